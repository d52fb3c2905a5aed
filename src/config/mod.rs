pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use checker::CliConfig;

#[cfg(feature = "cli")]
mod checker {
    use crate::core::interaction::{MAX_AGE, MAX_DOSE_MG, MIN_AGE, MIN_DOSE_MG};
    use crate::domain::model::{Drug, OrganStatus, Patient};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_path, validate_range, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "pharmsim")]
    #[command(about = "Drug interaction checker and dose-response curve for teaching")]
    pub struct CliConfig {
        #[arg(long, default_value = "Paracetamol")]
        pub drug_a: Drug,

        #[arg(long, default_value = "Paracetamol")]
        pub drug_b: Drug,

        #[arg(long, default_value = "25", help = "Patient age in years (1-90)")]
        pub age: u32,

        #[arg(long, default_value = "Normal")]
        pub kidney: OrganStatus,

        #[arg(long, default_value = "Normal")]
        pub liver: OrganStatus,

        #[arg(long, default_value = "500", help = "Dose of drug A in mg (50-1000)")]
        pub dose: f64,

        #[arg(long, help = "Directory to write the dose-response table to")]
        pub curve_output: Option<String>,

        #[arg(long, default_value = "50")]
        pub curve_points: usize,

        #[arg(long, help = "Print the assessment as JSON")]
        pub json: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn patient(&self) -> Patient {
            Patient {
                age: self.age,
                kidney: self.kidney,
                liver: self.liver,
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_range("age", self.age, MIN_AGE, MAX_AGE)?;
            validate_range("dose", self.dose, MIN_DOSE_MG, MAX_DOSE_MG)?;
            validate_range("curve_points", self.curve_points, 2, 10_000)?;
            if let Some(path) = &self.curve_output {
                validate_path("curve_output", path)?;
            }
            Ok(())
        }
    }

}
