use anyhow::Context;
use clap::Parser;
use pharmsim::core::ExperimentSource;
use pharmsim::utils::error::ErrorSeverity;
use pharmsim::utils::{logger, validation::Validate};
use pharmsim::{ExperimentConfig, IleumExperiment, LabEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "ileum-lab")]
#[command(about = "Chicken ileum dose-response virtual lab driven by a TOML experiment file")]
struct Args {
    /// Path to TOML experiment file
    #[arg(short, long, default_value = "experiment.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the simulate setting from the experiment file
    #[arg(long)]
    simulate: Option<bool>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Dry run - show what would be computed without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting ileum virtual lab");
    tracing::info!("📁 Loading experiment from: {}", args.config);

    let mut config = ExperimentConfig::from_file(&args.config)
        .with_context(|| format!("failed to load experiment file '{}'", args.config))?;

    if let Some(simulate) = args.simulate {
        config.experiment.simulate = Some(simulate);
        tracing::info!("🔧 Simulation overridden to: {}", simulate);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Experiment validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Experiment loaded and validated successfully");
    display_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let output_root = storage.clone();
    let engine = LabEngine::new(IleumExperiment::new(storage, config));

    match engine.run().await {
        Ok(outputs) => {
            tracing::info!("✅ Experiment completed successfully!");
            for name in outputs {
                println!("📁 {}", output_root.full_path(&name));
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Experiment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_summary(config: &ExperimentConfig, args: &Args) {
    println!("📋 Experiment Summary:");
    println!("  Name: {}", config.experiment.name);
    if let Some(description) = &config.experiment.description {
        println!("  Description: {}", description);
    }
    println!(
        "  Responses: {}",
        if config.simulation_enabled() {
            "auto-generated (virtual lab model)"
        } else {
            "observed values"
        }
    );

    let drug_a = config.drug_a();
    println!(
        "  Drug A: {} ({} doses, Max {}, EC50 {}, n {})",
        drug_a.drug,
        drug_a.doses.len(),
        drug_a.params.max,
        drug_a.params.ec50,
        drug_a.params.n
    );
    if let Some(drug_b) = config.drug_b() {
        println!(
            "  Drug B: {} ({} doses, Max {})",
            drug_b.drug,
            drug_b.doses.len(),
            drug_b.params.max
        );
        println!("  Interaction: {}", config.antagonism().label());
    }

    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|format| format.extension())
        .collect();
    println!("  Output: {} ({})", config.output_path(), formats.join(", "));
    if let Some(bundle) = config.bundle_filename() {
        println!("  Bundle: {} (ZIP)", bundle);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
