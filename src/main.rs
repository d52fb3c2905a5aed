use clap::Parser;
use pharmsim::core::interaction::score_patient;
use pharmsim::core::table::{quick_curve, render_delimited};
use pharmsim::core::Storage;
use pharmsim::utils::error::{ErrorSeverity, SimError};
use pharmsim::utils::{logger, validation::Validate};
use pharmsim::{CliConfig, InteractionAssessment, LocalStorage};

const CURVE_FILENAME: &str = "dose_response.csv";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting pharmsim interaction checker");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let assessment = match score_patient(config.drug_a, config.drug_b, &config.patient(), config.dose) {
        Ok(assessment) => assessment,
        Err(e) => exit_with(&e),
    };

    if config.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print_assessment(&config, &assessment);
    }

    if let Some(dir) = &config.curve_output {
        if let Err(e) = write_curve(&config, dir).await {
            exit_with(&e);
        }
    }

    println!("⚠️ Educational use only. Not for clinical decision-making.");
    Ok(())
}

fn print_assessment(config: &CliConfig, assessment: &InteractionAssessment) {
    println!("🧪 {} + {} ({} mg)", config.drug_a, config.drug_b, config.dose);
    println!(
        "  Patient: age {}, kidney {}, liver {}",
        config.age, config.kidney, config.liver
    );
    println!("  Interaction Level: {}", assessment.tier);
    println!("  Effect Type: {}", assessment.description);
    println!(
        "  Predicted Toxicity Score: {}/100 ({} point(s))",
        assessment.toxicity_score, assessment.points
    );
    for factor in &assessment.factors {
        println!("    + {} ({})", factor.label(), factor.points());
    }
}

async fn write_curve(config: &CliConfig, dir: &str) -> pharmsim::Result<()> {
    let table = quick_curve(config.drug_a.as_str(), config.curve_points)?;
    let csv = render_delimited(&table, b',')?;

    let storage = LocalStorage::new(dir.to_string());
    storage.write_file(CURVE_FILENAME, csv.as_bytes()).await?;

    let path = storage.full_path(CURVE_FILENAME);
    tracing::info!("📁 Dose-response curve saved to: {}", path);
    println!("📁 Dose-response curve saved to: {}", path);
    Ok(())
}

fn exit_with(e: &SimError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
