use clap::Parser;
use subway_sections::utils::error::ErrorSeverity;
use subway_sections::utils::{logger, validation::Validate};
use subway_sections::{
    CliConfig, InMemoryLineRepository, InMemoryStationRepository, LineConfig, LineService,
    OutputFormat, ScenarioRunner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading line scenario from {}", args.config);

    let config = match LineConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load scenario '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Scenario validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let format: OutputFormat = match &args.format {
        Some(format) => format.parse()?,
        None => config.output_format()?,
    };

    if args.dry_run {
        println!(
            "Line '{}': {} stations, {} sections, {} operations ({:?} output)",
            config.line.name,
            config.stations.len(),
            config.sections.len(),
            config.operations.len(),
            format
        );
        return Ok(());
    }

    let service = LineService::new(
        InMemoryLineRepository::new(),
        InMemoryStationRepository::new(),
    );
    let runner = ScenarioRunner::new(service);

    match runner.run(&config).await {
        Ok(report) => {
            print!("{}", report.render(format)?);
            if format != OutputFormat::Text {
                println!();
            }
        }
        Err(e) => {
            tracing::error!(
                "Replay failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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
