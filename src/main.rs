//! xml2cli - Main entry point
//!
//! Reads subsystem XML (or a JSON operation list) and prints the equivalent
//! management CLI script. The script goes to stdout; logs go to stderr.

use anyhow::{Context, Result};
use std::fs;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use xml2cli::cli::{Cli, Commands, OutputArgs, ShapeArgs};
use xml2cli::config_file::ConversionConfig;
use xml2cli::converter;
use xml2cli::engine::assembler;
use xml2cli::model::Operation;
use xml2cli::types::SubsystemAddStrategy;

/// Initialize the tracing subscriber with appropriate settings
fn init_tracing() {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() {
    init_tracing();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            shape,
            output,
        } => {
            let converters = shape.build_all(input.to_builders()?)?;
            // every converter carries the same shape settings
            let (strategy, batch) = converters
                .first()
                .map(|c| (c.strategy(), c.batch()))
                .unwrap_or((SubsystemAddStrategy::default(), true));
            for conversion in &converters {
                info!(
                    subsystem = conversion.subsystem_name(),
                    namespace = conversion.namespace(),
                    "Converting subsystem XML"
                );
            }
            info!(%strategy, batch, "Assembling script");
            let script = converter::convert_subsystems_to_cli(&converters, strategy, batch)?;
            emit(&script, &output)
        }
        Commands::Operations { input } => {
            let converters = ShapeArgs::default().build_all(input.to_builders()?)?;
            let operations = converter::convert_subsystems_to_operations(&converters)?;
            println!("{}", serde_json::to_string_pretty(&operations)?);
            Ok(())
        }
        Commands::Render {
            operations,
            shape,
            output,
        } => {
            let content = fs::read_to_string(&operations)
                .with_context(|| format!("Failed to read operations from {:?}", operations))?;
            let operations: Vec<Operation> =
                serde_json::from_str(&content).context("Failed to parse operations JSON")?;
            let script = assembler::assemble(
                &operations,
                shape.strategy.unwrap_or_default(),
                !shape.no_batch,
            );
            emit(&script, &output)
        }
        Commands::Validate { config } => {
            info!("Validating configuration file: {:?}", config);
            let conversion = ConversionConfig::load_from_file(&config)?;
            conversion.validate()?;
            let converters = ShapeArgs::default().build_all(conversion.to_builders()?)?;
            let operations = converter::convert_subsystems_to_operations(&converters)?;
            let names: Vec<&str> = converters.iter().map(|c| c.subsystem_name()).collect();
            println!(
                "✓ Configuration is valid: {} operation(s) for subsystem(s) {}",
                operations.len(),
                names.join(", ")
            );
            Ok(())
        }
    }
}

/// Print the script or write it to the requested file
fn emit(script: &str, output: &OutputArgs) -> Result<()> {
    let text = output.decorate(script);
    match &output.output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write script to {:?}", path))?;
            info!("Script written to {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}
