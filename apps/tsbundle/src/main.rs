use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;
use tsbundle_emit::{Config, Reporter};

#[derive(Parser)]
#[command(name = "tsbundle")]
#[command(about = "Tools for packaging TypeScript projects for editors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emit a JSON bundle of a TypeScript project
    Emit(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Emit(mut cfg) => {
            cfg.initialize()?;
            info!(
                "Emitting bundle for {} (using {} threads)",
                cfg.project_root().display(),
                rayon::current_num_threads()
            );
            debug!("Config: {:?}", cfg);

            // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
            let reporter = Reporter::new(BufWriter::new(std::io::stdout()), cfg.verbose);
            let emitted = tsbundle_emit::emit_project(&cfg, &reporter);
            reporter.into_inner().flush()?;

            match emitted {
                Some(path) => info!("Emitted {} in {}ms", path.display(), start.elapsed().as_millis()),
                None => info!("Emit failed after {}ms", start.elapsed().as_millis()),
            }

            // Errors have already been reported; emit never fails the process
            Ok(())
        }
    }
}
