use clap::Parser;
use dicomsplit_core::cli::{Cli, OutputFormat};
use dicomsplit_core::{DicomSplitter, SplitSummary, TextReport};
use log::{error, info};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let splitter = match DicomSplitter::new(cli.to_config()) {
        Ok(splitter) => splitter,
        Err(e) => {
            error!("Invalid arguments: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut summaries = Vec::new();
    for directory in &cli.directories {
        if !directory.is_dir() {
            eprintln!("Error: {} is not a directory", directory.display());
            process::exit(1);
        }

        match splitter.split_directory(directory) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!("Failed to split {}: {}", directory.display(), e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }

    info!("Split {} directories", summaries.len());
    output_summaries(&summaries, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_summaries(summaries: &[SplitSummary], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for summary in summaries {
                println!("{}", TextReport::new(summary));
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(summaries) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                let _ = summaries;
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
