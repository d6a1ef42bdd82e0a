//! Command-line interface for the SBML to BioPAX converter
//!
//! # Usage
//!
//! ```bash
//! # Convert an SBML model into BioPAX OWL
//! sbml2biopax convert model.xml model.owl
//!
//! # Create a root pathway and use a custom namespace
//! sbml2biopax convert model.xml model.owl --pathway --xml-base http://example.org/recon#
//!
//! # Print a summary and consistency report of the converted model
//! sbml2biopax inspect model.xml
//! ```

use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::{info, LevelFilter};
use sbml2biopax::{
    convert::config::ConverterConfigBuilder,
    info::ConversionSummary,
    io::{load_source_model, save_biopax_model, OutputFormat},
    prelude::SbmlToBiopaxConverter,
    validation::consistency::check_consistency,
};

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Convert an SBML model into BioPAX
    Convert {
        /// Path to the SBML (or JSON) source model
        input: PathBuf,

        /// Path to write the BioPAX model to
        output: PathBuf,

        /// Create a root pathway that contains all the interactions
        #[arg(long)]
        pathway: bool,

        /// Namespace prepended to every generated identifier
        #[arg(long, default_value = "")]
        xml_base: String,

        /// Output format, guessed from the output extension if omitted
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Print a summary of the converted model
        #[arg(short, long)]
        summary: bool,
    },
    /// Convert an SBML model and print its summary and consistency report
    Inspect {
        /// Path to the SBML (or JSON) source model
        input: PathBuf,

        /// Create a root pathway that contains all the interactions
        #[arg(long)]
        pathway: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Owl,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Owl => OutputFormat::Owl,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".bold().red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Convert {
            input,
            output,
            pathway,
            xml_base,
            format,
            summary,
        } => {
            let source = load_source_model(input)?;
            let config = ConverterConfigBuilder::default()
                .xml_base(xml_base)
                .make_pathway(*pathway)
                .build()?;

            let model = SbmlToBiopaxConverter::new(config).convert(&source)?;
            save_biopax_model(output, &model, format.map(OutputFormat::from))?;
            info!("Saved BioPAX model to {}", output.display());

            if *summary {
                println!("{}", ConversionSummary::new(&model));
            }
        }
        Commands::Inspect { input, pathway } => {
            let source = load_source_model(input)?;
            let config = ConverterConfigBuilder::default()
                .make_pathway(*pathway)
                .build()?;

            let model = SbmlToBiopaxConverter::new(config).convert(&source)?;
            println!("{}", ConversionSummary::new(&model));

            let report = check_consistency(&model);
            for result in &report.errors {
                println!("{result}");
            }

            if report.is_valid {
                println!("{}", "Model is consistent".bold().green());
            } else {
                println!("{}", "Model is inconsistent".bold().red());
            }
        }
    }

    Ok(())
}
