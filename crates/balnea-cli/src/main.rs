mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "balnea",
    version,
    about = "Extract and consolidate bathing-water quality bulletins"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract candidate station records from bulletin PDFs (without consolidating)
    Extract {
        /// Bulletin PDF file(s)
        files: Vec<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted records to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Public URL recorded as provenance instead of the local file path
        #[arg(long = "source-url", value_name = "URL")]
        source_url: Option<String>,
    },
    /// Run the full pipeline: extract, consolidate, geocode, project
    Consolidate {
        /// Bulletin PDF file(s); ranked newest-first by filename date
        files: Vec<PathBuf>,

        /// Geocode reference table (code,beach,reference,city,lat,lng)
        #[arg(short, long, value_name = "FILE")]
        geocodes: Option<PathBuf>,

        /// Previous run's points JSON, used to seed station history
        #[arg(long, value_name = "FILE")]
        previous: Option<PathBuf>,

        /// Where to write the projected points JSON
        #[arg(long = "points-out", value_name = "FILE", default_value = "points.json")]
        points_out: PathBuf,

        /// Where to write the operator index CSV
        #[arg(long = "index-out", value_name = "FILE")]
        index_out: Option<PathBuf>,

        /// Public URL recorded as provenance instead of the local file path
        #[arg(long = "source-url", value_name = "URL")]
        source_url: Option<String>,
    },
    /// Inspect and maintain the geocode reference table
    Geocode {
        #[command(subcommand)]
        action: GeocodeAction,
    },
}

#[derive(Subcommand)]
enum GeocodeAction {
    /// Report stations from the index that still lack coordinates
    Coverage {
        /// Station index CSV produced by consolidate --index-out
        #[arg(long, value_name = "FILE")]
        index: PathBuf,

        /// Geocode reference table CSV
        #[arg(long, value_name = "FILE")]
        geocodes: PathBuf,
    },
    /// Merge an official coordinates CSV into the geocode table
    Import {
        /// Source CSV; code,lat,lng or the full six-column format
        #[arg(long, value_name = "FILE")]
        src: PathBuf,

        /// Geocode reference table CSV to update in place
        #[arg(long, value_name = "FILE")]
        geocodes: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            files,
            output,
            out,
            source_url,
        } => commands::extract::run(files, &output, out, source_url),
        Commands::Consolidate {
            files,
            geocodes,
            previous,
            points_out,
            index_out,
            source_url,
        } => commands::consolidate::run(files, geocodes, previous, points_out, index_out, source_url),
        Commands::Geocode { action } => match action {
            GeocodeAction::Coverage { index, geocodes } => {
                commands::geocode::coverage(&index, &geocodes)
            }
            GeocodeAction::Import { src, geocodes } => commands::geocode::import(&src, &geocodes),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
