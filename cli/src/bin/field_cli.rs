use clap::{Parser, Subcommand};
use cli::{report_lines, Survey};
use color_eyre::eyre::{Result, WrapErr};
use field_area::{coordinates_from_geojson_string, AreaEstimator, SessionCommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a survey file and report the field area
    Estimate {
        /// Path to the survey file (.toml or .json)
        #[arg(short, long)]
        survey: PathBuf,
        /// Write the boundary as GeoJSON
        #[arg(short, long)]
        geojson: Option<PathBuf>,
        /// Write the field record (area + coordinates) as JSON
        #[arg(short, long)]
        record: Option<PathBuf>,
    },
    /// Recompute the area of a stored GeoJSON boundary
    Boundary {
        /// Path to the GeoJSON file
        #[arg(short, long)]
        geojson: PathBuf,
    },
    /// Print the JSON schema of the session commands
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Estimate { survey, geojson, record } => {
            estimate(survey, geojson.as_deref(), record.as_deref())?;
        }
        Commands::Boundary { geojson } => {
            boundary(geojson)?;
        }
        Commands::Schema => {
            for name in SessionCommand::command_names() {
                info!("Command: {}", name);
            }
            println!("{}", serde_json::to_string_pretty(&SessionCommand::schema())?);
        }
    }

    Ok(())
}

fn estimate(survey_path: &Path, geojson: Option<&Path>, record: Option<&Path>) -> Result<()> {
    let survey = Survey::from_file(survey_path)
        .wrap_err_with(|| format!("Failed to load survey {}", survey_path.display()))?;
    info!("Survey '{}': {} photos", survey.name, survey.samples.len());

    let (session, outcome) = survey.replay()?;
    if outcome.rejected > 0 {
        info!("{} photos were rejected", outcome.rejected);
    }

    if !session.is_complete() {
        println!("Not enough photos for an area: at least 3 are needed");
    }
    for line in report_lines(&outcome.record.report) {
        println!("{line}");
    }

    if let Some(path) = geojson {
        let collection = session.to_geojson()?;
        std::fs::write(path, serde_json::to_string_pretty(&collection)?)?;
        info!("GeoJSON saved to: {:?}", path);
    }
    if let Some(path) = record {
        std::fs::write(path, outcome.record.to_json()?)?;
        info!("Field record saved to: {:?}", path);
    }

    Ok(())
}

fn boundary(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let coordinates = coordinates_from_geojson_string(&content)?;
    info!("Boundary with {} vertices", coordinates.len());

    let estimate = AreaEstimator::new().estimate(&coordinates)?;
    for line in report_lines(&estimate.report) {
        println!("{line}");
    }
    println!("perimeter: {:.1} m", estimate.perimeter_m);
    Ok(())
}
