//! Command implementations for argo-wrangler

use crate::accessor::ArgoAccessor;
use crate::cli::args::{Args, Commands, FloatArgs, ReshapeArgs};
use crate::constants::{DIM_N_LEVELS, DIM_N_PROF, SPARSINESS_ATTR};
use crate::dataset::Dataset;
use crate::error::ArgoError;
use crate::io::{read_table, write_parquet};
use crate::loader::{Institute, LocalLoader};
use crate::models::CastReport;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Run the selected subcommand
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Arguments: {:?}", args);

    match args.command {
        Commands::Locate(float) => run_locate(&float),
        Commands::Reshape(reshape) => run_reshape(&reshape),
        #[cfg(feature = "netcdf")]
        Commands::Flatten(flatten) => run_flatten(&flatten),
    }
}

fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("argo_wrangler={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to install the log subscriber")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn run_locate(float: &FloatArgs) -> Result<()> {
    // Locating never opens the file, any reader will do
    let loader = LocalLoader::new(float.loader_config(), |path: &Path| -> crate::Result<Dataset> {
        Err(ArgoError::FileNotFound {
            path: path.to_path_buf(),
        })
    });
    let path = loader.profile_path(Institute::parse(&float.institute), float.wmo)?;

    let marker = if path.is_file() {
        "found".green()
    } else {
        "missing".red()
    };
    println!("{} [{}]", path.display(), marker);
    Ok(())
}

fn run_reshape(args: &ReshapeArgs) -> Result<()> {
    let start_time = Instant::now();

    let frame = read_table(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let coords: Vec<&str> = args.coords.iter().map(String::as_str).collect();
    let points = Dataset::from_point_frame(&frame, &coords)?;

    let mut argo = ArgoAccessor::with_config(points, args.accessor_config())?;
    if !args.no_cast {
        print_cast_report(&argo.cast_types()?);
    }

    let profiles = argo.point2profile()?;
    let mut table = profiles.to_frame()?;
    let rows = write_parquet(&mut table, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Reshape finished in {:.2?}", start_time.elapsed());
    println!("{}", "Reshape complete".green().bold());
    println!("  Points:     {}", frame.height());
    println!(
        "  Profiles:   {}",
        profiles.dim_len(DIM_N_PROF).unwrap_or(0)
    );
    println!(
        "  Levels:     {}",
        profiles.dim_len(DIM_N_LEVELS).unwrap_or(0)
    );
    if let Some(sparsiness) = profiles.attr(SPARSINESS_ATTR) {
        println!("  Filled:     {}%", sparsiness);
    }
    println!("  Cells:      {} -> {}", rows, args.output.display().to_string().cyan());
    Ok(())
}

#[cfg(feature = "netcdf")]
fn run_flatten(args: &crate::cli::args::FlattenArgs) -> Result<()> {
    let start_time = Instant::now();

    let loader = LocalLoader::netcdf(args.float.loader_config());
    let profiles = loader.load(Institute::parse(&args.float.institute), args.float.wmo)?;

    let mut argo = ArgoAccessor::new(profiles)?;
    let points = argo.profile2point()?;
    if !args.no_cast {
        print_cast_report(&argo.cast_types()?);
    }

    let mut table = argo.dataset().to_frame()?;
    let rows = write_parquet(&mut table, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Flatten finished in {:.2?}", start_time.elapsed());
    println!("{}", "Flatten complete".green().bold());
    println!(
        "  Points:     {}",
        points.dim_len(crate::constants::DIM_INDEX).unwrap_or(0)
    );
    println!("  Rows:       {} -> {}", rows, args.output.display().to_string().cyan());
    Ok(())
}

fn print_cast_report(report: &CastReport) {
    if !report.converted.is_empty() {
        println!(
            "{} {}",
            "Normalised:".bold(),
            report.converted.join(", ")
        );
    }
    for failure in &report.failures {
        println!(
            "{} {} could not be cast from {} to {}; values: {}",
            "Warning:".yellow().bold(),
            failure.column,
            failure.from,
            failure.to,
            failure.distinct_values.join(", ")
        );
    }
}
