use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use drplot::{DatasetCollection, ExportFormat, PlotError, ViewContainer, ViewerConfig};

/// Compare dimensionality-reduction techniques across metric plots.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file: dataset -> metric -> {scales, MDS, TSNE, RANDOM}
    #[arg(value_name = "DATA_JSON")]
    data: PathBuf,

    /// Viewer config (YAML); defaults to ~/.drplot/config.yaml when present
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset to show first
    #[arg(long)]
    dataset: Option<String>,

    /// Write the plots of every dataset (or only --dataset) to DIR and exit
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Export format: svg or png
    #[arg(long, default_value = "svg")]
    format: ExportFormat,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drplot=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "drplot failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::load_from_default_path()?.unwrap_or_default(),
    };
    let data = DatasetCollection::load(&args.data)?;
    if let Some(name) = &args.dataset {
        if !data.contains(name) {
            return Err(PlotError::MissingDataset(name.clone()).into());
        }
        config.default_dataset = Some(name.clone());
    }

    let single = args.dataset.is_some();
    let mut container = ViewContainer::new(Rc::new(data), config)?;
    if let Some(dir) = args.export_dir {
        let written = if single {
            container.export_all(&dir, args.format)?
        } else {
            container.export_datasets(&dir, args.format)?
        };
        for path in written {
            println!("{}", path.display());
        }
        return Ok(());
    }
    drplot::run_viewer(container)?;
    Ok(())
}
