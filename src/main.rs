use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use heatmap::{render_svg, Dataset, HeatMap, HeatMapConfig, RenderOptions};

/// Render a monthly temperature dataset as an SVG heat map
#[derive(Parser, Debug)]
#[command(name = "heatmap", version, about)]
struct Cli {
    /// Dataset JSON with baseTemperature and monthlyVariance
    #[arg(value_name = "DATASET")]
    dataset: PathBuf,

    /// Layout config JSON; missing fields use the defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the SVG here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Leave out per-cell tooltips
    #[arg(long)]
    no_tooltip: bool,

    /// Leave out the color legend
    #[arg(long)]
    no_legend: bool,

    /// Leave out the axis titles
    #[arg(long)]
    no_labels: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("heatmap: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> heatmap::Result<()> {
    let config = match &cli.config {
        Some(path) => HeatMapConfig::from_path(path)?,
        None => HeatMapConfig::default(),
    };
    let options = RenderOptions {
        show_tooltip: !cli.no_tooltip,
        show_legend: !cli.no_legend,
        show_labels: !cli.no_labels,
    };

    let dataset = Dataset::from_path(&cli.dataset)?;
    let heat_map = HeatMap::compute(&dataset, &config)?;
    let svg = render_svg(&heat_map, &options)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, svg)?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}
