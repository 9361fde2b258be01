use clap::{Parser, Subcommand};
use drawable_resizer::density::DensityBucket;
use drawable_resizer::export::{ExportOptions, ExportRequest};
use drawable_resizer::imaging::ResampleFilter;
use drawable_resizer::{config, export, output, sources};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "drawable-resizer")]
#[command(about = "Export an image at every Android drawable density")]
#[command(long_about = "\
Export an image at every Android drawable density

Give it artwork drawn at one density and it writes a scaled copy for each
selected bucket into drawable-<bucket>/ folders beside the source:

  art/
  ├── logo.png                     # Source, drawn at xxxhdpi
  └── logo/
      ├── drawable-ldpi/logo.png   # 0.75 / 4.0 of the source size
      ├── drawable-mdpi/logo.png   # 1.0 / 4.0
      ├── drawable-hdpi/logo.png   # 1.5 / 4.0
      ├── drawable-xhdpi/logo.png  # 2.0 / 4.0
      ├── drawable-xxhdpi/logo.png # 3.0 / 4.0
      └── drawable-xxxhdpi/logo.png

PNG sources are written as PNG, everything else as JPEG. A bucket that fails
does not stop the others; the exit status is non-zero if any bucket failed.

Settings are read from ./drawable-resizer.toml when present. Run
'drawable-resizer gen-config' to generate a documented one.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./drawable-resizer.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Flags for the export command. Each one overrides the config file.
#[derive(clap::Args)]
struct ExportArgs {
    /// Image files, or directories whose images are exported
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Density the source artwork is drawn at
    #[arg(long)]
    source_density: Option<DensityBucket>,

    /// Buckets to produce, comma separated (e.g. mdpi,hdpi,xhdpi)
    #[arg(long, value_delimiter = ',')]
    densities: Vec<DensityBucket>,

    /// JPEG quality, 1-100
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Resampling filter: triangle, catmull-rom, gaussian, lanczos3
    #[arg(long)]
    filter: Option<ResampleFilter>,

    /// Print reports as JSON instead of progress lines
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Export images into drawable-<bucket> folders
    Export(ExportArgs),
    /// Check whether a set of paths contains a decodable image
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the density table and the scale each bucket gets
    Densities {
        /// Density the source artwork is drawn at
        #[arg(long)]
        source_density: Option<DensityBucket>,
    },
    /// Print a stock drawable-resizer.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Export(args) => {
            let config = config::load_config(cli.config.as_deref(), Path::new("."))?;
            run_export(args, config)
        }
        Command::Check { paths } => {
            let verdicts: Vec<(PathBuf, bool)> = paths
                .iter()
                .map(|p| (p.clone(), sources::is_valid_image_drop(std::slice::from_ref(p))))
                .collect();
            output::print_check_output(&verdicts);
            if sources::is_valid_image_drop(&paths) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Densities { source_density } => {
            let config = config::load_config(cli.config.as_deref(), Path::new("."))?;
            output::print_density_table(source_density.unwrap_or(config.export.source_density));
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_export(
    args: ExportArgs,
    mut config: config::ResizerConfig,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if let Some(density) = args.source_density {
        config.export.source_density = density;
    }
    if !args.densities.is_empty() {
        config.export.densities = args.densities;
    }
    if let Some(quality) = args.quality {
        config.images.jpeg_quality = quality;
    }
    if let Some(filter) = args.filter {
        config.images.filter = filter;
    }
    config.validate()?;

    init_thread_pool(&config.processing);
    let paths = sources::collect_sources(&args.paths)?;
    let options = ExportOptions::from_config(&config);

    let mut all_complete = true;
    let mut json_reports = Vec::new();

    for source in &paths {
        let request = ExportRequest::new(
            source,
            config.export.source_density,
            config.export.densities.iter().copied(),
        );

        let (progress, printer) = if args.json {
            (None, None)
        } else {
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_export_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            (Some(tx), Some(printer))
        };

        let result = export::save_all(&request, &options, progress);
        if let Some(printer) = printer {
            printer
                .join()
                .map_err(|_| "progress printer panicked")?;
        }

        match result {
            Ok(report) => {
                all_complete &= report.is_complete();
                if args.json {
                    json_reports.push(output::json_report(&report));
                } else {
                    output::print_export_summary(&report);
                }
            }
            Err(e) => {
                all_complete = false;
                if args.json {
                    log::error!("{}", e);
                    json_reports.push(serde_json::json!({
                        "source": source,
                        "error": e.to_string(),
                    }));
                } else {
                    eprintln!("{}", e);
                }
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_reports)?);
    }

    Ok(if all_complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
