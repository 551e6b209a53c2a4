use clap::{Parser, Subcommand};
use kaleidoscope::config::{self, BackendKind};
use kaleidoscope::generate::{self, GenerateError, GenerateOptions, GenerateSummary, Observer};
use kaleidoscope::imaging::{ImageBackend, MagickBackend, RustBackend};
use kaleidoscope::model::Gallery;
use kaleidoscope::render::HtmlRenderer;
use kaleidoscope::{output, reader, scaffold};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kaleidoscope")]
#[command(about = "Static photo gallery generator")]
#[command(long_about = "\
Static photo gallery generator

Every directory holding an album.ini is an album. The [photos] section lists
the photos to show, in order, with optional captions.

Gallery structure:

  gallery/
  ├── gallery.ini              # [gallery] title, author
  ├── kaleidoscope.toml        # Build settings (optional)
  ├── 2017-italy/
  │   ├── album.ini            # [album] title, date = YYYY-MM-DD
  │   │                        # [photos] IMG_01.jpg = Caption| hidden part
  │   └── IMG_01.jpg
  └── drafts/                  # No album.ini = skipped

Output:

  output/
  ├── index.html               # Albums grouped by year
  ├── assets/
  └── 2017-italy/
      ├── index.html
      ├── thumb/IMG_01.jpg     # 300x200 bound
      └── large/IMG_01.jpg     # 1500x1000 bound

Resized images that already exist are never redone; delete one to force it.

Run 'kaleidoscope gen-config' to generate a documented kaleidoscope.toml.")]
#[command(version)]
struct Cli {
    /// Gallery root directory
    #[arg(long, default_value = ".", global = true)]
    gallery: PathBuf,

    /// Output directory [default: <GALLERY>/output]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize photos and render the site
    Build {
        /// Resize backend (overrides kaleidoscope.toml)
        #[arg(long, value_enum)]
        backend: Option<BackendKind>,
        /// Parallel resize workers (overrides kaleidoscope.toml)
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Write a default gallery.ini
    InitGallery {
        /// Overwrite an existing gallery.ini
        #[arg(long)]
        force: bool,
    },
    /// Write an album.ini listing every image in DIRECTORY
    InitAlbum {
        /// Album directory, relative to the gallery root
        directory: PathBuf,
        /// Overwrite an existing album.ini
        #[arg(long)]
        force: bool,
    },
    /// Read the gallery without building and show what would be built
    Check {
        /// Print the gallery model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock kaleidoscope.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { backend, jobs } => {
            let mut site_config = config::load_config(&cli.gallery)?;
            if let Some(backend) = backend {
                site_config.resize.backend = backend;
            }
            if let Some(jobs) = jobs {
                site_config.processing.max_processes = jobs;
            }
            site_config.validate()?;

            let output_dir = cli
                .output
                .clone()
                .unwrap_or_else(|| cli.gallery.join("output"));

            println!("==> Reading {}", cli.gallery.display());
            let mut gallery = reader::read_gallery(&cli.gallery)?;

            let jobs = init_thread_pool(&site_config.processing);
            let options = GenerateOptions {
                bounds: site_config.bounds(),
                jobs,
                assets: site_config.asset_source(&cli.gallery),
            };
            let reporter = output::ProgressReporter::new();

            println!("==> Building {}", output_dir.display());
            let summary = match site_config.resize.backend {
                BackendKind::Magick => {
                    let backend = MagickBackend::with_command(&site_config.resize.command);
                    build(&mut gallery, &output_dir, &backend, &reporter, &options)?
                }
                BackendKind::Builtin => {
                    build(&mut gallery, &output_dir, &RustBackend::new(), &reporter, &options)?
                }
            };
            output::print_summary(&summary, &output_dir);
        }
        Command::InitGallery { force } => {
            let path = scaffold::generate_gallery_ini(&cli.gallery, force)?;
            println!("{}", output::format_generated(&path));
        }
        Command::InitAlbum { directory, force } => {
            let path = scaffold::generate_album_ini(&cli.gallery.join(directory), force)?;
            println!("{}", output::format_generated(&path));
        }
        Command::Check { json } => {
            let gallery = reader::read_gallery(&cli.gallery)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&gallery)?);
            } else {
                output::print_check_output(&gallery);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn build<B: ImageBackend>(
    gallery: &mut Gallery,
    output_dir: &Path,
    backend: &B,
    observer: &dyn Observer,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    generate::generate(gallery, output_dir, backend, &HtmlRenderer, observer, options)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down,
/// not up. Returns the worker count.
fn init_thread_pool(processing: &config::ProcessingConfig) -> usize {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
    threads
}
