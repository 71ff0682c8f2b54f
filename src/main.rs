use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wallpaper_gallery::catalog::{SiteBase, today_utc};
use wallpaper_gallery::{build, config, imaging::RustBackend, output};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "wallpaper-gallery")]
#[command(about = "Build device-sized wallpapers and a JSON catalog")]
#[command(long_about = "\
Build device-sized wallpapers and a JSON catalog

Source images are read per device and published as letterboxed PNGs,
JPEG thumbnails and a manifest:

  gallery-src/
  ├── paperpro/                    # One directory per device
  │   └── My Photo_01.png          # → docs/gallery/paperpro/my-photo-01.png
  └── rm2/
      └── sunset.png               # → docs/gallery/rm2/sunset.png

  docs/gallery/
  ├── index.json                   # Catalog of every generated image
  ├── thumbs/                      # 600px-wide JPEG previews
  ├── paperpro/
  └── rm2/

Public URLs use GALLERY_BASE_URL, then site.base_url from gallery.toml,
then GITHUB_REPOSITORY (owner/project → https://owner.github.io/project).

Run 'wallpaper-gallery gen-config' to generate a documented gallery.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root containing gallery-src/ and docs/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Verbose logging (per-image debug output)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render every source image and write the manifest (default)
    Build,
    /// List the sources each device would build, without rendering
    Check,
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            init_thread_pool(&site_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let base = SiteBase::from_env(site_config.site.base_url.as_deref());
            tracing::debug!(base = %base.as_str(), "resolved site base");
            let settings = build::BuildSettings {
                config: &site_config,
                base: &base,
            };
            let result = build::build(
                &RustBackend::new(),
                &cli.root,
                &settings,
                &today_utc(),
                Some(&tx),
            );
            drop(tx);
            printer.join().unwrap();
            output::print_build_summary(&result?, &cli.root);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            let plans = build::plan(&RustBackend::new(), &cli.root, &site_config)?;
            output::print_plan(&plans);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level chosen here.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
