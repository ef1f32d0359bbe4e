use bitmap_handle::imaging::{Color, Format, RustBackend};
use bitmap_handle::{Image, ImageFlags, config, output};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Shared flags for commands that open an image.
#[derive(clap::Args, Clone)]
struct ImageArgs {
    /// Image file
    path: PathBuf,

    /// Codec to use instead of the one named by the file extension
    #[arg(long)]
    format: Option<Format>,
}

#[derive(Parser)]
#[command(name = "bitmap-handle")]
#[command(about = "Load, edit and save bitmaps with read/write access control")]
#[command(long_about = "\
Load, edit and save bitmaps with read/write access control

Every command opens one image handle. Read access loads the file, write
access allows edits and saving, and a handle opened for writing without
a loadable file starts from a blank image.

Defaults for new images come from bitmap-handle.toml (see gen-config).")]
#[command(version)]
struct Cli {
    /// Config file with defaults for new handles
    #[arg(long, default_value = "bitmap-handle.toml", global = true)]
    config: PathBuf,

    /// Log loads, allocations and releases
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a blank image filled with the clear color
    Create {
        #[command(flatten)]
        image: ImageArgs,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Bits per pixel
        #[arg(long)]
        bpp: Option<u32>,
    },
    /// Set one pixel and save
    Draw {
        #[command(flatten)]
        image: ImageArgs,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
        /// Color as #rrggbb or #rrggbbaa
        #[arg(long)]
        color: Color,
    },
    /// Fill the whole image with a color and save
    Clear {
        #[command(flatten)]
        image: ImageArgs,
        /// Color as #rrggbb or #rrggbbaa (defaults to the configured clear color)
        #[arg(long)]
        color: Option<Color>,
    },
    /// Print size, depth and access of an image
    Info {
        #[command(flatten)]
        image: ImageArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock bitmap-handle.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let backend = RustBackend::new();

    match cli.command {
        Command::Create {
            image,
            width,
            height,
            bpp,
        } => {
            let config = config::load_config(&cli.config)?;
            let options = config
                .open_options()
                .flags(ImageFlags::WRITE)
                .size(
                    width.unwrap_or(config.width),
                    height.unwrap_or(config.height),
                )
                .bpp(bpp.unwrap_or(config.bpp));
            let format = resolve_format(&config, &image);
            let mut handle = Image::open(&backend, format, &image.path, options)?;
            let applied = handle.clear_image()?;
            let saved = applied && handle.save_image()?;
            report_edit(&image.path, "created", applied, saved)?;
        }
        Command::Draw {
            image,
            x,
            y,
            color,
        } => {
            let config = config::load_config(&cli.config)?;
            let format = resolve_format(&config, &image);
            let mut handle = Image::open(&backend, format, &image.path, config.open_options())?;
            let applied = handle.draw_pixel(x, y, color)?;
            let saved = applied && handle.save_image()?;
            let edit = format!("pixel ({x}, {y}) set to {color}");
            report_edit(&image.path, &edit, applied, saved)?;
        }
        Command::Clear { image, color } => {
            let config = config::load_config(&cli.config)?;
            let format = resolve_format(&config, &image);
            let mut handle = Image::open(&backend, format, &image.path, config.open_options())?;
            if let Some(color) = color {
                handle.set_clear_pixel_color(color);
            }
            let applied = handle.clear_image()?;
            let saved = applied && handle.save_image()?;
            let edit = format!("cleared to {}", handle.clear_color());
            report_edit(&image.path, &edit, applied, saved)?;
        }
        Command::Info { image, json } => {
            let config = config::load_config(&cli.config)?;
            let format = resolve_format(&config, &image);
            let options = config.open_options().flags(ImageFlags::READ);
            let handle = Image::open(&backend, format, &image.path, options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&handle.info())?);
            } else {
                output::print_info(&handle.info());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Print a finished edit, or fail with the same line when it was rejected
/// or not saved.
fn report_edit(
    path: &Path,
    edit: &str,
    applied: bool,
    saved: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let line = output::edit_result(&path.display().to_string(), edit, applied, saved)?;
    println!("{}", line);
    Ok(())
}

/// Install the `env_logger` backend for the `log` facade.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn resolve_format(config: &config::HandleConfig, image: &ImageArgs) -> Format {
    image.format.unwrap_or_else(|| config.format_for(&image.path))
}
