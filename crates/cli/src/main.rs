#![deny(unsafe_code)]
//! Headless CLI for the triangle viewer.
//!
//! Subcommands:
//! - `render` -- draw the triangle on a software surface, write PNG
//! - `shaders` -- print the fixed vertex and fragment shaders

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use std::path::{Path, PathBuf};
use std::process;
use triangle_viewer_core::color::parse_channel_list;
use triangle_viewer_core::shader::{FRAGMENT_SHADER, VERTEX_SHADER};
use triangle_viewer_core::{draw_triangle, Initializer, Rgba, ViewerConfig};
use triangle_viewer_raster::snapshot::write_png;
use triangle_viewer_raster::SoftwareHost;

#[derive(Parser)]
#[command(name = "triangle-viewer", about = "Draw a single colored triangle")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the triangle and write a PNG snapshot.
    Render {
        /// Color as 0-255 channels, "R,G,B" or "R,G,B,A". Defaults to the
        /// config's initial color.
        #[arg(short, long)]
        color: Option<String>,

        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 256)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 256)]
        height: u32,

        /// Surface identifier.
        #[arg(long, default_value = "triangle")]
        surface: String,

        /// Output file path.
        #[arg(short, long, default_value = "triangle.png")]
        output: PathBuf,

        /// Viewer config as a JSON string.
        #[arg(long, default_value = "{}")]
        config: String,
    },
    /// Print the fixed shader pair.
    Shaders,
}

/// Arguments of a single `render` invocation.
struct RenderJob<'a> {
    color: Option<&'a str>,
    width: u32,
    height: u32,
    surface: &'a str,
    output: &'a Path,
    config: &'a str,
}

/// Resolves the color, draws it on a fresh software surface and writes
/// the frame. Returns the color that was drawn.
fn render(job: &RenderJob<'_>) -> Result<Rgba, CliError> {
    let config = ViewerConfig::from_json(job.config)?;
    let color = match job.color {
        Some(text) => parse_channel_list(text)?,
        None => config.initial_color,
    };

    let host = SoftwareHost::new().with_surface(job.surface, job.width, job.height);
    let mut initializer = Initializer::with_config(host, config);
    let ctx = initializer.initialize(job.surface)?;

    draw_triangle(&ctx, color)?;
    write_png(ctx.backend(), job.output)?;

    Ok(color)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Shaders => {
            if cli.json {
                let info = serde_json::json!({
                    "vertex": VERTEX_SHADER,
                    "fragment": FRAGMENT_SHADER,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("// vertex\n{VERTEX_SHADER}\n// fragment\n{FRAGMENT_SHADER}");
            }
        }
        Command::Render {
            color,
            width,
            height,
            surface,
            output,
            config,
        } => {
            let drawn = render(&RenderJob {
                color: color.as_deref(),
                width,
                height,
                surface: &surface,
                output: &output,
                config: &config,
            })?;

            if cli.json {
                let info = serde_json::json!({
                    "surface": surface,
                    "width": width,
                    "height": height,
                    "color": drawn,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered triangle {drawn:?} on '{surface}' ({width}x{height}) -> {}",
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::debug!("exiting with code {}", e.exit_code());
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job<'a>(output: &'a Path, color: Option<&'a str>) -> RenderJob<'a> {
        RenderJob {
            color,
            width: 16,
            height: 16,
            surface: "triangle",
            output,
            config: "{}",
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_writes_png_in_requested_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let drawn = render(&job(&path, Some("0,255,0"))).unwrap();
        assert_eq!(drawn, [0.0, 1.0, 0.0, 1.0]);
        assert!(path.exists());
    }

    #[test]
    fn render_without_color_uses_config_initial_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut j = job(&path, None);
        j.config = r#"{"initial_color": [0.0, 0.0, 1.0, 1.0]}"#;
        assert_eq!(render(&j).unwrap(), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn bad_color_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let err = render(&job(&path, Some("255"))).unwrap_err();
        assert_eq!(err.exit_code(), 13);
        assert!(!path.exists());
    }

    #[test]
    fn bad_config_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut j = job(&path, None);
        j.config = "{not json";
        assert_eq!(render(&j).unwrap_err().exit_code(), 13);
    }

    #[test]
    fn zero_sized_surface_is_init_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut j = job(&path, None);
        j.width = 0;
        assert_eq!(render(&j).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn oversized_surface_is_init_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut j = job(&path, None);
        j.width = u32::MAX;
        j.height = u32::MAX;
        assert_eq!(render(&j).unwrap_err().exit_code(), 10);
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert_eq!(render(&job(&path, None)).unwrap_err().exit_code(), 12);
    }
}
