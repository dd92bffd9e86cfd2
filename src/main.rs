use anyhow::{Context, anyhow};
use clap::{ArgGroup, Parser};
use log::{info, warn};
use markshot::draw::{BaseImage, WHITE};
use markshot::script::Script;
use markshot::util::Point;
use markshot::{Config, Session, export};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "markshot")]
#[command(version, about = "Annotate screenshots with arrows, shapes, text and blur")]
#[command(group(ArgGroup::new("source").required(true).args(["input", "blank"])))]
struct Cli {
    /// PNG image to annotate
    #[arg(long, short = 'i', value_name = "PNG")]
    input: Option<PathBuf>,

    /// Start from a white canvas of the given size instead of an image
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    blank: Option<(i32, i32)>,

    /// Crop the image to a selection before annotating (at least 10 px)
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_crop)]
    crop: Option<[f64; 4]>,

    /// Annotation steps to apply (TOML)
    #[arg(long, short = 's', value_name = "TOML")]
    script: Option<PathBuf>,

    /// Where to write the annotated PNG (default: configured export directory)
    #[arg(long, short = 'o', value_name = "PNG")]
    output: Option<PathBuf>,

    /// Configuration file to use instead of ~/.config/markshot/config.toml
    #[arg(long, short = 'c', value_name = "TOML")]
    config: Option<PathBuf>,
}

fn parse_size(value: &str) -> Result<(i32, i32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("invalid dimension '{part}'"))
    };
    Ok((parse(width)?, parse(height)?))
}

fn parse_crop(value: &str) -> Result<[f64; 4], String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid number '{part}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; 4]>::try_from(parts).map_err(|_| format!("expected X,Y,W,H, got '{value}'"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            warn!("Failed to load config: {:#}; using defaults", err);
            Config::default()
        }),
    };

    let mut base = match (&cli.input, cli.blank) {
        (Some(path), _) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            BaseImage::from_png(&mut BufReader::new(file))
                .with_context(|| format!("Failed to decode {}", path.display()))?
        }
        (None, Some((width, height))) => BaseImage::solid(width, height, WHITE)?,
        (None, None) => return Err(anyhow!("either --input or --blank is required")),
    };

    if let Some([x, y, width, height]) = cli.crop {
        base = base
            .crop(Point::new(x, y), Point::new(x + width, y + height))
            .ok_or_else(|| anyhow!("crop selection {width}x{height} at {x},{y} is too small or off the image"))?;
    }
    info!("Annotating {}x{} image", base.width(), base.height());

    let mut session = Session::new(base, &config)?;

    if let Some(path) = &cli.script {
        let script = Script::load(path)?;
        script.apply(&mut session);
    }

    let written = match cli.output {
        Some(path) => {
            export::write_png_file(session.surface(), &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => session
            .save_png(&config.export)
            .context("Failed to save image")?,
    };
    println!("{}", written.display());

    Ok(())
}
