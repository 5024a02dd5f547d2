use std::io::{BufWriter, Cursor, Write as _};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "gifscale", version)]
#[command(about = "Resize an animated GIF without per-frame compositing artifacts")]
struct Cli {
    /// Target width in pixels; 0 derives it from --height preserving aspect.
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Target height in pixels; 0 derives it from --width. Both 0 keeps the
    /// source dimensions.
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Resampling filter.
    #[arg(long, value_enum, default_value_t = FilterChoice::Nearest)]
    filter: FilterChoice,

    /// Source GIF: a file path or an absolute http/https URL.
    source: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

fn make_resampler(choice: FilterChoice) -> Box<dyn gifscale::Resampler> {
    match choice {
        FilterChoice::Nearest => Box::new(gifscale::NearestNeighbor),
        FilterChoice::Triangle => {
            Box::new(gifscale::Filtered(image::imageops::FilterType::Triangle))
        }
        FilterChoice::CatmullRom => {
            Box::new(gifscale::Filtered(image::imageops::FilterType::CatmullRom))
        }
        FilterChoice::Lanczos3 => {
            Box::new(gifscale::Filtered(image::imageops::FilterType::Lanczos3))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let bytes = gifscale::load_source(&cli.source)?;
    let anim = gifscale::decode_animation(Cursor::new(bytes))
        .with_context(|| format!("decode '{}'", cli.source))?;

    let opts = gifscale::ResizeOpts {
        width: cli.width,
        height: cli.height,
        ..gifscale::ResizeOpts::default()
    };
    let resampler = make_resampler(cli.filter);
    let resized = gifscale::resize_animation(&anim, &opts, resampler.as_ref())?;

    let stdout = std::io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    gifscale::encode_animation(&mut out, &resized)?;
    out.flush().context("flush stdout")?;

    Ok(())
}
