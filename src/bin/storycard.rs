use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "storycard", version)]
struct Cli {
    /// Cover image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Quote text. Mutually exclusive with --quote-file.
    #[arg(long, conflicts_with = "quote_file")]
    quote: Option<String>,

    /// Read the quote from a UTF-8 text file.
    #[arg(long)]
    quote_file: Option<PathBuf>,

    /// Output aspect ratio: 9:16, 1:1 or 2:1. Unknown values fall back to
    /// 9:16.
    #[arg(long, default_value = "9:16")]
    ratio: storycard::AspectRatio,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let image_bytes = fs::read(&cli.image)
        .with_context(|| format!("read cover image '{}'", cli.image.display()))?;
    let quote = match (&cli.quote, &cli.quote_file) {
        (Some(q), _) => q.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("read quote file '{}'", path.display()))?,
        (None, None) => String::new(),
    };

    let mut renderer = storycard::CardRenderer::new();
    let png = renderer.generate(&image_bytes, &quote, cli.ratio)?;

    fs::write(&cli.out, &png)
        .with_context(|| format!("write output '{}'", cli.out.display()))?;
    eprintln!("wrote {} ({} bytes)", cli.out.display(), png.len());
    Ok(())
}
