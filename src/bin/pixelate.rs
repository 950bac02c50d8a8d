use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use pixel_grid_art::{PixelateOptions, pixelate_bytes};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn images into blocky, palette-reduced pixel art.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of blocks across; rows follow the aspect ratio
    #[arg(short = 'w', long, default_value_t = 64)]
    grid_width: u32,

    /// Number of palette colors
    #[arg(short = 'k', long, default_value_t = 8)]
    n_colors: usize,

    /// Output pixels per block
    #[arg(long, default_value_t = 10)]
    point_size: u32,

    /// Seed for reproducible palettes
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "pixelated_")]
    prefix: String,

    /// Also write the palette usage table next to each output as JSON
    #[arg(long)]
    report: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_grid_art=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();

    let opts = PixelateOptions {
        grid_width: args.grid_width,
        colors: args.n_colors,
        point_size: args.point_size,
        seed: args.seed,
    };
    opts.validate().context("invalid options")?;

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let (png, result) = pixelate_bytes(&bytes, &opts).context("pixelate processing failed")?;

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let out_path = if let Some(dir) = &args.out_dir {
            dir.join(format!("{stem}.png"))
        } else {
            PathBuf::from(format!("{}{}.png", args.prefix, stem))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png)?;

        let mut report_path = None;
        if args.report {
            let usage: Vec<_> = result
                .usage_report()
                .into_iter()
                .map(|e| json!({ "color": e.hex, "count": e.count, "textColor": e.text_color }))
                .collect();
            let report = json!({
                "width": result.columns(),
                "height": result.rows(),
                "palette": result.palette.iter().map(|c| c.to_hex()).collect::<Vec<_>>(),
                "usage": usage,
            });
            let path = out_path.with_extension("json");
            fs::write(&path, serde_json::to_string_pretty(&report)?)?;
            report_path = Some(path);
        }
        println!("{}", saved_line(&out_path, report_path.as_deref()));
    }

    Ok(())
}

fn saved_line(image: &Path, report: Option<&Path>) -> String {
    match report {
        Some(report) => format!("Saved → {} (+ {})", image.display(), report.display()),
        None => format!("Saved → {}", image.display()),
    }
}
