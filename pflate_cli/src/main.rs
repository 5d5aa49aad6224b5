use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pflate_core::{compress, decompress, Options, Summary, DEFAULT_CHUNK_SIZE, DEFAULT_LEVEL};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pflate",
    about = "Chunk-parallel deflate file compressor",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a chunked deflate container
    Compress {
        /// Source file to compress
        input: PathBuf,
        /// Destination container file
        output: PathBuf,
        /// Raw bytes per chunk (default: 1 MiB)
        #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE as u64,
              value_parser = clap::value_parser!(u64).range(1..=1 << 30))]
        chunk_size: u64,
        /// Deflate level: 1 (fastest) to 12 (smallest)
        #[arg(short, long, default_value_t = DEFAULT_LEVEL,
              value_parser = clap::value_parser!(u32).range(1..=12))]
        level: u32,
        /// Worker threads (default: all available cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Decompress a chunked deflate container back to the original file
    Decompress {
        /// Source container file
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        /// Worker threads (default: all available cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn report(summary: &Summary) {
    let secs = summary.elapsed.as_secs_f64().max(1e-9);
    eprintln!("  chunks      : {}", summary.chunks);
    eprintln!("  bytes in    : {}", human_bytes(summary.bytes_in));
    eprintln!("  bytes out   : {}", human_bytes(summary.bytes_out));
    if summary.bytes_out > 0 {
        eprintln!(
            "  ratio       : {:.2}x",
            summary.bytes_in as f64 / summary.bytes_out as f64
        );
    }
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((summary.bytes_in as f64 / secs) as u64)
    );
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(
    input: PathBuf,
    output: PathBuf,
    chunk_size: u64,
    level: u32,
    threads: Option<usize>,
) -> anyhow::Result<()> {
    let options = Options {
        chunk_size: chunk_size as usize,
        workers: threads,
        level,
    };
    let summary = compress(&input, &output, &options)
        .with_context(|| format!("compressing {:?} -> {:?}", input, output))?;
    report(&summary);
    println!(
        "Compression finished in {:.3} seconds.",
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf, threads: Option<usize>) -> anyhow::Result<()> {
    let options = Options {
        workers: threads,
        ..Options::default()
    };
    let summary = decompress(&input, &output, &options)
        .with_context(|| format!("decompressing {:?} -> {:?}", input, output))?;
    report(&summary);
    println!(
        "Decompression finished in {:.3} seconds.",
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compress {
            input,
            output,
            chunk_size,
            level,
            threads,
        } => run_compress(input, output, chunk_size, level, threads),
        Commands::Decompress {
            input,
            output,
            threads,
        } => run_decompress(input, output, threads),
    }
}
