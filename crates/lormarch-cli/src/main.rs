//! lormarch CLI - batch LOI tracing from the command line
//!
//! Builds tracer configurations, samples rays along lines of response,
//! and runs traces over ray files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lormarch_batch::{RayBatch, Tracer, TracerConfig};
use lormarch_kernel::MarchSettings;
use lormarch_math::Point3;

#[derive(Parser)]
#[command(name = "lormarch")]
#[command(about = "SDF ray-marching LOI tracer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a tracer configuration file
    Init {
        /// Output configuration file
        output: PathBuf,
        /// Voxel extents as x,y,z
        #[arg(long, value_delimiter = ',')]
        voxel_size: Vec<f64>,
        /// March iterations per ray
        #[arg(long, default_value_t = 2)]
        iterations: u32,
        /// Smallest march step per iteration
        #[arg(long, default_value_t = 1e-4)]
        step_floor: f64,
        /// Pin the tracer to batches of exactly this many rays
        #[arg(long)]
        batch_len: Option<usize>,
    },
    /// Display a tracer configuration
    Info {
        /// Path to the configuration file
        config: PathBuf,
    },
    /// Sample rays along a line of response into a ray file
    Sample {
        /// Output ray file
        output: PathBuf,
        /// LOR start point as x,y,z
        #[arg(long, value_delimiter = ',')]
        start: Vec<f64>,
        /// LOR end point as x,y,z
        #[arg(long, value_delimiter = ',')]
        end: Vec<f64>,
        /// Number of sample points along the segment
        #[arg(long, default_value_t = 16)]
        samples: usize,
        /// Normalization constant shared by the samples
        #[arg(long, default_value_t = 1.0)]
        norm_const: f64,
    },
    /// Trace a ray file and report LOI rows
    Trace {
        /// Input ray file (JSON, as written by `sample`)
        rays: PathBuf,
        /// Tracer configuration file (defaults to unit voxels)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write `[loi, ix, iy, iz]` rows to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            output,
            voxel_size,
            iterations,
            step_floor,
            batch_len,
        } => init_config(&output, &voxel_size, iterations, step_floor, batch_len),
        Commands::Info { config } => show_info(&config),
        Commands::Sample {
            output,
            start,
            end,
            samples,
            norm_const,
        } => sample_lor(&output, &start, &end, samples, norm_const),
        Commands::Trace {
            rays,
            config,
            output,
        } => run_trace(&rays, config.as_deref(), output.as_deref()),
    }
}

fn axes(values: &[f64], what: &str) -> Result<[f64; 3]> {
    match values {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => anyhow::bail!("{what} needs exactly three components, got {}", values.len()),
    }
}

fn init_config(
    output: &std::path::Path,
    voxel_size: &[f64],
    iterations: u32,
    step_floor: f64,
    batch_len: Option<usize>,
) -> Result<()> {
    let config = TracerConfig {
        voxel_size: axes(voxel_size, "--voxel-size")?,
        march: MarchSettings {
            iterations,
            step_floor,
        },
        batch_len,
    };
    // Validate before writing so a bad file never hits disk.
    config.build()?;
    config.save(output)?;
    println!("Wrote tracer config to {}", output.display());
    Ok(())
}

fn show_info(path: &std::path::Path) -> Result<()> {
    let config = TracerConfig::load(path)?;
    config.build()?;

    println!("tracer config: {}", path.display());
    println!(
        "  Voxel size: {} x {} x {}",
        config.voxel_size[0], config.voxel_size[1], config.voxel_size[2]
    );
    println!("  Iterations: {}", config.march.iterations);
    println!("  Step floor: {}", config.march.step_floor);
    match config.batch_len {
        Some(len) => println!("  Batch length: pinned to {len}"),
        None => println!("  Batch length: unpinned"),
    }
    Ok(())
}

fn sample_lor(
    output: &std::path::Path,
    start: &[f64],
    end: &[f64],
    samples: usize,
    norm_const: f64,
) -> Result<()> {
    let start = axes(start, "--start")?;
    let end = axes(end, "--end")?;

    let mut batch = RayBatch::new();
    batch.push_lor(
        Point3::new(start[0], start[1], start[2]),
        Point3::new(end[0], end[1], end[2]),
        samples,
        norm_const,
    )?;

    std::fs::write(output, serde_json::to_string_pretty(&batch)?)?;
    println!("Wrote {} rays to {}", batch.len(), output.display());
    Ok(())
}

fn run_trace(
    rays: &std::path::Path,
    config: Option<&std::path::Path>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => TracerConfig::load(path)?,
        None => TracerConfig {
            voxel_size: [1.0, 1.0, 1.0],
            march: MarchSettings::default(),
            batch_len: None,
        },
    };
    let tracer: Tracer = config.build()?;

    let batch: RayBatch = serde_json::from_str(&std::fs::read_to_string(rays)?)?;
    let records = tracer.trace_batch(&batch)?;

    // Degenerate rays produce non-finite lengths; keep them out of the
    // output the way the surrounding projector would.
    let rows: Vec<[f64; 4]> = records
        .iter()
        .filter(|r| r.loi.is_finite())
        .map(|r| r.to_row())
        .collect();
    let dropped = records.len() - rows.len();

    println!("Traced {} rays ({} non-finite dropped)", records.len(), dropped);

    match output {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&rows)?)?;
            println!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => {
            for row in rows.iter().take(10) {
                println!(
                    "  loi = {:.6}  voxel = ({}, {}, {})",
                    row[0], row[1] as i64, row[2] as i64, row[3] as i64
                );
            }
            if rows.len() > 10 {
                println!("  ... {} more rows", rows.len() - 10);
            }
        }
    }
    Ok(())
}
