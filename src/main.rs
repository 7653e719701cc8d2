use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rank_wheel::config::{Config, DEFAULT_BIND};
use rank_wheel::draw::Drawer;
use rank_wheel::error::Result;
use rank_wheel::metrics::SpinMetrics;
use rank_wheel::server::{self, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Weighted rank wheel web service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Run the offline spin benchmark instead of serving
    #[arg(long)]
    bench_spins: bool,

    /// Number of spins to draw in benchmark mode
    #[arg(long, default_value = "10000")]
    num_spins: usize,

    /// Seed for a reproducible benchmark
    #[arg(long)]
    seed: Option<u64>,

    /// Path to write HDR histogram output
    #[arg(long, default_value = "target/spin_bench/hdr_histogram.hdr")]
    hist_out: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RANK_WHEEL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("rank_wheel=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let config = Config {
        bind_addr: args.bind,
        ..Config::default()
    };

    let result = if args.bench_spins {
        run_spin_benchmark(&args, &config)
    } else {
        run_server(&config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);

    for (rank, entry) in state.drawer().ranks().iter().zip(state.drawer().weights().iter()) {
        info!(key = %rank.key, name = %rank.name, limit = rank.limit, percent = entry.percent, "rank");
    }

    server::serve(config, state).await
}

/// Draw `num_spins` times offline and report distribution and latency
fn run_spin_benchmark(args: &Args, config: &Config) -> Result<()> {
    let drawer = Drawer::new(config.ranks.clone())?;
    let metrics = SpinMetrics::new(
        drawer.ranks().len(),
        config.histogram_max_nanos,
        config.histogram_sigfigs,
    )?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(num_spins = args.num_spins, seed = ?args.seed, "running spin benchmark");
    let bench_start = Instant::now();

    for _ in 0..args.num_spins {
        let start = Instant::now();
        let spin = drawer.spin(&mut rng)?;
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        metrics.record_hit(spin.index, elapsed);
    }

    let duration_secs = bench_start.elapsed().as_secs_f64();

    println!("\n=== Benchmark Complete ===");
    println!("Total time: {:.3}s", duration_secs);
    if duration_secs > 0.0 {
        println!("Throughput: {:.0} spins/sec", args.num_spins as f64 / duration_secs);
    }
    println!();
    metrics.print_summary(drawer.ranks(), drawer.weights());

    metrics.write_histogram(&args.hist_out)?;
    info!(path = %args.hist_out.display(), "histogram written");

    let json_path = args.hist_out.with_file_name("spin_summary.json");
    metrics.write_summary_json(&json_path, drawer.ranks(), drawer.weights(), duration_secs)?;
    info!(path = %json_path.display(), "summary written");

    Ok(())
}
