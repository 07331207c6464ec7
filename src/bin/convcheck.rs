//! Precision and timing driver for the convolution engines.
//!
//! Run with: `cargo run --release -- precision` or `cargo run --release -- bench`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use convcheck::config::{PrecisionConfig, SizeParams, DEFAULT_SEED};
use convcheck::conv::ConvMode;
use convcheck::metrics::{benchmark, precision, BENCH_CASES};
use convcheck::tensor::ElementType;

#[derive(Parser)]
#[command(name = "convcheck", version)]
#[command(about = "Cross-validate GEMM and FFT 2D convolutions against a direct reference")]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare each accelerated algorithm against the direct reference
    Precision {
        #[arg(long, value_enum, default_value_t = ModeArg::All)]
        mode: ModeArg,

        #[arg(long, value_enum, default_value_t = PrecisionArg::All)]
        precision: PrecisionArg,

        /// Input side length
        #[arg(long, value_name = "N", default_value_t = 100)]
        size: usize,

        /// Kernel side length [default: N/4]
        #[arg(long, value_name = "K")]
        kernel: Option<usize>,

        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Time every algorithm over the benchmark size table
    Bench {
        #[arg(long, value_enum, default_value_t = PrecisionArg::Single)]
        precision: PrecisionArg,

        #[arg(long, value_name = "N", default_value_t = 10)]
        iterations: usize,

        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Valid,
    Full,
    All,
}

impl ModeArg {
    fn modes(self) -> &'static [ConvMode] {
        match self {
            ModeArg::Valid => &[ConvMode::Valid],
            ModeArg::Full => &[ConvMode::Full],
            ModeArg::All => &[ConvMode::Full, ConvMode::Valid],
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PrecisionArg {
    Single,
    Double,
    All,
}

impl PrecisionArg {
    fn elements(self) -> &'static [ElementType] {
        match self {
            PrecisionArg::Single => &[ElementType::Single],
            PrecisionArg::Double => &[ElementType::Double],
            PrecisionArg::All => &ElementType::ALL,
        }
    }
}

fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Command::Precision { mode, precision: elements, size, kernel, seed } => {
            let sizes = match kernel {
                Some(k) => SizeParams::new(size, k),
                None => SizeParams::quarter_kernel(size),
            };
            let config = PrecisionConfig::default().with_sizes(sizes).with_seed(seed);
            info!(input = sizes.input, kernel = sizes.kernel, seed, "precision comparison");

            let mut reports = Vec::new();
            // mode-major order, single before double
            for &mode in mode.modes() {
                for &element in elements.elements() {
                    let batch = precision::compare_precision(mode, element, &config)
                        .with_context(|| format!("{element} precision, {mode} mode"))?;
                    reports.extend(batch);
                }
            }
            precision::print_report(&reports);
        }
        Command::Bench { precision: elements, iterations, seed } => {
            let mut timings = Vec::new();
            for &element in elements.elements() {
                for case in BENCH_CASES {
                    info!(case = case.name, %element, iterations, "benchmark section");
                    let section = match element {
                        ElementType::Single => benchmark::run_benchmark::<f32>(case, iterations, seed),
                        ElementType::Double => benchmark::run_benchmark::<f64>(case, iterations, seed),
                    }
                    .with_context(|| format!("benchmark section {}", case.name))?;
                    timings.extend(section);
                }
            }
            benchmark::print_report(&timings);
        }
    }
    Ok(())
}
