use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use log::{log_enabled, Level};

use neurite_nn::binary::bits::{from_binary_array, to_binary_array, to_bit};
use neurite_nn::data::product::{product_input, ProductCursor, MAX_FACTOR};
use neurite_nn::data::sample::SampleSource;
use neurite_nn::data::MnistSet;
use neurite_nn::network::config::{NetConfig, Task};
use neurite_nn::network::memory::{ErrorHistory, NetworkMemory};
use neurite_nn::network::Network;
use neurite_nn::train::run_training_batch;

/// Node-graph neural network trained from first principles on binary
/// multiplication and MNIST digits.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Network snapshot file, created on first save.
    #[arg(long, default_value = "neural_data.json")]
    snapshot: PathBuf,

    /// Batch-error history file.
    #[arg(long, default_value = "totalError.json")]
    history: PathBuf,

    /// Configuration file; built-in defaults apply when it is absent.
    #[arg(long, default_value = "neural_config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train the multiplication model.
    Train {
        /// Number of training cycles; prompted for when omitted.
        #[arg(long)]
        cycles: Option<u64>,

        /// Pin every sample to this first operand (needs --second).
        #[arg(long, requires = "second")]
        first: Option<u8>,

        /// Pin every sample to this second operand (needs --first).
        #[arg(long, requires = "first")]
        second: Option<u8>,
    },

    /// Ask the multiplication model for one product.
    Guess,

    /// Train the digit classifier on an MNIST image/label pair.
    TrainMnist {
        /// Number of training cycles; prompted for when omitted.
        #[arg(long)]
        cycles: Option<u64>,

        /// Train only on images of this digit.
        #[arg(long)]
        label: Option<u8>,

        /// IDX3 image file.
        #[arg(long, default_value = "mnist/train-images.idx3-ubyte")]
        images: PathBuf,

        /// IDX1 label file.
        #[arg(long, default_value = "mnist/train-labels.idx1-ubyte")]
        labels: PathBuf,
    },

    /// Classify one image drawn from the MNIST set.
    GuessMnist {
        /// Draw an image of this digit.
        #[arg(long)]
        label: Option<u8>,

        /// IDX3 image file.
        #[arg(long, default_value = "mnist/train-images.idx3-ubyte")]
        images: PathBuf,

        /// IDX1 label file.
        #[arg(long, default_value = "mnist/train-labels.idx1-ubyte")]
        labels: PathBuf,
    },

    /// Discard the snapshot and error history and start fresh.
    Reset,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = NetConfig::load_or_default(&cli.config)?;

    match &cli.command {
        Command::Train { cycles, first, second } => {
            train_product(&cli, &config, *cycles, *first, *second)
        }
        Command::Guess => guess_product(&cli, &config),
        Command::TrainMnist { cycles, label, images, labels } => {
            train_mnist(&cli, &config, *cycles, *label, images, labels)
        }
        Command::GuessMnist { label, images, labels } => {
            guess_mnist(&cli, &config, *label, images, labels)
        }
        Command::Reset => reset(&cli),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn train_product(
    cli: &Cli,
    config: &NetConfig,
    cycles: Option<u64>,
    first: Option<u8>,
    second: Option<u8>,
) -> Result<()> {
    let cycles = resolve_cycles(cycles)?;
    let mut net = build_network(cli, config, Task::Product)?;
    let mut cursor = match (first, second) {
        (Some(first), Some(second)) => ProductCursor::fixed(first, second)?,
        _ => ProductCursor::new(),
    };
    run_training(cli, &mut net, &mut cursor, cycles)
}

fn guess_product(cli: &Cli, config: &NetConfig) -> Result<()> {
    let mut net = build_network(cli, config, Task::Product)?;

    println!("Pick two numbers between 0 and {MAX_FACTOR}");
    let first = prompt_operand("First: ")?;
    let second = prompt_operand("Second: ")?;

    let outputs = net.evaluate(&product_input(first, second)?)?;
    let guessed_bits: Vec<u8> = outputs.iter().map(|&a| to_bit(a)).collect();
    let guess = from_binary_array(&guessed_bits);

    let product = u16::from(first) * u16::from(second);
    let expected_bits = to_binary_array(i64::from(product))?;
    let expected: Vec<f64> = expected_bits.iter().map(|&bit| f64::from(bit)).collect();
    let errors = net.output_error(&outputs, &expected)?;

    println!("Correct answer: {product}");
    println!("Guess: {guess}");
    println!("Correct binary array: {expected_bits:?}");
    println!("Guess binary array: {guessed_bits:?}");
    println!("Guess output array: {outputs:?}");
    println!("Output error: {errors:?}");
    Ok(())
}

fn train_mnist(
    cli: &Cli,
    config: &NetConfig,
    cycles: Option<u64>,
    label: Option<u8>,
    images: &Path,
    labels: &Path,
) -> Result<()> {
    println!("Running MNIST training");
    let cycles = resolve_cycles(cycles)?;
    let mut net = build_network(cli, config, Task::Mnist)?;
    let mut set = load_mnist(images, labels)?;
    if let Some(label) = label {
        set.restrict_to_label(label)?;
    }
    run_training(cli, &mut net, &mut set, cycles)
}

fn guess_mnist(
    cli: &Cli,
    config: &NetConfig,
    label: Option<u8>,
    images: &Path,
    labels: &Path,
) -> Result<()> {
    let mut net = build_network(cli, config, Task::Mnist)?;
    let mut set = load_mnist(images, labels)?;
    if let Some(label) = label {
        set.restrict_to_label(label)?;
    }

    let (expected_digit, sample) = set.draw();
    let (guess, outputs) = net.classify(&sample.input)?;
    let guessed_bits: Vec<u8> = outputs.iter().map(|&a| to_bit(a)).collect();

    println!("Correct answer: {expected_digit}");
    println!("Guess: {guess}");
    println!("Expected number array: {:?}", sample.target);
    println!("Guess number array: {guessed_bits:?}");
    println!("Guess output array: {outputs:?}");
    Ok(())
}

fn reset(cli: &Cli) -> Result<()> {
    println!("Resetting neural net data");
    NetworkMemory::empty().save_json(&cli.snapshot)?;
    ErrorHistory::default().save_json(&cli.history)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_network(cli: &Cli, config: &NetConfig, task: Task) -> Result<Network> {
    let memory = NetworkMemory::load_or_empty(&cli.snapshot)?;
    let history = ErrorHistory::load_or_empty(&cli.history)?;
    Network::build(task, config, memory, history)
}

fn load_mnist(images: &Path, labels: &Path) -> Result<MnistSet> {
    let set = MnistSet::load(images, labels)?;
    if set.pixels_per_image() != Task::Mnist.input_width() {
        bail!(
            "MNIST images hold {} pixels but the network expects {}",
            set.pixels_per_image(),
            Task::Mnist.input_width()
        );
    }
    Ok(set)
}

/// Runs `cycles` training batches, saving the snapshot and error history
/// after every batch so an interrupted run resumes where it stopped.
fn run_training<S: SampleSource>(
    cli: &Cli,
    net: &mut Network,
    source: &mut S,
    cycles: u64,
) -> Result<()> {
    println!("Training for {cycles} cycles");
    let started = Instant::now();
    let bar = training_bar(cycles);

    for _ in 0..cycles {
        run_training_batch(net, source)?;
        save_state(cli, net)?;
        bar.inc(1);
    }
    bar.finish();

    println!(
        "Training finished after {cycles} cycles in {:.2?} ({} completed in total)",
        started.elapsed(),
        net.completed_cycles()
    );
    Ok(())
}

fn save_state(cli: &Cli, net: &Network) -> Result<()> {
    net.snapshot().save_json(&cli.snapshot)?;
    net.history().save_json(&cli.history)
}

/// Progress bar for a training run; hidden when trace logging is active
/// so bar redraws do not interleave with the log lines.
fn training_bar(cycles: u64) -> ProgressBar {
    if log_enabled!(Level::Trace) {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(cycles)
    }
}

fn resolve_cycles(cycles: Option<u64>) -> Result<u64> {
    if let Some(cycles) = cycles {
        return Ok(cycles);
    }
    let answer = prompt("How many cycles? ")?;
    answer
        .parse()
        .map_err(|_| anyhow!("Invalid number of cycles: {answer}"))
}

fn prompt_operand(question: &str) -> Result<u8> {
    let answer = prompt(question)?;
    let value: u8 = answer
        .parse()
        .map_err(|_| anyhow!("Invalid operand: {answer}"))?;
    if value > MAX_FACTOR {
        bail!("{value} is larger than the maximum operand {MAX_FACTOR}");
    }
    Ok(value)
}

/// Prints `question` and reads one trimmed line from stdin.
fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
