use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rps_verify::config::VerifierConfig;
use rps_verify::error::{Result, VerifierError};
use rps_verify::gadget::{self, ParsedGadget};
use rps_verify::verify::{modes, CategoryHistograms, Histogram, ProbingOutcome, RpeOutcome};

#[derive(Parser)]
#[command(name = "rps-verify", about = "Verify random probing security and expandability of boolean masking gadgets")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// 0 = silent except for the final result, 1 = per-level progress,
    /// 2 = per-rule tuple counts.
    #[arg(long, global = true, default_value_t = 0)]
    verbosity: u8,

    /// Number of tuples processed per enumeration batch.
    #[arg(long, global = true, default_value_t = rps_verify::constants::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Number of worker threads for batch-level parallelism within one
    /// size level. `1` (the default) disables concurrency entirely.
    #[arg(long, global = true, default_value_t = rps_verify::constants::DEFAULT_THREADS)]
    threads: usize,
}

#[derive(Subcommand)]
enum Command {
    /// t-probing security of a single probe tuple size.
    Probing {
        #[arg(long)]
        order: usize,
        #[arg(long)]
        circuit: String,
    },
    /// Random probing: tabulate c[] over every size up to coeff_max.
    Rp {
        #[arg(long)]
        coeff_max: usize,
        #[arg(long)]
        circuit: String,
    },
    /// Random probing composability.
    Rpc {
        #[arg(long)]
        order: usize,
        #[arg(long)]
        t_output: Option<usize>,
        #[arg(long)]
        coeff_max: usize,
        #[arg(long)]
        circuit: String,
    },
    /// Random probing expandability, variant 1.
    Rpe1 {
        #[arg(long)]
        order: usize,
        #[arg(long)]
        coeff_max: usize,
        #[arg(long, default_value_t = false)]
        copy: bool,
        #[arg(long)]
        circuit: String,
    },
    /// Random probing expandability, variant 2.
    Rpe2 {
        #[arg(long)]
        order: usize,
        #[arg(long)]
        coeff_max: usize,
        #[arg(long, default_value_t = false)]
        copy: bool,
        #[arg(long)]
        circuit: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = VerifierConfig::new(cli.batch_size, cli.verbosity, cli.threads)?;

    match cli.command {
        Command::Probing { order, circuit } => {
            let gadget = load_gadget(&circuit)?;
            match modes::t_probing(&gadget, order, &config)? {
                ProbingOutcome::Secure => {
                    println!("secure");
                    Ok(ExitCode::SUCCESS)
                }
                ProbingOutcome::Insecure { witness } => {
                    println!("insecure: witness tuple = {{{}}}", witness.join(", "));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Rp { coeff_max, circuit } => {
            let gadget = load_gadget(&circuit)?;
            let hist = modes::random_probing(&gadget, coeff_max, &config)?;
            print_histogram(&hist);
            Ok(ExitCode::SUCCESS)
        }
        Command::Rpc { order, t_output, coeff_max, circuit } => {
            let gadget = load_gadget(&circuit)?;
            let t_output = t_output.unwrap_or(order);
            let hist = modes::rpc(&gadget, order, t_output, coeff_max, &config)?;
            print_histogram(&hist);
            Ok(ExitCode::SUCCESS)
        }
        Command::Rpe1 { order, coeff_max, copy, circuit } => {
            let gadget = load_gadget(&circuit)?;
            let outcome = modes::rpe1(&gadget, order, coeff_max, copy, &config)?;
            print_rpe_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Command::Rpe2 { order, coeff_max, copy, circuit } => {
            let gadget = load_gadget(&circuit)?;
            let outcome = modes::rpe2(&gadget, order, coeff_max, copy, &config)?;
            print_rpe_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_gadget(path: &str) -> Result<ParsedGadget> {
    let source = fs::read_to_string(path).map_err(|source| VerifierError::Io {
        path: path.to_string(),
        source,
    })?;
    gadget::parse(&source)
}

fn print_histogram(hist: &Histogram) {
    let coeffs: Vec<String> = hist.c.iter().map(|c| c.to_string()).collect();
    println!("c = [{}]", coeffs.join(", "));
}

fn print_rpe_outcome(outcome: &RpeOutcome) {
    match outcome {
        RpeOutcome::Plain(hist) => print_histogram(hist),
        RpeOutcome::Categorized(CategoryHistograms { i1, i2, i1_and_i2, i1_or_i2 }) => {
            print!("I1: ");
            print_histogram(i1);
            print!("I2: ");
            print_histogram(i2);
            print!("I1 & I2: ");
            print_histogram(i1_and_i2);
            print!("I1 | I2: ");
            print_histogram(i1_or_i2);
        }
    }
}
