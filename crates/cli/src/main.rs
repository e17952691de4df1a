//! Cache hierarchy simulator CLI.
//!
//! This binary drives the simulator from the command line. It performs:
//! 1. **Trace run:** Reads a text trace (file or stdin), simulates it against
//!    the configured L1/victim/L2 hierarchy and prints the statistics.
//! 2. **Config dump:** Prints the effective configuration as JSON.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=cachesim_core=trace`).

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::CacheHierarchyConfig;
use cachesim_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Two-level set-associative cache simulator with a victim cache",
    long_about = "Simulate a trace of memory reads and writes against an L1/L2 cache hierarchy.\n\nTrace lines are `r <hex address>` or `w <hex address>`.\n\nExamples:\n  cachesim run -i traces/gcc.trace\n  cachesim run -c 10 -b 4 -s 0 -v 2 -C 12 -B 4 -S 1 < traces/thrash.trace\n  cachesim run --config hierarchy.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trace through the hierarchy and print statistics.
    Run {
        #[command(flatten)]
        geometry: GeometryArgs,

        /// Trace file (stdin when omitted).
        #[arg(short, long)]
        input: Option<String>,

        /// Print the statistics as JSON instead of the text report.
        #[arg(long)]
        json: bool,

        /// Report sections to print (summary, l1, victim, l2); all by default.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Print the effective configuration as JSON.
    Config {
        #[command(flatten)]
        geometry: GeometryArgs,
    },
}

/// Geometry overrides applied on top of the defaults or `--config`.
#[derive(Args, Debug)]
struct GeometryArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<String>,

    /// L1 capacity exponent (2^c bytes).
    #[arg(short = 'c')]
    c1: Option<u32>,

    /// L1 block-size exponent (2^b bytes).
    #[arg(short = 'b')]
    b1: Option<u32>,

    /// L1 set-size exponent (2^s ways).
    #[arg(short = 's')]
    s1: Option<u32>,

    /// Victim cache blocks (0-4).
    #[arg(short = 'v')]
    victim: Option<u32>,

    /// L2 capacity exponent.
    #[arg(short = 'C')]
    c2: Option<u32>,

    /// L2 block-size exponent.
    #[arg(short = 'B')]
    b2: Option<u32>,

    /// L2 set-size exponent.
    #[arg(short = 'S')]
    s2: Option<u32>,

    /// Seed for the replacement tie-break generator.
    #[arg(long)]
    seed: Option<u64>,
}

impl GeometryArgs {
    /// Loads `--config` (or the defaults) and applies the flag overrides.
    fn resolve(&self) -> Result<CacheHierarchyConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("could not read config '{path}': {e}"))?;
                serde_json::from_str(&text)
                    .map_err(|e| format!("could not parse config '{path}': {e}"))?
            }
            None => CacheHierarchyConfig::default(),
        };

        let overrides = [
            (&mut config.l1.c, self.c1),
            (&mut config.l1.b, self.b1),
            (&mut config.l1.s, self.s1),
            (&mut config.victim_blocks, self.victim),
            (&mut config.l2.c, self.c2),
            (&mut config.l2.b, self.b2),
            (&mut config.l2.s, self.s2),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            geometry,
            input,
            json,
            sections,
        } => cmd_run(&geometry, input.as_deref(), json, &sections),
        Commands::Config { geometry } => cmd_config(&geometry),
    };

    if let Err(e) = result {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

/// Simulates the trace and prints the report.
fn cmd_run(
    geometry: &GeometryArgs,
    input: Option<&str>,
    json: bool,
    sections: &[String],
) -> Result<(), String> {
    let config = geometry.resolve()?;
    let mut sim = Simulator::new(&config).map_err(|e| format!("invalid configuration: {e}"))?;

    info!(input = input.unwrap_or("<stdin>"), "simulating trace");
    let stats = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("could not open trace '{path}': {e}"))?;
            sim.run(BufReader::new(file))
        }
        None => sim.run(io::stdin().lock()),
    }
    .map_err(|e| e.to_string())?;

    if json {
        let text = serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())?;
        println!("{text}");
        Ok(())
    } else {
        stats.print_sections(sections).map_err(|e| e.to_string())
    }
}

/// Prints the validated configuration.
fn cmd_config(geometry: &GeometryArgs) -> Result<(), String> {
    let config = geometry.resolve()?;
    config
        .validate()
        .map_err(|e| format!("invalid configuration: {e}"))?;
    let text = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
