#![forbid(unsafe_code)]

//! Command-line argument parsing for the squares demo.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `STEPQ_DEMO_*` prefix.

use std::env;
use std::process;

use stepq_core::EndMode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
stepq demo: recursive square subdivision, one bounded run per tick

USAGE:
    stepq-demo-squares [OPTIONS]

OPTIONS:
    --size=N              Canvas side length in cells, rounded up to a
                          power of two (default: 64)
    --steps-per-tick=N    Pops per tick; 0 drains in one tick (default: 16)
    --steps-per-frame=N   Pops between frame captures (default: 64)
    --tick-ms=N           Sleep between ticks in milliseconds (default: 33)
    --pop-mode=MODE       first | last | either (default: first)
    --add-mode=MODE       first | last | either (default: last)
    --shuffle             Shuffle the queue once per tick
    --seed=N              Seed the random source for a reproducible run
    --frames-dir=PATH     Directory for frame snapshots (default: frames)
    --slug=NAME           Identifier used in frame file names
                          (default: squares)
    --help, -h            Show this help message
    --version, -V         Show version

ENVIRONMENT VARIABLES:
    STEPQ_DEMO_SIZE             Override --size
    STEPQ_DEMO_STEPS_PER_TICK   Override --steps-per-tick
    STEPQ_DEMO_STEPS_PER_FRAME  Override --steps-per-frame
    STEPQ_DEMO_TICK_MS          Override --tick-ms";

/// Parsed command-line options.
pub struct Opts {
    /// Canvas side length in cells.
    pub size: u16,
    /// Pops per tick (0 = drain in one tick).
    pub steps_per_tick: u64,
    /// Pops between frame captures.
    pub steps_per_frame: u64,
    /// Sleep between ticks, in milliseconds.
    pub tick_ms: u64,
    /// End the stepping pops from.
    pub pop_mode: EndMode,
    /// End the stepping appends to.
    pub add_mode: EndMode,
    /// Whether to shuffle the queue once per tick.
    pub shuffle: bool,
    /// Fixed seed for the random source (None = entropy).
    pub seed: Option<u64>,
    /// Directory frame snapshots are written to.
    pub frames_dir: String,
    /// Identifier used in frame file names.
    pub slug: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            size: 64,
            steps_per_tick: 16,
            steps_per_frame: 64,
            tick_ms: 33,
            pop_mode: EndMode::First,
            add_mode: EndMode::Last,
            shuffle: false,
            seed: None,
            frames_dir: "frames".into(),
            slug: "squares".into(),
        }
    }
}

fn parse_mode(val: &str) -> EndMode {
    match val {
        "first" => EndMode::First,
        "last" => EndMode::Last,
        "either" => EndMode::Either,
        other => {
            eprintln!("Invalid mode: {other} (expected first, last, or either)");
            process::exit(1);
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are
    /// overridden by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Ok(val) = env::var("STEPQ_DEMO_SIZE")
            && let Ok(n) = val.parse()
        {
            opts.size = n;
        }
        if let Ok(val) = env::var("STEPQ_DEMO_STEPS_PER_TICK")
            && let Ok(n) = val.parse()
        {
            opts.steps_per_tick = n;
        }
        if let Ok(val) = env::var("STEPQ_DEMO_STEPS_PER_FRAME")
            && let Ok(n) = val.parse()
        {
            opts.steps_per_frame = n;
        }
        if let Ok(val) = env::var("STEPQ_DEMO_TICK_MS")
            && let Ok(n) = val.parse()
        {
            opts.tick_ms = n;
        }

        // Parse command-line args (override env vars)
        let args: Vec<String> = env::args().skip(1).collect();
        for arg in &args {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("stepq-demo-squares {VERSION}");
                    process::exit(0);
                }
                "--shuffle" => {
                    opts.shuffle = true;
                }
                other => {
                    if let Some(val) = other.strip_prefix("--size=") {
                        opts.size = parse_num(val, "--size");
                    } else if let Some(val) = other.strip_prefix("--steps-per-tick=") {
                        opts.steps_per_tick = parse_num(val, "--steps-per-tick");
                    } else if let Some(val) = other.strip_prefix("--steps-per-frame=") {
                        opts.steps_per_frame = parse_num(val, "--steps-per-frame");
                    } else if let Some(val) = other.strip_prefix("--tick-ms=") {
                        opts.tick_ms = parse_num(val, "--tick-ms");
                    } else if let Some(val) = other.strip_prefix("--pop-mode=") {
                        opts.pop_mode = parse_mode(val);
                    } else if let Some(val) = other.strip_prefix("--add-mode=") {
                        opts.add_mode = parse_mode(val);
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_num(val, "--seed"));
                    } else if let Some(val) = other.strip_prefix("--frames-dir=") {
                        opts.frames_dir = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--slug=") {
                        opts.slug = val.to_string();
                    } else {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }
}

fn parse_num<T: std::str::FromStr>(val: &str, flag: &str) -> T {
    match val.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Invalid {flag} value: {val}");
            process::exit(1);
        }
    }
}
