#![deny(clippy::all, clippy::pedantic)]
//! # Suika Runtime
//!
//! Command line driver for the merge-game environment. `random` plays
//! episodes with a uniform random policy and prints one JSON summary per
//! episode on stdout; `sweep` steps a list of discrete actions and reports
//! where each one dropped its piece.

mod episodes;
mod text_render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use suika::GameConfig;

#[derive(Parser, Debug)]
#[command(name = "suika", version, about)]
struct Args {
    /// JSON game configuration. Built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play episodes with a uniform random policy.
    Random {
        #[arg(long, default_value_t = 1)]
        episodes: u64,

        /// Base seed; episode `i` uses `seed + i`.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Use a discrete action space with this many bins instead of a
        /// continuous one.
        #[arg(long, value_name = "BINS")]
        discrete: Option<usize>,

        /// Start every episode from a randomly scattered board.
        #[arg(long)]
        scatter: bool,

        /// Truncate episodes after this many steps.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Log an ASCII board through tracing while playing.
        #[arg(long)]
        render: bool,

        /// Frames between two rendered boards.
        #[arg(long, default_value_t = 120)]
        render_every: u64,
    },
    /// Step the listed discrete actions and report each drop column.
    Sweep {
        #[arg(long, default_value_t = 50)]
        bins: usize,

        #[arg(long, value_delimiter = ',', default_values_t = [0, 12, 25, 37, 49])]
        actions: Vec<usize>,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    match args.command {
        Command::Random {
            episodes,
            seed,
            discrete,
            scatter,
            max_steps,
            render,
            render_every,
        } => episodes::random(
            config,
            &episodes::RandomOptions {
                episodes,
                seed,
                discrete,
                scatter,
                max_steps,
                render_every: render.then_some(render_every),
            },
        ),
        Command::Sweep {
            bins,
            actions,
            seed,
        } => episodes::sweep(config, bins, &actions, seed),
    }
}
