// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line interface definition.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pictograph_animator")]
#[command(about = "Interpolate and inspect pictograph sequences", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (RON)
    #[arg(long, global = true, env = "PICTOGRAPH_ANIMATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the header and timeline length of a sequence
    Inspect {
        /// Sequence image (PNG) or JSON array
        file: PathBuf,
    },

    /// Print both prop poses at one beat
    Pose {
        /// Sequence image (PNG) or JSON array
        file: PathBuf,

        /// Beat to query (clamped to the timeline)
        #[arg(allow_negative_numbers = true)]
        beat: f32,
    },

    /// Step through a sequence at a fixed frame rate, one line per frame
    Play {
        /// Sequence image (PNG) or JSON array
        file: PathBuf,

        /// Frames per second (defaults to the configured value)
        #[arg(long)]
        fps: Option<u32>,

        /// Beats per second (defaults to the configured value)
        #[arg(long)]
        speed: Option<f32>,

        /// Play the timeline once even if looping is configured
        #[arg(long)]
        once: bool,

        /// Stop after this many frames
        #[arg(long, default_value_t = 600)]
        max_frames: usize,

        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// List and search the sequence catalog
    Catalog {
        /// Catalog root (defaults to the configured value)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Case-insensitive match on name, word or author
        #[arg(long, default_value = "")]
        query: String,

        /// Category label, e.g. "Level 2" or "Short (≤5 steps)"
        #[arg(long)]
        category: Option<String>,
    },

    /// Write a sequence into a fresh minimal PNG
    Export {
        /// Sequence image (PNG) or JSON array
        file: PathBuf,

        /// Output PNG path
        out: PathBuf,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
