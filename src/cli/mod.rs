//! CLI interface for knobwire

use clap::{Parser, Subcommand};
use knobwire::controls::ControlChannel;
use std::path::PathBuf;

/// Drive scene fields live from MIDI controller knobs and sliders
#[derive(Parser)]
#[command(name = "knobwire")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a live session; scene and binding values are saved when it ends
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "knobwire.yaml")]
        config: PathBuf,

        /// Run without MIDI hardware (all controls read 0)
        #[arg(long)]
        dry_run: bool,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Show the terminal control panel
        #[arg(long)]
        panel: bool,
    },

    /// Validate a configuration file and its scene
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "knobwire.yaml")]
        config: PathBuf,
    },

    /// List available MIDI input ports
    Ports,

    /// List the fields controls can drive
    Fields {
        /// Configuration file path
        #[arg(short, long, default_value = "knobwire.yaml")]
        config: PathBuf,

        /// Only show this object
        #[arg(short, long)]
        object: Option<String>,
    },

    /// Bind a control to a field
    Bind {
        /// Configuration file path
        #[arg(short, long, default_value = "knobwire.yaml")]
        config: PathBuf,

        /// Control, e.g. knob1 or slider8
        #[arg(long)]
        control: ControlChannel,

        /// Target object
        #[arg(long)]
        object: String,

        /// Target field
        #[arg(long)]
        field: String,

        /// Scale applied to control movement
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        scale: i32,
    },

    /// Remove a binding from a control
    Unbind {
        /// Configuration file path
        #[arg(short, long, default_value = "knobwire.yaml")]
        config: PathBuf,

        /// Control, e.g. knob1 or slider8
        #[arg(long)]
        control: ControlChannel,

        /// Position of the binding on the control, starting at 1
        #[arg(long, default_value = "1")]
        index: usize,
    },

    /// Remove every binding
    Clear {
        /// Configuration file path
        #[arg(short, long, default_value = "knobwire.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration and scene
    Init,
}
