// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: A single command: probe one profile, an image reference, or all of them.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgprobe")]
#[command(about = "Build throwaway images from base-image profiles and report what a command prints")]
#[command(version)]
pub struct Cli {
    /// Profile tag, image reference, or "all"
    #[arg(default_value = "all")]
    pub target: String,

    /// Custom image tag for a single target (letters and digits only)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory for generated Dockerfiles
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Command to run in each container instead of the profile's
    #[arg(short, long)]
    pub command: Option<String>,

    /// Remove containers, images, and Dockerfiles after each probe
    #[arg(long)]
    pub clean: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Indent JSON, or print tables when --json is absent
    #[arg(long)]
    pub pretty: bool,

    /// Profile list to use instead of discovering one
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
