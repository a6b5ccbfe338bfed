use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "evidence-sheet")]
#[command(version, about = "Lay out evidence photos on an A4 sheet and export it as PNG")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose a sheet from up to four JPEG/PNG photos
    Compose(ComposeArgs),

    /// Show the complaint guide
    Guide {
        /// Category to show; lists all categories when omitted
        #[arg(value_name = "METHOD")]
        method: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Photos to place on the sheet, in order
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Sheet title (defaults to the configured title)
    #[arg(long)]
    pub title: Option<String>,

    /// Page number printed in the footer
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Caption for each photo, in photo order (repeatable)
    #[arg(long = "note", value_name = "TEXT")]
    pub notes: Vec<String>,

    /// Where to save the PNG (defaults to the configured save location)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Open a print page for the sheet after saving
    #[arg(long)]
    pub print: bool,

    /// Preview zoom to report (0.5 to 2.0)
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f32,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
