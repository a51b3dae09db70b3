use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "appindex")]
#[command(about = "Index .desktop files and resolve launcher choices", long_about = None)]
pub struct Cli {
    /// Extra scan roots (repeatable), ranked after the XDG ones
    #[arg(short = 'p', long = "path")]
    pub paths: Vec<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Scan for .desktop files and print what we found
    Scan {
        /// Max number of file paths to print (omit for unlimited)
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Build the index and list its entries
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print the name index: one winning application per display name
    Names {
        #[arg(long)]
        json: bool,
    },

    /// Look up a single entry by desktop-id
    Lookup {
        desktop_id: String,

        #[arg(long)]
        json: bool,
    },

    /// Resolve a typed line to an application plus leftover arguments
    Resolve {
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Resolve a typed line and launch the application
    Launch { query: String },

    /// Keep the index live: watch the scan roots and apply changes
    Watch,

    /// Parse a single .desktop file and print the extracted record
    Parse {
        path: PathBuf,

        #[arg(long)]
        json: bool,
    },
}
