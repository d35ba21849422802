use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "doc-tree")]
#[command(about = "A terminal panel for organising documents into folders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the interactive TUI (default)
    Run {
        /// Start from a JSON snapshot instead of the sample documents
        #[arg(short, long)]
        state: Option<String>,
    },
    /// Render a snapshot as text
    Screenshot {
        /// Path to the JSON snapshot (defaults to the sample documents)
        #[arg(short, long)]
        state: Option<String>,
        /// Output file for the screenshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Terminal width for rendering
        #[arg(long, default_value = "80")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "24")]
        height: u16,
    },
    /// Execute a command against a snapshot and output the resulting snapshot
    Execute {
        /// Path to the JSON snapshot
        #[arg(short, long)]
        state: String,
        /// Command to execute (e.g. "drag_start:doc-5", "move_to:doc-1:root")
        #[arg(short = 'x', long)]
        command: String,
        /// Output file for the resulting snapshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Also render a screenshot of the result
        #[arg(long)]
        screenshot: bool,
        /// Terminal width for screenshot (if enabled)
        #[arg(long, default_value = "80")]
        width: u16,
        /// Terminal height for screenshot (if enabled)
        #[arg(long, default_value = "24")]
        height: u16,
    },
    /// Write the sample documents as a JSON snapshot
    SaveState {
        /// Output file for the snapshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run a headless test script
    Test {
        /// Path to the test script
        script: String,
        /// Initial JSON snapshot (defaults to the sample documents)
        #[arg(short, long)]
        state: Option<String>,
        /// Write screenshots instead of comparing them
        #[arg(long)]
        overwrite: bool,
        /// Log debug output to stderr
        #[arg(short, long)]
        verbose: bool,
    },
}
