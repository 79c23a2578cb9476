use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream a stored assistant reply as if it came from the agent
    Replay {
        /// File holding the complete reply text
        file: PathBuf,

        /// Chars per streamed chunk (defaults to the configured size)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Author recorded on the resulting message
        #[arg(long, default_value = "chat-agent")]
        author: String,
    },

    /// Print the actions contained in a reply's options block
    Actions {
        /// File holding the complete reply text
        file: PathBuf,
    },
}

/// Define the application arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
