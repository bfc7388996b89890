//! CLI module for Lectern.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lectern - Lecture Pipeline and RAG
///
/// Downloads recorded lectures, transcribes them, and builds a queryable
/// knowledge base.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline over the configured lectures, then answer questions
    /// interactively
    Run {
        /// Additional lecture URLs, appended to the configured set
        urls: Vec<String>,

        /// Skip the interactive query session after indexing
        #[arg(long)]
        no_query: bool,
    },

    /// Ask a single question against the built index
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum number of context chunks to include
        #[arg(short = 'c', long, default_value = "10")]
        max_chunks: usize,
    },

    /// Show per-lecture stage completion for the work directory
    Status {
        /// Additional lecture URLs, appended to the configured set
        urls: Vec<String>,
    },

    /// Check external tools, credentials, and configuration
    Doctor,
}
