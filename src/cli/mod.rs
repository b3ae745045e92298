//! CLI module - Command-line interface for Reelscout
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Reelscout - movie discovery with a trending strip
#[derive(Parser)]
#[command(name = "reelscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Search movies by title and count the search
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show currently popular movies
    #[command(alias = "popular")]
    Discover,

    /// Show the most searched terms
    #[command(alias = "t")]
    Trending {
        /// Number of entries to show
        #[arg(long, short)]
        limit: Option<u64>,
    },

    /// Interactive search: every line typed on stdin updates the query
    #[command(alias = "b")]
    Browse,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
