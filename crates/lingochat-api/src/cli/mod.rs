//! CLI command definitions for the `lingochat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod seed;
pub mod vocabulary;

use clap::{Parser, Subcommand};

/// Language-practice chat backend.
#[derive(Parser)]
#[command(name = "lingochat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs as JSON lines.
    #[arg(long, global = true, env = "LINGOCHAT_LOG_JSON")]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "LINGOCHAT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "info,lingochat_core=debug,lingochat_infra=debug,lingochat_api=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(long)]
        port: Option<u16>,

        /// Host address to bind to.
        #[arg(long)]
        host: Option<String>,
    },

    /// Load the built-in speaker catalog into the database.
    Seed,

    /// Send a message to a chat session and print the reply.
    Send {
        /// Session id, e.g. `chat_aurora-001`.
        session_id: String,

        /// Message text.
        text: String,

        /// User the session belongs to.
        #[arg(long)]
        user: Option<String>,
    },

    /// Show a chat session with its speaker.
    Session {
        /// Session id.
        session_id: String,
    },

    /// List a user's most recent chats.
    Recent {
        /// User id.
        user_id: String,
    },

    /// Translate a word into one or more languages.
    Translate {
        /// Word to translate.
        word: String,

        /// Source language.
        #[arg(long, default_value = "English")]
        from: String,

        /// Target languages (comma-separated or repeated).
        #[arg(long = "to", value_delimiter = ',', required = true)]
        to: Vec<String>,
    },

    /// Manage a user's saved words.
    Words {
        #[command(subcommand)]
        command: WordsCommand,
    },
}

#[derive(Subcommand)]
pub enum WordsCommand {
    /// Save a word to the dictionary for its language.
    Save {
        word: String,

        /// Language the word belongs to.
        #[arg(long, short)]
        language: String,

        #[arg(long)]
        user: String,
    },

    /// List the words in one dictionary.
    List {
        #[arg(long, short)]
        language: String,

        #[arg(long)]
        user: String,
    },

    /// List a user's dictionaries.
    Dictionaries {
        #[arg(long)]
        user: String,
    },

    /// Remove a saved word by id.
    Forget {
        id: String,

        #[arg(long)]
        user: String,
    },
}
