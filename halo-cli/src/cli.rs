use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "halo")]
#[command(about = "Halo customer-service agent", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Talk to the agent in an interactive console
    Chat {
        /// Conversation session id
        #[arg(short, long, default_value = "cli")]
        session: String,

        /// Channel recorded on the conversation
        #[arg(short, long, default_value = "web")]
        channel: String,
    },

    /// Load a file into the knowledge base
    Ingest {
        file: PathBuf,

        /// Target collection, defaults to DB_SCHEMA
        #[arg(long)]
        collection: Option<String>,

        /// Replace documents with the same title
        #[arg(long)]
        replace: bool,
    },

    /// Similarity search over the knowledge base
    Search {
        query: String,

        #[arg(short, long, default_value_t = halo_rag::RETRIEVER_TOP_K)]
        k: usize,

        #[arg(long)]
        collection: Option<String>,
    },

    /// Record counts and backing store of a collection
    Stats {
        #[arg(long)]
        collection: Option<String>,
    },
}
