use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the domain name and field definitions of a schema file
    Define {
        /// Schema file (TOML)
        schema: PathBuf,
    },
    /// Print the document operation for a record
    Document {
        /// Schema file (TOML)
        schema: PathBuf,
        /// Record as a JSON object
        record: PathBuf,
        /// Record id (defaults to the record's `id` property)
        #[arg(long)]
        id: Option<String>,
        /// Document version, must grow with every change
        #[arg(long)]
        version: u64,
        /// Emit a delete operation instead of an add
        #[arg(long)]
        delete: bool,
    },
    /// Compile a query into search endpoint parameters
    Compile {
        /// Schema file (TOML)
        schema: PathBuf,
        /// Clause as "field operator value", e.g. "helpfulness > 10"
        #[arg(short = 'w', long = "where")]
        clauses: Vec<String>,
        /// Free-text search
        #[arg(short, long)]
        text: Option<String>,
        /// Rank expression, e.g. "-helpfulness"
        #[arg(long)]
        order: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        /// Field to return with each hit
        #[arg(short, long = "return")]
        returning: Vec<String>,
    },
}
