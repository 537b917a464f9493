//! Bibshelf CLI - Command-line front end for the personal bibliography manager

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use bibshelf::config;
use bibshelf::storage::BibStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bibshelf")]
#[command(version)]
#[command(about = "Personal bibliography manager - citations, reference sets and BibTeX export")]
#[command(long_about = r#"
Bibshelf keeps your citations in a single SQLite file:
  • Add, edit and remove bibliographic entries (duplicates are refused)
  • Group entries into named reference sets
  • Quick search: tag:ml, author:knuth, created:2024-05, pub:1998, 2023, free text
  • Export a reference set as a .bib file

Example usage:
  bibshelf add --authors "Ada Lovelace" --title "Notes" --year 1843
  bibshelf search "tag:history"
  bibshelf set create "Thesis"
  bibshelf set add Thesis 1
  bibshelf set export Thesis --output thesis.bib
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Entry fields shared by `add` and `update`
#[derive(Args, Debug, Default)]
pub struct EntryFields {
    /// Authors, e.g. "Lovelace, Ada and Babbage, Charles"
    #[arg(short, long)]
    pub authors: Option<String>,

    /// Title of the work
    #[arg(short, long)]
    pub title: Option<String>,

    /// Journal, proceedings or publisher
    #[arg(long)]
    pub venue: Option<String>,

    /// Four-digit year
    #[arg(short, long)]
    pub year: Option<String>,

    /// Publication date: YYYY, YYYY-MM or YYYY-MM-DD
    #[arg(long = "date")]
    pub publication_date: Option<String>,

    #[arg(long)]
    pub volume: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub pages: Option<String>,

    #[arg(long)]
    pub doi: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

/// Criteria of the advanced search
#[derive(Args, Debug, Default)]
pub struct FindArgs {
    /// Text contained in authors, title, venue or tags
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Created on/after this date prefix
    #[arg(long)]
    pub created_from: Option<String>,

    /// Created before the end of this date prefix
    #[arg(long)]
    pub created_to: Option<String>,

    /// Published on/after this date prefix
    #[arg(long)]
    pub pub_from: Option<String>,

    /// Published before the end of this date prefix
    #[arg(long)]
    pub pub_to: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Add a new entry
    Add {
        #[command(flatten)]
        fields: EntryFields,
    },

    /// Update fields of an entry (pass "" to clear an optional field)
    Update {
        /// Entry id
        id: i64,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show a single entry
    Show {
        /// Entry id
        id: i64,

        /// Print the entry as BibTeX
        #[arg(long)]
        bibtex: bool,
    },

    /// List all entries, newest first
    List,

    /// Quick search (tag:, author:, created:, pub:, a date, or free text)
    Search {
        /// Search query
        query: String,
    },

    /// Advanced search combining several criteria
    Find {
        #[command(flatten)]
        criteria: FindArgs,
    },

    /// Manage reference sets
    Set {
        #[command(subcommand)]
        command: SetCommands,
    },

    /// Show statistics about the bibliography
    Stats,
}

#[derive(Subcommand)]
enum SetCommands {
    /// Create a reference set
    Create {
        name: String,
    },

    /// Delete a reference set (its entries are kept)
    Delete {
        /// Set name or id
        set: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List reference sets
    List,

    /// Add an entry to a set
    Add {
        /// Set name or id
        set: String,
        /// Entry id
        entry: i64,
    },

    /// Remove an entry from a set
    Remove {
        /// Set name or id
        set: String,
        /// Entry id
        entry: i64,
    },

    /// Show the entries of a set
    Show {
        /// Set name or id
        set: String,
    },

    /// Export a set as BibTeX
    Export {
        /// Set name or id
        set: String,

        /// Output file (defaults to <export_dir>/<set>.bib)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        bibshelf::ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(&config_path))?;
    let mut settings = loaded.unwrap_or_default();
    if let Some(db) = &cli.database {
        settings.database = Some(db.to_string_lossy().to_string());
    }
    let database = settings.database_path();

    config::ensure_db_dir(&database)?;
    let store = BibStore::open(&database)?;
    tracing::debug!("Using database {}", database.display());
    let json = cli.json;

    match cli.command {
        Commands::Init { force } => commands::run_init(&store, &config_path, &settings, &database, force),
        Commands::Add { fields } => commands::run_add(&store, fields, json),
        Commands::Update { id, fields } => commands::run_update(&store, id, fields),
        Commands::Delete { id, yes } => commands::run_delete(&store, id, yes),
        Commands::Show { id, bibtex } => commands::run_show(&store, id, bibtex, json),
        Commands::List => commands::run_list(&store, json),
        Commands::Search { query } => commands::run_search(&store, &query, json),
        Commands::Find { criteria } => commands::run_find(&store, criteria, json),
        Commands::Set { command } => match command {
            SetCommands::Create { name } => commands::run_set_create(&store, &name, json),
            SetCommands::Delete { set, yes } => commands::run_set_delete(&store, &set, yes),
            SetCommands::List => commands::run_set_list(&store, json),
            SetCommands::Add { set, entry } => commands::run_set_add(&store, &set, entry),
            SetCommands::Remove { set, entry } => commands::run_set_remove(&store, &set, entry),
            SetCommands::Show { set } => commands::run_set_show(&store, &set, json),
            SetCommands::Export { set, output } => {
                commands::run_set_export(&store, &settings, &set, output, json)
            }
        },
        Commands::Stats => commands::run_stats(&store, &database, json),
    }
}
