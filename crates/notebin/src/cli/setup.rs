use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "notebin",
    bin_name = "notebin",
    version,
    disable_help_subcommand = true,
    about = "Pages, folders and a trash that forgives",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Act as this user (overrides NOTEBIN_USER and the config file)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub user: Option<String>,

    /// Database file (overrides NOTEBIN_DB and the config file)
    #[arg(long, global = true, help_heading = "Options")]
    pub db: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new page
    #[command(alias = "n", display_order = 1)]
    Create {
        /// Page body
        #[arg(long, short = 'b', default_value = "")]
        body: String,

        /// Create inside another entry (parent id)
        #[arg(long = "in", short = 'i')]
        parent: Option<String>,

        /// Title words (joined with spaces)
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Create a new folder
    #[command(display_order = 2)]
    Mkdir {
        /// Create inside another entry (parent id)
        #[arg(long = "in", short = 'i')]
        parent: Option<String>,

        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// List active pages, or folders with --folders
    #[command(alias = "ls", display_order = 3)]
    List {
        #[arg(long)]
        folders: bool,
    },

    /// Show all active entries as a tree
    #[command(display_order = 4)]
    Tree,

    /// Show one entry (and its blocks, for pages)
    #[command(alias = "v", display_order = 5)]
    Show { id: String },

    /// Show a folder with its pages and subfolders
    #[command(display_order = 6)]
    Folder { id: String },

    /// Edit the title or body of an entry
    #[command(display_order = 7)]
    Edit {
        id: String,

        #[arg(long, short = 't')]
        title: Option<String>,

        #[arg(long, short = 'b')]
        body: Option<String>,
    },

    /// Move an entry under another one, or to the root without --to
    #[command(alias = "mv", display_order = 8)]
    Move {
        id: String,

        #[arg(long)]
        to: Option<String>,
    },

    /// Search active entries
    #[command(display_order = 9)]
    Search {
        term: String,

        /// Only "pages" or "folders"
        #[arg(long, short = 'k')]
        kind: Option<String>,
    },

    /// Manage page blocks
    #[command(subcommand, display_order = 10)]
    Block(BlockCommands),

    /// Move an entry to the trash
    #[command(alias = "rm", display_order = 20)]
    Trash {
        /// "pages" or "folders"
        kind: String,
        id: String,
    },

    /// List the trash, most recently trashed first
    #[command(display_order = 21)]
    Trashed,

    /// Bring an entry back from the trash
    #[command(display_order = 22)]
    Restore { kind: String, id: String },

    /// Permanently delete a trashed entry
    #[command(alias = "delete", display_order = 23)]
    Purge { kind: String, id: String },

    /// Permanently delete everything in the trash
    #[command(display_order = 24)]
    EmptyTrash,
}

#[derive(Subcommand, Debug)]
pub enum BlockCommands {
    /// Append a block to a page
    Add {
        page: String,
        #[arg(value_name = "TYPE")]
        block_type: String,
        content: String,

        #[arg(long, allow_negative_numbers = true)]
        position: Option<i64>,
    },

    /// List the blocks of a page
    #[command(alias = "ls")]
    List { page: String },

    /// Replace the content of a block
    Edit { id: String, content: String },
}
