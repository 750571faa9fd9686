//! # CLI Behavior
//!
//! This is **one possible UI client** for notebin, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Sessions
//!
//! Notebin does not authenticate. The signed-in user comes from, in order:
//! `--user`, `NOTEBIN_USER`, the `user` key of the config file. With none of
//! them every command fails as unauthorized.
//!
//! ## Naked Execution
//!
//! Running `notebin` with no arguments lists active pages.
//!
//! ## Output
//!
//! Human output goes to stdout through [`render`]. With `--json`, every command
//! prints the uniform `ActionResult` shape instead (also on failure). Logs go to
//! stderr at the configured level. `RUST_LOG` overrides the configured level and
//! `-v` forces debug.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `handlers`: Per-command calls into the API
//! - `render`: Output formatting (lists, trees, details)

mod handlers;
mod render;
pub mod setup;

use anyhow::Context;
use clap::Parser;
use notebinapp::api::NotebinApi;
use notebinapp::auth::{AuthProvider, NoSession, StaticSession};
use notebinapp::config::NotebinConfig;
use notebinapp::store::sqlite::SqliteBackend;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use handlers::Ctx;
use setup::{Cli, Commands};

pub type Api = NotebinApi<SqliteBackend, Box<dyn AuthProvider>>;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = NotebinConfig::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config.resolve_database()?,
    };
    let store = SqliteBackend::open(&db_path)
        .with_context(|| format!("could not open database at {}", db_path.display()))?;
    debug!(db = %db_path.display(), "store ready");

    let auth: Box<dyn AuthProvider> = match cli.user.as_deref().or(config.user()) {
        Some(user) => Box::new(StaticSession::for_id(user)),
        None => Box::new(NoSession),
    };

    let ctx = Ctx {
        api: NotebinApi::new(store, auth),
        json: cli.json,
    };
    let command = cli.command.unwrap_or(Commands::List { folders: false });
    handlers::dispatch(&ctx, command)
}

fn init_logging(config: &NotebinConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
