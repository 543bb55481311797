mod aggregate;
mod config;
mod db;
mod error;
mod exchange;
mod format;
mod models;
mod projection;
mod run;
mod session;
mod store;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    init_tracing(&config.log_filter);

    let db = db::Database::open(&config.db_path)?;
    tracing::debug!(path = %config.db_path.display(), "opened database");
    let mut session = session::Session::open(db, models::YearMonth::current());

    run::as_cli(&args, &mut session, &config)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
