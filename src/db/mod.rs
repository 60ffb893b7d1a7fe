//! Document store: users, profiles and events on top of an sqlx SQLite pool.
//!
//! Every multi-row operation runs inside a single transaction, so a failure
//! halfway (or a dropped request future) leaves nothing half-written.

mod cascade;
mod events;
mod id;
mod profiles;
mod users;

use std::{str::FromStr, time::Duration};

use sqlx::{
    Sqlite, SqlitePool, Transaction,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::{AppResult, config::Config};

pub use cascade::{CascadeReport, remove_first};
pub use events::{Event, EventSettings, NewEvent};
pub use id::{DocId, InvalidDocId};
pub use profiles::Profile;

/// Whether an update found a document to apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Matched,
    NoMatch,
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(config: &Config) -> AppResult<Store> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Store { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// A private in-memory database. The pool is pinned to one connection that
    /// never expires, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> AppResult<Store> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        let store = Store { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Starts a transaction holding the write lock from its first statement.
    /// A deferred transaction that reads first cannot wait for the lock when it
    /// later writes; SQLite fails it with `SQLITE_BUSY` instead.
    pub(crate) async fn begin_write(&self) -> sqlx::Result<Transaction<'static, Sqlite>> {
        self.pool.begin_with("BEGIN IMMEDIATE").await
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
impl Store {
    /// A pooled store over a real database file, for tests that need more
    /// than one connection.
    pub(crate) async fn on_disk(dir: &std::path::Path) -> Store {
        let url = format!("sqlite://{}", dir.join("eventhub.db").display());
        let config = Config::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone())).unwrap();
        Store::connect(&config).await.unwrap()
    }

    /// Checks out a pool connection, starving everyone else on a
    /// single-connection store until it is dropped.
    pub(crate) async fn hold_connection(&self) -> sqlx::pool::PoolConnection<Sqlite> {
        self.pool.acquire().await.unwrap()
    }
}
