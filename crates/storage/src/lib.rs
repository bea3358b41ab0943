//! Player records for the entry console.
//!
//! The store holds one row per player id with the codename shown on the
//! roster. Every operation is a single auto-committed statement; the
//! connection it runs on is checked out of the pool for that statement
//! only and handed back when the statement finishes or fails.

pub mod players;

pub use sea_orm::DbErr;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, sea_query::Expr,
};
use thiserror::Error;

/// Longest codename the `players` table accepts.
pub const MAX_CODENAME_LEN: usize = 30;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to player database: {0}")]
    Connect(#[source] DbErr),
    #[error("player query failed: {0}")]
    Query(#[from] DbErr),
    #[error("player id must be positive, got {0}")]
    InvalidId(i32),
    #[error("codename must be 1 to {} characters", MAX_CODENAME_LEN)]
    InvalidCodename,
    #[error("player {0} not found")]
    NotFound(i32),
}

/// Point lookups and writes keyed by player id.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Create the `players` table if it is missing.
    async fn ensure_schema(&self) -> Result<(), StorageError>;

    /// Codename stored for `id`, or `None` when no row exists.
    async fn find_codename(&self, id: i32) -> Result<Option<String>, StorageError>;

    async fn insert(&self, id: i32, codename: &str) -> Result<(), StorageError>;

    async fn update_codename(&self, id: i32, codename: &str) -> Result<(), StorageError>;
}

/// How long a statement waits for a pooled connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn options(db_url: &str, max_connections: u32) -> ConnectOptions {
    let mut opts = ConnectOptions::new(db_url.to_owned());
    opts.max_connections(max_connections)
        .min_connections(0)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .sqlx_logging(false);
    opts
}

#[async_trait]
impl<T: PlayerRepository + ?Sized> PlayerRepository for Arc<T> {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        (**self).ensure_schema().await
    }

    async fn find_codename(&self, id: i32) -> Result<Option<String>, StorageError> {
        (**self).find_codename(id).await
    }

    async fn insert(&self, id: i32, codename: &str) -> Result<(), StorageError> {
        (**self).insert(id, codename).await
    }

    async fn update_codename(&self, id: i32, codename: &str) -> Result<(), StorageError> {
        (**self).update_codename(id, codename).await
    }
}

/// Connect to the database and return a SeaORM [`DatabaseConnection`].
pub async fn connect(db_url: &str, max_connections: u32) -> Result<DatabaseConnection, StorageError> {
    Database::connect(options(db_url, max_connections))
        .await
        .map_err(StorageError::Connect)
}

fn check_record(id: i32, codename: &str) -> Result<(), StorageError> {
    if id <= 0 {
        return Err(StorageError::InvalidId(id));
    }
    if codename.is_empty() || codename.chars().count() > MAX_CODENAME_LEN {
        return Err(StorageError::InvalidCodename);
    }
    Ok(())
}

/// [`PlayerRepository`] backed by a SeaORM connection pool.
#[derive(Clone)]
pub struct PlayerStore {
    db: DatabaseConnection,
}

impl PlayerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn open(db_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let db = connect(db_url, max_connections).await?;
        log::info!("connected to player database");
        Ok(Self::new(db))
    }

    /// Build the pool without connecting; an unreachable database shows up
    /// as a failure of the first statement instead.
    pub async fn open_lazy(db_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let mut opts = options(db_url, max_connections);
        opts.connect_lazy(true);
        let db = Database::connect(opts).await.map_err(StorageError::Connect)?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl PlayerRepository for PlayerStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        Migrator::up(&self.db, None).await?;
        Ok(())
    }

    async fn find_codename(&self, id: i32) -> Result<Option<String>, StorageError> {
        let row = players::Entity::find_by_id(id).one(&self.db).await?;
        // A row with a NULL codename still counts as an existing player.
        Ok(row.map(|row| row.codename.unwrap_or_default()))
    }

    async fn insert(&self, id: i32, codename: &str) -> Result<(), StorageError> {
        check_record(id, codename)?;
        let row = players::ActiveModel {
            id: Set(id),
            codename: Set(Some(codename.to_owned())),
        };
        players::Entity::insert(row).exec(&self.db).await?;
        log::info!("inserted player {id} as '{codename}'");
        Ok(())
    }

    async fn update_codename(&self, id: i32, codename: &str) -> Result<(), StorageError> {
        check_record(id, codename)?;
        let res = players::Entity::update_many()
            .col_expr(players::Column::Codename, Expr::value(codename))
            .filter(players::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(StorageError::NotFound(id));
        }
        log::info!("renamed player {id} to '{codename}'");
        Ok(())
    }
}
