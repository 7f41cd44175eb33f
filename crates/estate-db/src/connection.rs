//! Connection to the SurrealDB instance holding the hierarchy tables.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::repository::SurrealEntityStore;
use crate::schema::run_migrations;

/// Where the hierarchy lives and how to sign in.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, e.g. `127.0.0.1:8000`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "estate".into(),
            database: "hierarchy".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// A signed-in connection whose level tables are at the latest schema
/// version.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Sign in, select the hierarchy namespace and database, then apply
    /// pending migrations. Stores handed out afterwards can accept imports
    /// immediately.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let db = Surreal::new::<Ws>(&config.url).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        run_migrations(&db).await?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Hierarchy database ready"
        );
        Ok(Self { db })
    }

    /// An entity store sharing this connection.
    pub fn entity_store(&self) -> SurrealEntityStore<Client> {
        SurrealEntityStore::new(self.db.clone())
    }
}
