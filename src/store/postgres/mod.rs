//! diesel-async implementation. Cascades and SET NULL actions live in the
//! migration's foreign keys, so deletes here are single statements.

use anyhow::Context;
use diesel_async::{AsyncPgConnection, pooled_connection::bb8::PooledConnection};

use super::{StoreError, StoreResult};
use crate::db::DbPool;

mod accounts;
mod carts;
mod catalog;
mod orders;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        PgStore { pool }
    }

    async fn conn(&self) -> StoreResult<PooledConnection<'_, AsyncPgConnection>> {
        self.pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")
            .map_err(StoreError::Other)
    }
}
