//! Persistence seam for the importer

use async_trait::async_trait;
use colony_common::db::{self, cages, mice, strains, NewCage, NewMouse};
use colony_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Create operations the normalizer emits
///
/// `create_cage` must report a duplicate (strain, cage number) pair as
/// [`colony_common::Error::Conflict`]; the scanner treats that as a skip.
#[async_trait]
pub trait ColonyStore: Send + Sync {
    /// Delete every mouse, cage and strain
    async fn wipe(&self) -> Result<()>;

    async fn create_strain(&self, name: &str) -> Result<Uuid>;

    async fn create_cage(&self, strain_id: Uuid, cage: &NewCage) -> Result<Uuid>;

    async fn create_mouse(&self, cage_id: Uuid, mouse: &NewMouse) -> Result<Uuid>;
}

/// [`ColonyStore`] backed by the colony SQLite database
#[derive(Clone)]
pub struct SqliteColonyStore {
    pool: SqlitePool,
}

impl SqliteColonyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ColonyStore for SqliteColonyStore {
    async fn wipe(&self) -> Result<()> {
        db::wipe_colony(&self.pool).await
    }

    async fn create_strain(&self, name: &str) -> Result<Uuid> {
        Ok(strains::create_strain(&self.pool, name, None, None).await?.id)
    }

    async fn create_cage(&self, strain_id: Uuid, cage: &NewCage) -> Result<Uuid> {
        Ok(cages::create_cage(&self.pool, strain_id, cage).await?.id)
    }

    async fn create_mouse(&self, cage_id: Uuid, mouse: &NewMouse) -> Result<Uuid> {
        Ok(mice::create_mouse(&self.pool, cage_id, mouse).await?.id)
    }
}
