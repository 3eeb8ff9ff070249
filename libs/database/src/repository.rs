//! Generic base repository shared by PostgreSQL-backed domain repositories.
//!
//! Domain crates build their concrete repository (e.g. `PgOrderRepository`) on
//! top of `BaseRepository<Entity>`, handling only the domain-shaped mapping
//! and leaving the SeaORM CRUD plumbing here.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

/// Marker for entities whose primary key is a `Uuid`, matching the `uuid::Uuid`
/// id convention used throughout this workspace's domain crates.
pub trait UuidEntity: EntityTrait
where
    <Self::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
}

impl<E> UuidEntity for E
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
}

/// Thin wrapper around a SeaORM entity's CRUD operations.
///
/// This holds the shared `DatabaseConnection` and exposes the handful of
/// operations every domain repository in this workspace needs; domain-specific
/// queries (filters, joins, counts) are implemented directly against
/// `self.db()` in the concrete repository.
#[derive(Clone)]
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _marker: std::marker::PhantomData<E>,
}

impl<E: EntityTrait> BaseRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn insert(&self, model: E::ActiveModel) -> Result<E::Model, DbErr>
    where
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    {
        model.insert(&self.db).await
    }

    pub async fn find_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<E::Model>, DbErr>
    where
        E::PrimaryKey: PrimaryKeyTrait,
    {
        E::find_by_id(id).one(&self.db).await
    }

    pub async fn update(&self, model: E::ActiveModel) -> Result<E::Model, DbErr>
    where
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    {
        model.update(&self.db).await
    }

    pub async fn delete_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<u64, DbErr>
    where
        E::PrimaryKey: PrimaryKeyTrait,
    {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
