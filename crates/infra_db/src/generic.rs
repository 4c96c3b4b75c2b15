//! Generic repository
//!
//! [`GenericRepository`] implements the `Repository` port once for every
//! entity that has an [`EntityMapping`]. What differs between entities, how
//! search options turn into a filter and how results are ordered, is supplied
//! by a [`SearchCriteria`] value injected at construction.
//!
//! # Transactions
//!
//! `insert`, `update` and `delete` each run in their own [`UnitOfWork`]:
//!
//! ```text
//! begin ──► execute ──► commit ──► release
//!              │
//!              └─ error ──► rollback (failure ignored) ──► release ──► original error
//! ```
//!
//! `find`, `retrieve_all` and `retrieve` use a plain [`Session`] without a
//! transaction. Engine errors are returned unchanged as `DatabaseError::Sql`
//! and are never retried.
//!
//! [`UnitOfWork`]: crate::session::UnitOfWork
//! [`Session`]: crate::session::Session

use async_trait::async_trait;
use core_kernel::{DomainPort, EntityId, Repository};
use sqlx::sqlite::{Sqlite, SqliteConnection};
use sqlx::QueryBuilder;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument};

use crate::criteria::{push_value, push_values, OrderBy, Predicate, Root, SqlValue};
use crate::error::DatabaseError;
use crate::mapping::EntityMapping;
use crate::pool::DatabasePool;
use crate::session::SessionFactory;

/// Entity-specific filtering and ordering
pub trait SearchCriteria<E>: Send + Sync + 'static {
    /// Search options accepted by [`Repository::retrieve`]
    type Options: Send + Sync + 'static;

    /// Sort order for every multi-row query
    ///
    /// The repository appends the identifier column as a last tiebreaker, so
    /// the order only needs to express the business rule.
    fn build_order(&self, root: &Root) -> OrderBy;

    /// Filter for a search; never called by `retrieve_all`
    fn build_predicate(&self, options: &Self::Options, root: &Root) -> Predicate;
}

/// CRUD repository for entity type `E` with criteria `C`
pub struct GenericRepository<E, C> {
    sessions: SessionFactory,
    criteria: C,
    _entity: PhantomData<fn() -> E>,
}

impl<E, C> GenericRepository<E, C>
where
    E: EntityMapping,
    C: SearchCriteria<E>,
{
    /// Creates a repository that opens its sessions through `sessions`
    pub fn new(sessions: SessionFactory, criteria: C) -> Self {
        Self {
            sessions,
            criteria,
            _entity: PhantomData,
        }
    }

    /// Creates a repository on `pool` with the default criteria
    pub fn from_pool(pool: DatabasePool) -> Self
    where
        C: Default,
    {
        Self::new(SessionFactory::new(pool), C::default())
    }

    /// Returns the session factory, for entity-specific queries
    pub fn sessions(&self) -> &SessionFactory {
        &self.sessions
    }

    /// Returns the criteria that filter and order this repository's queries
    pub fn criteria(&self) -> &C {
        &self.criteria
    }

    /// Builds the `SELECT` for a multi-row query
    ///
    /// The predicate is only built when options are given.
    fn select_query(&self, options: Option<&C::Options>) -> QueryBuilder<'static, Sqlite> {
        let root = E::root();
        let mut qb = select_from::<E>();

        if let Some(options) = options {
            let predicate = self.criteria.build_predicate(options, &root);
            if !predicate.is_always() {
                qb.push(" WHERE ");
                predicate.push_sql(&mut qb);
            }
        }

        self.criteria
            .build_order(&root)
            .with_tiebreaker(root.id())
            .push_sql(&mut qb);
        qb
    }

    async fn fetch(&self, options: Option<&C::Options>) -> Result<Vec<E>, DatabaseError> {
        let mut query = self.select_query(options);
        let mut session = self.sessions.open_session().await?;

        let rows = query
            .build_query_as::<E::Row>()
            .fetch_all(session.connection())
            .await?;

        rows.into_iter().map(E::from_row).collect()
    }
}

impl<E, C: Clone> Clone for GenericRepository<E, C> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            criteria: self.criteria.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, C> fmt::Debug for GenericRepository<E, C>
where
    E: EntityMapping,
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericRepository")
            .field("table", &E::TABLE)
            .field("criteria", &self.criteria)
            .finish()
    }
}

impl<E, C> DomainPort for GenericRepository<E, C>
where
    E: EntityMapping,
    C: SearchCriteria<E>,
{
}

#[async_trait]
impl<E, C> Repository<E, C::Options> for GenericRepository<E, C>
where
    E: EntityMapping,
    C: SearchCriteria<E>,
{
    type Error = DatabaseError;

    #[instrument(skip(self, entity), fields(table = E::TABLE))]
    async fn insert(&self, entity: &mut E) -> Result<(), DatabaseError> {
        if let Some(id) = entity.id() {
            return Err(DatabaseError::AlreadyPersisted {
                entity: E::TABLE,
                id,
            });
        }

        let mut uow = self.sessions.begin().await?;
        let outcome = insert_row(uow.connection(), &*entity).await;
        let id = uow.complete(outcome).await?;

        entity.assign_id(id);
        debug!(%id, "Inserted entity");
        Ok(())
    }

    #[instrument(skip(self, entity), fields(table = E::TABLE))]
    async fn update(&self, entity: &E) -> Result<(), DatabaseError> {
        let id = entity
            .id()
            .ok_or(DatabaseError::MissingIdentifier { entity: E::TABLE })?;

        let mut uow = self.sessions.begin().await?;
        let outcome = update_row(uow.connection(), id, entity).await;
        uow.complete(outcome).await?;

        debug!(%id, "Updated entity");
        Ok(())
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn delete(&self, id: EntityId) -> Result<(), DatabaseError> {
        let mut uow = self.sessions.begin().await?;
        let outcome = delete_row::<E>(uow.connection(), id).await;
        uow.complete(outcome).await?;

        debug!("Deleted entity");
        Ok(())
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn find(&self, id: EntityId) -> Result<Option<E>, DatabaseError> {
        let mut qb = select_from::<E>();
        qb.push(" WHERE ").push(E::root().id()).push(" = ");
        push_value(&mut qb, SqlValue::from(id));

        let mut session = self.sessions.open_session().await?;
        let row = qb
            .build_query_as::<E::Row>()
            .fetch_optional(session.connection())
            .await?;

        debug!(found = row.is_some(), "Loaded entity");
        row.map(E::from_row).transpose()
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn retrieve_all(&self) -> Result<Vec<E>, DatabaseError> {
        let entities = self.fetch(None).await?;
        debug!(count = entities.len(), "Retrieved entities");
        Ok(entities)
    }

    #[instrument(skip(self, options), fields(table = E::TABLE))]
    async fn retrieve(&self, options: &C::Options) -> Result<Vec<E>, DatabaseError> {
        let entities = self.fetch(Some(options)).await?;
        debug!(count = entities.len(), "Retrieved matching entities");
        Ok(entities)
    }
}

/// `SELECT <columns> FROM <table>`
fn select_from<E: EntityMapping>() -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(E::COLUMNS.join(", "));
    qb.push(" FROM ").push(E::TABLE);
    qb
}

async fn insert_row<E: EntityMapping>(
    conn: &mut SqliteConnection,
    entity: &E,
) -> Result<EntityId, DatabaseError> {
    let (columns, values): (Vec<&'static str>, Vec<SqlValue>) =
        entity.column_values().into_iter().unzip();

    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
    qb.push(E::TABLE);
    if columns.is_empty() {
        qb.push(" DEFAULT VALUES");
    } else {
        qb.push(" (").push(columns.join(", ")).push(") VALUES (");
        push_values(&mut qb, &values);
        qb.push(")");
    }

    let result = qb.build().execute(&mut *conn).await?;
    let rowid = result.last_insert_rowid();

    EntityId::new(rowid).map_err(|e| DatabaseError::mapping(E::TABLE, E::ID_COLUMN, e))
}

async fn update_row<E: EntityMapping>(
    conn: &mut SqliteConnection,
    id: EntityId,
    entity: &E,
) -> Result<(), DatabaseError> {
    let values = entity.column_values();
    if values.is_empty() {
        return ensure_exists::<E>(conn, id).await;
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
    qb.push(E::TABLE).push(" SET ");
    for (i, (column, value)) in values.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(column).push(" = ");
        push_value(&mut qb, value);
    }
    qb.push(" WHERE ").push(E::ID_COLUMN).push(" = ");
    push_value(&mut qb, SqlValue::from(id));

    let result = qb.build().execute(&mut *conn).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(E::TABLE, id));
    }
    Ok(())
}

/// Nothing to write: the update succeeds exactly when the row exists
async fn ensure_exists<E: EntityMapping>(
    conn: &mut SqliteConnection,
    id: EntityId,
) -> Result<(), DatabaseError> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT 1 FROM ");
    qb.push(E::TABLE).push(" WHERE ").push(E::ID_COLUMN).push(" = ");
    push_value(&mut qb, SqlValue::from(id));

    match qb.build().fetch_optional(&mut *conn).await? {
        Some(_) => Ok(()),
        None => Err(DatabaseError::not_found(E::TABLE, id)),
    }
}

async fn delete_row<E: EntityMapping>(
    conn: &mut SqliteConnection,
    id: EntityId,
) -> Result<(), DatabaseError> {
    let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM ");
    qb.push(E::TABLE).push(" WHERE ").push(E::ID_COLUMN).push(" = ");
    push_value(&mut qb, SqlValue::from(id));

    let result = qb.build().execute(&mut *conn).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(E::TABLE, id));
    }
    Ok(())
}
