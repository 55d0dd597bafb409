use chrono::Utc;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, Order, PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{
    EntityLabel, HasCreatedAtColumn, HasIdActiveModel, HasIdColumn, TimestampedActiveModel,
};
use super::error::{DaoLayerError, DaoResult};

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

pub fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}

// Connection-generic helpers. `C` is either the pool or an open transaction, so the
// ownership graph can run several of these inside one unit of work.

pub async fn insert_stamped<E, C, T>(conn: &C, data: T) -> DaoResult<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    T: IntoActiveModel<E::ActiveModel>,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E>
        + ActiveModelBehavior
        + HasIdActiveModel
        + TimestampedActiveModel
        + Send,
{
    let now = now();
    let mut active = data.into_active_model();
    active.set_id(Uuid::new_v4());
    active.set_created_at(now);
    active.set_updated_at(now);
    active.insert(conn).await.map_err(DaoLayerError::Db)
}

pub async fn find_in<E, C>(conn: &C, id: Uuid) -> DaoResult<E::Model>
where
    E: EntityTrait + EntityLabel,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    E::find_by_id(id)
        .one(conn)
        .await
        .map_err(DaoLayerError::Db)?
        .ok_or(DaoLayerError::NotFound {
            entity: E::LABEL,
            id,
        })
}

pub async fn update_in<E, C, F>(conn: &C, id: Uuid, apply: F) -> DaoResult<E::Model>
where
    E: EntityTrait + EntityLabel,
    C: ConnectionTrait,
    F: FnOnce(&mut E::ActiveModel),
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + TimestampedActiveModel + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let model = find_in::<E, C>(conn, id).await?;
    let mut active = model.into_active_model();
    apply(&mut active);
    active.set_updated_at(now());
    active.update(conn).await.map_err(DaoLayerError::Db)
}

pub async fn delete_in<E, C>(conn: &C, id: Uuid) -> DaoResult<Uuid>
where
    E: EntityTrait + EntityLabel,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let result = E::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;

    if result.rows_affected == 0 {
        return Err(DaoLayerError::NotFound {
            entity: E::LABEL,
            id,
        });
    }

    Ok(id)
}

pub struct DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
{
    dao: D,
    page: u64,
    page_size: u64,
    order: Option<(<D::Entity as EntityTrait>::Column, Order)>,
    apply: F,
    done: bool,
}

impl<D, F> DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
    <D::Entity as EntityTrait>::Column: Clone,
{
    pub async fn next_page(
        &mut self,
    ) -> DaoResult<Option<PaginatedResponse<D::Model>>> {
        if self.done {
            return Ok(None);
        }

        let response = self
            .dao
            .find(
                self.page,
                self.page_size,
                self.order.clone(),
                self.apply.clone(),
            )
            .await?;

        if !response.has_next {
            self.done = true;
        }
        self.page = self.page.saturating_add(1);

        Ok(Some(response))
    }
}

/// Generic DAO over one stamped entity. `Model`/`ActiveModel` are spelled out so their
/// bounds travel with every `D: DaoBase`.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized {
    type Entity: EntityTrait<
            Model = Self::Model,
            ActiveModel = Self::ActiveModel,
            PrimaryKey: PrimaryKeyTrait<ValueType: From<Uuid> + Send + Sync>,
        > + HasCreatedAtColumn
        + HasIdColumn
        + EntityLabel
        + Send
        + Sync;
    type Model: FromQueryResult + IntoActiveModel<Self::ActiveModel> + Send + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + HasIdActiveModel
        + TimestampedActiveModel
        + Send;

    const MAX_PAGE_SIZE: u64 = 100;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    async fn create(
        &self,
        data: impl IntoActiveModel<Self::ActiveModel> + Send,
    ) -> DaoResult<Self::Model> {
        insert_stamped::<Self::Entity, _, _>(self.db(), data).await
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<Self::Model> {
        find_in::<Self::Entity, _>(self.db(), id).await
    }

    async fn find(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(<Self::Entity as EntityTrait>::Column, Order)>,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<Self::Model>> {
        if page == 0 || page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(DaoLayerError::InvalidPagination { page, page_size });
        }

        let base = Self::Entity::find();
        let filtered = apply(base);
        let ordered = match order {
            Some((column, order)) => filtered.order_by(column, order),
            None => filtered
                .order_by_asc(Self::Entity::created_at_column())
                .order_by_asc(Self::Entity::id_column()),
        };
        let fetch_size = page_size.saturating_add(1);
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let mut data = ordered
            .limit(fetch_size)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        let has_next = data.len() > page_size as usize;
        if has_next {
            data.truncate(page_size as usize);
        }

        Ok(PaginatedResponse {
            data,
            page,
            page_size,
            has_next,
        })
    }

    fn find_iter<F>(
        &self,
        page_size: Option<u64>,
        order: Option<(<Self::Entity as EntityTrait>::Column, Order)>,
        apply: F,
    ) -> DaoPager<Self, F>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Clone + Send,
        <Self::Entity as EntityTrait>::Column: Clone,
    {
        DaoPager {
            dao: self.clone(),
            page: 1,
            page_size: page_size.unwrap_or(Self::MAX_PAGE_SIZE),
            order,
            apply,
            done: false,
        }
    }

    /// Every row, oldest first, fetched page by page.
    async fn find_all(&self) -> DaoResult<Vec<Self::Model>> {
        let mut pager = self.find_iter(None, None, |query| query);
        let mut rows = Vec::new();
        while let Some(mut response) = pager.next_page().await? {
            rows.append(&mut response.data);
        }
        Ok(rows)
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<Self::Model>
    where
        F: for<'a> FnOnce(&'a mut Self::ActiveModel) + Send,
    {
        update_in::<Self::Entity, _, _>(self.db(), id, apply).await
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        delete_in::<Self::Entity, _>(self.db(), id).await
    }
}
