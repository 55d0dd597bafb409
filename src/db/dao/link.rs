use std::collections::HashMap;

use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::now;
use super::error::{DaoLayerError, DaoResult};

/// Join table holding one `(parent, child)` row per membership. Reading the children of a
/// parent in `linked_at` order gives back the list in append order.
pub trait LinkEntity: EntityTrait {
    const NAME: &'static str;

    fn parent_column() -> Self::Column;
    fn child_column() -> Self::Column;
    fn linked_at_column() -> Self::Column;
    fn new_link(parent: Uuid, child: Uuid, at: DateTimeWithTimeZone) -> Self::ActiveModel;
    fn parent_of(model: &Self::Model) -> Uuid;
    fn child_of(model: &Self::Model) -> Uuid;
}

/// Appends `child` to `parent`'s list. Linking an existing pair is a no-op.
pub async fn link<L, C>(conn: &C, parent: Uuid, child: Uuid) -> DaoResult<()>
where
    L: LinkEntity,
    C: ConnectionTrait,
    L::ActiveModel: ActiveModelTrait<Entity = L> + ActiveModelBehavior + Send,
{
    L::insert(L::new_link(parent, child, now()))
        .on_conflict(
            OnConflict::columns([L::parent_column(), L::child_column()])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    tracing::debug!(table = L::NAME, %parent, %child, "linked");
    Ok(())
}

/// Pulls `child` out of every parent list that holds it.
pub async fn unlink_child<L, C>(conn: &C, child: Uuid) -> DaoResult<u64>
where
    L: LinkEntity,
    C: ConnectionTrait,
{
    let result = L::delete_many()
        .filter(L::child_column().eq(child))
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    tracing::debug!(table = L::NAME, %child, rows = result.rows_affected, "pulled child");
    Ok(result.rows_affected)
}

/// Empties `parent`'s list. The children themselves are untouched.
pub async fn unlink_parent<L, C>(conn: &C, parent: Uuid) -> DaoResult<u64>
where
    L: LinkEntity,
    C: ConnectionTrait,
{
    let result = L::delete_many()
        .filter(L::parent_column().eq(parent))
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    tracing::debug!(table = L::NAME, %parent, rows = result.rows_affected, "cleared parent");
    Ok(result.rows_affected)
}

pub async fn children_of<L, C>(conn: &C, parent: Uuid) -> DaoResult<Vec<Uuid>>
where
    L: LinkEntity,
    C: ConnectionTrait,
{
    let rows = L::find()
        .filter(L::parent_column().eq(parent))
        .order_by_asc(L::linked_at_column())
        .all(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    Ok(rows.iter().map(L::child_of).collect())
}

/// Children of several parents in one query. Parents without children map to an empty list.
pub async fn children_of_many<L, C>(
    conn: &C,
    parents: &[Uuid],
) -> DaoResult<HashMap<Uuid, Vec<Uuid>>>
where
    L: LinkEntity,
    C: ConnectionTrait,
{
    let mut lists: HashMap<Uuid, Vec<Uuid>> =
        parents.iter().map(|parent| (*parent, Vec::new())).collect();
    if parents.is_empty() {
        return Ok(lists);
    }

    let rows = L::find()
        .filter(L::parent_column().is_in(parents.iter().copied()))
        .order_by_asc(L::linked_at_column())
        .all(conn)
        .await
        .map_err(DaoLayerError::Db)?;

    for row in &rows {
        lists
            .entry(L::parent_of(row))
            .or_default()
            .push(L::child_of(row));
    }
    Ok(lists)
}
