//! List record helpers.
//!
//! Lists carry no data beyond their identifier. Deleting a list removes its
//! items first inside the same transaction, so ownership holds even when the
//! backend does not enforce the `ON DELETE CASCADE` foreign key (`SQLite`
//! leaves `foreign_keys` off unless asked).

use diesel::{dsl::exists, prelude::*, result::QueryResult};
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::{connection::DbConnection, items::insert_item};
use crate::models::{Item, List, ListId};

pub(super) async fn insert_list(conn: &mut DbConnection) -> QueryResult<ListId> {
    use crate::schema::lists::dsl::lists;
    let row: List = diesel::insert_into(lists)
        .default_values()
        .returning(List::as_returning())
        .get_result(conn)
        .await?;
    Ok(row.list_id())
}

/// Insert a new, empty list and return its identifier.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_list(conn: &mut DbConnection) -> QueryResult<ListId> {
    let list = insert_list(conn).await?;
    tracing::debug!(list_id = %list, "created list");
    Ok(list)
}

/// Create a list together with its first item in one transaction.
///
/// # Errors
/// Returns any error produced by either insertion; nothing is persisted in
/// that case.
#[must_use = "handle the result"]
pub async fn create_list_with_item(
    conn: &mut DbConnection,
    text: &str,
) -> QueryResult<(ListId, Item)> {
    let (list, item) = conn
        .transaction::<_, diesel::result::Error, _>(|conn| {
            Box::pin(async move {
                let list = insert_list(conn).await?;
                let item = insert_item(conn, list, text).await?;
                Ok((list, item))
            })
        })
        .await?;
    tracing::debug!(list_id = %list, item_id = item.id, "created list with first item");
    Ok((list, item))
}

/// Report whether a list with the given identifier exists.
///
/// # Errors
/// Returns any error produced by the lookup query.
#[must_use = "handle the result"]
pub async fn list_exists(conn: &mut DbConnection, list: ListId) -> QueryResult<bool> {
    use crate::schema::lists::dsl::{id, lists};
    diesel::select(exists(lists.filter(id.eq(list.get()))))
        .get_result(conn)
        .await
}

/// Delete a list and every item it owns.
///
/// Returns `false` when no such list existed.
///
/// # Errors
/// Returns any error produced by the delete statements; the transaction is
/// rolled back in that case.
#[must_use = "handle the result"]
pub async fn delete_list(conn: &mut DbConnection, list: ListId) -> QueryResult<bool> {
    use crate::schema::{items, lists};
    let raw = list.get();
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        Box::pin(async move {
            let removed_items = diesel::delete(items::table.filter(items::list_id.eq(raw)))
                .execute(conn)
                .await?;
            let removed_lists = diesel::delete(lists::table.filter(lists::id.eq(raw)))
                .execute(conn)
                .await?;
            tracing::debug!(list_id = raw, removed_items, "deleted list");
            Ok(removed_lists > 0)
        })
    })
    .await
}
