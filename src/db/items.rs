//! Item record helpers.

use diesel::{prelude::*, result::QueryResult, sql_types::Text};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Item, ListId, NewItem};

pub(super) async fn insert_item(
    conn: &mut DbConnection,
    list: ListId,
    text: &str,
) -> QueryResult<Item> {
    use crate::schema::items::dsl::items;
    let row = NewItem {
        text,
        list_id: list.get(),
    };
    diesel::insert_into(items)
        .values(&row)
        .returning(Item::as_returning())
        .get_result(conn)
        .await
}

/// Append an item to an existing list.
///
/// Returns `None`, and inserts nothing, when the list does not exist. The
/// existence check and the insert are a single `INSERT ... SELECT`, so the
/// statement takes the write lock up front instead of upgrading a read lock
/// that a concurrent writer may already be waiting on.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_item(
    conn: &mut DbConnection,
    list: ListId,
    text: &str,
) -> QueryResult<Option<Item>> {
    use crate::schema::{items, lists};
    let owner = lists::table
        .filter(lists::id.eq(list.get()))
        .select((text.into_sql::<Text>(), lists::id));
    diesel::insert_into(items::table)
        .values(owner)
        .into_columns((items::text, items::list_id))
        .returning(Item::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// Load a list's items in insertion order.
///
/// # Errors
/// Returns any error produced by the query.
#[must_use = "handle the result"]
pub async fn list_items(conn: &mut DbConnection, list: ListId) -> QueryResult<Vec<Item>> {
    use crate::schema::items::dsl::{id, items, list_id};
    items
        .filter(list_id.eq(list.get()))
        .order(id.asc())
        .select(Item::as_select())
        .load(conn)
        .await
}
