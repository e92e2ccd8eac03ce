//! Embedded migrations create the list and item tables.

#![cfg(feature = "sqlite")]
#![expect(clippy::expect_used, reason = "test assertions")]

use diesel_async::AsyncConnection;
use superlists::db;

#[tokio::test]
async fn sqlite_migrations_run() {
    use diesel_async::RunQueryDsl;

    let mut conn = db::DbConnection::establish(":memory:")
        .await
        .expect("in-memory database");
    db::run_migrations(&mut conn).await.expect("migrations");
    diesel::sql_query("SELECT id FROM lists")
        .execute(&mut conn)
        .await
        .expect("lists table");
    diesel::sql_query("SELECT id, text, list_id FROM items")
        .execute(&mut conn)
        .await
        .expect("items table");
}

#[tokio::test]
async fn sqlite_migrations_persist_to_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("migrated.db");
    let url = path.to_str().expect("utf-8 path");
    {
        let mut conn = db::DbConnection::establish(url).await.expect("open");
        db::apply_migrations(&mut conn, url).await.expect("migrations");
        db::create_list_with_item(&mut conn, "Buy peacock feathers")
            .await
            .expect("seed");
    }
    let mut conn = db::DbConnection::establish(url).await.expect("reopen");
    db::run_migrations(&mut conn).await.expect("rerun migrations");
    let list = superlists::models::ListId::new(1);
    let items = db::list_items(&mut conn, list).await.expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|i| i.text.as_str()), Some("Buy peacock feathers"));
}
