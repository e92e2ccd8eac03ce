#![cfg(feature = "sqlite")]

use diesel_async::AsyncConnection;
use rstest::{fixture, rstest};

use super::*;
use crate::models::ListId;

#[fixture]
async fn migrated_conn() -> DbConnection {
    let mut conn = DbConnection::establish(":memory:")
        .await
        .expect("failed to create in-memory connection");
    apply_migrations(&mut conn, "")
        .await
        .expect("failed to apply migrations");
    conn
}

#[rstest]
#[tokio::test]
async fn migrations_are_idempotent(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    run_migrations(&mut conn)
        .await
        .expect("second migration run should be a no-op");
}

#[rstest]
#[tokio::test]
async fn audit_accepts_bundled_sqlite(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    audit_sqlite_features(&mut conn)
        .await
        .expect("sqlite feature audit failed");
}

#[rstest]
#[tokio::test]
async fn new_lists_get_distinct_ids(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let first = create_list(&mut conn).await.expect("create first list");
    let second = create_list(&mut conn).await.expect("create second list");
    assert_ne!(first, second);
    assert!(list_exists(&mut conn, first).await.expect("lookup"));
    assert!(list_exists(&mut conn, second).await.expect("lookup"));
}

#[rstest]
#[tokio::test]
async fn items_come_back_in_insertion_order(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let list = create_list(&mut conn).await.expect("create list");
    for text in ["Buy a Burger", "Use Burger's ketchup to make a soup", "Nap"] {
        create_item(&mut conn, list, text)
            .await
            .expect("insert item")
            .expect("list should exist");
    }
    let texts: Vec<String> = list_items(&mut conn, list)
        .await
        .expect("load items")
        .into_iter()
        .map(|item| item.text)
        .collect();
    assert_eq!(
        texts,
        ["Buy a Burger", "Use Burger's ketchup to make a soup", "Nap"]
    );
}

#[rstest]
#[tokio::test]
async fn items_stay_with_their_list(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let (first, rooster) = create_list_with_item(&mut conn, "Buy rooster tail")
        .await
        .expect("start first list");
    let (second, milk) = create_list_with_item(&mut conn, "Buy Milk")
        .await
        .expect("start second list");
    assert_eq!(rooster.owner(), first);
    assert_eq!(milk.owner(), second);

    let first_items = list_items(&mut conn, first).await.expect("load first");
    let second_items = list_items(&mut conn, second).await.expect("load second");
    assert_eq!(first_items, vec![rooster]);
    assert_eq!(second_items, vec![milk]);
}

#[rstest]
#[tokio::test]
async fn create_item_refuses_unknown_list(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let missing = ListId::new(4242);
    let created = create_item(&mut conn, missing, "orphan")
        .await
        .expect("query should succeed");
    assert!(created.is_none());
    assert!(list_items(&mut conn, missing).await.expect("load").is_empty());
}

#[rstest]
#[tokio::test]
async fn empty_text_is_storable(#[future] migrated_conn: DbConnection) {
    // The storage layer itself does not reject blank text.
    let mut conn = migrated_conn.await;
    let (list, item) = create_list_with_item(&mut conn, "")
        .await
        .expect("start list");
    assert_eq!(item.text, "");
    assert_eq!(list_items(&mut conn, list).await.expect("load").len(), 1);
}

#[rstest]
#[tokio::test]
async fn deleting_a_list_removes_its_items(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let (doomed, _) = create_list_with_item(&mut conn, "first")
        .await
        .expect("start doomed list");
    create_item(&mut conn, doomed, "second")
        .await
        .expect("insert")
        .expect("list exists");
    let (kept, kept_item) = create_list_with_item(&mut conn, "survivor")
        .await
        .expect("start kept list");

    assert!(delete_list(&mut conn, doomed).await.expect("delete"));
    assert!(!list_exists(&mut conn, doomed).await.expect("lookup"));
    assert!(list_items(&mut conn, doomed).await.expect("load").is_empty());
    assert_eq!(
        list_items(&mut conn, kept).await.expect("load"),
        vec![kept_item]
    );

    assert!(!delete_list(&mut conn, doomed).await.expect("second delete"));
}
