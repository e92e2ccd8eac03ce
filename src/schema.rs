//! Diesel table definitions for lists and their items.

diesel::table! {
    /// Identity-only list containers.
    lists (id) {
        /// Generated list identifier, used in the list URL.
        id -> Integer,
    }
}

diesel::table! {
    /// To-do entries; each row belongs to exactly one list.
    items (id) {
        /// Generated identifier. Ascending order is insertion order.
        id -> Integer,
        /// Free-form item text.
        text -> Text,
        /// Owning list.
        list_id -> Integer,
    }
}

diesel::joinable!(items -> lists (list_id));
diesel::allow_tables_to_appear_in_same_query!(items, lists);
