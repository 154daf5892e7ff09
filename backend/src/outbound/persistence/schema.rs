//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key, assigned by the database.
        id -> Int4,
        /// Unique login name (max 64 characters).
        #[max_length = 64]
        username -> Varchar,
        /// Salted argon2id hash in PHC string format.
        password_hash -> Varchar,
    }
}

diesel::table! {
    /// Blog posts, each owned by one author.
    posts (id) {
        /// Primary key, assigned by the database.
        id -> Int4,
        /// Foreign key into `users.id`.
        author_id -> Int4,
        /// Post title (max 255 characters).
        #[max_length = 255]
        title -> Varchar,
        /// Post body.
        body -> Text,
        /// Creation timestamp, assigned by the database.
        created -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::allow_tables_to_appear_in_same_query!(posts, users);
