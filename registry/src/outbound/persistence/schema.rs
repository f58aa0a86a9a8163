//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `registry/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! it with `diesel print-schema`).

diesel::table! {
    /// Student records.
    ///
    /// `email` carries a unique index and `grade` a `CHECK (grade BETWEEN 1
    /// AND 12)` constraint.
    students (id) {
        /// Primary key from a `BIGSERIAL` sequence.
        id -> Int8,
        /// Given name (max 50 characters).
        first_name -> Varchar,
        /// Family name (max 50 characters).
        last_name -> Varchar,
        /// Unique contact address (max 254 characters).
        email -> Varchar,
        /// Birth date.
        date_of_birth -> Date,
        /// Enrollment date; indexed for year filters.
        enrollment_date -> Date,
        /// Grade, 1 to 12.
        grade -> Int2,
    }
}

diesel::table! {
    /// Registered accounts.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 150 characters).
        username -> Varchar,
        /// Argon2id hash in PHC string format.
        password_hash -> Text,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}
