//! Diesel table definitions for the PostgreSQL schema.
//!
//! Migrations are owned outside this repository; these definitions must match
//! the live schema exactly. Diesel uses them for compile-time query
//! validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts.
    utilisateur (id_user) {
        /// Primary key, assigned by the store.
        id_user -> Int4,
        /// Display name, intended unique.
        nom_utilisateur -> Varchar,
        /// Argon2 password hash in PHC string format.
        mot_de_passe -> Varchar,
    }
}

diesel::table! {
    /// Heritage points; `(latitude, longitude)` carries a UNIQUE constraint.
    patrimoine (id_patrimoine) {
        /// Primary key, assigned by the store.
        id_patrimoine -> Int4,
        /// Point name.
        nom_patrimoine -> Varchar,
        /// Latitude as a decimal string with 6 fractional digits.
        latitude -> Varchar,
        /// Longitude as a decimal string with 6 fractional digits.
        longitude -> Varchar,
        /// Owning user.
        id_user -> Int4,
    }
}

diesel::joinable!(patrimoine -> utilisateur (id_user));
diesel::allow_tables_to_appear_in_same_query!(patrimoine, utilisateur);
