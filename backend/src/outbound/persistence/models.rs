//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{patrimoine, utilisateur};

/// Row struct for reading from the utilisateur table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = utilisateur)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id_user: i32,
    pub nom_utilisateur: String,
    pub mot_de_passe: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = utilisateur)]
pub(crate) struct NewUserRow<'a> {
    pub nom_utilisateur: &'a str,
    pub mot_de_passe: &'a str,
}

/// Insertable struct for creating new heritage point records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patrimoine)]
pub(crate) struct NewPointRow<'a> {
    pub nom_patrimoine: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub id_user: i32,
}
