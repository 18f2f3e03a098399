//! PostgreSQL-backed `HeritagePointRepository` implementation using Diesel ORM.
//!
//! The insert path distinguishes the coordinate uniqueness violation from
//! infrastructure faults so callers can treat the former as a user-facing
//! validation failure.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HeritageInsertError, HeritagePointRepository, HeritageQueryError};
use crate::domain::{Coordinates, DisplayName, NewHeritagePoint, OwnedHeritagePoint, PointName, UserId};

use super::connect::{ConnectError, ConnectionFactory};
use super::diesel_error_mapping::{map_connect_error, map_diesel_error};
use super::models::NewPointRow;
use super::schema::{patrimoine, utilisateur};

/// Diesel-backed implementation of the heritage point repository port.
#[derive(Clone)]
pub struct DieselHeritagePointRepository {
    factory: ConnectionFactory,
}

impl DieselHeritagePointRepository {
    /// Create a repository opening connections through the given factory.
    pub fn new(factory: ConnectionFactory) -> Self {
        Self { factory }
    }
}

fn map_insert_error(error: diesel::result::Error) -> HeritageInsertError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    // UNIQUE(latitude, longitude): the one business-rule failure on this path.
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = error {
        return HeritageInsertError::DuplicateCoordinates;
    }
    map_diesel_error(
        error,
        HeritageInsertError::query,
        HeritageInsertError::connection,
    )
}

fn map_query_connect(error: ConnectError) -> HeritageQueryError {
    map_connect_error(error, HeritageQueryError::connection)
}

fn map_query(error: diesel::result::Error) -> HeritageQueryError {
    map_diesel_error(
        error,
        HeritageQueryError::query,
        HeritageQueryError::connection,
    )
}

type JoinedRow = (String, String, String, String);

/// Convert a joined row into a validated listed point.
fn row_to_point(row: JoinedRow) -> Result<OwnedHeritagePoint, HeritageQueryError> {
    let (nom_patrimoine, latitude, longitude, nom_utilisateur) = row;
    let name = PointName::new(nom_patrimoine)
        .map_err(|err| HeritageQueryError::query(format!("stored point name invalid: {err}")))?;
    let coordinates = Coordinates::from_stored(&latitude, &longitude)
        .map_err(|err| HeritageQueryError::query(format!("stored coordinates invalid: {err}")))?;
    let owner_name = DisplayName::new(nom_utilisateur)
        .map_err(|err| HeritageQueryError::query(format!("stored owner name invalid: {err}")))?;
    Ok(OwnedHeritagePoint::new(name, coordinates, owner_name))
}

#[async_trait]
impl HeritagePointRepository for DieselHeritagePointRepository {
    async fn insert(&self, point: &NewHeritagePoint) -> Result<(), HeritageInsertError> {
        let mut conn = self
            .factory
            .connect()
            .await
            .map_err(|err| map_connect_error(err, HeritageInsertError::connection))?;
        let row = NewPointRow {
            nom_patrimoine: point.name().as_ref(),
            latitude: point.coordinates().latitude(),
            longitude: point.coordinates().longitude(),
            id_user: point.owner().value(),
        };
        diesel::insert_into(patrimoine::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError> {
        let mut conn = self.factory.connect().await.map_err(map_query_connect)?;
        let rows: Vec<JoinedRow> = patrimoine::table
            .inner_join(utilisateur::table)
            .select((
                patrimoine::nom_patrimoine,
                patrimoine::latitude,
                patrimoine::longitude,
                utilisateur::nom_utilisateur,
            ))
            .load(&mut conn)
            .await
            .map_err(map_query)?;
        rows.into_iter().map(row_to_point).collect()
    }

    async fn list_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError> {
        let mut conn = self.factory.connect().await.map_err(map_query_connect)?;
        let rows: Vec<JoinedRow> = patrimoine::table
            .inner_join(utilisateur::table)
            .filter(patrimoine::id_user.eq(owner.value()))
            .select((
                patrimoine::nom_patrimoine,
                patrimoine::latitude,
                patrimoine::longitude,
                utilisateur::nom_utilisateur,
            ))
            .load(&mut conn)
            .await
            .map_err(map_query)?;
        rows.into_iter().map(row_to_point).collect()
    }
}
