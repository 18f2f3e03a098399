//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, PasswordHash, UserAccount, UserId};

use super::connect::{ConnectError, ConnectionFactory};
use super::diesel_error_mapping::{map_connect_error, map_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::schema::utilisateur;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    factory: ConnectionFactory,
}

impl DieselUserRepository {
    /// Create a repository opening connections through the given factory.
    pub fn new(factory: ConnectionFactory) -> Self {
        Self { factory }
    }
}

fn map_connect(error: ConnectError) -> UserPersistenceError {
    map_connect_error(error, UserPersistenceError::connection)
}

fn map_query(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain account record.
fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let UserRow {
        id_user,
        nom_utilisateur,
        mot_de_passe,
    } = row;
    let display_name = DisplayName::new(nom_utilisateur).map_err(|err| {
        UserPersistenceError::query(format!("stored display name invalid: {err}"))
    })?;
    Ok(UserAccount::new(
        UserId::new(id_user),
        display_name,
        PasswordHash::from_stored(mot_de_passe),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        display_name: &DisplayName,
        password_hash: &PasswordHash,
    ) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.factory.connect().await.map_err(map_connect)?;
        let row = NewUserRow {
            nom_utilisateur: display_name.as_ref(),
            mot_de_passe: password_hash.as_str(),
        };
        let id = diesel::insert_into(utilisateur::table)
            .values(&row)
            .returning(utilisateur::id_user)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_query)?;
        Ok(UserId::new(id))
    }

    async fn find_by_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.factory.connect().await.map_err(map_connect)?;
        let row: Option<UserRow> = utilisateur::table
            .filter(utilisateur::nom_utilisateur.eq(display_name))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query)?;
        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row mapping; query execution is covered by the
    //! store itself.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rows_map_to_validated_accounts() {
        let account = row_to_account(UserRow {
            id_user: 3,
            nom_utilisateur: "ada".to_owned(),
            mot_de_passe: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$AAAA".to_owned(),
        })
        .expect("valid row maps");
        assert_eq!(account.id().value(), 3);
        assert_eq!(account.display_name().as_ref(), "ada");
    }

    #[rstest]
    fn corrupt_display_names_surface_as_query_errors() {
        let err = row_to_account(UserRow {
            id_user: 3,
            nom_utilisateur: "   ".to_owned(),
            mot_de_passe: "hash".to_owned(),
        })
        .expect_err("blank stored name is corrupt");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
