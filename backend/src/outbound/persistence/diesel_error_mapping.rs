//! Shared Diesel error mapping for repositories with basic query semantics.

use tracing::debug;

use super::connect::ConnectError;

/// Map a connection failure into a repository-specific error constructor.
pub(super) fn map_connect_error<E, C>(error: ConnectError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Repositories with special handling (e.g. unique violations) match those
/// variants first and fall back to this helper for the rest.
pub(super) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::HeritageQueryError;
    use rstest::rstest;

    #[rstest]
    fn connect_errors_keep_their_message() {
        let err: HeritageQueryError = map_connect_error(
            ConnectError::new("connection refused"),
            HeritageQueryError::connection,
        );
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let err: HeritageQueryError = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection,
                Box::new("gone".to_string()),
            ),
            HeritageQueryError::query,
            HeritageQueryError::connection,
        );
        assert!(matches!(err, HeritageQueryError::Connection { .. }));
    }

    #[rstest]
    fn other_failures_map_to_query_errors() {
        let err: HeritageQueryError = map_diesel_error(
            diesel::result::Error::NotFound,
            HeritageQueryError::query,
            HeritageQueryError::connection,
        );
        assert!(matches!(err, HeritageQueryError::Query { .. }));
    }
}
