//! Port abstraction for heritage point persistence adapters.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::heritage::{NewHeritagePoint, OwnedHeritagePoint};
use crate::domain::user::{DisplayName, UserId};

/// Failures raised while inserting a heritage point.
///
/// `DuplicateCoordinates` is a business-rule violation the caller surfaces as
/// a validation notice; the other variants are infrastructure faults and must
/// stay distinguishable from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeritageInsertError {
    /// Another point already occupies these exact coordinates.
    #[error("a point already exists at these coordinates")]
    DuplicateCoordinates,
    /// Repository connection could not be established.
    #[error("heritage repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("heritage repository query failed: {message}")]
    Query { message: String },
}

impl HeritageInsertError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Failures raised while listing heritage points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeritageQueryError {
    /// Repository connection could not be established.
    #[error("heritage repository connection failed: {message}")]
    Connection { message: String },
    /// Query failed during execution.
    #[error("heritage repository query failed: {message}")]
    Query { message: String },
}

impl HeritageQueryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Outbound port for the heritage points table.
///
/// Listings join each point with its owner's display name, matching the SQL
/// inner join in the Diesel adapter.
#[async_trait]
pub trait HeritagePointRepository: Send + Sync {
    /// Insert a point; the store's `UNIQUE(latitude, longitude)` constraint
    /// arbitrates races on the same coordinates.
    async fn insert(&self, point: &NewHeritagePoint) -> Result<(), HeritageInsertError>;

    /// List every point with its owner's display name.
    async fn list_all(&self) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError>;

    /// List the given user's points with the owner's display name.
    async fn list_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError>;
}

/// In-memory heritage repository for handler tests.
///
/// Enforces the coordinate uniqueness constraint the way the store does and
/// joins owner names registered via [`FixtureHeritagePointRepository::add_owner`].
#[derive(Debug, Default)]
pub struct FixtureHeritagePointRepository {
    owners: Mutex<HashMap<UserId, DisplayName>>,
    points: Mutex<Vec<NewHeritagePoint>>,
}

impl FixtureHeritagePointRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an owner so listings can resolve the display name.
    pub fn add_owner(&self, id: UserId, display_name: DisplayName) {
        if let Ok(mut owners) = self.owners.lock() {
            owners.insert(id, display_name);
        }
    }

    fn join(&self, filter: Option<UserId>) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError> {
        let owners = self
            .owners
            .lock()
            .map_err(|_| HeritageQueryError::query("fixture lock poisoned"))?;
        let points = self
            .points
            .lock()
            .map_err(|_| HeritageQueryError::query("fixture lock poisoned"))?;
        Ok(points
            .iter()
            .filter(|point| filter.is_none_or(|owner| point.owner() == owner))
            // Inner join: points whose owner is unknown are dropped.
            .filter_map(|point| {
                owners.get(&point.owner()).map(|owner_name| {
                    OwnedHeritagePoint::new(
                        point.name().clone(),
                        point.coordinates().clone(),
                        owner_name.clone(),
                    )
                })
            })
            .collect())
    }
}

#[async_trait]
impl HeritagePointRepository for FixtureHeritagePointRepository {
    async fn insert(&self, point: &NewHeritagePoint) -> Result<(), HeritageInsertError> {
        let mut points = self
            .points
            .lock()
            .map_err(|_| HeritageInsertError::query("fixture lock poisoned"))?;
        if points
            .iter()
            .any(|existing| existing.coordinates() == point.coordinates())
        {
            return Err(HeritageInsertError::DuplicateCoordinates);
        }
        points.push(point.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError> {
        self.join(None)
    }

    async fn list_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<OwnedHeritagePoint>, HeritageQueryError> {
        self.join(Some(owner))
    }
}
