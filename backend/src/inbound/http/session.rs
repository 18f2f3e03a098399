//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal only in domain-friendly
//! operations: persisting and retrieving the authenticated identity, and the
//! one-shot flash notices the next rendered page consumes.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{DisplayName, Error, User, UserId};

pub(crate) const USER_ID_KEY: &str = "id_user";
pub(crate) const USER_NAME_KEY: &str = "nom_utilisateur";
const FLASH_KEY: &str = "flash_notices";

/// Severity of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

/// One-shot notice stored in the session until the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashNotice {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashNotice {
    /// Build a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    /// Build an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_identity(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.id().value())
            .and_then(|()| self.0.insert(USER_NAME_KEY, user.display_name().as_ref()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the authenticated identity, if present.
    ///
    /// A session carrying unusable identity values is treated as anonymous
    /// rather than failing the request.
    pub fn current_user(&self) -> Result<Option<User>, Error> {
        let id = match self.0.get::<i32>(USER_ID_KEY) {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(error) => {
                tracing::warn!("unreadable user id in session cookie: {error}");
                return Ok(None);
            }
        };
        let name = match self.0.get::<String>(USER_NAME_KEY) {
            Ok(Some(name)) => name,
            Ok(None) => return Ok(None),
            Err(error) => {
                tracing::warn!("unreadable display name in session cookie: {error}");
                return Ok(None);
            }
        };
        match DisplayName::new(name) {
            Ok(display_name) => Ok(Some(User::new(UserId::new(id), display_name))),
            Err(error) => {
                tracing::warn!("invalid display name in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Remove all session state, ending the authenticated state.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// Queue a one-shot notice for the next rendered page.
    pub fn push_notice(&self, notice: FlashNotice) -> Result<(), Error> {
        let mut notices = self.pending_notices()?;
        notices.push(notice);
        self.0
            .insert(FLASH_KEY, notices)
            .map_err(|error| Error::internal(format!("failed to persist notice: {error}")))
    }

    /// Take and clear all pending notices.
    pub fn take_notices(&self) -> Result<Vec<FlashNotice>, Error> {
        let notices = self.pending_notices()?;
        self.0.remove(FLASH_KEY);
        Ok(notices)
    }

    fn pending_notices(&self) -> Result<Vec<FlashNotice>, Error> {
        Ok(self
            .0
            .get::<Vec<FlashNotice>>(FLASH_KEY)
            .map_err(|error| Error::internal(format!("failed to read notices: {error}")))?
            .unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
