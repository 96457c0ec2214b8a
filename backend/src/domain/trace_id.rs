//! Per-request correlation identifier.
//!
//! The trace middleware opens a [`TraceId::scope`] around every request, so
//! a domain [`Error`](super::Error) built anywhere inside the handler picks
//! the identifier up without it being passed around. Task-locals do not
//! follow `tokio::spawn` or `web::block`; re-enter the scope there if the
//! spawned work can fail with a domain error.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID correlating one request across logs, errors and the `trace-id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the enclosing request, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `self` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use medicare_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(id.scope(async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}
