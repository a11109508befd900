//! Request/response boundaries to the external backend. The wire format is
//! owned by the backend; these traits only fix the shapes this core needs.
//!
//! The returned futures carry a `Send` bound so the poll loops can run them
//! from spawned tasks.

use std::future::Future;

use crate::error::SourceError;
use crate::models::{AlertFeed, CookingSession, EnvironmentalSample};

/// Source of expiring-item alerts and the optional rescue-menu payload.
pub trait AlertSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<AlertFeed, SourceError>> + Send;
}

/// Source of historical cooking sessions, also accepting the serve command.
pub trait SessionSource: Send + Sync + 'static {
    fn fetch_sessions(
        &self,
    ) -> impl Future<Output = Result<Vec<CookingSession>, SourceError>> + Send;

    fn mark_served(&self, id: &str) -> impl Future<Output = Result<(), SourceError>> + Send;
}

/// Source of cold-storage sensor readings, newest first.
pub trait SampleSource: Send + Sync + 'static {
    fn fetch_samples(
        &self,
    ) -> impl Future<Output = Result<Vec<EnvironmentalSample>, SourceError>> + Send;
}
