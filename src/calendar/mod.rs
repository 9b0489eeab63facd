//! Remote calendar access.
//!
//! [`CalendarPort`] is the whole capability surface the core uses; the
//! Google implementation lives in [`google`], credential values in
//! [`token`]. Remote events are queried fresh on every call — the provider
//! is the source of truth and nothing here caches.

pub mod google;
pub mod token;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::event::{NormalizedEvent, RemoteEvent};

#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// The next `limit` upcoming events, soonest first.
    async fn list_upcoming(&self, limit: usize) -> Result<Vec<RemoteEvent>>;

    /// Events overlapping `[start, end)` whose text matches `text_filter`.
    /// Provider-side full-text matching is acceptable as a pre-filter; the
    /// caller applies its own exact comparison.
    async fn list_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        text_filter: &str,
    ) -> Result<Vec<RemoteEvent>>;

    /// Create a new event and return the provider-assigned link.
    async fn create(&self, event: &NormalizedEvent) -> Result<String>;

    async fn get(&self, id: &str) -> Result<RemoteEvent>;

    /// Overwrite summary, window and color of an existing event.
    async fn update(&self, id: &str, event: &NormalizedEvent) -> Result<()>;
}
