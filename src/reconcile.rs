//! Event reconciliation against the remote calendar.
//!
//! Creation is idempotent-guarded: an event is a duplicate iff an existing
//! one matches on summary AND start AND end, three independent exact
//! equalities — overlap alone is not a match. The update path is the
//! deliberate opposite: no duplicate check, last write wins. Edits are
//! allowed to collide.

use log::{debug, info};

use crate::calendar::CalendarPort;
use crate::error::Result;
use crate::event::NormalizedEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Event created; carries the provider-assigned link.
    Created(String),
    /// An identical event already exists; nothing was written.
    AlreadyExists,
    /// Existing event overwritten.
    Updated,
}

/// Create `event` unless an identical one already exists.
///
/// The remote calendar is queried fresh for the event's window with the
/// summary as a provider-side pre-filter; nothing is written until the
/// duplicate check has a definitive answer.
pub async fn reconcile(calendar: &dyn CalendarPort, event: &NormalizedEvent) -> Result<Outcome> {
    let candidates = calendar
        .list_in_window(event.start_utc, event.end_utc, &event.summary)
        .await?;

    let duplicate = candidates.iter().any(|existing| {
        existing.summary == event.summary
            && existing.start_utc == event.start_utc
            && existing.end_utc == event.end_utc
    });

    if duplicate {
        debug!("'{}' at {} already exists, skipping create", event.summary, event.start_utc);
        return Ok(Outcome::AlreadyExists);
    }

    let link = calendar.create(event).await?;
    info!("created '{}' ({} - {})", event.summary, event.start_utc, event.end_utc);
    Ok(Outcome::Created(link))
}

/// Overwrite event `id` with `event`, unconditionally.
pub async fn update(
    calendar: &dyn CalendarPort,
    id: &str,
    event: &NormalizedEvent,
) -> Result<Outcome> {
    calendar.update(id, event).await?;
    info!("updated event {} to '{}'", id, event.summary);
    Ok(Outcome::Updated)
}
