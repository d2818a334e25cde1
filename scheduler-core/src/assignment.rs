//! Court assignment decisions derived from a ranked queue.
//!
//! Nothing here mutates the queue or the courts; callers apply the returned
//! `CourtAssignment`s and re-run the scheduler.

use court_types::{Court, CourtAssignment, QueueMatch};
use tracing::debug;

/// First match in queue order that is not already sitting on a still-active court.
pub fn next_match_for_court<'a, S: AsRef<str>>(
    queue: &'a [QueueMatch],
    active_court_names: &[S],
) -> Option<&'a QueueMatch> {
    queue.iter().find(|m| match &m.court {
        None => true,
        Some(court) => !active_court_names.iter().any(|name| name.as_ref() == court),
    })
}

/// Pairs free courts (active, no current match) with the head of the queue,
/// in the order the courts were supplied.
pub fn auto_assign_first_wave(queue: &[QueueMatch], courts: &[Court]) -> Vec<CourtAssignment> {
    let assignments: Vec<CourtAssignment> = courts
        .iter()
        .filter(|c| c.is_free())
        .zip(queue)
        .map(|(court, m)| CourtAssignment {
            match_id: m.id.clone(),
            court_name: court.name.clone(),
        })
        .collect();

    debug!(
        free_courts = courts.iter().filter(|c| c.is_free()).count(),
        queued = queue.len(),
        assigned = assignments.len(),
        "first wave assigned"
    );
    assignments
}

/// Puts the queue head on the court that just freed up.
///
/// The caller must already have dropped the match that was running on `court`
/// from the queue; no filtering happens here.
pub fn auto_assign_on_court_free(queue: &[QueueMatch], court: &Court) -> Option<CourtAssignment> {
    queue.first().map(|m| CourtAssignment {
        match_id: m.id.clone(),
        court_name: court.name.clone(),
    })
}
