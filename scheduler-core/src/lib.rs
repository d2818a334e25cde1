//! # scheduler-core
//!
//! Pure, synchronous scheduling core for Court Suite.
//!
//! - [`queue`]: ranks waiting matches into a court queue (round-balanced or
//!   stage-weighted) with wait estimates.
//! - [`assignment`]: turns a queue into court assignment decisions.
//! - [`rotation`]: fixed fair rotations for 4/5/6-player doubles boxes.
//!
//! Nothing here performs I/O or keeps state between calls. Callers own
//! persistence and must re-run the scheduler after every match or court change.

pub mod assignment;
pub mod error;
pub mod priority;
pub mod queue;
pub mod rotation;

pub use assignment::{auto_assign_first_wave, auto_assign_on_court_free, next_match_for_court};
pub use error::{QueueError, RotationError};
pub use queue::{scheduled_queue, try_scheduled_queue, QueueStrategy, ScheduledQueue, WaitUnit};
pub use rotation::{
    generate_box_pairings, validate_pattern_fairness, BoxSize, PatternValidationResult,
    RotationPattern, RoundDefinition,
};
