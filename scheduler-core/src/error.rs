use thiserror::Error;

/// Input the queue cannot be scored from at all.
///
/// `scheduled_queue` logs these and degrades to an empty queue;
/// `try_scheduled_queue` hands them back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("match {match_id} has round number 0; rounds start at 1")]
    InvalidRound { match_id: String },
}

/// Caller errors for the box rotation generator. Always propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error("unsupported box size {0}; boxes hold 4, 5 or 6 players")]
    UnsupportedBoxSize(usize),

    #[error("player count mismatch: box of {expected} needs {expected} players, got {actual}")]
    PlayerCountMismatch { expected: usize, actual: usize },
}
