use std::fmt;

/// Reasons a requested draw transition is refused. All of them leave the
/// machine exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// No current prize, or its quota is already met.
    PrizeExhausted,
    InsufficientCandidates { needed: usize, available: usize },
    /// Every card slot is already showing a winner.
    CapacityExhausted { used: usize, total: usize },
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::PrizeExhausted => write!(f, "Prize quota exhausted"),
            DrawError::InsufficientCandidates { needed, available } => {
                write!(f, "Not enough candidates: need {}, have {}", needed, available)
            }
            DrawError::CapacityExhausted { used, total } => {
                write!(f, "No free card slot: {} of {} in use", used, total)
            }
        }
    }
}

impl std::error::Error for DrawError {}
