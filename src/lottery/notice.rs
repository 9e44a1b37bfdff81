use std::fmt;

/// Operator-facing messages raised on specific draw edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LotteryOver,
    NotEnoughPeople { prize: String, needed: usize, available: usize },
    Drawing { prize: String, count: usize },
    NoFreeSlot { total: usize },
    PrizeSelected { prize: String },
    WinnerReturned { name: String },
    WinnersReset,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LotteryOver => write!(f, "The lottery is over"),
            Notice::NotEnoughPeople { prize, needed, available } => write!(
                f,
                "Not enough people for {}: {} needed, {} eligible",
                prize, needed, available
            ),
            Notice::Drawing { prize, count } => write!(f, "Drawing {} {} now", count, prize),
            Notice::NoFreeSlot { total } => write!(f, "Not enough free cards: only {} on stage", total),
            Notice::PrizeSelected { prize } => write!(f, "Now drawing for {}", prize),
            Notice::WinnerReturned { name } => write!(f, "{} is back in the draw", name),
            Notice::WinnersReset => write!(f, "All winners cleared"),
        }
    }
}
