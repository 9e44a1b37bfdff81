//! Prize quota bookkeeping: how many to draw next, and committing a round.
use super::model::{Participant, Prize};
use super::roster::Roster;

/// Upper bound on winners revealed in one round.
pub const MAX_ROUND_SIZE: usize = 10;

/// Demand for the next round: the first unfulfilled sub-batch if sub-batches
/// are on, otherwise whatever is left of the prize.
pub fn remaining_for_round(prize: &Prize) -> usize {
    if prize.sub_batches_enabled() {
        if let Some(batch) = prize.separate.count_list.iter().find(|b| !b.is_fulfilled()) {
            return (batch.count - batch.used_count) as usize;
        }
    }
    prize.count.saturating_sub(prize.used_count) as usize
}

/// Winners to draw this round. Never more than the prize has left.
pub fn round_size(prize: &Prize) -> usize {
    let left = prize.count.saturating_sub(prize.used_count) as usize;
    remaining_for_round(prize).min(left).min(MAX_ROUND_SIZE)
}

/// Apply a finished round: bump the prize counters and the first
/// unfulfilled sub-batch, and write the win into each winner's record.
pub fn commit(prize: &Prize, winners: &[Participant], round_size: usize, when: &str, roster: &mut Roster) -> Prize {
    let mut next = prize.clone();
    let step = (round_size as u32).min(next.count.saturating_sub(next.used_count));

    next.used_count += step;

    if next.sub_batches_enabled() {
        let consumed: u32 = next.separate.count_list.iter().map(|b| b.used_count).sum();
        let room = next.count.saturating_sub(consumed);
        if let Some(batch) = next.separate.count_list.iter_mut().find(|b| !b.is_fulfilled()) {
            batch.used_count += step.min(room);
        }
    }

    next.is_used = next.used_count >= next.count;
    roster.record_winners(winners, &next, when);

    log::info!(
        "Committed {} winner(s) for '{}': {}/{} used{}",
        winners.len(),
        next.name,
        next.used_count,
        next.count,
        if next.is_used { " (done)" } else { "" }
    );
    next
}

/// Take `n` wins back off a prize, newest sub-batch first.
pub fn release(prize: &Prize, n: u32) -> Prize {
    let mut next = prize.clone();
    let n = n.min(next.used_count);
    next.used_count -= n;

    let mut left = n;
    for batch in next.separate.count_list.iter_mut().rev() {
        if left == 0 {
            break;
        }
        let back = left.min(batch.used_count);
        batch.used_count -= back;
        left -= back;
    }

    next.is_used = next.used_count >= next.count;
    next
}

/// The prize that follows `just_completed`: first unused one in list order.
pub fn advance_to_next_prize<'a>(prizes: &'a [Prize], just_completed: &Prize) -> Option<&'a Prize> {
    prizes.iter().find(|p| !p.is_used && p.id != just_completed.id)
}
