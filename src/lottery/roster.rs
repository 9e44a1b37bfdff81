//! Person and prize records the draw reads from and commits into.
use super::model::{Participant, ParticipantId, Prize, PrizeId};
use super::quota;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    persons: Vec<Participant>,
    already: Vec<Participant>,
}

impl Roster {
    /// Fresh import: ids are reassigned `0..n` and win records cleared.
    pub fn from_import(mut list: Vec<Participant>) -> Self {
        for (i, p) in list.iter_mut().enumerate() {
            p.id = i as ParticipantId;
            p.clear_wins();
        }
        Self { persons: list, already: Vec::new() }
    }

    /// Records as previously saved, win history intact.
    pub fn from_records(persons: Vec<Participant>, already: Vec<Participant>) -> Self {
        Self { persons, already }
    }

    pub fn persons(&self) -> &[Participant] {
        &self.persons
    }

    pub fn already(&self) -> &[Participant] {
        &self.already
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.persons.iter().find(|p| p.id == id)
    }

    pub fn not_won(&self) -> Vec<Participant> {
        self.persons.iter().filter(|p| !p.is_win).cloned().collect()
    }

    pub fn not_won_prize(&self, prize_id: &str) -> Vec<Participant> {
        self.persons.iter().filter(|p| !p.has_won(prize_id)).cloned().collect()
    }

    pub fn record_winners(&mut self, winners: &[Participant], prize: &Prize, when: &str) {
        for w in winners {
            match self.persons.iter_mut().find(|p| p.id == w.id) {
                Some(p) => {
                    p.record_win(prize, when);
                    self.already.push(p.clone());
                }
                None => log::warn!("Winner {} ({}) is not in the roster; skipping.", w.id, w.name),
            }
        }
    }

    /// Put one winner back into the undrawn pool.
    pub fn move_already_to_not(&mut self, id: ParticipantId) -> bool {
        let Some(p) = self.persons.iter_mut().find(|p| p.id == id) else { return false; };
        p.clear_wins();
        self.already.retain(|a| a.id != id);
        true
    }

    /// Forget every win.
    pub fn reset_winners(&mut self) {
        for p in &mut self.persons {
            p.clear_wins();
        }
        self.already.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrizeBoard {
    prizes: Vec<Prize>,
    current: Option<PrizeId>,
}

impl PrizeBoard {
    /// Falls back to the first unused prize when `current` is missing or unknown.
    pub fn new(prizes: Vec<Prize>, current: Option<PrizeId>) -> Self {
        let current = current
            .filter(|id| prizes.iter().any(|p| &p.id == id))
            .or_else(|| prizes.iter().find(|p| !p.is_used).map(|p| p.id.clone()));
        Self { prizes, current }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn current(&self) -> Option<&Prize> {
        let id = self.current.as_ref()?;
        self.prizes.iter().find(|p| &p.id == id)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Step the current prize forward or back through the list, wrapping.
    pub fn cycle(&mut self, forward: bool) -> Option<&Prize> {
        if self.prizes.is_empty() {
            return None;
        }
        let n = self.prizes.len();
        let at = self.current.as_ref().and_then(|id| self.prizes.iter().position(|p| &p.id == id));
        let next = match (at, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        let id = self.prizes[next].id.clone();
        self.set_current(&id);
        self.current()
    }

    /// Zero every prize's counters and go back to the first prize.
    pub fn reset_usage(&mut self) {
        for p in &mut self.prizes {
            p.used_count = 0;
            p.is_used = false;
            for b in &mut p.separate.count_list {
                b.used_count = 0;
            }
        }
        self.current = self.prizes.first().map(|p| p.id.clone());
    }

    pub fn set_current(&mut self, id: &str) -> bool {
        if self.prizes.iter().any(|p| p.id == id) {
            self.current = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Write `prize` back. A prize that just filled up hands the spotlight to
    /// the next unused one.
    pub fn update_prize(&mut self, prize: Prize) {
        match self.prizes.iter_mut().find(|p| p.id == prize.id) {
            Some(slot) => *slot = prize.clone(),
            None => {
                log::warn!("Prize '{}' not on the board; ignoring update.", prize.id);
                return;
            }
        }
        if !prize.is_used {
            return;
        }
        if let Some(next) = quota::advance_to_next_prize(&self.prizes, &prize) {
            log::info!("Prize '{}' complete; next up '{}'.", prize.name, next.name);
            self.current = Some(next.id.clone());
        } else {
            log::info!("Prize '{}' complete; no prizes left.", prize.name);
        }
    }
}
