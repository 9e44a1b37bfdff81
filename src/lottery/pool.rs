//! Sampling without replacement over participants and card slots.
use rand::Rng;
use std::collections::HashSet;

use super::error::DrawError;
use super::model::{Participant, Prize};
use super::roster::Roster;

/// Draw up to `n` entries uniformly at random, without replacement.
/// Returns `(drawn, remaining)`; `drawn.len() == min(n, pool.len())`.
pub fn draw_random_subset<T, R: Rng + ?Sized>(mut pool: Vec<T>, n: usize, rng: &mut R) -> (Vec<T>, Vec<T>) {
    let take = n.min(pool.len());
    let mut drawn = Vec::with_capacity(take);
    while drawn.len() < take {
        let i = rng.random_range(0..pool.len());
        drawn.push(pool.remove(i));
    }
    (drawn, pool)
}

/// A uniformly random slot in `[0, total)` that is not in `used`.
pub fn select_unused_slot<R: Rng + ?Sized>(used: &HashSet<usize>, total: usize, rng: &mut R) -> Result<usize, DrawError> {
    let free: Vec<usize> = (0..total).filter(|s| !used.contains(s)).collect();
    if free.is_empty() {
        return Err(DrawError::CapacityExhausted { used: used.len().min(total), total });
    }
    Ok(free[rng.random_range(0..free.len())])
}

/// Participants that may win `prize` this round: everyone who has not won
/// it for an `is_all` prize, otherwise everyone who has not won anything.
pub fn eligible_pool(roster: &Roster, prize: &Prize) -> Vec<Participant> {
    if prize.is_all { roster.not_won_prize(&prize.id) } else { roster.not_won() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn people(n: u32) -> Vec<Participant> {
        (0..n).map(|i| Participant::new(i, &format!("U{:03}", i), &format!("Person {}", i), "Ops", "Staff")).collect()
    }

    #[test]
    fn subset_is_distinct_and_partitions_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..=12 {
            let pool: Vec<u32> = (0..12).collect();
            let (drawn, rest) = draw_random_subset(pool, n, &mut rng);
            assert_eq!(drawn.len(), n);
            let drawn_set: HashSet<u32> = drawn.iter().copied().collect();
            assert_eq!(drawn_set.len(), n);
            assert!(rest.iter().all(|r| !drawn_set.contains(r)));
            let mut all: Vec<u32> = drawn.into_iter().chain(rest).collect();
            all.sort();
            assert_eq!(all, (0..12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn oversized_request_takes_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let (drawn, rest) = draw_random_subset(vec!['a', 'b', 'c'], 10, &mut rng);
        assert_eq!(drawn.len(), 3);
        assert!(rest.is_empty());
        let (drawn, rest) = draw_random_subset(Vec::<u8>::new(), 3, &mut rng);
        assert!(drawn.is_empty() && rest.is_empty());
    }

    #[test]
    fn every_entry_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let (drawn, _) = draw_random_subset((0..6).collect::<Vec<u8>>(), 1, &mut rng);
            seen.insert(drawn[0]);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn unused_slot_avoids_used_and_fails_when_full() {
        let mut rng = StdRng::seed_from_u64(3);
        let used: HashSet<usize> = (0..9).collect();
        for _ in 0..20 {
            assert_eq!(select_unused_slot(&used, 10, &mut rng), Ok(9));
        }
        let full: HashSet<usize> = (0..10).collect();
        assert_eq!(
            select_unused_slot(&full, 10, &mut rng),
            Err(DrawError::CapacityExhausted { used: 10, total: 10 })
        );
        assert!(select_unused_slot(&HashSet::new(), 0, &mut rng).is_err());
    }

    #[test]
    fn eligibility_depends_on_prize_kind() {
        let mut persons = people(4);
        let mug = Prize::new("mug", "Mug", 2);
        let raffle = Prize::new("raffle", "Raffle", 2).drawing_from_all();
        persons[0].record_win(&mug, "2024-01-01 10:00:00");
        persons[1].record_win(&raffle, "2024-01-01 10:00:00");

        let roster = Roster::from_records(persons, Vec::new());

        let normal: Vec<u32> = eligible_pool(&roster, &mug).iter().map(|p| p.id).collect();
        assert_eq!(normal, vec![2, 3]);
        let all: Vec<u32> = eligible_pool(&roster, &raffle).iter().map(|p| p.id).collect();
        assert_eq!(all, vec![0, 2, 3]);
    }
}
