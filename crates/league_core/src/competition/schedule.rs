//! Day-indexed schedules and the round-robin (circle method) generator.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::club::ClubId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub home: ClubId,
    pub away: ClubId,
    pub is_played: bool,
    /// Owning playoff series.
    #[serde(default)]
    pub series: Option<usize>,
}

impl ScheduledMatch {
    pub fn new(home: ClubId, away: ClubId) -> Self {
        Self { home, away, is_played: false, series: None }
    }

    pub fn in_series(home: ClubId, away: ClubId, series: usize) -> Self {
        Self { home, away, is_played: false, series: Some(series) }
    }

    pub fn involves(&self, club: ClubId) -> bool {
        self.home == club || self.away == club
    }

    /// Same pairing with home and away swapped.
    pub fn mirrored(&self) -> Self {
        Self { home: self.away, away: self.home, is_played: false, series: self.series }
    }
}

pub type ScheduleDay = Vec<ScheduledMatch>;

/// `None` is a rest (or gap) day.
pub type Schedule = Vec<Option<ScheduleDay>>;

// ============================================================================
// Round robin
// ============================================================================

/// Rotation `i` of the circle: the first slot stays, the rest turn by `i`.
fn rotate<T: Copy>(slots: &[T], shift: usize) -> Vec<T> {
    if shift == 0 || slots.len() < 2 {
        return slots.to_vec();
    }
    let tail = &slots[1..];
    let split = tail.len() - shift;
    let mut rotated = Vec::with_capacity(slots.len());
    rotated.push(slots[0]);
    rotated.extend_from_slice(&tail[split..]);
    rotated.extend_from_slice(&tail[..split]);
    rotated
}

/// One canonical day per rotation; slot `i` meets slot `n - 1 - i`.
///
/// With an odd number of clubs a bye slot is added and its pairings are
/// dropped, so one club rests on each canonical day.
pub fn canonical_days(club_ids: &[ClubId]) -> Vec<ScheduleDay> {
    let mut slots: Vec<Option<ClubId>> = club_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }

    (0..n - 1)
        .map(|shift| {
            let circle = rotate(&slots, shift);
            (0..n / 2)
                .filter_map(|i| match (circle[i], circle[n - 1 - i]) {
                    (Some(home), Some(away)) => Some(ScheduledMatch::new(home, away)),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// `repeats / 2` copies of the day followed by as many mirrored copies.
pub fn compose_days(day: &[ScheduledMatch], repeats: usize) -> Vec<ScheduleDay> {
    let copy = || day.iter().map(|m| ScheduledMatch::new(m.home, m.away)).collect::<ScheduleDay>();
    let mirror = || day.iter().map(ScheduledMatch::mirrored).collect::<ScheduleDay>();
    let half = repeats / 2;
    (0..half).map(|_| copy()).chain((0..half).map(|_| mirror())).collect()
}

/// Every match day of a double round robin.
///
/// Even canonical days are repeated `inter_division` times, odd ones
/// `intra_division` times.
pub fn full_round_robin(
    club_ids: &[ClubId],
    inter_division: usize,
    intra_division: usize,
) -> Vec<ScheduleDay> {
    canonical_days(club_ids)
        .iter()
        .enumerate()
        .flat_map(|(i, day)| {
            let repeats = if i % 2 == 0 { inter_division } else { intra_division };
            compose_days(day, repeats)
        })
        .collect()
}

/// Splices a rest day before every `recovery_day - 1` match days and one
/// rest day at the end.
///
/// A `recovery_day` below 2 is treated as 2: at least every other day is a
/// match day.
pub fn insert_rest_days(days: Vec<ScheduleDay>, recovery_day: usize) -> Schedule {
    let recovery_day = recovery_day.max(2);
    let mut schedule = Schedule::new();
    let mut days = days.into_iter().peekable();
    let mut day = 0usize;
    while days.peek().is_some() {
        if day % recovery_day == 0 {
            schedule.push(None);
        } else {
            schedule.push(days.next());
        }
        day += 1;
    }
    schedule.push(None);
    schedule
}

/// Shuffled round-robin season with rest days.
pub fn make_round_robin_schedule<R: Rng + ?Sized>(
    club_ids: &[ClubId],
    inter_division: usize,
    intra_division: usize,
    recovery_day: usize,
    rng: &mut R,
) -> Schedule {
    let mut ids = club_ids.to_vec();
    ids.shuffle(rng);
    let mut days = full_round_robin(&ids, inter_division, intra_division);
    days.shuffle(rng);
    insert_rest_days(days, recovery_day)
}

/// Unplayed matches of a club, in schedule order.
pub fn club_schedule(schedule: &Schedule, club: ClubId) -> Vec<ScheduledMatch> {
    schedule
        .iter()
        .flatten()
        .flatten()
        .filter(|m| !m.is_played && m.involves(club))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    fn assert_no_double_booking(schedule: &Schedule) {
        for day in schedule.iter().flatten() {
            let mut seen = HashSet::new();
            for m in day {
                assert_ne!(m.home, m.away);
                assert!(seen.insert(m.home), "club {} plays twice", m.home);
                assert!(seen.insert(m.away), "club {} plays twice", m.away);
            }
        }
    }

    #[test]
    fn test_rotation_keeps_first_slot() {
        let slots = [0, 1, 2, 3, 4, 5];
        assert_eq!(rotate(&slots, 0), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(rotate(&slots, 1), vec![0, 5, 1, 2, 3, 4]);
        assert_eq!(rotate(&slots, 2), vec![0, 4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_canonical_days_pair_everyone_once() {
        let ids: Vec<ClubId> = (0..8).collect();
        let days = canonical_days(&ids);
        assert_eq!(days.len(), 7);

        let mut pairs = HashSet::new();
        for day in &days {
            assert_eq!(day.len(), 4);
            for m in day {
                let pair = (m.home.min(m.away), m.home.max(m.away));
                assert!(pairs.insert(pair), "pair {:?} repeated", pair);
            }
        }
        assert_eq!(pairs.len(), 28);
    }

    #[test]
    fn test_odd_club_count_gets_a_bye() {
        let ids: Vec<ClubId> = (0..5).collect();
        let days = canonical_days(&ids);
        assert_eq!(days.len(), 5);
        for day in &days {
            assert_eq!(day.len(), 2);
        }
        let total: usize = days.iter().map(Vec::len).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_compose_days_mirrors_half() {
        let day = vec![ScheduledMatch::new(1, 2)];
        let days = compose_days(&day, 4);
        assert_eq!(days.len(), 4);
        assert_eq!((days[0][0].home, days[0][0].away), (1, 2));
        assert_eq!((days[1][0].home, days[1][0].away), (1, 2));
        assert_eq!((days[2][0].home, days[2][0].away), (2, 1));
        assert_eq!((days[3][0].home, days[3][0].away), (2, 1));
    }

    #[test]
    fn test_rest_days_every_recovery_day() {
        let days: Vec<ScheduleDay> = (0..4).map(|i| vec![ScheduledMatch::new(i, i + 10)]).collect();
        let schedule = insert_rest_days(days, 3);
        let shape: Vec<bool> = schedule.iter().map(Option::is_some).collect();
        assert_eq!(shape, vec![false, true, true, false, true, true, false]);
    }

    #[test]
    fn test_season_schedule_is_balanced() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ids: Vec<ClubId> = (0..16).collect();
        let schedule = make_round_robin_schedule(&ids, 2, 2, 3, &mut rng);
        assert_no_double_booking(&schedule);

        let mut home_games: HashMap<ClubId, usize> = HashMap::new();
        let mut total = 0;
        for m in schedule.iter().flatten().flatten() {
            *home_games.entry(m.home).or_default() += 1;
            total += 1;
        }
        assert_eq!(total, 16 * 15);
        assert!(home_games.values().all(|&n| n == 15));
        assert!(schedule.last().map_or(false, Option::is_none));
    }

    #[test]
    fn test_club_schedule_skips_played() {
        let mut schedule: Schedule = vec![
            None,
            Some(vec![ScheduledMatch::new(0, 1), ScheduledMatch::new(2, 3)]),
            Some(vec![ScheduledMatch::new(1, 2), ScheduledMatch::new(3, 0)]),
        ];
        assert_eq!(club_schedule(&schedule, 0).len(), 2);

        if let Some(Some(day)) = schedule.get_mut(1) {
            day[0].is_played = true;
        }
        let remaining = club_schedule(&schedule, 0);
        assert_eq!(remaining.len(), 1);
        assert_eq!((remaining[0].home, remaining[0].away), (3, 0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: match count is n(n-1)/2 per pairing repeat, and no
            /// club plays twice on one day.
            #[test]
            fn prop_round_robin_counts(
                half in 1usize..10,
                inter in 1usize..3,
                intra in 1usize..3,
                recovery in 2usize..5,
                seed in any::<u64>(),
            ) {
                let n = half * 2;
                let (inter, intra) = (inter * 2, intra * 2);
                let ids: Vec<ClubId> = (0..n).collect();
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let schedule = make_round_robin_schedule(&ids, inter, intra, recovery, &mut rng);

                let canonical = n - 1;
                let even_days = (canonical + 1) / 2;
                let odd_days = canonical / 2;
                let expected = (even_days * inter + odd_days * intra) * (n / 2);
                let total: usize = schedule.iter().flatten().map(Vec::len).sum();
                prop_assert_eq!(total, expected);
                assert_no_double_booking(&schedule);
            }
        }
    }
}
