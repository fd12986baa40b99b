use crate::models::matches::{SetScores, Side};

/// A value counted once per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub team1: u32,
    pub team2: u32,
}

impl Tally {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }
}

/// Winner of each set by index. Equal games award the set to nobody,
/// and so does an index present on one side only.
pub fn set_winners(scores: &SetScores) -> Vec<Option<Side>> {
    (0..scores.set_count())
        .map(|i| match (scores.team1.get(i), scores.team2.get(i)) {
            (Some(a), Some(b)) if a > b => Some(Side::Team1),
            (Some(a), Some(b)) if b > a => Some(Side::Team2),
            _ => None,
        })
        .collect()
}

pub fn set_tally(scores: &SetScores) -> Tally {
    set_winners(scores)
        .into_iter()
        .fold(Tally::default(), |mut tally, winner| {
            match winner {
                Some(Side::Team1) => tally.team1 = tally.team1.saturating_add(1),
                Some(Side::Team2) => tally.team2 = tally.team2.saturating_add(1),
                None => {}
            }
            tally
        })
}

/// Sum of games per side; a missing set counts as zero. Saturates at `u32::MAX`.
pub fn point_tally(scores: &SetScores) -> Tally {
    let total = |games: &[u32]| games.iter().fold(0u32, |acc, g| acc.saturating_add(*g));
    Tally {
        team1: total(scores.team1.as_slice()),
        team2: total(scores.team2.as_slice()),
    }
}

/// Side with strictly more sets, `None` when level
pub fn match_winner(scores: &SetScores) -> Option<Side> {
    let sets = set_tally(scores);
    if sets.team1 > sets.team2 {
        Some(Side::Team1)
    } else if sets.team2 > sets.team1 {
        Some(Side::Team2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_set_match_winner() {
        let scores = SetScores::new(vec![6, 3, 10], vec![4, 6, 8]);

        assert_eq!(
            set_winners(&scores),
            vec![Some(Side::Team1), Some(Side::Team2), Some(Side::Team1)]
        );
        assert_eq!(set_tally(&scores), Tally { team1: 2, team2: 1 });
        assert_eq!(point_tally(&scores), Tally { team1: 19, team2: 18 });
        assert_eq!(match_winner(&scores), Some(Side::Team1));
    }

    #[test]
    fn test_level_sets_have_no_winner() {
        let scores = SetScores::new(vec![6, 6], vec![6, 6]);

        assert_eq!(set_winners(&scores), vec![None, None]);
        assert_eq!(set_tally(&scores), Tally::default());
        assert_eq!(match_winner(&scores), None);

        let points = point_tally(&scores);
        assert_eq!(points.team1, points.team2);
    }

    #[test]
    fn test_split_sets_have_no_winner() {
        let scores = SetScores::new(vec![6, 2], vec![3, 6]);
        assert_eq!(set_tally(&scores), Tally { team1: 1, team2: 1 });
        assert_eq!(match_winner(&scores), None);
    }

    #[test]
    fn test_team2_wins_straight_sets() {
        let scores = SetScores::new(vec![2, 4], vec![6, 6]);
        assert_eq!(match_winner(&scores), Some(Side::Team2));
    }

    #[test]
    fn test_empty_scores() {
        let scores = SetScores::default();
        assert!(set_winners(&scores).is_empty());
        assert_eq!(point_tally(&scores), Tally::default());
        assert_eq!(match_winner(&scores), None);
    }

    #[test]
    fn test_missing_set_counts_as_zero_points_and_no_set() {
        let scores = SetScores::new(vec![6, 6, 7], vec![4, 3]);
        assert_eq!(set_winners(&scores), vec![Some(Side::Team1), Some(Side::Team1), None]);
        assert_eq!(point_tally(&scores), Tally { team1: 19, team2: 7 });
    }

    #[test]
    fn test_point_tally_saturates() {
        let scores = SetScores::new(vec![u32::MAX, 1], vec![3, 4]);
        assert_eq!(point_tally(&scores), Tally { team1: u32::MAX, team2: 7 });
        assert_eq!(match_winner(&scores), None);
    }
}
