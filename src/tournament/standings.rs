use crate::models::matches::{Match, Side};
use crate::models::pool::PoolStandings;
use crate::tournament::scoring::{match_winner, point_tally, set_tally};

/// Fold a completed match into a pool's standings.
///
/// Missing entries for either team start at zero. The result is the whole
/// mapping, meant to be persisted as-is. Not idempotent: the caller keeps
/// track of which matches are already folded in. Counters saturate.
pub fn apply_match_result(standings: &PoolStandings, m: &Match) -> PoolStandings {
    let mut updated = standings.clone();
    let scores = m.scores.clone().unwrap_or_default();

    let sets = set_tally(&scores);
    let points = point_tally(&scores);
    let winner = match_winner(&scores);

    for side in [Side::Team1, Side::Team2] {
        let opponent = side.opponent();
        let record = updated.entry(m.team_id(side)).or_default();

        record.matches_played = record.matches_played.saturating_add(1);
        record.sets_won = record.sets_won.saturating_add(sets.get(side));
        record.sets_lost = record.sets_lost.saturating_add(sets.get(opponent));
        record.points_won = record.points_won.saturating_add(points.get(side));
        record.points_lost = record.points_lost.saturating_add(points.get(opponent));

        if winner == Some(side) {
            record.matches_won = record.matches_won.saturating_add(1);
        }
    }

    updated
}
