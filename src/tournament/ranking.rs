use std::collections::HashSet;
use uuid::Uuid;

use crate::models::matches::{Match, MatchStatus};
use crate::models::pool::{PoolStandings, RankedStanding, StandingRecord};
use crate::models::tournament::TiebreakerRule;

fn rule_key(
    rule: TiebreakerRule,
    team_id: Uuid,
    record: &StandingRecord,
    group: &HashSet<Uuid>,
    head_to_head: &[Match],
) -> i64 {
    match rule {
        TiebreakerRule::MatchesWon => i64::from(record.matches_won),
        TiebreakerRule::SetsWon => i64::from(record.sets_won),
        TiebreakerRule::GamesWon => i64::from(record.points_won),
        TiebreakerRule::SetDifference => record.set_difference(),
        TiebreakerRule::GameDifference => record.point_difference(),
        TiebreakerRule::DirectConfrontation => head_to_head
            .iter()
            .filter(|m| m.status == MatchStatus::Completed)
            .filter(|m| group.contains(&m.team1_id) && group.contains(&m.team2_id))
            .filter(|m| m.winner_id == Some(team_id))
            .count() as i64,
    }
}

/// Split one tied group by a rule, best first
fn split_group(
    group: Vec<(Uuid, StandingRecord)>,
    rule: TiebreakerRule,
    head_to_head: &[Match],
) -> Vec<Vec<(Uuid, StandingRecord)>> {
    let members: HashSet<Uuid> = group.iter().map(|(id, _)| *id).collect();
    let mut keyed: Vec<(i64, Uuid, StandingRecord)> = group
        .into_iter()
        .map(|(id, record)| (rule_key(rule, id, &record, &members, head_to_head), id, record))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    let mut groups: Vec<Vec<(Uuid, StandingRecord)>> = Vec::new();
    let mut last_key = None;
    for (key, id, record) in keyed {
        match groups.last_mut() {
            Some(current) if last_key == Some(key) => current.push((id, record)),
            _ => groups.push(vec![(id, record)]),
        }
        last_key = Some(key);
    }
    groups
}

/// Order a pool's teams by the category's tiebreaker rules.
///
/// Rules are applied in order, each one only inside the groups still tied
/// after the previous rules. `DirectConfrontation` counts wins in completed
/// matches played between members of the tied group. Teams level on every
/// rule are ordered by id so the output is stable.
pub fn rank_standings(
    standings: &PoolStandings,
    rules: &[TiebreakerRule],
    head_to_head: &[Match],
) -> Vec<RankedStanding> {
    let mut groups = vec![standings.iter().map(|(id, record)| (*id, *record)).collect::<Vec<_>>()];

    for rule in rules {
        groups = groups
            .into_iter()
            .flat_map(|group| {
                if group.len() > 1 {
                    split_group(group, *rule, head_to_head)
                } else {
                    vec![group]
                }
            })
            .collect();
    }

    groups
        .into_iter()
        .flat_map(|mut group| {
            group.sort_by_key(|(id, _)| *id);
            group
        })
        .enumerate()
        .map(|(index, (team_id, standing))| RankedStanding {
            position: index as u32 + 1,
            team_id,
            standing,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(matches_won: u32, sets_won: u32, points_won: u32) -> StandingRecord {
        StandingRecord {
            matches_played: 3,
            matches_won,
            sets_won,
            sets_lost: 0,
            points_won,
            points_lost: 0,
        }
    }

    fn result(team1_id: Uuid, team2_id: Uuid, winner_id: Uuid) -> Match {
        let now = Utc::now();
        Match {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            pool_id: None,
            bracket_round: None,
            team1_id,
            team2_id,
            court_id: None,
            scheduled_time: now,
            duration_minutes: 90,
            status: MatchStatus::Completed,
            scores: None,
            winner_id: Some(winner_id),
            version: 2,
            created_at: now,
            updated_at: now,
        }
    }

    fn order(ranked: &[RankedStanding]) -> Vec<Uuid> {
        ranked.iter().map(|r| r.team_id).collect()
    }

    #[test]
    fn test_orders_by_matches_then_sets_then_games() {
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let standings = PoolStandings::from([
            (a, record(1, 3, 40)),
            (b, record(2, 4, 30)),
            (c, record(1, 3, 45)),
            (d, record(1, 4, 20)),
        ]);

        let ranked = rank_standings(&standings, &TiebreakerRule::default_rules(), &[]);

        assert_eq!(order(&ranked), vec![b, d, c, a]);
        assert_eq!(ranked.iter().map(|r| r.position).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_direct_confrontation_only_counts_matches_inside_the_tie() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let standings = PoolStandings::from([
            (a, record(1, 2, 24)),
            (b, record(1, 2, 24)),
            (c, record(0, 0, 0)),
        ]);
        // b beat a directly, a beat c (outside the tie)
        let history = vec![result(a, b, b), result(a, c, a)];

        let ranked = rank_standings(&standings, &TiebreakerRule::default_rules(), &history);

        assert_eq!(order(&ranked), vec![b, a, c]);
    }

    #[test]
    fn test_full_tie_falls_back_to_team_id() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let standings = PoolStandings::from([(a, record(1, 2, 20)), (b, record(1, 2, 20))]);

        let ranked = rank_standings(&standings, &TiebreakerRule::default_rules(), &[]);

        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(order(&ranked), expected);
    }

    #[test]
    fn test_difference_rules() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let standings = PoolStandings::from([
            (a, StandingRecord { sets_won: 4, sets_lost: 4, ..Default::default() }),
            (b, StandingRecord { sets_won: 3, sets_lost: 1, ..Default::default() }),
        ]);

        let by_sets = rank_standings(&standings, &[TiebreakerRule::SetsWon], &[]);
        let by_difference = rank_standings(&standings, &[TiebreakerRule::SetDifference], &[]);

        assert_eq!(order(&by_sets), vec![a, b]);
        assert_eq!(order(&by_difference), vec![b, a]);
    }

    #[test]
    fn test_empty_pool() {
        assert!(rank_standings(&PoolStandings::new(), &TiebreakerRule::default_rules(), &[]).is_empty());
    }
}
