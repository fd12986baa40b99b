use uuid::Uuid;

use crate::models::matches::{CandidateMatch, ConflictResult, Match, MatchStatus};

/// Existing matches that clash with a candidate booking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub court: Vec<Uuid>,
    pub team: Vec<Uuid>,
}

impl ConflictReport {
    pub fn result(&self) -> ConflictResult {
        ConflictResult {
            court_conflict: !self.court.is_empty(),
            team_conflict: !self.team.is_empty(),
        }
    }
}

/// Completed matches no longer occupy their slot. Cancelled ones still do.
fn occupies_slot(m: &Match) -> bool {
    m.status != MatchStatus::Completed
}

pub fn find_conflicts(candidate: &CandidateMatch, existing: &[Match]) -> ConflictReport {
    let slot = candidate.interval();
    let mut report = ConflictReport::default();

    for other in existing.iter().filter(|m| occupies_slot(m)) {
        if !slot.overlaps(&other.interval()) {
            continue;
        }

        if candidate.court_id.is_some() && other.court_id == candidate.court_id {
            report.court.push(other.id);
        }

        if candidate.team_ids().iter().any(|team| other.involves_team(*team)) {
            report.team.push(other.id);
        }
    }

    report
}

/// Court and team clashes for a proposed booking, reported independently
pub fn check_conflict(candidate: &CandidateMatch, existing: &[Match]) -> ConflictResult {
    find_conflicts(candidate, existing).result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, hour, minute, 0).unwrap()
    }

    fn existing_match(
        court_id: Option<Uuid>,
        team1_id: Uuid,
        team2_id: Uuid,
        start: DateTime<Utc>,
        duration_minutes: i32,
        status: MatchStatus,
    ) -> Match {
        Match {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            pool_id: None,
            bracket_round: None,
            team1_id,
            team2_id,
            court_id,
            scheduled_time: start,
            duration_minutes,
            status,
            scores: None,
            winner_id: None,
            version: 1,
            created_at: start,
            updated_at: start,
        }
    }

    fn candidate(
        court_id: Option<Uuid>,
        team1_id: Uuid,
        team2_id: Uuid,
        start: DateTime<Utc>,
        duration_minutes: i32,
    ) -> CandidateMatch {
        CandidateMatch {
            court_id,
            team1_id,
            team2_id,
            scheduled_time: start,
            duration_minutes,
        }
    }

    #[test]
    fn test_touching_slots_on_same_court_do_not_conflict() {
        let court = Some(Uuid::new_v4());
        let existing = vec![existing_match(
            court,
            Uuid::new_v4(),
            Uuid::new_v4(),
            at(10, 0),
            60,
            MatchStatus::Scheduled,
        )];
        let proposed = candidate(court, Uuid::new_v4(), Uuid::new_v4(), at(11, 0), 60);

        assert_eq!(check_conflict(&proposed, &existing), ConflictResult::default());
    }

    #[test]
    fn test_overlapping_slot_on_same_court_conflicts() {
        let court = Some(Uuid::new_v4());
        let existing = vec![existing_match(
            court,
            Uuid::new_v4(),
            Uuid::new_v4(),
            at(10, 0),
            60,
            MatchStatus::Scheduled,
        )];
        let proposed = candidate(court, Uuid::new_v4(), Uuid::new_v4(), at(10, 30), 60);

        let result = check_conflict(&proposed, &existing);
        assert!(result.court_conflict);
        assert!(!result.team_conflict);
    }

    #[test]
    fn test_team_conflict_on_another_court() {
        let team = Uuid::new_v4();
        let existing = vec![existing_match(
            Some(Uuid::new_v4()),
            Uuid::new_v4(),
            team,
            at(10, 0),
            90,
            MatchStatus::InProgress,
        )];
        let proposed = candidate(Some(Uuid::new_v4()), team, Uuid::new_v4(), at(11, 0), 60);

        let result = check_conflict(&proposed, &existing);
        assert!(!result.court_conflict);
        assert!(result.team_conflict);
    }

    #[test]
    fn test_court_and_team_flags_are_independent() {
        let court = Some(Uuid::new_v4());
        let team = Uuid::new_v4();
        let existing = vec![
            existing_match(court, Uuid::new_v4(), Uuid::new_v4(), at(10, 0), 60, MatchStatus::Scheduled),
            existing_match(None, team, Uuid::new_v4(), at(10, 0), 60, MatchStatus::Scheduled),
        ];
        let proposed = candidate(court, team, Uuid::new_v4(), at(10, 0), 60);

        let report = find_conflicts(&proposed, &existing);
        assert_eq!(report.court, vec![existing[0].id]);
        assert_eq!(report.team, vec![existing[1].id]);
        assert_eq!(
            report.result(),
            ConflictResult { court_conflict: true, team_conflict: true }
        );
    }

    #[test]
    fn test_completed_matches_are_ignored() {
        let court = Some(Uuid::new_v4());
        let team = Uuid::new_v4();
        let existing = vec![existing_match(
            court,
            team,
            Uuid::new_v4(),
            at(10, 0),
            60,
            MatchStatus::Completed,
        )];
        let proposed = candidate(court, team, Uuid::new_v4(), at(10, 15), 30);

        assert!(!check_conflict(&proposed, &existing).has_conflict());
    }

    #[test]
    fn test_cancelled_matches_still_block_the_slot() {
        let court = Some(Uuid::new_v4());
        let existing = vec![existing_match(
            court,
            Uuid::new_v4(),
            Uuid::new_v4(),
            at(10, 0),
            60,
            MatchStatus::Cancelled,
        )];
        let proposed = candidate(court, Uuid::new_v4(), Uuid::new_v4(), at(10, 15), 30);

        assert!(check_conflict(&proposed, &existing).court_conflict);
    }

    #[test]
    fn test_candidate_without_court_never_has_court_conflict() {
        let existing = vec![existing_match(
            None,
            Uuid::new_v4(),
            Uuid::new_v4(),
            at(10, 0),
            60,
            MatchStatus::Scheduled,
        )];
        let proposed = candidate(None, Uuid::new_v4(), Uuid::new_v4(), at(10, 0), 60);

        assert!(!check_conflict(&proposed, &existing).court_conflict);
    }

    #[test]
    fn test_conflict_is_symmetric() {
        let court = Some(Uuid::new_v4());
        let shared_team = Uuid::new_v4();
        let a = existing_match(court, shared_team, Uuid::new_v4(), at(14, 0), 60, MatchStatus::Scheduled);
        let b = existing_match(court, Uuid::new_v4(), shared_team, at(14, 0), 60, MatchStatus::Scheduled);

        let a_against_b = check_conflict(&CandidateMatch::from(&a), std::slice::from_ref(&b));
        let b_against_a = check_conflict(&CandidateMatch::from(&b), std::slice::from_ref(&a));

        assert_eq!(a_against_b, b_against_a);
        assert!(a_against_b.court_conflict);
        assert!(a_against_b.team_conflict);
    }
}
