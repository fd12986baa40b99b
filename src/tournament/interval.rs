use chrono::{DateTime, Duration, Utc};

/// Half-open time slot `[start, end)` occupied by a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn from_start(start: DateTime<Utc>, duration_minutes: i32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
        }
    }

    /// Touching intervals (`a.end == b.start`) do not overlap
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let first = TimeInterval::from_start(at(10, 0), 60);
        let second = TimeInterval::from_start(at(11, 0), 60);
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_partial_overlap_and_containment() {
        let first = TimeInterval::from_start(at(10, 0), 60);
        let partial = TimeInterval::from_start(at(10, 30), 60);
        let contained = TimeInterval::from_start(at(10, 15), 15);
        let containing = TimeInterval::from_start(at(9, 0), 180);

        assert!(first.overlaps(&partial));
        assert!(partial.overlaps(&first));
        assert!(first.overlaps(&contained));
        assert!(first.overlaps(&containing));
        assert!(first.overlaps(&first));
    }

    #[test]
    fn test_end_follows_duration() {
        let interval = TimeInterval::from_start(at(10, 0), 90);
        assert_eq!(interval.start, at(10, 0));
        assert_eq!(interval.end, at(11, 30));
    }
}
