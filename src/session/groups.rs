//! Recency grouping for the session list: a pure view over the store,
//! bucketed by how recently each session was touched.

use super::types::Session;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyBucket {
    Today,
    Yesterday,
    Previous7Days,
    Older,
}

impl RecencyBucket {
    pub fn label(&self) -> &'static str {
        match self {
            RecencyBucket::Today => "Today",
            RecencyBucket::Yesterday => "Yesterday",
            RecencyBucket::Previous7Days => "Previous 7 Days",
            RecencyBucket::Older => "Older",
        }
    }

    fn for_age(age: Duration) -> Self {
        if age < Duration::hours(24) {
            RecencyBucket::Today
        } else if age < Duration::hours(48) {
            RecencyBucket::Yesterday
        } else if age < Duration::days(7) {
            RecencyBucket::Previous7Days
        } else {
            RecencyBucket::Older
        }
    }
}

/// One non-empty bucket of sessions, in store order.
#[derive(Debug, Clone)]
pub struct SessionGroup<'a> {
    pub bucket: RecencyBucket,
    pub sessions: Vec<&'a Session>,
}

/// Filter sessions whose title contains `query` (case-insensitive), then
/// bucket the survivors by `now - updated_at`. Empty buckets are omitted;
/// within a bucket the input order is preserved.
pub fn group_sessions<'a>(
    sessions: &'a [Session],
    query: &str,
    now: DateTime<Utc>,
) -> Vec<SessionGroup<'a>> {
    let query = query.to_lowercase();
    let mut buckets: [Vec<&Session>; 4] = Default::default();

    for session in sessions {
        if !query.is_empty() && !session.title.to_lowercase().contains(&query) {
            continue;
        }
        let slot = match RecencyBucket::for_age(now - session.updated_at) {
            RecencyBucket::Today => 0,
            RecencyBucket::Yesterday => 1,
            RecencyBucket::Previous7Days => 2,
            RecencyBucket::Older => 3,
        };
        buckets[slot].push(session);
    }

    const ORDER: [RecencyBucket; 4] = [
        RecencyBucket::Today,
        RecencyBucket::Yesterday,
        RecencyBucket::Previous7Days,
        RecencyBucket::Older,
    ];

    ORDER
        .into_iter()
        .zip(buckets)
        .filter(|(_, sessions)| !sessions.is_empty())
        .map(|(bucket, sessions)| SessionGroup { bucket, sessions })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::{Mode, SessionId};

    fn session_touched(id: u64, title: &str, hours_ago: i64, now: DateTime<Utc>) -> Session {
        let mut session = Session::new(SessionId(id), Mode::Chat);
        session.title = title.to_string();
        session.updated_at = now - Duration::hours(hours_ago);
        session
    }

    #[test]
    fn test_buckets_by_age() {
        let now = Utc::now();
        let sessions = vec![
            session_touched(0, "fresh", 1, now),
            session_touched(1, "day old", 30, now),
            session_touched(2, "this week", 100, now),
            session_touched(3, "ancient", 200, now),
        ];

        let groups = group_sessions(&sessions, "", now);
        let buckets: Vec<RecencyBucket> = groups.iter().map(|g| g.bucket).collect();
        assert_eq!(
            buckets,
            vec![
                RecencyBucket::Today,
                RecencyBucket::Yesterday,
                RecencyBucket::Previous7Days,
                RecencyBucket::Older,
            ]
        );
        for group in &groups {
            assert_eq!(group.sessions.len(), 1);
        }
        assert_eq!(groups[3].sessions[0].title, "ancient");
    }

    #[test]
    fn test_empty_buckets_omitted() {
        let now = Utc::now();
        let sessions = vec![
            session_touched(0, "one", 1, now),
            session_touched(1, "two", 2, now),
        ];

        let groups = group_sessions(&sessions, "", now);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].bucket, RecencyBucket::Today);
        assert_eq!(groups[0].sessions.len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let now = Utc::now();
        let sessions = vec![
            session_touched(0, "Ndiudze nezvetsika", 1, now),
            session_touched(1, "New Translation", 1, now),
        ];

        let groups = group_sessions(&sessions, "TRANSLAT", now);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sessions[0].title, "New Translation");
    }

    #[test]
    fn test_absent_query_matches_nothing() {
        let now = Utc::now();
        let sessions = vec![
            session_touched(0, "alpha", 1, now),
            session_touched(1, "beta", 30, now),
            session_touched(2, "gamma", 200, now),
        ];

        let groups = group_sessions(&sessions, "zzz", now);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_store_order_preserved_within_bucket() {
        let now = Utc::now();
        let sessions = vec![
            session_touched(2, "newest", 1, now),
            session_touched(1, "middle", 2, now),
            session_touched(0, "oldest", 3, now),
        ];

        let groups = group_sessions(&sessions, "", now);
        let titles: Vec<&str> = groups[0].sessions.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }
}
