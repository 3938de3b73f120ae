use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use super::*;
use crate::clock::{Clock, ManualClock};
use crate::fixtures::fixed_now;
use crate::model::{MatchScore, PostingId, UserId};
use crate::store::{MatchScoreStore, MemoryStore};

const DAY: StdDuration = StdDuration::from_secs(86_400);

fn cache() -> (Arc<MemoryStore>, Arc<ManualClock>, MatchScoreCache) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let cache = MatchScoreCache::new(store.clone(), clock.clone(), DAY);
    (store, clock, cache)
}

#[tokio::test]
async fn test_upsert_then_get_fresh_returns_row() {
    let (_store, _clock, cache) = cache();
    let user = UserId::new();
    let posting = PostingId::new();

    cache
        .upsert(user, posting, 72.456, vec!["Strong match".into()])
        .await
        .unwrap();
    let fresh = cache.get_fresh(user).await.unwrap();

    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].posting_id, posting);
    assert_eq!(fresh[0].relevance_score, 72.46);
    assert_eq!(fresh[0].match_reasons, vec!["Strong match"]);
}

#[tokio::test]
async fn test_expired_rows_are_misses_but_kept() {
    let (store, clock, cache) = cache();
    let user = UserId::new();
    let posting = PostingId::new();
    cache.upsert(user, posting, 60.0, vec![]).await.unwrap();

    clock.advance(Duration::hours(25));

    assert!(cache.get_fresh(user).await.unwrap().is_empty());
    assert_eq!(store.score_count(), 1);
    assert!(store.get(user, posting).await.unwrap().is_some());
}

#[tokio::test]
async fn test_rescore_overwrites_in_place() {
    let (store, clock, cache) = cache();
    let user = UserId::new();
    let posting = PostingId::new();
    cache.upsert(user, posting, 60.0, vec![]).await.unwrap();
    clock.advance(Duration::hours(30));

    cache.upsert(user, posting, 80.0, vec![]).await.unwrap();

    assert_eq!(store.score_count(), 1);
    let fresh = cache.get_fresh(user).await.unwrap();
    assert_eq!(fresh[0].relevance_score, 80.0);
}

#[tokio::test]
async fn test_get_fresh_sorts_descending_and_scopes_by_user() {
    let (_store, _clock, cache) = cache();
    let user = UserId::new();
    let other = UserId::new();
    let now = fixed_now();
    cache
        .upsert_many(vec![
            MatchScore::new(user, PostingId::new(), 55.0, vec![], now),
            MatchScore::new(user, PostingId::new(), 91.0, vec![], now),
            MatchScore::new(user, PostingId::new(), 73.0, vec![], now),
            MatchScore::new(other, PostingId::new(), 99.0, vec![], now),
        ])
        .await
        .unwrap();

    let scores: Vec<f64> = cache
        .get_fresh(user)
        .await
        .unwrap()
        .iter()
        .map(|row| row.relevance_score)
        .collect();

    assert_eq!(scores, vec![91.0, 73.0, 55.0]);
}

#[tokio::test]
async fn test_profile_change_invalidates_older_scores() {
    let (_store, clock, cache) = cache();
    let user = UserId::new();
    cache.upsert(user, PostingId::new(), 60.0, vec![]).await.unwrap();

    clock.advance(Duration::hours(1));
    let profile_updated = clock.now();

    assert_eq!(cache.get_fresh(user).await.unwrap().len(), 1);
    assert!(
        cache
            .get_fresh_since(user, Some(profile_updated))
            .await
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_freshness_cutoff() {
    let (_store, _clock, cache) = cache();
    let now = fixed_now();

    assert_eq!(cache.freshness_cutoff(None), now - Duration::days(1));
    assert_eq!(
        cache.freshness_cutoff(Some(now - Duration::days(3))),
        now - Duration::days(1)
    );
    assert_eq!(
        cache.freshness_cutoff(Some(now - Duration::hours(2))),
        now - Duration::hours(2)
    );
}

#[test]
fn test_match_status_header_values() {
    assert_eq!(MatchStatus::Hit.as_header_value(), "HIT");
    assert!(!MatchStatus::Miss.is_hit());
    assert_eq!(MatchStatus::Miss.to_string(), "MISS");
}
