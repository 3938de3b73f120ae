use std::io::Write;
use std::sync::Arc;

use chrono::Duration;

use super::*;
use crate::clock::ManualClock;
use crate::fixtures::{PostingBuilder, fixed_now, interest};
use crate::ingest::Deduplicator;
use crate::model::{InterestKind, ProcessingStatus};

fn snapshot(user_id: UserId, posting_id: PostingId, score: f64, hours: i64) -> RecommendationSnapshot {
    RecommendationSnapshot {
        user_id,
        posting_id,
        match_score: score,
        match_reasons: vec!["Good match".into()],
        created_at: fixed_now(),
        expires_at: fixed_now() + Duration::hours(hours),
    }
}

#[tokio::test]
async fn test_insert_rejects_duplicate_link() {
    let store = MemoryStore::new();
    let posting = PostingBuilder::new("Engineer", "Acme").link("https://a/1").build();
    let twin = PostingBuilder::new("Engineer", "Acme").link("https://a/1").build();

    store.insert(posting).await.unwrap();
    let err = store.insert(twin).await.unwrap_err();

    assert!(matches!(err, StoreError::DuplicateLink { .. }));
    assert_eq!(store.posting_count(), 1);
}

#[tokio::test]
async fn test_recent_orders_newest_first_and_skips_archived() {
    let store = MemoryStore::new();
    let old = PostingBuilder::new("Old", "Acme").posted_days_ago(10).build();
    let newer = PostingBuilder::new("Newer", "Acme").posted_days_ago(2).build();
    let newest = PostingBuilder::new("Newest", "Acme").posted_days_ago(1).build();
    let archived = PostingBuilder::new("Archived", "Acme")
        .posted_days_ago(1)
        .status(ProcessingStatus::Archived)
        .build();
    for p in [old, newer.clone(), newest.clone(), archived] {
        store.insert(p).await.unwrap();
    }

    let recent = store
        .recent(fixed_now() - Duration::days(7), 10)
        .await
        .unwrap();
    let titles: Vec<&str> = recent.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Newer"]);

    let limited = store.recent(fixed_now() - Duration::days(7), 1).await.unwrap();
    assert_eq!(limited[0].id, newest.id);
}

#[tokio::test]
async fn test_score_upsert_is_last_write_wins() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let posting = PostingId::new();

    store
        .upsert_many(vec![MatchScore::new(user, posting, 55.0, vec![], fixed_now())])
        .await
        .unwrap();
    store
        .upsert_many(vec![MatchScore::new(
            user,
            posting,
            72.5,
            vec![],
            fixed_now() + Duration::hours(1),
        )])
        .await
        .unwrap();

    assert_eq!(store.score_count(), 1);
    let row = store.get(user, posting).await.unwrap().unwrap();
    assert_eq!(row.relevance_score, 72.5);

    let fresh = store
        .updated_since(user, fixed_now() + Duration::minutes(30))
        .await
        .unwrap();
    assert_eq!(fresh.len(), 1);
}

#[tokio::test]
async fn test_replace_for_user_swaps_whole_set() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let other = UserId::new();
    let (a, b, c) = (PostingId::new(), PostingId::new(), PostingId::new());

    store
        .replace_for_user(user, vec![snapshot(user, a, 60.0, 24), snapshot(user, b, 80.0, 24)])
        .await
        .unwrap();
    store
        .replace_for_user(other, vec![snapshot(other, a, 90.0, 24)])
        .await
        .unwrap();
    store
        .replace_for_user(user, vec![snapshot(user, c, 70.0, 24)])
        .await
        .unwrap();

    let rows = store.active_for_user(user, fixed_now()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].posting_id, c);
    assert_eq!(store.snapshot_rows(other).len(), 1);
}

#[tokio::test]
async fn test_failed_replace_keeps_previous_set() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let posting = PostingId::new();
    store
        .replace_for_user(user, vec![snapshot(user, posting, 60.0, 24)])
        .await
        .unwrap();

    store.set_fail_writes(true);
    let result = store
        .replace_for_user(user, vec![snapshot(user, PostingId::new(), 99.0, 24)])
        .await;

    assert!(matches!(result, Err(StoreError::WriteFailed { .. })));
    let rows = store.snapshot_rows(user);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].posting_id, posting);
}

#[tokio::test]
async fn test_replace_rejects_rows_for_other_users() {
    let store = MemoryStore::new();
    let user = UserId::new();

    let result = store
        .replace_for_user(user, vec![snapshot(UserId::new(), PostingId::new(), 60.0, 24)])
        .await;

    assert!(result.is_err());
    assert!(store.snapshot_rows(user).is_empty());
}

#[tokio::test]
async fn test_active_for_user_filters_expired_and_sorts() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let (low, high, expired) = (PostingId::new(), PostingId::new(), PostingId::new());
    store
        .replace_for_user(
            user,
            vec![
                snapshot(user, low, 51.0, 24),
                snapshot(user, high, 88.0, 24),
                snapshot(user, expired, 95.0, -1),
            ],
        )
        .await
        .unwrap();

    let rows = store.active_for_user(user, fixed_now()).await.unwrap();
    let ids: Vec<PostingId> = rows.iter().map(|r| r.posting_id).collect();
    assert_eq!(ids, vec![high, low]);

    assert_eq!(store.delete_expired(fixed_now()).await.unwrap(), 1);
    assert_eq!(store.snapshot_rows(user).len(), 2);
}

#[tokio::test]
async fn test_cascading_deletes_by_posting() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let gone = PostingId::new();
    let kept = PostingId::new();
    store
        .upsert_many(vec![
            MatchScore::new(user, gone, 60.0, vec![], fixed_now()),
            MatchScore::new(user, kept, 60.0, vec![], fixed_now()),
        ])
        .await
        .unwrap();
    store
        .replace_for_user(user, vec![snapshot(user, gone, 60.0, 24), snapshot(user, kept, 70.0, 24)])
        .await
        .unwrap();

    assert_eq!(MatchScoreStore::delete_for_postings(&store, &[gone]).await.unwrap(), 1);
    assert_eq!(SnapshotStore::delete_for_postings(&store, &[gone]).await.unwrap(), 1);
    assert_eq!(store.score_count(), 1);
    assert_eq!(store.snapshot_rows(user)[0].posting_id, kept);
}

#[tokio::test]
async fn test_interest_expiry_only_removes_saved() {
    let store = MemoryStore::new();
    let user = UserId::new();
    let past = Some(fixed_now() - Duration::days(1));
    let saved = PostingId::new();
    let applied = PostingId::new();
    store.add_interest(interest(user, saved, InterestKind::Saved, past));
    store.add_interest(interest(user, applied, InterestKind::Applied, past));
    store.add_interest(interest(user, PostingId::new(), InterestKind::Saved, None));

    assert_eq!(store.delete_expired_saved(fixed_now()).await.unwrap(), 1);

    let referenced = store.referenced_posting_ids().await.unwrap();
    assert!(referenced.contains(&applied));
    assert!(!referenced.contains(&saved));
    assert_eq!(store.interest_count(), 2);
}

#[tokio::test]
async fn test_unavailable_store_fails_reads() {
    let store = MemoryStore::new();
    store.set_unavailable(true);

    assert!(matches!(
        store.user_ids().await,
        Err(StoreError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn test_seed_load_and_apply() {
    let user = UserId::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "profiles": [{{ "user_id": "{user}", "target_roles": ["Backend Engineer"], "work_mode": "remote" }}],
            "postings": [
                {{ "title": "Backend Engineer", "company": "Acme", "link": "https://acme.example.com/jobs/1" }},
                {{ "title": "Backend Engineer", "company": "Acme", "link": "https://acme.example.com/jobs/1/" }},
                {{ "title": "", "company": "Acme", "link": "https://acme.example.com/jobs/2" }}
            ],
            "interests": [
                {{ "user_id": "{user}", "posting_link": "https://acme.example.com/jobs/1?utm_source=mail",
                   "kind": "applied", "created_at": "2025-05-30T10:00:00Z" }},
                {{ "user_id": "{user}", "posting_link": "https://nowhere.example.com/9",
                   "kind": "saved", "created_at": "2025-05-30T10:00:00Z" }}
            ]
        }}"#
    )
    .unwrap();

    let seed = SeedData::load(file.path()).unwrap();
    let store = Arc::new(MemoryStore::new());
    let dedup = Deduplicator::new(store.clone(), Arc::new(ManualClock::new(fixed_now())));
    let report = seed.apply(&store, &dedup).await.unwrap();

    assert_eq!(
        report,
        SeedReport {
            postings: 1,
            rejected_postings: 2,
            profiles: 1,
            interests: 1,
            orphan_interests: 1,
        }
    );
    assert!(store.profile(user).await.unwrap().is_some());
    assert_eq!(store.recent_for_user(user, 10).await.unwrap().len(), 1);
}

#[test]
fn test_seed_load_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    assert!(matches!(
        SeedData::load(file.path()),
        Err(StoreError::SeedParse { .. })
    ));
    assert!(matches!(
        SeedData::load(std::path::Path::new("/nonexistent/seed.json")),
        Err(StoreError::SeedIo { .. })
    ));
}
