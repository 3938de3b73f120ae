use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use super::*;
use crate::clock::ManualClock;
use crate::embedding::MockEmbedder;
use crate::fixtures::{PostingBuilder, SignalBuilder, fixed_now, interest};
use crate::model::{InterestKind, MatchScore, Posting, RecommendationSnapshot, UserId};
use crate::pipeline::MatchingConfig;
use crate::service::RecommendationService;
use crate::store::{MatchScoreStore, MemoryStore, PostingStore, SnapshotStore};

fn sweeper() -> (Arc<MemoryStore>, Arc<ManualClock>, ExpirySweeper) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let sweeper = ExpirySweeper::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    );
    (store, clock, sweeper)
}

fn snapshot_row(
    user_id: UserId,
    posting: &Posting,
    expires_in: Duration,
) -> RecommendationSnapshot {
    RecommendationSnapshot {
        user_id,
        posting_id: posting.id,
        match_score: 80.0,
        match_reasons: vec!["Strong match".into()],
        created_at: fixed_now(),
        expires_at: fixed_now() + expires_in,
    }
}

async fn insert(store: &MemoryStore, posting: Posting) -> Posting {
    store.insert(posting.clone()).await.unwrap();
    posting
}

#[test]
fn test_schedule_config_defaults() {
    let config = ScheduleConfig::default();
    assert_eq!(config.generation_interval, StdDuration::from_secs(2 * 86_400));
    assert_eq!(config.sweep_interval, StdDuration::from_secs(86_400));
    assert_eq!(config.posting_retention_days, 30);
    assert!(config.validate().is_ok());

    let zero = ScheduleConfig {
        posting_retention_days: 0,
        ..ScheduleConfig::default()
    };
    assert!(zero.validate().is_err());
}

#[tokio::test]
async fn test_shutdown_signal_wakes_waiters_once() {
    let shutdown = ShutdownSignal::new();
    let waiter = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.wait().await })
    };

    assert!(!shutdown.is_triggered());
    assert!(shutdown.trigger());
    assert!(!shutdown.trigger());
    tokio::time::timeout(StdDuration::from_secs(1), waiter)
        .await
        .expect("waiter should wake")
        .unwrap();

    // Already triggered: resolves immediately.
    shutdown.wait().await;
}

#[tokio::test]
async fn test_sweep_expired_recommendations_is_idempotent() {
    let (store, _clock, sweeper) = sweeper();
    let posting = insert(&store, PostingBuilder::new("Backend Engineer", "Acme").build()).await;
    let other = insert(&store, PostingBuilder::new("Data Engineer", "Beta").build()).await;
    let user = UserId::new();
    store
        .replace_for_user(
            user,
            vec![
                snapshot_row(user, &posting, Duration::seconds(-1)),
                snapshot_row(user, &other, Duration::days(1)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(sweeper.sweep_expired_recommendations().await.unwrap(), 1);
    assert_eq!(sweeper.sweep_expired_recommendations().await.unwrap(), 0);
    let rows = store.snapshot_rows(user);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].posting_id, other.id);
}

#[tokio::test]
async fn test_sweep_expired_saved_records_keeps_applied() {
    let (store, _clock, sweeper) = sweeper();
    let user = UserId::new();
    let past = Some(fixed_now() - Duration::days(1));
    let posting = insert(&store, PostingBuilder::new("Backend Engineer", "Acme").build()).await;
    store.add_interest(interest(user, posting.id, InterestKind::Saved, past));
    store.add_interest(interest(user, posting.id, InterestKind::Applied, past));
    store.add_interest(interest(
        user,
        posting.id,
        InterestKind::Saved,
        Some(fixed_now() + Duration::days(1)),
    ));

    assert_eq!(sweeper.sweep_expired_saved_records().await.unwrap(), 1);
    assert_eq!(sweeper.sweep_expired_saved_records().await.unwrap(), 0);
    assert_eq!(store.interest_count(), 2);
}

#[tokio::test]
async fn test_sweep_old_postings_honours_exemptions() {
    let (store, _clock, sweeper) = sweeper();
    let user = UserId::new();
    let stale = insert(
        &store,
        PostingBuilder::new("Backend Engineer", "Old").posted_days_ago(40).build(),
    )
    .await;
    let external = insert(
        &store,
        PostingBuilder::new("Backend Engineer", "Manual")
            .external()
            .posted_days_ago(400)
            .build(),
    )
    .await;
    let applied = insert(
        &store,
        PostingBuilder::new("Backend Engineer", "Applied").posted_days_ago(400).build(),
    )
    .await;
    let recent = insert(
        &store,
        PostingBuilder::new("Backend Engineer", "New").posted_days_ago(5).build(),
    )
    .await;
    store.add_interest(interest(user, applied.id, InterestKind::Applied, None));
    store
        .upsert_many(vec![MatchScore::new(user, stale.id, 70.0, vec![], fixed_now())])
        .await
        .unwrap();
    store
        .replace_for_user(user, vec![snapshot_row(user, &stale, Duration::days(1))])
        .await
        .unwrap();

    assert_eq!(sweeper.sweep_old_postings(30).await.unwrap(), 1);
    assert_eq!(sweeper.sweep_old_postings(30).await.unwrap(), 0);

    assert!(store.find_by_link(&stale.link).await.unwrap().is_none());
    for kept in [&external, &applied, &recent] {
        assert!(store.find_by_link(&kept.link).await.unwrap().is_some());
    }
    assert_eq!(store.score_count(), 0);
    assert!(store.snapshot_rows(user).is_empty());
}

#[tokio::test]
async fn test_run_all_releases_postings_held_by_expired_saves() {
    let (store, _clock, sweeper) = sweeper();
    let user = UserId::new();
    let saved = insert(
        &store,
        PostingBuilder::new("Backend Engineer", "Acme").posted_days_ago(60).build(),
    )
    .await;
    store.add_interest(interest(
        user,
        saved.id,
        InterestKind::Saved,
        Some(fixed_now() - Duration::days(1)),
    ));

    let report = sweeper.run_all(30).await.unwrap();

    assert_eq!(
        report,
        SweepReport {
            recommendations: 0,
            saved_records: 1,
            postings: 1,
        }
    );
    assert_eq!(sweeper.run_all(30).await.unwrap(), SweepReport::default());
}

#[tokio::test]
async fn test_sweep_surfaces_store_failure() {
    let (store, _clock, sweeper) = sweeper();
    store.set_unavailable(true);

    assert!(matches!(
        sweeper.run_all(30).await,
        Err(SweepError::Store(_))
    ));
}

#[tokio::test]
async fn test_scheduler_runs_jobs_until_shutdown() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mock = Arc::new(
        MockEmbedder::new()
            .with_rule("target roles", vec![1.0, 0.0])
            .with_rule("backend", vec![0.6, 0.8]),
    );
    let shutdown = ShutdownSignal::new();
    let service = Arc::new(RecommendationService::with_store(
        store.clone(),
        mock,
        clock.clone(),
        &MatchingConfig::default(),
        1_000,
        30,
        shutdown.clone(),
    ));

    let posting = insert(
        &store,
        PostingBuilder::new("Senior Backend Engineer", "Acme")
            .description("Go, Postgres")
            .build(),
    )
    .await;
    let expired_user = UserId::new();
    store
        .replace_for_user(
            expired_user,
            vec![snapshot_row(expired_user, &posting, Duration::seconds(-1))],
        )
        .await
        .unwrap();
    let signal = SignalBuilder::new()
        .target_roles(&["Backend Engineer"])
        .skills(&["go", "postgres"])
        .build();
    let user_id = signal.user_id;
    store.put_profile(signal);

    let scheduler = Scheduler::new(
        service,
        ScheduleConfig::for_testing(StdDuration::from_millis(50)),
        shutdown.clone(),
    );
    let handle = scheduler.start();
    assert!(scheduler.is_running());

    tokio::time::sleep(StdDuration::from_millis(150)).await;
    assert_eq!(store.snapshot_rows(user_id).len(), 1);
    assert!(store.snapshot_rows(expired_user).is_empty());

    shutdown.trigger();
    tokio::time::timeout(StdDuration::from_secs(1), handle)
        .await
        .expect("scheduler should stop")
        .unwrap();
    assert!(!scheduler.is_running());
}
