//! End-to-end HTTP tests: ingest, generate, read, sweep.

mod common;

use chrono::Duration;
use jobmatch::MATCH_STATUS_HEADER;
use jobmatch::fixtures::{SignalBuilder, candidate, fixed_now, interest};
use jobmatch::model::{InterestKind, PostingCandidate, UserSignal};
use jobmatch::store::PostingStore;

use common::harness::{backend_embedder, spawn_test_server};

fn backend_user() -> UserSignal {
    SignalBuilder::new()
        .target_roles(&["Backend Engineer"])
        .skills(&["go", "postgres"])
        .build()
}

fn backend_candidate() -> PostingCandidate {
    PostingCandidate {
        description: "We use Go, Postgres, Kubernetes.".to_string(),
        ..candidate(
            "Senior Backend Engineer",
            "Acme",
            "https://jobs.example.com/acme/1?utm_source=feed",
        )
    }
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = spawn_test_server(backend_embedder())
        .await
        .expect("Server should start");

    let resp = reqwest::get(format!("{}/healthz", server.url())).await.unwrap();

    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ingest_generate_and_read_recommendations() {
    let server = spawn_test_server(backend_embedder())
        .await
        .expect("Server should start");
    let dedup = server.dedup();

    let report = dedup
        .ingest_batch(vec![
            backend_candidate(),
            candidate("Physical Therapist", "Clinic", "https://jobs.example.com/clinic/7"),
            // Same canonical link once tracking parameters are dropped.
            candidate(
                "Senior Backend Engineer",
                "Acme",
                "https://jobs.example.com/acme/1",
            ),
        ])
        .await
        .unwrap();
    assert_eq!((report.accepted, report.duplicates), (2, 1));

    let user = backend_user();
    let user_id = user.user_id;
    server.store.put_profile(user);

    let client = reqwest::Client::new();
    let stats: serde_json::Value = client
        .post(format!("{}/v1/admin/generation", server.url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["success"], 1);
    assert_eq!(stats["total_recommendations"], 1);

    let page: serde_json::Value = client
        .get(format!(
            "{}/v1/users/{}/recommendations?page=1&page_size=10",
            server.url(),
            user_id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 1);
    let item = &page["items"][0];
    assert_eq!(item["posting"]["title"], "Senior Backend Engineer");
    assert_eq!(item["posting"]["link"], "https://jobs.example.com/acme/1");
    assert_eq!(item["match_score"], 94.0);
    assert!(
        item["match_reason"]
            .as_str()
            .unwrap()
            .contains("Skills match: go, postgres")
    );

    // Generation cached the score, so on-demand matches are served without embedding.
    let calls = server.embedder.calls();
    let resp = client
        .get(format!("{}/v1/users/{}/matches?limit=1", server.url(), user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()[MATCH_STATUS_HEADER], "HIT");
    assert_eq!(server.embedder.calls(), calls);
}

#[tokio::test]
async fn test_snapshot_expires_and_is_swept() {
    let server = spawn_test_server(backend_embedder())
        .await
        .expect("Server should start");
    server.dedup().ingest(backend_candidate()).await.unwrap();
    let user = backend_user();
    let user_id = user.user_id;
    server.store.put_profile(user);
    server.service.run_generation().await.unwrap();

    server.clock.advance(Duration::days(3) + Duration::seconds(1));

    let client = reqwest::Client::new();
    let page: serde_json::Value = client
        .get(format!("{}/v1/users/{}/recommendations", server.url(), user_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 0);

    let report: serde_json::Value = client
        .post(format!("{}/v1/admin/sweep", server.url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["recommendations"], 1);
    assert_eq!(report["postings"], 0);
    assert!(server.store.snapshot_rows(user_id).is_empty());
}

#[tokio::test]
async fn test_retention_sweep_spares_referenced_postings() {
    let server = spawn_test_server(backend_embedder())
        .await
        .expect("Server should start");
    let dedup = server.dedup();
    dedup
        .ingest_batch(vec![
            backend_candidate(),
            candidate("Data Engineer", "Beta", "https://jobs.example.com/beta/2"),
        ])
        .await
        .unwrap();
    let kept = server
        .store
        .find_by_link("https://jobs.example.com/acme/1")
        .await
        .unwrap()
        .unwrap();
    let user = backend_user();
    server.store.add_interest(interest(
        user.user_id,
        kept.id,
        InterestKind::Applied,
        None,
    ));

    server.clock.set(fixed_now() + Duration::days(31));
    let report = server.service.run_sweep().await.unwrap();

    assert_eq!(report.postings, 1);
    assert_eq!(server.store.posting_count(), 1);
    assert!(
        server
            .store
            .find_by_link("https://jobs.example.com/beta/2")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_unknown_user_and_bad_id() {
    let server = spawn_test_server(backend_embedder())
        .await
        .expect("Server should start");
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/v1/users/{}/matches", server.url(), jobmatch::UserId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = client
        .get(format!("{}/v1/users/42/recommendations", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let server = spawn_test_server(backend_embedder())
        .await
        .expect("Server should start");
    let url = server.url();

    server.shutdown().await;

    assert!(reqwest::get(format!("{}/healthz", url)).await.is_err());
}
