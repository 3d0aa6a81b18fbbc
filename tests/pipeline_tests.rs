//! End-to-end pipeline tests over the fake tool suite
//!
//! Submit through the API, await the tracked background job, then observe
//! terminal status and artifact fetchability.

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use helpers::{body_bytes, body_json, test_state, FailAt, FakeTools};
use stemd::build_router;
use stemd::models::StemKind;

async fn submit_and_wait(state: &stemd::AppState, session_id: &str) {
    let app = build_router(state.clone());
    let body = serde_json::json!({
        "youtube_url": "https://example.com/watch?v=abc",
        "session_id": session_id,
    });
    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    assert!(state.jobs.wait(session_id).await, "job was not tracked");
}

#[tokio::test]
async fn successful_job_goes_ready_with_all_four_stems() {
    let (_dir, state) = test_state(Arc::new(FakeTools::succeeding()));
    submit_and_wait(&state, "sess-ok").await;

    let doc = state.store.read("sess-ok").unwrap().unwrap();
    assert_eq!(doc.status, stemd::models::SessionStatus::Ready);
    assert_eq!(doc.title.as_deref(), Some("Test Video"));

    let app = build_router(state.clone());
    for stem in StemKind::ALL {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/download/sess-ok/{}", stem))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "stem {} not fetchable", stem);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap(),
            "audio/mpeg"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains(&stem.mp3_name()));

        let bytes = body_bytes(response).await;
        assert!(!bytes.is_empty());
    }
}

#[tokio::test]
async fn successful_job_removes_intermediates() {
    let (_dir, state) = test_state(Arc::new(FakeTools::succeeding()));
    submit_and_wait(&state, "sess-ok").await;

    let layout = state.store.layout().clone();
    assert!(!layout.download_wav("sess-ok").exists());
    assert!(!layout.session_stems_dir("sess-ok").exists());
    assert!(layout.session_compressed_dir("sess-ok").exists());
}

#[tokio::test]
async fn failing_separation_goes_failed_and_nothing_is_fetchable() {
    let (_dir, state) = test_state(Arc::new(FakeTools::failing_at(FailAt::Separate)));
    submit_and_wait(&state, "sess-bad").await;

    let doc = state.store.read("sess-bad").unwrap().unwrap();
    assert_eq!(doc.status, stemd::models::SessionStatus::Failed);
    assert!(doc.title.is_none());

    let app = build_router(state.clone());
    for stem in StemKind::ALL {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/download/sess-bad/{}", stem))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn failing_probe_still_records_failed_status() {
    let (_dir, state) = test_state(Arc::new(FakeTools::failing_at(FailAt::Probe)));
    submit_and_wait(&state, "sess-probe").await;

    let doc = state.store.read("sess-probe").unwrap().unwrap();
    assert_eq!(doc.status, stemd::models::SessionStatus::Failed);
}

#[tokio::test]
async fn failing_transcode_leaves_partial_artifacts_unfetchable() {
    let (_dir, state) = test_state(Arc::new(FakeTools::failing_at(FailAt::Transcode)));
    submit_and_wait(&state, "sess-tc").await;

    let doc = state.store.read("sess-tc").unwrap().unwrap();
    assert_eq!(doc.status, stemd::models::SessionStatus::Failed);

    // No rollback: intermediates may remain, but nothing is served
    let app = build_router(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/download/sess-tc/vocals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_is_pollable_during_and_after_processing() {
    let (_dir, state) = test_state(Arc::new(FakeTools::succeeding()));
    submit_and_wait(&state, "sess-poll").await;

    let app = build_router(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/status/sess-poll")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["title"], "Test Video");
}

#[tokio::test]
async fn duplicate_submission_overwrites_previous_session() {
    let (_dir, state) = test_state(Arc::new(FakeTools::succeeding()));
    submit_and_wait(&state, "sess-dup").await;
    submit_and_wait(&state, "sess-dup").await;

    let doc = state.store.read("sess-dup").unwrap().unwrap();
    assert_eq!(doc.status, stemd::models::SessionStatus::Ready);
}
