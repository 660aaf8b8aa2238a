//! Integration tests for the eligibility, attendance and signing endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use common::{body_json, client_token, get, post_json, trainer_token};
use emargement_core::decomposer::create_training;
use emargement_core::memory::InMemoryStore;
use emargement_core::training::{DaySpec, SessionWindow, TrainingRequest};
use serde_json::{json, Value};

const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgo=";

struct Fixture {
    store: Arc<InMemoryStore>,
    day_id: i64,
    alice: i64,
    bob: i64,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let request = TrainingRequest {
        base_title: "SST".into(),
        company: "Acme".into(),
        location: "Lyon".into(),
        trainer_id: Some(2),
        trainer_name: "Camille".into(),
        days: vec![DaySpec {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            morning: Some(SessionWindow {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            }),
            afternoon: Some(SessionWindow {
                start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }),
        }],
    };
    let day_id = create_training(store.as_ref(), &request).await.unwrap()[0].id;
    let alice = store
        .add_participant(day_id, "Alice", "alice@acme.test", Some("Acme"))
        .unwrap()
        .id;
    let bob = store.add_participant(day_id, "Bob", "bob@acme.test", None).unwrap().id;
    Fixture {
        store,
        day_id,
        alice,
        bob,
    }
}

impl Fixture {
    fn app(&self) -> axum::Router {
        common::build_test_app(self.store.clone())
    }

    async fn eligible(&self, session: &str) -> Vec<i64> {
        let uri = format!("/api/v1/training-days/{}/sessions/{session}/eligible", self.day_id);
        let response = get(self.app(), &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect()
    }

    async fn sign_qr(
        &self,
        session: &str,
        participant_id: i64,
        signature: &str,
    ) -> (StatusCode, Value) {
        let uri = format!("/api/v1/training-days/{}/sessions/{session}/signatures", self.day_id);
        let response = post_json(
            self.app(),
            &uri,
            None,
            json!({ "participant_id": participant_id, "signature": signature }),
        )
        .await;
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn sign_link(
        &self,
        participant_id: i64,
        session: &str,
        signature: &str,
    ) -> (StatusCode, Value) {
        let uri = format!(
            "/api/v1/training-days/{}/participants/{participant_id}/signatures/{session}",
            self.day_id
        );
        let response = post_json(self.app(), &uri, None, json!({ "signature": signature })).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[tokio::test]
async fn eligible_list_is_public_and_hides_emails() {
    let f = fixture().await;
    let uri = format!("/api/v1/training-days/{}/sessions/morning/eligible", f.day_id);

    let response = get(f.app(), &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["name"], "Alice");
    assert_eq!(json["data"][0]["company"], "Acme");
    assert!(json["data"][0].get("email").is_none());
}

#[tokio::test]
async fn eligible_for_unknown_day_is_404() {
    let f = fixture().await;
    let uri = "/api/v1/training-days/9999/sessions/afternoon/eligible";
    let response = get(f.app(), uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn qr_signature_removes_participant_from_session() {
    let f = fixture().await;

    let (status, json) = f.sign_qr("morning", f.alice, SIGNATURE).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "morning_only");
    assert_eq!(json["data"]["session"], "morning");
    assert!(json["data"]["signed_at"].is_string());

    assert_eq!(f.eligible("morning").await, vec![f.bob]);
    assert_eq!(f.eligible("afternoon").await, vec![f.alice, f.bob]);
}

#[tokio::test]
async fn second_signature_is_409_whichever_flow() {
    let f = fixture().await;

    let (status, _) = f.sign_link(f.alice, "afternoon", SIGNATURE).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = f.sign_qr("afternoon", f.alice, SIGNATURE).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_SIGNED");

    let (status, json) = f.sign_link(f.alice, "afternoon", SIGNATURE).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_SIGNED");
}

#[tokio::test]
async fn both_sessions_make_a_full_day() {
    let f = fixture().await;

    f.sign_link(f.bob, "afternoon", SIGNATURE).await;
    let (status, json) = f.sign_qr("morning", f.bob, SIGNATURE).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "full_day");
    assert!(!f.eligible("morning").await.contains(&f.bob));
    assert!(!f.eligible("afternoon").await.contains(&f.bob));
}

#[tokio::test]
async fn blank_signature_is_rejected_before_the_gate() {
    let f = fixture().await;

    let (status, json) = f.sign_qr("morning", f.alice, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, _) = f.sign_link(f.alice, "morning", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(f.eligible("morning").await, vec![f.alice, f.bob]);
}

#[tokio::test]
async fn missing_signature_fields_answer_json_errors() {
    let f = fixture().await;
    let uri = format!("/api/v1/training-days/{}/sessions/morning/signatures", f.day_id);

    let response = post_json(f.app(), &uri, None, json!({ "participant_id": f.alice })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(f.app(), &uri, None, json!({ "signature": SIGNATURE })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    assert_eq!(f.eligible("morning").await, vec![f.alice, f.bob]);
}

#[tokio::test]
async fn participant_of_another_day_is_404() {
    let f = fixture().await;
    let other_day = fixture_day(&f).await;
    let stranger = f
        .store
        .add_participant(other_day, "Eve", "eve@other.test", None)
        .unwrap()
        .id;

    let (status, json) = f.sign_link(stranger, "morning", SIGNATURE).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_session_segment_is_rejected() {
    let f = fixture().await;
    let uri = format!("/api/v1/training-days/{}/sessions/evening/eligible", f.day_id);
    let response = get(f.app(), &uri, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A second single-day training in the same store.
async fn fixture_day(f: &Fixture) -> i64 {
    let request = TrainingRequest {
        base_title: "Incendie".into(),
        company: "Globex".into(),
        location: "Paris".into(),
        trainer_id: Some(9),
        trainer_name: String::new(),
        days: vec![DaySpec {
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            morning: Some(SessionWindow {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            }),
            afternoon: None,
        }],
    };
    create_training(f.store.as_ref(), &request).await.unwrap()[0].id
}

// ---------------------------------------------------------------------------
// Attendance sheet
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attendance_sheet_for_staff_only() {
    let f = fixture().await;
    f.sign_qr("morning", f.alice, SIGNATURE).await;
    let uri = format!("/api/v1/training-days/{}/attendance", f.day_id);

    let response = get(f.app(), &uri, Some(&client_token())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(f.app(), &uri, Some(&trainer_token())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let sheet = json["data"].as_array().unwrap();
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet[0]["participant"]["name"], "Alice");
    assert_eq!(sheet[0]["status"], "morning_only");
    assert!(sheet[0]["morning_signed_at"].is_string());
    assert!(sheet[0]["afternoon_signed_at"].is_null());
    assert_eq!(sheet[1]["status"], "unsigned");
}
