use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediflow::error::StoreError;
use mediflow::models::{
    AppointmentDraft, AppointmentStatus, AppointmentType, Appointments,
};
use mediflow::store::{FilterSpec, HttpStore, SortDir, TableClient};

fn client(server: &MockServer) -> TableClient<Appointments> {
    TableClient::new(Arc::new(HttpStore::new(server.uri(), "test-token")))
}

fn appointment_json(id: &str) -> serde_json::Value {
    json!({
        "Id": id,
        "Name": "Blood pressure check",
        "Tags": "",
        "patient": "p1",
        "date": "2023-09-18",
        "time": "09:30",
        "department": "d1",
        "doctor": "doc1",
        "appointmentType": "Follow-up",
        "notes": "",
        "status": "scheduled",
    })
}

#[tokio::test]
async fn list_posts_the_wire_query_with_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tables/appointment/query"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "pagingInfo": {"limit": 20, "offset": 0},
            "where": [
                {"fieldName": "status", "operator": "ExactMatch", "values": ["scheduled"]}
            ],
            "orderBy": [
                {"fieldName": "date", "SortType": "ASC"},
                {"fieldName": "time", "SortType": "ASC"}
            ],
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [appointment_json("a1")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let spec = FilterSpec::new()
        .eq("status", "scheduled")
        .order_by("date", SortDir::Asc)
        .order_by("time", SortDir::Asc);
    let records = client(&server).list(&spec).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
    assert_eq!(records[0].status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn create_sends_exactly_the_writable_fields() {
    let server = MockServer::start().await;
    // exact body match: no Id, Owner or audit fields may appear
    Mock::given(method("POST"))
        .and(path("/tables/appointment"))
        .and(body_json(json!({
            "Name": "Flu shot",
            "Tags": "",
            "patient": "p1",
            "date": "2023-09-20",
            "time": "08:00",
            "department": "d1",
            "doctor": "doc1",
            "appointmentType": "Vaccination",
            "notes": "",
            "status": "scheduled",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": appointment_json("a9")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = AppointmentDraft {
        name: "Flu shot".into(),
        tags: "".into(),
        patient: "p1".into(),
        date: chrono::NaiveDate::from_ymd_opt(2023, 9, 20).unwrap(),
        time: chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        department: "d1".into(),
        doctor: "doc1".into(),
        appointment_type: AppointmentType::Vaccination,
        notes: "".into(),
        status: AppointmentStatus::Scheduled,
    };
    let created = client(&server).create(&draft).await.unwrap();
    assert_eq!(created.id, "a9");
}

#[tokio::test]
async fn unauthorized_and_missing_records_map_to_typed_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tables/appointment/a1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tables/appointment/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(matches!(
        client.get("a1").await,
        Err(StoreError::Unauthorized)
    ));
    assert!(matches!(
        client.get("missing").await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn server_error_envelope_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tables/appointment/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": "INTERNAL", "message": "storage unavailable"}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .list(&FilterSpec::new())
        .await
        .expect_err("500 must surface as an error");
    match err {
        StoreError::Api { code, message } => {
            assert_eq!(code, "INTERNAL");
            assert_eq!(message, "storage unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_returns_the_server_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tables/appointment/a1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).delete("a1").await.unwrap());
}
