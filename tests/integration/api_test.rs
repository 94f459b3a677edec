// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{harness, supervisor, technician};
use axum::Extension;
use axum_test::TestServer;
use dispatchrs::domain::models::incident::SupportTier;
use dispatchrs::domain::models::technician::Specialty;
use dispatchrs::domain::repositories::technician_directory::TechnicianDirectory;
use dispatchrs::presentation::routes;
use serde_json::json;

async fn server() -> TestServer {
    let h = harness();
    h.directory
        .upsert(&technician(1, SupportTier::L1Technician, Specialty::Software, 0, 4))
        .await
        .unwrap();
    h.directory
        .upsert(&technician(2, SupportTier::L2Expert, Specialty::Software, 0, 8))
        .await
        .unwrap();
    h.directory.upsert(&supervisor(10)).await.unwrap();

    let app = routes::routes().layer(Extension(h.use_case.clone()));
    TestServer::new(app).expect("test server must start")
}

#[tokio::test]
async fn test_health_and_version_endpoints() {
    let server = server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");

    let response = server.get("/v1/version").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_ticket_intake_and_escalation_over_http() {
    let server = server().await;

    let response = server
        .post("/v1/tickets")
        .json(&json!({
            "reported_by": 500,
            "category": "software",
            "priority": "high",
            "impact": "medium",
            "urgency": "medium"
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ticket"]["ticket_number"], "INC-000001");
    assert_eq!(body["data"]["assignment"]["assigned"], true);
    let ticket_id = body["data"]["ticket"]["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/v1/tickets/{}/escalate", ticket_id))
        .json(&json!({
            "reason": "needs expert review",
            "requested_by": 10
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tier"], "l2_expert");

    let response = server
        .get(&format!("/v1/tickets/{}/escalations", ticket_id))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failures_are_reported_through_the_envelope() {
    let server = server().await;

    let response = server.get("/v1/tickets/999").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert!(body["message"].as_str().unwrap().contains("999"));

    // A plain technician cannot escalate
    let open = server
        .post("/v1/tickets")
        .json(&json!({
            "reported_by": 500,
            "category": "software"
        }))
        .await;
    let ticket_id = open.json::<serde_json::Value>()["data"]["ticket"]["id"]
        .as_i64()
        .unwrap();

    let response = server
        .post(&format!("/v1/tickets/{}/escalate", ticket_id))
        .json(&json!({
            "reason": "please",
            "requested_by": 1
        }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}
