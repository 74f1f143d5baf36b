mod helpers;

use axum::http::StatusCode;
use helpers::{mesh_form, setup_test_app, setup_test_app_with, FakeOutcome};
use serde_json::Value;

const TWO_HOUR_GCODE: &str = "G28\n; estimated printing time (normal mode) = 2h 0m 0s\nM84\n";

#[tokio::test]
async fn test_quote_prices_sliced_mesh() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let form = mesh_form("cube.stl", b"solid cube\nendsolid cube\n")
        .add_text("material", "PLA")
        .add_text("color", "화이트");
    let response = app.server.post("/api/v0/quotes").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["printTime"], "2h 0m 0s");
    assert_eq!(body["estimatedPrice"], 36000);
    assert_eq!(body["originalName"], "cube.stl");
    assert_eq!(body["calculation"]["printHours"], "2.00");
    assert_eq!(body["calculation"]["material"], "PLA");
    assert_eq!(body["calculation"]["color"], "화이트");
}

#[tokio::test]
async fn test_uploaded_mesh_is_staged_then_deleted() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app
        .server
        .post("/api/v0/quotes")
        .multipart(mesh_form("bracket.STL", b"solid b\nendsolid b\n"))
        .await;
    response.assert_status_ok();

    let seen = app.slicer.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    let (path, existed) = &seen[0];
    assert!(existed, "mesh should exist while slicing");
    assert_eq!(path.extension().unwrap(), "stl");
    assert_eq!(app.uploads_left(), 0);
}

#[tokio::test]
async fn test_legacy_path_and_defaults() {
    let app = setup_test_app(FakeOutcome::Gcode("; TIME:5400\n"));

    let response = app
        .server
        .post("/api/calculate-price")
        .multipart(mesh_form("part.obj", b"v 0 0 0\n"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["printTime"], "1h 30m 0s");
    assert_eq!(body["calculation"]["material"], "PLA");
    assert_eq!(body["calculation"]["color"], "화이트");
    // 1.5h * 8000 + 0 + 20000
    assert_eq!(body["estimatedPrice"], 32000);
}

#[tokio::test]
async fn test_unknown_material_uses_default_rate() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let form = mesh_form("cube.stl", b"solid\n")
        .add_text("material", "NYLON")
        .add_text("color", "투명");
    let response = app.server.post("/api/v0/quotes").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["estimatedPrice"], 2 * 10000 + 3000 + 20000);
}

#[tokio::test]
async fn test_rejects_unsupported_extension() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app
        .server
        .post("/api/v0/quotes")
        .multipart(mesh_form("photo.png", b"\x89PNG"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.slicer.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejects_empty_file_and_missing_file() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app
        .server
        .post("/api/v0/quotes")
        .multipart(mesh_form("cube.stl", b""))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let form = axum_test::multipart::MultipartForm::new().add_text("material", "PLA");
    let response = app.server.post("/api/v0/quotes").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_missing_duration_is_unprocessable() {
    let app = setup_test_app(FakeOutcome::Gcode("G28\nG1 X10 Y10\n"));

    let response = app
        .server
        .post("/api/v0/quotes")
        .multipart(mesh_form("cube.stl", b"solid\n"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "DURATION_UNAVAILABLE");
    assert_eq!(app.uploads_left(), 0);
}

#[tokio::test]
async fn test_missing_duration_with_fallback_hours() {
    let app = setup_test_app_with(
        FakeOutcome::Gcode("G28\n"),
        &[("FALLBACK_PRINT_HOURS", "1")],
    );

    let response = app
        .server
        .post("/api/v0/quotes")
        .multipart(mesh_form("cube.stl", b"solid\n"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["printTime"], "unknown");
    assert_eq!(body["estimatedPrice"], 8000 + 20000);
}

#[tokio::test]
async fn test_slicer_failure_is_server_error_with_details() {
    let app = setup_test_app(FakeOutcome::Fail("Object has no volume"));

    let response = app
        .server
        .post("/api/v0/quotes")
        .multipart(mesh_form("broken.stl", b"solid\n"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "SLICE_EXECUTION_FAILED");
    assert_eq!(body["error"], "Failed to slice the model");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("Object has no volume"));
    assert_eq!(app.uploads_left(), 0);
}

#[tokio::test]
async fn test_pricing_table() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app.server.get("/api/v0/pricing").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["defaultMaterialRate"], 10000);
    assert_eq!(body["baseMaterialCost"], 20000);
    assert_eq!(body["materials"][0]["id"], "PLA");
    assert_eq!(body["materials"][0]["amount"], 8000);
    assert_eq!(body["colors"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_health_reports_missing_engine() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app.server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["slicer"]["available"], false);

    app.server.get("/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app.server.get("/live").await;
    let request_id = response.header("x-request-id");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app(FakeOutcome::Gcode(TWO_HOUR_GCODE));

    let response = app.server.get("/api/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/v0/quotes"]["post"].is_object());
}
