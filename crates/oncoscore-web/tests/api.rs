//! End-to-end tests over the full router with fixture artifacts.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use oncoscore_config::{ArtifactConfig, ModuleId};
use oncoscore_test_utils as fixtures;
use oncoscore_web::artifacts::ArtifactBundle;
use oncoscore_web::router::build_router;
use oncoscore_web::state::AppState;

fn tabular_app() -> (Router, TempDir) {
    let tmp = fixtures::tabular_artifact_dir();
    let config = ArtifactConfig {
        dir: tmp.path().to_path_buf(),
        modules: vec![ModuleId::Endometrial, ModuleId::Molecular, ModuleId::Cervical],
    };
    let bundle = ArtifactBundle::load(&config).expect("fixture artifacts must load");
    let state = Arc::new(AppState::new(bundle, 2));
    (build_router(state), tmp)
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ready_modules() {
    let (app, _tmp) = tabular_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], json!(true));
    assert_eq!(body["modules"]["endometrial"], json!(true));
    assert!(body["modules"].get("cytology").is_none());
}

#[tokio::test]
async fn high_risk_endometrial_scenario() {
    let (app, _tmp) = tabular_app();
    let (status, body) =
        post_json(&app, "/predict/endometrial", &fixtures::high_risk_endometrial_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_tier"], json!("High"));
    assert_eq!(body["prediction"], json!(1));
    assert_eq!(body["threshold_used"]["low_upper"], json!(0.56));
    assert_eq!(body["threshold_used"]["high_lower"], json!(0.65));
    assert_eq!(body["attribution_method"], json!("exact"));

    let probability = body["probability"].as_f64().unwrap();
    assert!(probability >= 0.65, "expected High-band probability, got {probability}");

    // top attribution is the 18.5 mm endometrial stripe
    let shap = body["shap_explanation"].as_array().unwrap();
    assert_eq!(shap.len(), 5);
    assert_eq!(shap[0]["feature"], json!("ThickEndometrium"));
    assert_eq!(shap[0]["direction"], json!("increases risk"));

    // thickness-threshold and CA-125 actions both fire
    let recs = body["clinical_recommendations"].as_array().unwrap();
    assert!(recs.iter().any(|r| r.as_str().unwrap().contains("endometrial biopsy")));
    assert!(recs.iter().any(|r| r.as_str().unwrap().contains("CA-125")));

    // exactly one disclaimer string
    assert!(body["disclaimer"].is_string());
}

#[tokio::test]
async fn unknown_category_is_client_error_naming_field() {
    let (app, _tmp) = tabular_app();
    let mut request = fixtures::high_risk_endometrial_request();
    request["MenopauseStatus"] = json!("Post");
    let (status, body) = post_json(&app, "/predict/endometrial", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("MenopauseStatus"));
    assert!(message.contains("Post"));
}

#[tokio::test]
async fn missing_required_field_is_client_error() {
    let (app, _tmp) = tabular_app();
    let mut request = fixtures::high_risk_endometrial_request();
    request.as_object_mut().unwrap().remove("CA125_Level");
    let (status, body) = post_json(&app, "/predict/endometrial", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("CA125_Level"));
}

#[tokio::test]
async fn malformed_json_body_keeps_error_shape() {
    let (app, _tmp) = tabular_app();
    let response = app
        .clone()
        .oneshot(
            Request::post("/predict/endometrial")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("invalid JSON"));
}

#[tokio::test]
async fn identical_concurrent_requests_return_identical_bodies() {
    let (app, _tmp) = tabular_app();
    let request = fixtures::high_risk_endometrial_request();
    let body_bytes = serde_json::to_vec(&request).unwrap();

    let send = |app: Router, bytes: Vec<u8>| async move {
        let response = app
            .oneshot(
                Request::post("/predict/endometrial")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(bytes))
                    .unwrap(),
            )
            .await
            .unwrap();
        response.into_body().collect().await.unwrap().to_bytes()
    };

    let (first, second) = tokio::join!(
        send(app.clone(), body_bytes.clone()),
        send(app.clone(), body_bytes.clone())
    );
    assert_eq!(first, second, "concurrent identical requests must be byte-identical");
}

#[tokio::test]
async fn molecular_dual_task_response() {
    let (app, _tmp) = tabular_app();
    let (status, body) =
        post_json(&app, "/predict/endometrial-molecular", &fixtures::molecular_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtype"]["prediction"], json!("MSI Hypermutated"));
    let probs = body["subtype"]["probabilities"].as_object().unwrap();
    assert_eq!(probs.len(), 4);
    let total: f64 = probs.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-6);

    assert_eq!(body["survival"]["prediction"], json!("DECEASED"));
    assert_eq!(body["survival"]["risk_tier"], json!("High"));
    assert_eq!(body["attribution_method"], json!("exact"));
    assert!(body["disclaimer"].as_str().unwrap().contains("TCGA"));
}

#[tokio::test]
async fn cervical_all_optional_fields_imputed() {
    let (app, _tmp) = tabular_app();
    // every cervical field is optional; an empty object scores at the
    // cohort medians
    let (status, body) = post_json(&app, "/predict/cervical", &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["cancer_probability"].is_number());
    assert_eq!(body["thresholds"]["T1"], json!(0.35));
    assert_eq!(body["thresholds"]["T2"], json!(0.65));
    assert!(body["risk_label"].as_str().unwrap().ends_with("Risk"));
    assert!(body["cds_guidance"]["actions"].as_array().unwrap().len() >= 2);
    assert_eq!(body["attribution_method"], json!("exact"));
}

#[tokio::test]
async fn importances_only_artifact_degrades_to_approximate() {
    let tmp = TempDir::new().unwrap();
    fixtures::write_cervical_artifacts(&tmp.path().join("cervical"), false);
    let config = ArtifactConfig {
        dir: tmp.path().to_path_buf(),
        modules: vec![ModuleId::Cervical],
    };
    let bundle = ArtifactBundle::load(&config).unwrap();
    let app = build_router(Arc::new(AppState::new(bundle, 2)));

    let (status, body) = post_json(&app, "/predict/cervical", &json!({"Age": 40})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attribution_method"], json!("approximate"));
    assert!(!body["shap_explanation"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn disabled_module_answers_service_unavailable() {
    let (app, _tmp) = tabular_app();
    let boundary = "XTESTBOUNDARY";
    let mut payload = Vec::new();
    payload.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"smear.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    payload.extend_from_slice(&[0x89, 0x50, 0x4e, 0x47]);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .clone()
        .oneshot(
            Request::post("/predict/cytology")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn cytology_upload_without_file_field_is_client_error() {
    let (app, _tmp) = tabular_app();
    let boundary = "XTESTBOUNDARY";
    let payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );

    let response = app
        .clone()
        .oneshot(
            Request::post("/predict/cytology")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn model_info_endpoints() {
    let (app, _tmp) = tabular_app();

    let (status, body) = get(&app, "/api/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models"].as_array().unwrap().len(), 3);

    let (status, body) = get(&app, "/api/models/endometrial").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"].as_array().unwrap().len(), 18);
    assert_eq!(body["thresholds"]["low_upper"], json!(0.56));

    let (status, body) = get(&app, "/api/models/molecular").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtypes"].as_array().unwrap().len(), 4);

    let (status, _body) = get(&app, "/api/models/prostate").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
