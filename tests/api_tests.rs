use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use faker_file_api::config::Settings;
use faker_file_api::error::ErrorBody;
use faker_file_api::registry::ProviderRegistry;
use faker_file_api::routes::create_router;
use faker_file_api::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(Settings::default()))
}

async fn post_json(app: Router, uri: &str, body: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn error_body(response: Response) -> ErrorBody {
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn filename(response: &Response) -> String {
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    disposition
        .strip_prefix("inline; filename=")
        .unwrap_or_else(|| panic!("unexpected disposition: {}", disposition))
        .to_string()
}

#[tokio::test]
async fn test_heartbeat() {
    let response = get(app(), "/heartbeat/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, serde_json::json!({"message": "Heartbeat"}));
}

#[tokio::test]
async fn test_providers_lists_every_route() {
    let response = get(app(), "/providers/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let listing = body.as_object().unwrap();
    let registry = ProviderRegistry::new();
    assert_eq!(listing.len(), registry.len());
    for entry in registry.entries() {
        assert_eq!(listing[&entry.path()], entry.summary, "{}", entry.name);
    }
}

#[tokio::test]
async fn test_every_provider_accepts_empty_request() {
    for entry in ProviderRegistry::new().entries() {
        let response = post_json(app(), &entry.path(), "{}").await;
        assert_eq!(response.status(), StatusCode::OK, "{}", entry.name);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream",
            "{}",
            entry.name
        );

        let name = filename(&response);
        assert!(name.contains('.'), "{}: {}", entry.name, name);
        assert!(!body_bytes(response).await.is_empty(), "{}", entry.name);
    }
}

#[tokio::test]
async fn test_png_file_decodes() {
    let response = post_json(app(), "/png_file/", r#"{"max_nb_chars": 300}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(filename(&response).ends_with(".png"));

    let bytes = body_bytes(response).await;
    let image = image::load_from_memory(&bytes).unwrap();
    assert!(image.width() > 0);
}

#[tokio::test]
async fn test_basename_controls_filename() {
    let response = post_json(app(), "/txt_file/", r#"{"basename": "notes", "max_nb_chars": 50}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(filename(&response), "notes.txt");
}

#[tokio::test]
async fn test_prefix_controls_filename() {
    let response = post_json(app(), "/csv_file/", r#"{"prefix": "export_", "num_rows": 2}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    let name = filename(&response);
    assert!(name.starts_with("export_"), "{}", name);
    assert!(name.ends_with(".csv"), "{}", name);
}

#[tokio::test]
async fn test_content_template_is_rendered() {
    let response = post_json(app(), "/txt_file/", r#"{"content": "Dear {{first_name}},"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.starts_with("Dear "));
    assert!(!text.contains("{{"));
}

#[tokio::test]
async fn test_invalid_selector_is_unprocessable() {
    let cases = [
        ("/png_file/", r#"{"image_generator": "wkhtmltopdf"}"#),
        ("/pdf_file/", r#"{"pdf_generator": "pdfkit"}"#),
        ("/mp3_file/", r#"{"mp3_generator": "gtts"}"#),
    ];
    for (uri, body) in cases {
        let error = error_body(post_json(app(), uri, body).await).await;
        assert_eq!(error.body, "JsonDataError", "{}", uri);
        assert!(!error.detail.is_empty());
    }
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let error = error_body(post_json(app(), "/txt_file/", "{not json").await).await;
    assert_eq!(error.body, "JsonSyntaxError");
}

#[tokio::test]
async fn test_missing_content_type_is_unprocessable() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/txt_file/")
                .method("POST")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    let error = error_body(response).await;
    assert_eq!(error.body, "MissingJsonContentType");
}

#[tokio::test]
async fn test_out_of_range_values_are_unprocessable() {
    let cases = [
        ("/txt_file/", r#"{"max_nb_chars": 0}"#),
        ("/csv_file/", r#"{"num_rows": 0}"#),
        ("/bin_file/", r#"{"length": 0}"#),
        ("/graphic_png_file/", r#"{"size": [0, 10]}"#),
        ("/graphic_ico_file/", r#"{"size": [512, 512]}"#),
        ("/zip_file/", r#"{"options": {"count": 1000}}"#),
        ("/generic_file/", r#"{"extension": "tar.gz"}"#),
        ("/txt_file/", r#"{"basename": "../etc/passwd"}"#),
    ];
    for (uri, body) in cases {
        let error = error_body(post_json(app(), uri, body).await).await;
        assert_eq!(error.body, "ValidationError", "{} {}", uri, body);
    }
}

#[tokio::test]
async fn test_unknown_template_token_is_unprocessable() {
    let error = error_body(post_json(app(), "/txt_file/", r#"{"content": "{{unicorn}}"}"#).await).await;
    assert_eq!(error.body, "TemplateError");
    assert!(error.detail.contains("unicorn"));
}

#[tokio::test]
async fn test_oversized_output_is_unprocessable() {
    let template = "{{paragraph}}".repeat(20);
    let columns: serde_json::Map<String, Value> = (0..10)
        .map(|i| (format!("col{}", i), Value::from(template.clone())))
        .collect();
    let request = serde_json::json!({"data_columns": columns, "num_rows": 10000});
    let error = error_body(post_json(app(), "/csv_file/", &request.to_string()).await).await;
    assert_eq!(error.body, "ValidationError");
    assert!(error.detail.contains("exceeds the limit"));

    let request = serde_json::json!({"content": "{{text}}".repeat(60_000)});
    let error = error_body(post_json(app(), "/txt_file/", &request.to_string()).await).await;
    assert_eq!(error.body, "ValidationError");
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let padding = "x".repeat(2 * 1024 * 1024);
    let body = format!(r#"{{"content": "{}"}}"#, padding);

    // Without Content-Length the limit is hit while buffering the body.
    let response = post_json(app(), "/txt_file/", &body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error.body, "PayloadTooLarge");

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/txt_file/")
                .method("POST")
                .header("content-type", "application/json")
                .header("content-length", body.len())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_long_subject_is_unprocessable() {
    let request = serde_json::json!({"subject": "s".repeat(1000)});
    let error = error_body(post_json(app(), "/eml_file/", &request.to_string()).await).await;
    assert_eq!(error.body, "ValidationError");
}

#[tokio::test]
async fn test_metrics_count_generated_files() {
    let state = AppState::new(Settings::default());
    let app = create_router(state.clone());

    let ok = post_json(app.clone(), "/txt_file/", r#"{"max_nb_chars": 20}"#).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let bytes = body_bytes(ok).await.len() as u64;
    let failed = post_json(app.clone(), "/txt_file/", r#"{"max_nb_chars": 0}"#).await;
    assert_eq!(failed.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = get(app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let metrics: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(metrics["total_requests"], 2);
    assert_eq!(metrics["successful_requests"], 1);
    assert_eq!(metrics["failed_requests"], 1);
    assert_eq!(metrics["files_generated"], 1);
    assert_eq!(metrics["bytes_generated"], bytes);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let response = get(app(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/txt_file/"));
    assert!(paths.contains_key("/heartbeat/"));
    assert_eq!(doc["paths"]["/mp3_file/"]["post"]["tags"][0], "Audio");
}

#[tokio::test]
async fn test_cors_exposes_content_disposition() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/txt_file/")
                .method("POST")
                .header("origin", "http://example.com")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"max_nb_chars": 20}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let exposed = response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-disposition"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = post_json(app(), "/gif_file/", "{}").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
