//! End-to-end behavior of the `/api/setup` resource against a real
//! file-backed store.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use onboard_cli::server::router;
use onboard_core::StatusStore;
use onboard_core::status::SetupStatus;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(tmp: &TempDir) -> Router {
	router(StatusStore::new(tmp.path().join("setup-status.json")))
}

async fn body_status(response: axum::response::Response) -> SetupStatus {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("body should be readable");
	serde_json::from_slice(&bytes).expect("body should be a status document")
}

fn json_request(method: &str, body: &str) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri("/api/setup")
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.expect("request should build")
}

#[tokio::test]
async fn get_before_any_write_returns_defaults() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let response = app(&tmp)
		.oneshot(Request::builder().uri("/api/setup").body(Body::empty()).expect("request should build"))
		.await
		.expect("request should succeed");

	assert_eq!(response.status(), StatusCode::OK);
	let status = body_status(response).await;
	assert_eq!(status, SetupStatus::default());
}

#[tokio::test]
async fn post_merges_and_appends_logs_across_requests() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let app = app(&tmp);

	let response = app
		.clone()
		.oneshot(json_request("POST", r#"{"step":1,"progress":25,"log":"→ started"}"#))
		.await
		.expect("request should succeed");
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.clone()
		.oneshot(json_request("POST", r#"{"progress":50,"log":"→ browser launched"}"#))
		.await
		.expect("request should succeed");
	assert_eq!(response.status(), StatusCode::OK);

	let status = body_status(response).await;
	assert_eq!(status.step, 1);
	assert_eq!(status.progress, 50);
	assert_eq!(status.logs, vec!["→ started", "→ browser launched"]);
}

#[tokio::test]
async fn malformed_post_is_client_error_without_mutation() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let app = app(&tmp);

	app.clone()
		.oneshot(json_request("POST", r#"{"log":"first"}"#))
		.await
		.expect("request should succeed");

	let response = app
		.clone()
		.oneshot(json_request("POST", "{not json"))
		.await
		.expect("request should succeed");
	assert!(response.status().is_client_error(), "got {}", response.status());

	let response = app
		.oneshot(Request::builder().uri("/api/setup").body(Body::empty()).expect("request should build"))
		.await
		.expect("request should succeed");
	let status = body_status(response).await;
	assert_eq!(status.logs, vec!["first"]);
}

#[tokio::test]
async fn null_error_field_clears_stored_error() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let app = app(&tmp);

	app.clone()
		.oneshot(json_request("POST", r#"{"error":"Login timeout"}"#))
		.await
		.expect("request should succeed");

	let response = app
		.oneshot(json_request("POST", r#"{"error":null}"#))
		.await
		.expect("request should succeed");
	let status = body_status(response).await;
	assert_eq!(status.error, None);
}

#[tokio::test]
async fn delete_resets_to_defaults() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let app = app(&tmp);

	app.clone()
		.oneshot(json_request("POST", r#"{"step":4,"complete":true,"log":"done"}"#))
		.await
		.expect("request should succeed");

	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("DELETE")
				.uri("/api/setup")
				.body(Body::empty())
				.expect("request should build"),
		)
		.await
		.expect("request should succeed");
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.oneshot(Request::builder().uri("/api/setup").body(Body::empty()).expect("request should build"))
		.await
		.expect("request should succeed");
	assert_eq!(body_status(response).await, SetupStatus::default());
}
