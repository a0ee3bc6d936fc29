//! HTTP boundary for the setup status document.
//!
//! One resource, three verbs: GET returns the current document, POST merges
//! a partial update, DELETE resets to the initial state. A malformed POST
//! body is rejected by the extractor before any mutation happens.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use colored::Colorize;
use onboard_core::status::{SetupStatus, StatusUpdate};
use onboard_core::{DataDir, Result, StatusStore};
use tracing::{error, info};

pub fn router(store: StatusStore) -> Router {
	Router::new()
		.route("/api/setup", get(get_status).post(post_update).delete(delete_status))
		.with_state(Arc::new(store))
}

async fn get_status(State(store): State<Arc<StatusStore>>) -> Json<SetupStatus> {
	Json(store.read())
}

async fn post_update(
	State(store): State<Arc<StatusStore>>,
	Json(update): Json<StatusUpdate>,
) -> std::result::Result<Json<SetupStatus>, (StatusCode, String)> {
	store.write(update).map(Json).map_err(internal_error)
}

async fn delete_status(
	State(store): State<Arc<StatusStore>>,
) -> std::result::Result<Json<SetupStatus>, (StatusCode, String)> {
	store.reset().map(Json).map_err(internal_error)
}

fn internal_error(err: onboard_core::SetupError) -> (StatusCode, String) {
	error!(target = "onboard", error = %err, "status document write failed");
	(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub async fn serve(data: &DataDir, port: u16) -> Result<()> {
	let store = StatusStore::open(data);
	let app = router(store);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
	info!(target = "onboard", port, "setup endpoint listening");
	println!("{} Setup endpoint on http://127.0.0.1:{port}/api/setup", "→".cyan());

	axum::serve(listener, app).await?;
	Ok(())
}
