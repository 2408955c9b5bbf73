//! Common shared server functionality for integration tests.

//		Packages

use axum::{
	Extension,
	Router,
	routing::{get, post},
};
use core::{net::SocketAddr, time::Duration};
use depotctl::server::{Axum, Config as ServerConfig, Core};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower_http::{
	LatencyUnit,
	trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;



//		Functions

//		api_routes
/// The HTTP surface described in spec.md §6, wired onto an Axum [`Router`].
pub fn api_routes() -> Router {
	Router::new()
		.route("/apps/",                            get(Axum::list_apps))
		.route("/apps/{app_id}/",                    get(Axum::get_app))
		.route("/apps/{app_id}/check-update/",        get(Axum::check_update))
		.route("/apps/{app_id}/upload-zip/",          post(Axum::upload_zip))
		.route("/apps/{app_id}/upload-file/",         post(Axum::upload_file))
		.route("/apps/{app_id}/create-version/",      post(Axum::create_version))
		.route("/blobs/{hash}",                       get(Axum::get_blob))
		.route("/check-files/",                       post(Axum::check_files))
}

//		spawn_server
/// Spawns a real server bound to an ephemeral port, returning the address
/// clients should talk to and the [`Core`] backing it (so tests can seed
/// applications/versions directly without going through HTTP), plus the
/// [`TempDir`] holding its blob store (kept alive for the test's duration).
pub async fn spawn_server() -> (SocketAddr, Arc<Core>, TempDir) {
	let blob_dir = tempfile::tempdir().unwrap();
	let core     = Arc::new(Core::new(ServerConfig { blob_store_dir: blob_dir.path().to_path_buf() }).await.unwrap());

	let app = api_routes()
		.layer(Extension(Arc::clone(&core)))
		.layer(TraceLayer::new_for_http()
			.on_request(DefaultOnRequest::new().level(Level::INFO))
			.on_response(DefaultOnResponse::new().level(Level::INFO).latency_unit(LatencyUnit::Micros))
		)
	;
	let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
	let address  = listener.local_addr().unwrap();
	drop(tokio::spawn(async move { axum::serve(listener, app).await.unwrap() }));
	// give the listener a moment to start accepting, matching the teacher's
	// pattern of spawning the server task and returning its bound address.
	tokio::time::sleep(Duration::from_millis(10)).await;
	(address, core, blob_dir)
}
