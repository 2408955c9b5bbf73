//! An example of a simple Axum server that serves a depotctl API.

#![allow(unused_crate_dependencies, reason = "Creates a lot of noise")]

//	Lints specifically disabled for examples
#![allow(
	non_snake_case,
	unreachable_pub,
	clippy::arithmetic_side_effects,
	clippy::cast_lossless,
	clippy::cast_precision_loss,
	clippy::cognitive_complexity,
	clippy::default_numeric_fallback,
	clippy::exhaustive_enums,
	clippy::exhaustive_structs,
	clippy::expect_used,
	clippy::indexing_slicing,
	clippy::let_underscore_must_use,
	clippy::let_underscore_untyped,
	clippy::missing_assert_message,
	clippy::missing_panics_doc,
	clippy::mod_module_files,
	clippy::must_use_candidate,
	clippy::panic,
	clippy::print_stdout,
	clippy::tests_outside_test_module,
	clippy::too_many_lines,
	clippy::unwrap_in_result,
	clippy::unwrap_used,
	reason = "Not useful in examples"
)]



//		Packages

use axum::{
	Extension,
	Router,
	routing::{get, post},
};
use core::net::{IpAddr, SocketAddr};
use depotctl::server::{Axum as ApiHandlers, Config as ServerConfig, Core};
use figment::{
	Figment,
	providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower_http::{
	LatencyUnit,
	trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt::layer, layer::SubscriberExt as _, registry, util::SubscriberInitExt as _};



//		Structs

//		Config
/// The main configuration options for the application.
#[derive(Debug, Deserialize, Serialize, SmartDefault)]
pub struct Config {
	//		Public properties
	/// The name of the application.
	#[default = "example"]
	pub appname:        String,

	/// The host to listen on.
	#[default(IpAddr::from([127, 0, 0, 1]))]
	pub host:           IpAddr,

	/// The port to listen on.
	#[default = 8000]
	pub port:           u16,

	/// The directory to store blobs in.
	#[default = "blobs"]
	pub blob_store_dir: String,
}



//		Functions

//		api_routes
/// The full HTTP surface, wired onto a fresh [`Router`].
fn api_routes() -> Router {
	Router::new()
		.route("/apps/",                      get(ApiHandlers::list_apps))
		.route("/apps/{app_id}/",             get(ApiHandlers::get_app))
		.route("/apps/{app_id}/check-update/", get(ApiHandlers::check_update))
		.route("/apps/{app_id}/upload-zip/",   post(ApiHandlers::upload_zip))
		.route("/apps/{app_id}/upload-file/",  post(ApiHandlers::upload_file))
		.route("/apps/{app_id}/create-version/", post(ApiHandlers::create_version))
		.route("/blobs/{hash}",               get(ApiHandlers::get_blob))
		.route("/check-files/",               post(ApiHandlers::check_files))
}

//		main
#[tokio::main]
async fn main() {
	registry()
		.with(EnvFilter::new("info"))
		.with(layer().with_target(false))
		.init()
	;
	let config: Config = Figment::from(Serialized::defaults(Config::default()))
		.merge(Toml::file("axum-server.toml"))
		.merge(Env::raw())
		.extract()
		.expect("Error loading config")
	;
	let core = Arc::new(
		Core::new(ServerConfig { blob_store_dir: PathBuf::from(&config.blob_store_dir) })
			.await
			.expect("Error opening blob store")
	);
	let app = api_routes()
		.layer(Extension(Arc::clone(&core)))
		.layer(TraceLayer::new_for_http()
			.on_request(DefaultOnRequest::new().level(Level::INFO))
			.on_response(DefaultOnResponse::new().level(Level::INFO).latency_unit(LatencyUnit::Millis))
		)
	;
	let address  = SocketAddr::from((config.host, config.port));
	let listener = TcpListener::bind(address).await.expect("Error binding listener");
	info!("{} listening on {address}", config.appname);
	let serve = tokio::spawn(async move { axum::serve(listener, app).await.expect("Error running server") });
	signal::ctrl_c().await.unwrap();
	serve.abort();
	println!("Shutting down");
}
