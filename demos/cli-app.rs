//! An example of a simple CLI application that keeps itself updated against a
//! depotctl server.

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

use core::time::Duration;
use depotctl::client::{ApplyState, Client, Config as ClientConfig};
use figment::{
	Figment,
	providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{io::stdout, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{
	EnvFilter,
	fmt::{format::FmtSpan, layer, writer::MakeWriterExt as _},
	layer::SubscriberExt as _,
	registry,
	util::SubscriberInitExt as _,
};



//		Structs

//		Config
/// The main configuration options for the application.
#[derive(Debug, Deserialize, Serialize, SmartDefault)]
pub struct Config {
	//		Public properties
	/// The name of the application.
	#[default = "example"]
	pub appname:         String,

	/// The directory this installation lives in and should be kept in sync.
	#[default = "."]
	pub local_dir:       String,

	/// The full location of the depotctl API server, including FQDN and base
	/// path.
	#[default = "http://127.0.0.1:8000/"]
	pub api_server:      String,

	/// This application's id, as registered with the server.
	pub app_id:          uuid::Uuid,

	/// The interpreter used to launch `.py` entry points.
	#[default = "python3"]
	pub script_runtime:  String,

	/// Whether to check for updates on startup.
	pub update_on_startup: bool,

	/// The interval at which to check for updates, in seconds. If not
	/// provided, this will be disabled and only the startup check (if
	/// enabled) will run.
	pub update_interval: Option<u64>,
}



//		Functions

//		main
#[tokio::main]
async fn main() {
	registry()
		.with(EnvFilter::new("info,reqwest=debug"))
		.with(
			layer()
				.with_writer(stdout.with_max_level(Level::INFO))
				.with_span_events(FmtSpan::NONE)
				.with_target(false)
		)
		.init()
	;
	let config: Config = Figment::from(Serialized::defaults(Config::default()))
		.merge(Toml::file("cli-app.toml"))
		.merge(Env::raw())
		.extract()
		.expect("Error loading config")
	;
	let client = Client::new(ClientConfig {
		local_dir:       PathBuf::from(&config.local_dir),
		api:             config.api_server.parse().expect("Invalid API server URL"),
		app_id:          config.app_id,
		request_timeout: Duration::from_secs(30),
		max_retries:     5,
		retry_base:      Duration::from_millis(500),
		retry_cap:       Duration::from_secs(30),
		script_runtime:  PathBuf::from(&config.script_runtime),
	});
	info!("{} started", config.appname);

	if config.update_on_startup {
		check_and_apply(&client).await;
	}

	match config.update_interval.map(Duration::from_secs) {
		Some(period) => loop {
			tokio::select! {
				()  = tokio::time::sleep(period) => check_and_apply(&client).await,
				res = signal::ctrl_c()           => { res.unwrap(); break; },
			}
		},
		None => signal::ctrl_c().await.unwrap(),
	}
	info!("{} stopped", config.appname);
}

//		check_and_apply
/// Checks for an update and applies it if one is available, logging the
/// outcome either way.
async fn check_and_apply(client: &Client) {
	let cancel = CancellationToken::new();
	match client.apply(&|path, downloaded, total| info!(path, downloaded, total, "downloading"), &cancel).await {
		Ok(ApplyState::Idle)      => info!("already up to date"),
		Ok(state)                 => info!(?state, "update applied"),
		Err(err)                  => warn!(error = %err, "update check failed"),
	}
}
