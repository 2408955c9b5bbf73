//! `depotctl` is a content-addressed incremental update engine: server-side
//! release packaging and versioning, and a client-side apply engine that
//! reconciles a local installation directory with a server-declared target
//! version.
//!
//! Five components, leaves first: the [`blob`] store (content-addressed file
//! storage), the [`registry`] (per-application sequence of immutable
//! versions), [`packaging`] (ingests a release archive into the other two),
//! [`plan`] (diffs a client's manifest against the active version), and
//! [`client`] (the apply engine that fetches a plan and reconciles a
//! directory tree against it, atomically and with rollback). [`wire`] holds
//! the JSON shapes shared between [`server`] and [`client`]; [`server`]
//! exposes the first four components over HTTP.



//		Global configuration

#![cfg_attr(feature = "reasons", feature(lint_reasons))]

//	Customisations of the standard linting configuration
#![cfg_attr(    feature = "reasons",  allow(clippy::multiple_crate_versions, reason = "Cannot resolve all these"))]
#![cfg_attr(not(feature = "reasons"), allow(clippy::multiple_crate_versions))]



//		Modules

pub mod hash;
pub mod blob;
pub mod registry;
pub mod packaging;
pub mod plan;
pub mod wire;
pub mod server;
pub mod client;



//		Packages

#[cfg(test)]
mod integration_test_package_usage {
	use assert_json_diff as _;
	use bytes as _;
	use claims as _;
	use tower_http as _;
	use tracing_subscriber as _;
	use velcro as _;
	use wiremock as _;
}
