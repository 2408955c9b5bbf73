//! This module provides server-side functionality for the update engine's
//! HTTP surface (§6).
//!
//! The primary functionality is provided by the [`Core`] struct, which wires
//! together the blob store (C1), the version registry (C2), the packaging
//! service (C3), and the plan service (C4), and can be driven directly from
//! test code or from endpoint handlers. The [`Axum`] struct holds ready-made
//! handlers for the [Axum](https://crates.io/crates/axum) web framework that
//! call through to [`Core`].

//		Modules

#[cfg(test)]
#[path = "tests/server.rs"]
mod tests;



//		Packages

use crate::{
	blob::{BlobError, BlobStore},
	hash::BlobHash,
	packaging::{self, PackagingError},
	plan::{self, PlanError},
	registry::{AppId, Manifest, Registry, RegistryError, Version},
	wire::{
		AppRecord,
		CheckFilesRequest,
		CheckFilesResponse,
		CreateVersionRequest,
		ErrorResponse,
		UpdateInfo,
		UploadFileResponse,
		UploadZipResponse,
	},
};
use axum::{
	Extension,
	Json,
	body::Body,
	extract::{Multipart, Path, Query},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use chrono::Utc;
use core::fmt::Display;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};



//		Structs

//		Config
/// The configuration options for the server.
#[cfg_attr(    feature = "reasons",  allow(clippy::exhaustive_structs, reason = "Provided for configuration"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::exhaustive_structs))]
#[derive(Clone, Debug)]
pub struct Config {
	//		Public properties

	/// The directory backing the blob store.
	pub blob_store_dir: std::path::PathBuf,
}

//		Core
/// The core functionality of the server: the blob store, version registry,
/// and the packaging/plan operations layered over them.
#[derive(Clone, Debug)]
pub struct Core {
	//		Private properties

	/// The content-addressed blob store (C1).
	blobs:    BlobStore,

	/// The version registry (C2).
	registry: Registry,
}

//󰭅		Core
impl Core {
	//		new
	/// Creates a new core server instance, opening (or creating) the blob
	/// store rooted at `config.blob_store_dir`.
	///
	/// # Errors
	///
	/// Returns the underlying [`std::io::Error`] if the blob store root
	/// cannot be created.
	pub async fn new(config: Config) -> std::io::Result<Self> {
		Ok(Self {
			blobs:    BlobStore::new(config.blob_store_dir).await?,
			registry: Registry::new(),
		})
	}

	//		registry
	/// The version registry.
	#[must_use]
	pub const fn registry(&self) -> &Registry {
		&self.registry
	}

	//		blobs
	/// The blob store.
	#[must_use]
	pub const fn blobs(&self) -> &BlobStore {
		&self.blobs
	}

	//		list_apps
	/// Lists applications, optionally filtered by availability.
	#[must_use]
	pub fn list_apps(&self, available_only: Option<bool>) -> Vec<AppRecord> {
		self.registry.list_apps(available_only, Utc::now())
			.into_iter()
			.map(|app| AppRecord { id: app.id, name: app.name })
			.collect()
	}

	//		get_app
	/// Looks up a single application by id.
	#[must_use]
	pub fn get_app(&self, id: AppId) -> Option<AppRecord> {
		self.registry.get_app(id).map(|app| AppRecord { id: app.id, name: app.name })
	}

	//		check_update
	/// Computes the update plan for a client of `app`.
	///
	/// # Errors
	///
	/// See [`plan::check_update`].
	pub async fn check_update(&self, app: AppId, client_version_id: Option<&str>) -> Result<UpdateInfo, PlanError> {
		plan::check_update(&self.registry, &self.blobs, app, client_version_id).await
	}

	//		upload_zip
	/// Ingests a whole release archive.
	///
	/// # Errors
	///
	/// See [`packaging::upload_zip`].
	#[expect(clippy::too_many_arguments, reason = "mirrors the five independent fields of the upload-zip endpoint")]
	pub async fn upload_zip(
		&self,
		app:           AppId,
		version_id:    String,
		entry_point:   String,
		changelog:     String,
		active:        bool,
		archive_bytes: Vec<u8>,
	) -> Result<Version, PackagingError> {
		packaging::upload_zip(&self.registry, &self.blobs, app, version_id, entry_point, changelog, active, archive_bytes).await
	}

	//		upload_file
	/// Stores a single streamed file as a blob.
	///
	/// # Errors
	///
	/// See [`packaging::upload_file`].
	pub async fn upload_file(&self, bytes: &[u8]) -> Result<BlobHash, PackagingError> {
		packaging::upload_file(&self.blobs, bytes).await
	}

	//		create_version
	/// Creates a version from a manifest built up via prior
	/// [`upload_file`](Self::upload_file) calls.
	///
	/// # Errors
	///
	/// See [`packaging::create_version`].
	#[expect(clippy::too_many_arguments, reason = "mirrors the five independent fields of the create-version endpoint")]
	pub async fn create_version(
		&self,
		app:          AppId,
		version_id:   String,
		entry_point:  String,
		changelog:    String,
		active:       bool,
		file_manifest: Manifest,
	) -> Result<Version, PackagingError> {
		packaging::create_version(&self.registry, &self.blobs, app, version_id, entry_point, changelog, active, file_manifest).await
	}

	//		check_files
	/// Partitions a batch of hashes into those the blob store already has
	/// and those it doesn't.
	pub async fn check_files(&self, hashes: &[BlobHash]) -> (Vec<BlobHash>, Vec<BlobHash>) {
		self.blobs.check_existing(hashes).await
	}
}



//		Functions

//		error_response
/// Builds a uniform `{error: string}` JSON body with the given status.
fn error_response(status: StatusCode, message: impl Display) -> Response {
	(status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

//󰭅		IntoResponse for PlanError
impl IntoResponse for PlanError {
	//		into_response
	fn into_response(self) -> Response {
		match self {
			Self::UnknownApp(_) | Self::NoActiveVersion(_) => error_response(StatusCode::NOT_FOUND, self),
		}
	}
}

//󰭅		IntoResponse for PackagingError
impl IntoResponse for PackagingError {
	//		into_response
	fn into_response(self) -> Response {
		match self {
			Self::BadArchive(_) | Self::UnsafePath(_) | Self::MissingBlob(_) | Self::DuplicateVersion(..) =>
				error_response(StatusCode::BAD_REQUEST, self),
			Self::UnknownApp(_) => error_response(StatusCode::NOT_FOUND, self),
			Self::Blob(_)       => error_response(StatusCode::INTERNAL_SERVER_ERROR, self),
		}
	}
}

//󰭅		IntoResponse for RegistryError
impl IntoResponse for RegistryError {
	//		into_response
	fn into_response(self) -> Response {
		match self {
			Self::DuplicateVersion(..) | Self::MissingBlob(_) => error_response(StatusCode::BAD_REQUEST, self),
			Self::UnknownApp(_) | Self::UnknownVersion(..)    => error_response(StatusCode::NOT_FOUND, self),
		}
	}
}

//󰭅		IntoResponse for BlobError
impl IntoResponse for BlobError {
	//		into_response
	fn into_response(self) -> Response {
		match self {
			Self::NotFound(_) => error_response(StatusCode::NOT_FOUND, self),
			Self::Storage(..) => error_response(StatusCode::INTERNAL_SERVER_ERROR, self),
		}
	}
}



//		Structs

//		ListAppsQuery
/// Query parameters accepted by `GET /apps/`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ListAppsQuery {
	//		Public properties

	/// Restrict the listing to available (or unavailable) applications.
	pub is_available: Option<bool>,
}

//		CheckUpdateQuery
/// Query parameters accepted by `GET /{app_id}/check-update/`.
#[derive(Clone, Debug, Deserialize)]
pub struct CheckUpdateQuery {
	//		Public properties

	/// The version the client currently has installed, if any.
	pub version: Option<String>,
}

//		Axum
/// Endpoint handlers for use with the Axum web framework.
///
/// As with the upstream pattern this is generalised from: handlers are
/// static methods that extract an `Arc<Core>` from the request extensions,
/// so [`Core`] need only be constructed once and layered onto the router.
///
/// # Examples
///
/// ```ignore
/// let core = Arc::new(Core::new(config).await?);
/// let app  = Router::new()
///     .route("/apps/",                          get(Axum::list_apps))
///     .route("/apps/{app_id}/check-update/",     get(Axum::check_update))
///     .route("/blobs/{hash}",                    get(Axum::get_blob))
///     .layer(Extension(core))
/// ;
/// ```
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub struct Axum;

//󰭅		Axum
impl Axum {
	//		list_apps
	/// `GET /apps/` — lists applications, honouring `?is_available=`.
	#[expect(clippy::unused_async, reason = "handler signature is async by convention")]
	pub async fn list_apps(
		Extension(core): Extension<Arc<Core>>,
		Query(query):    Query<ListAppsQuery>,
	) -> impl IntoResponse {
		Json(core.list_apps(query.is_available))
	}

	//		get_app
	/// `GET /apps/{app_id}/` — a single application record.
	#[expect(clippy::unused_async, reason = "handler signature is async by convention")]
	pub async fn get_app(
		Extension(core): Extension<Arc<Core>>,
		Path(app_id):    Path<AppId>,
	) -> Response {
		core.get_app(app_id).map_or_else(
			|| error_response(StatusCode::NOT_FOUND, format!("no such application: {app_id}")),
			|app| Json(app).into_response(),
		)
	}

	//		check_update
	/// `GET /apps/{app_id}/check-update/?version=<v>`.
	pub async fn check_update(
		Extension(core): Extension<Arc<Core>>,
		Path(app_id):    Path<AppId>,
		Query(query):    Query<CheckUpdateQuery>,
	) -> Response {
		match core.check_update(app_id, query.version.as_deref()).await {
			Ok(info)  => Json(info).into_response(),
			Err(err) => {
				error!(app = %app_id, error = %err, "check-update failed");
				err.into_response()
			},
		}
	}

	//		upload_zip
	/// `POST /apps/{app_id}/upload-zip/` — multipart fields `version`,
	/// `entry_point`, `changelog`, `is_active`, `file`.
	pub async fn upload_zip(
		Extension(core): Extension<Arc<Core>>,
		Path(app_id):    Path<AppId>,
		mut multipart:   Multipart,
	) -> Response {
		let mut version_id  = None;
		let mut entry_point = None;
		let mut changelog   = None;
		let mut is_active   = false;
		let mut archive     = None;

		loop {
			let field = match multipart.next_field().await {
				Ok(Some(field)) => field,
				Ok(None)        => break,
				Err(err)        => return error_response(StatusCode::BAD_REQUEST, err),
			};
			let Some(name) = field.name().map(str::to_owned) else { continue };
			match name.as_str() {
				"version"     => version_id  = field.text().await.ok(),
				"entry_point" => entry_point = field.text().await.ok(),
				"changelog"   => changelog   = field.text().await.ok(),
				"is_active"   => is_active   = field.text().await.ok().is_some_and(|v| v == "true"),
				"file"        => archive     = field.bytes().await.ok().map(|b| b.to_vec()),
				_             => continue,
			}
		}

		let (Some(version_id), Some(entry_point), Some(archive)) = (version_id, entry_point, archive) else {
			return error_response(StatusCode::BAD_REQUEST, "missing required field: version, entry_point, or file");
		};
		let changelog = changelog.unwrap_or_default();

		match core.upload_zip(app_id, version_id.clone(), entry_point, changelog, is_active, archive).await {
			Ok(version) => {
				info!(app = %app_id, version = %version.version_id, "upload-zip succeeded");
				Json(UploadZipResponse {
					message:   format!("version {} created", version.version_id),
					version:   version.version_id,
					is_active: version.active,
				}).into_response()
			},
			Err(err) => {
				error!(app = %app_id, version = %version_id, error = %err, "upload-zip failed");
				err.into_response()
			},
		}
	}

	//		upload_file
	/// `POST /apps/{app_id}/upload-file/` — multipart field `file`.
	pub async fn upload_file(
		Extension(core): Extension<Arc<Core>>,
		Path(app_id):    Path<AppId>,
		mut multipart:   Multipart,
	) -> Response {
		let field = loop {
			match multipart.next_field().await {
				Ok(Some(field)) if field.name() == Some("file") => break Some(field),
				Ok(Some(_))                                     => continue,
				Ok(None)                                        => break None,
				Err(err)                                        => return error_response(StatusCode::BAD_REQUEST, err),
			}
		};
		let Some(field) = field else {
			return error_response(StatusCode::BAD_REQUEST, "missing required field: file");
		};
		let Ok(bytes) = field.bytes().await else {
			return error_response(StatusCode::BAD_REQUEST, "failed to read uploaded file");
		};

		match core.upload_file(&bytes).await {
			Ok(id)   => Json(UploadFileResponse { id, url: format!("/blobs/{id}") }).into_response(),
			Err(err) => {
				error!(app = %app_id, error = %err, "upload-file failed");
				err.into_response()
			},
		}
	}

	//		get_blob
	/// `GET /blobs/{hash}` — streams a blob's raw bytes, the endpoint that
	/// every `url` field in a [`Plan`](crate::wire::Plan) resolves to.
	pub async fn get_blob(
		Extension(core): Extension<Arc<Core>>,
		Path(hash):      Path<BlobHash>,
	) -> Response {
		match core.blobs().open(&hash).await {
			Ok(file) => {
				let stream = tokio_util::io::ReaderStream::new(file);
				Body::from_stream(stream).into_response()
			},
			Err(err) => {
				error!(hash = %hash, error = %err, "get-blob failed");
				err.into_response()
			},
		}
	}

	//		create_version
	/// `POST /apps/{app_id}/create-version/`.
	pub async fn create_version(
		Extension(core): Extension<Arc<Core>>,
		Path(app_id):    Path<AppId>,
		Json(request):   Json<CreateVersionRequest>,
	) -> Response {
		match core.create_version(
			app_id,
			request.version.clone(),
			request.entry_point,
			request.changelog,
			request.is_active,
			request.file_manifest,
		).await {
			Ok(version) => Json(UploadZipResponse {
				message:   format!("version {} created", version.version_id),
				version:   version.version_id,
				is_active: version.active,
			}).into_response(),
			Err(err) => {
				error!(app = %app_id, version = %request.version, error = %err, "create-version failed");
				err.into_response()
			},
		}
	}

	//		check_files
	/// `POST /check-files/`.
	#[expect(clippy::unused_async, reason = "handler signature is async by convention")]
	pub async fn check_files(
		Extension(core): Extension<Arc<Core>>,
		Json(request):   Json<CheckFilesRequest>,
	) -> impl IntoResponse {
		let (existing_files, missing_files) = core.check_files(&request.file_hashes).await;
		Json(CheckFilesResponse { existing_files, missing_files })
	}
}


