//! Shared JSON wire types, used by both the server handlers and the client.

#[cfg(test)]
#[path = "tests/wire.rs"]
mod tests;

//		Packages

use crate::hash::BlobHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;



//		Structs

//		FileEntry
/// One file, as it appears in a [`Plan`]'s `add`/`keep`/`delete` sets.
///
/// `hash`/`size` come from the target manifest for `add` and `keep`, and from
/// the local manifest for `delete` — see §3 of the design.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FileEntry {
	//		Public properties

	/// The content hash of the file.
	pub hash: BlobHash,

	/// The POSIX-relative path of the file inside the tree.
	pub path: String,

	/// The relative URL from which the blob can be fetched.
	pub url:  String,

	/// The size of the file in bytes.
	pub size: u64,
}

//		Plan
/// The add/keep/delete partition produced by the plan service.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Plan {
	//		Public properties

	/// Files present in the target but not the local manifest.
	pub add:    Vec<FileEntry>,

	/// Files present in both manifests (by path).
	pub keep:   Vec<FileEntry>,

	/// Files present in the local manifest but not the target.
	pub delete: Vec<FileEntry>,
}

//		UpdateInfo
/// The response to `GET /{app_id}/check-update/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UpdateInfo {
	//		Public properties

	/// Whether the client's version differs from the active version.
	pub need_update:     bool,

	/// The version the client reported, if it was recognised.
	pub current_version: Option<String>,

	/// The application's currently-active version.
	pub active_version:  String,

	/// The relative path of the program to launch, from the active version.
	pub entry_point:     String,

	/// The active version's changelog.
	pub changelog:       String,

	/// Files to add.
	pub add:             Vec<FileEntry>,

	/// Files to keep (subject to hash verification).
	pub keep:             Vec<FileEntry>,

	/// Files to delete.
	pub delete:           Vec<FileEntry>,

}

//		AppRecord
/// The JSON representation of an application, as returned by `GET /apps/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppRecord {
	//		Public properties

	/// The application's stable id.
	pub id:   uuid::Uuid,

	/// The application's name.
	pub name: String,
}

//		UploadZipResponse
/// The response to `POST /{app_id}/upload-zip/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UploadZipResponse {
	//		Public properties

	/// A human-readable confirmation message.
	pub message:   String,

	/// The version that was created.
	pub version:   String,

	/// Whether the created version was made active.
	pub is_active: bool,
}

//		UploadFileResponse
/// The response to `POST /{app_id}/upload-file/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UploadFileResponse {
	//		Public properties

	/// The content hash of the uploaded file.
	pub id:  BlobHash,

	/// The relative URL from which the blob can be fetched.
	pub url: String,
}

//		CreateVersionRequest
/// The form payload of `POST /{app_id}/create-version/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreateVersionRequest {
	//		Public properties

	/// The version identifier.
	pub version:      String,

	/// The relative path of the program to launch.
	pub entry_point:  String,

	/// Free-text changelog.
	pub changelog:    String,

	/// Whether to make this version active immediately.
	pub is_active:    bool,

	/// The path → hash manifest, built from prior `upload-file` calls.
	pub file_manifest: BTreeMap<String, BlobHash>,
}

//		CheckFilesRequest
/// The request payload of `POST /check-files/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CheckFilesRequest {
	//		Public properties

	/// The hashes to check for existence.
	pub file_hashes: Vec<BlobHash>,
}

//		CheckFilesResponse
/// The response payload of `POST /check-files/`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CheckFilesResponse {
	//		Public properties

	/// Hashes already present in the blob store.
	pub existing_files: Vec<BlobHash>,

	/// Hashes not yet present in the blob store.
	pub missing_files:  Vec<BlobHash>,
}

//		ErrorResponse
/// The uniform shape of an HTTP error body.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorResponse {
	//		Public properties

	/// A human-readable description of the error.
	pub error: String,
}

//		LocalConfig
/// The persisted client-side install record, `<local_dir>/.update_config.json`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LocalConfig {
	//		Public properties

	/// The currently-installed version, if any.
	pub version:         Option<String>,

	/// The instant of the last successful update check.
	pub last_check_time: Option<chrono::DateTime<chrono::Utc>>,
}
