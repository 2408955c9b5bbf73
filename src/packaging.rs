//! C3 — the Packaging Service.
//!
//! Accepts a release as either a whole ZIP archive or a sequence of
//! individually-streamed files, and turns it into blobs (C1) plus a new
//! [`Version`](crate::registry::Version) (C2).

#[cfg(test)]
#[path = "tests/packaging.rs"]
mod tests;

//		Packages

use crate::{
	blob::{BlobError, BlobStore},
	hash::BlobHash,
	registry::{Manifest, Registry, RegistryError, Version},
};
use core::{
	error::Error,
	fmt::{self, Display},
};
use std::io::{Cursor, Read as _};
use tracing::{debug, info};
use uuid::Uuid;
use zip::{result::ZipError, ZipArchive};



//		Constants

/// The prefix of archive entries that are macOS resource-fork noise and must
/// be ignored, per §6.
const MACOSX_PREFIX: &str = "__MACOSX/";



//		Enums

//		PackagingError
/// Errors that can occur while ingesting a release.
#[derive(Debug)]
#[non_exhaustive]
pub enum PackagingError {
	/// The archive bytes are not a well-formed ZIP.
	BadArchive(ZipError),

	/// An entry's path escapes the tree or uses a disallowed form.
	UnsafePath(String),

	/// A referenced blob does not exist in the store.
	MissingBlob(Vec<BlobHash>),

	/// `(app, version_id)` is not unique.
	DuplicateVersion(Uuid, String),

	/// No such application.
	UnknownApp(Uuid),

	/// A blob operation failed.
	Blob(BlobError),
}

//󰭅		Display
impl Display for PackagingError {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::BadArchive(ref err)             => write!(f, "not a valid zip archive: {err}"),
			Self::UnsafePath(ref path)            => write!(f, "unsafe path in manifest: {path}"),
			Self::MissingBlob(ref hashes)         => write!(f, "manifest references blobs that have not been uploaded: {}",
				hashes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
			),
			Self::DuplicateVersion(ref app, ref v) => write!(f, "version {v} already exists for application {app}"),
			Self::UnknownApp(ref app)             => write!(f, "no such application: {app}"),
			Self::Blob(ref err)                   => write!(f, "blob store error: {err}"),
		}
	}
}

//󰭅		Error
impl Error for PackagingError {}

//󰭅		From<RegistryError>
impl From<RegistryError> for PackagingError {
	//		from
	fn from(err: RegistryError) -> Self {
		match err {
			RegistryError::DuplicateVersion(app, v) => Self::DuplicateVersion(app, v),
			RegistryError::MissingBlob(hashes)      => Self::MissingBlob(hashes),
			RegistryError::UnknownApp(app)          => Self::UnknownApp(app),
			RegistryError::UnknownVersion(app, _)   => Self::UnknownApp(app),
		}
	}
}

//󰭅		From<BlobError>
impl From<BlobError> for PackagingError {
	//		from
	fn from(err: BlobError) -> Self {
		Self::Blob(err)
	}
}



//		Functions

//		normalize_path
/// Normalises an archive entry path to the manifest's strict POSIX form
/// (`/`-separated, no leading `/`, no `..` segments).
///
/// # Errors
///
/// Returns [`PackagingError::UnsafePath`] if the path cannot be normalised
/// safely.
pub fn normalize_path(raw: &str) -> Result<String, PackagingError> {
	let posix = raw.replace('\\', "/");
	if posix.starts_with('/') || posix.is_empty() {
		return Err(PackagingError::UnsafePath(raw.to_owned()));
	}
	let mut segments = Vec::new();
	for segment in posix.split('/') {
		match segment {
			"" | "."  => continue,
			".."      => return Err(PackagingError::UnsafePath(raw.to_owned())),
			other     => segments.push(other),
		}
	}
	if segments.is_empty() {
		return Err(PackagingError::UnsafePath(raw.to_owned()));
	}
	Ok(segments.join("/"))
}

//		upload_zip
/// Whole-archive ingest: expands `archive_bytes`, stores every contained
/// file as a blob, and creates the version.
///
/// Directory entries and `__MACOSX/...` resource-fork entries are skipped.
/// If any step fails, no [`Version`] is created; blobs already stored are
/// retained since they are content-addressed and safe to reuse.
///
/// # Errors
///
/// * [`PackagingError::BadArchive`] if `archive_bytes` is not a valid ZIP.
/// * [`PackagingError::UnsafePath`] if an entry's path is unsafe.
/// * [`PackagingError::DuplicateVersion`] via the underlying registry call.
#[expect(clippy::too_many_arguments, reason = "mirrors the five independent fields of the upload-zip endpoint")]
pub async fn upload_zip(
	registry:      &Registry,
	blobs:         &BlobStore,
	app:           Uuid,
	version_id:    String,
	entry_point:   String,
	changelog:     String,
	active:        bool,
	archive_bytes: Vec<u8>,
) -> Result<Version, PackagingError> {
	let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).map_err(PackagingError::BadArchive)?;
	let mut manifest: Manifest = Manifest::new();

	for i in 0..archive.len() {
		let mut entry = archive.by_index(i).map_err(PackagingError::BadArchive)?;
		if entry.is_dir() {
			continue;
		}
		let raw_name = entry.name().to_owned();
		if raw_name.starts_with(MACOSX_PREFIX) {
			continue;
		}
		let path = normalize_path(&raw_name)?;
		let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
		entry.read_to_end(&mut bytes).map_err(|err| PackagingError::BadArchive(ZipError::Io(err)))?;
		let record = blobs.put(&bytes).await?;
		debug!(path = %path, hash = %record.id, size = record.size, "staged archive entry");
		let _prior = manifest.insert(path, record.id);
	}

	let version = registry.create_version(blobs, app, version_id, entry_point, changelog, manifest, active).await?;
	info!(app = %app, version = %version.version_id, files = version.manifest.len(), "created version from zip archive");
	Ok(version)
}

//		upload_file
/// Streamed-mode step 1: stores a single file's bytes as a blob.
///
/// # Errors
///
/// Returns [`PackagingError::Blob`] if the underlying store rejects the
/// write.
pub async fn upload_file(blobs: &BlobStore, bytes: &[u8]) -> Result<BlobHash, PackagingError> {
	let record = blobs.put(bytes).await?;
	debug!(hash = %record.id, size = record.size, "staged streamed file");
	Ok(record.id)
}

//		create_version
/// Streamed-mode step 2: creates the version from a manifest the caller
/// built up via prior [`upload_file`] calls.
///
/// Entry paths are re-normalised defensively even though the caller is
/// expected to have already POSIX-normalised them.
///
/// # Errors
///
/// * [`PackagingError::UnsafePath`] if a manifest key is unsafe.
/// * [`PackagingError::MissingBlob`] via the underlying registry call.
/// * [`PackagingError::DuplicateVersion`] via the underlying registry call.
#[expect(clippy::too_many_arguments, reason = "mirrors the five independent fields of the create-version endpoint")]
pub async fn create_version(
	registry:    &Registry,
	blobs:       &BlobStore,
	app:         Uuid,
	version_id:  String,
	entry_point: String,
	changelog:   String,
	active:      bool,
	raw_manifest: Manifest,
) -> Result<Version, PackagingError> {
	let mut manifest = Manifest::new();
	for (path, hash) in raw_manifest {
		let normalized = normalize_path(&path)?;
		let _prior = manifest.insert(normalized, hash);
	}
	let version = registry.create_version(blobs, app, version_id, entry_point, changelog, manifest, active).await?;
	info!(app = %app, version = %version.version_id, files = version.manifest.len(), "created version from streamed files");
	Ok(version)
}
