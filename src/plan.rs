//! C4 — the Plan Service.
//!
//! Given an application and the version a client reports as installed,
//! computes the add/keep/delete partition (§3's `Plan`) between the
//! currently-active version's manifest and the client's.

#[cfg(test)]
#[path = "tests/plan.rs"]
mod tests;

//		Packages

use crate::{
	blob::BlobStore,
	registry::{AppId, Manifest, Registry},
	wire::{FileEntry, Plan, UpdateInfo},
};
use core::{
	error::Error,
	fmt::{self, Display},
};



//		Enums

//		PlanError
/// Errors that can occur when computing an update plan.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum PlanError {
	/// The application has no active version.
	NoActiveVersion(AppId),

	/// No such application.
	UnknownApp(AppId),
}

//󰭅		Display
impl Display for PlanError {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::NoActiveVersion(ref app) => write!(f, "application {app} has no active version"),
			Self::UnknownApp(ref app)      => write!(f, "no such application: {app}"),
		}
	}
}

//󰭅		Error
impl Error for PlanError {}



//		Functions

//		check_update
/// Computes the [`UpdateInfo`] for a client of `app` reporting
/// `client_version_id`.
///
/// # Errors
///
/// * [`PlanError::UnknownApp`] if `app` is not registered.
/// * [`PlanError::NoActiveVersion`] if `app` has no active version.
pub async fn check_update(
	registry:          &Registry,
	blobs:             &BlobStore,
	app:               AppId,
	client_version_id: Option<&str>,
) -> Result<UpdateInfo, PlanError> {
	let active = registry.get_active(app)
		.map_err(|_err| PlanError::UnknownApp(app))?
		.ok_or(PlanError::NoActiveVersion(app))?;
	let local_manifest: Manifest = client_version_id
		.and_then(|version_id| registry.get_version(app, version_id))
		.map_or_else(Manifest::new, |version| version.manifest);

	let plan = diff_manifests(blobs, &active.manifest, &local_manifest).await;

	Ok(UpdateInfo {
		need_update:     client_version_id != Some(active.version_id.as_str()),
		current_version: client_version_id.map(ToOwned::to_owned),
		active_version:  active.version_id,
		entry_point:     active.entry_point,
		changelog:       active.changelog,
		add:             plan.add,
		keep:            plan.keep,
		delete:          plan.delete,
	})
}

//		diff_manifests
/// Partitions the union of `target` and `local` path keys into add/keep/
/// delete, per the `Plan` note in §3: a path present in both manifests is
/// always `keep`, even when the hashes differ — the apply engine is
/// responsible for noticing the mismatch and re-downloading.
///
/// Sizes are looked up from `blobs`; a hash that has since gone missing from
/// the store (should not happen under V1) is reported as size zero rather
/// than failing plan computation.
pub async fn diff_manifests(blobs: &BlobStore, target: &Manifest, local: &Manifest) -> Plan {
	let mut add    = Vec::new();
	let mut keep   = Vec::new();
	let mut delete = Vec::new();

	for (path, hash) in target {
		let entry = entry_for(blobs, path, hash).await;
		if local.contains_key(path) {
			keep.push(entry);
		} else {
			add.push(entry);
		}
	}
	for (path, hash) in local {
		if !target.contains_key(path) {
			delete.push(entry_for(blobs, path, hash).await);
		}
	}

	Plan { add, keep, delete }
}

//		entry_for
/// Builds a [`FileEntry`] for `path`/`hash`, looking up its size in `blobs`.
async fn entry_for(blobs: &BlobStore, path: &str, hash: &crate::hash::BlobHash) -> FileEntry {
	FileEntry {
		hash: *hash,
		path: path.to_owned(),
		url:  blob_url(hash),
		size: blobs.size(hash).await.unwrap_or(0),
	}
}

//		blob_url
/// The relative URL at which a blob can be fetched by hash.
fn blob_url(hash: &crate::hash::BlobHash) -> String {
	format!("/blobs/{hash}")
}
