//! C2 — the Version Registry.
//!
//! Holds, per [`Application`], an ordered sequence of immutable
//! [`Version`]s, and enforces that at most one of them is active at a time
//! (invariant V2). This is an in-memory stand-in for "any relational store"
//! (§1 explicitly treats the persistence schema as an external collaborator)
//! — a real deployment swaps the body of [`Registry`] for one backed by a
//! database table with a `UNIQUE(app, version) WHERE is_active` constraint,
//! keeping the same public API.

#[cfg(test)]
#[path = "tests/registry.rs"]
mod tests;

//		Packages

use crate::{
	blob::BlobStore,
	hash::BlobHash,
};
use chrono::{DateTime, Utc};
use core::{
	error::Error,
	fmt::{self, Display},
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;



//		Types

/// The stable identifier of an [`Application`].
pub type AppId = Uuid;

/// A version's manifest: POSIX-normalised relative path → content hash.
pub type Manifest = BTreeMap<String, BlobHash>;



//		Enums

//		RegistryError
/// Errors that can occur when working with the version registry.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RegistryError {
	/// `(app, version_id)` is not unique.
	DuplicateVersion(AppId, String),

	/// One or more blobs referenced by a manifest do not exist in the blob
	/// store.
	MissingBlob(Vec<BlobHash>),

	/// No application exists with the given id.
	UnknownApp(AppId),

	/// No version exists with the given id for the given application.
	UnknownVersion(AppId, String),
}

//󰭅		Display
impl Display for RegistryError {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::DuplicateVersion(ref app, ref version) => write!(f, "version {version} already exists for application {app}"),
			Self::MissingBlob(ref hashes)                => write!(f, "manifest references blobs that have not been uploaded: {}",
				hashes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
			),
			Self::UnknownApp(ref app)                    => write!(f, "no such application: {app}"),
			Self::UnknownVersion(ref app, ref version)   => write!(f, "no such version {version} for application {app}"),
		}
	}
}

//󰭅		Error
impl Error for RegistryError {}



//		Structs

//		Application
/// A named product for which versions are distributed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Application {
	//		Public properties

	/// The application's stable identity.
	pub id:           AppId,

	/// The unique human-readable name.
	pub name:         String,

	/// The instant from which the application is available, if bounded.
	pub enable_time:  Option<DateTime<Utc>>,

	/// The instant after which the application is no longer available, if
	/// bounded.
	pub disable_time: Option<DateTime<Utc>>,
}

//󰭅		Application
impl Application {
	//		is_available_at
	/// Whether the application is available at the given instant (invariant
	/// A1).
	#[must_use]
	pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
		self.enable_time.is_none_or(|enabled| enabled <= now)
			&& self.disable_time.is_none_or(|disabled| disabled > now)
	}
}

//		Version
/// An immutable snapshot of an application.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Version {
	//		Public properties

	/// The owning application.
	pub app:         AppId,

	/// A human string, unique within `app`.
	pub version_id:  String,

	/// The relative path of the program to launch.
	pub entry_point: String,

	/// Free-text changelog.
	pub changelog:   String,

	/// The path → content-hash mapping for this version's tree.
	pub manifest:    Manifest,

	/// Whether this is the currently-active version of its application.
	pub active:      bool,

	/// When this version was created.
	pub upload_time: DateTime<Utc>,
}

//		Registry
/// The in-memory version registry.
#[derive(Debug, Default)]
pub struct Registry {
	//		Private properties

	/// All known applications, by id.
	apps:     RwLock<HashMap<AppId, Application>>,

	/// All known versions, by application id, in creation order.
	versions: RwLock<HashMap<AppId, Vec<Version>>>,
}

//󰭅		Registry
impl Registry {
	//		new
	/// Creates an empty registry.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	//		register_app
	/// Registers a new application. Returns the created record.
	pub fn register_app(
		&self,
		name:         String,
		enable_time:  Option<DateTime<Utc>>,
		disable_time: Option<DateTime<Utc>>,
	) -> Application {
		let app = Application {
			id: Uuid::new_v4(),
			name,
			enable_time,
			disable_time,
		};
		let _prior = self.apps.write().insert(app.id, app.clone());
		app
	}

	//		get_app
	/// Looks up an application by id.
	#[must_use]
	pub fn get_app(&self, id: AppId) -> Option<Application> {
		self.apps.read().get(&id).cloned()
	}

	//		list_apps
	/// Lists applications, optionally restricted by availability at `now`.
	#[must_use]
	pub fn list_apps(&self, available_only: Option<bool>, now: DateTime<Utc>) -> Vec<Application> {
		self.apps.read().values()
			.filter(|app| available_only.is_none_or(|want| app.is_available_at(now) == want))
			.cloned()
			.collect()
	}

	//		create_version
	/// Atomically registers a new version of `app`.
	///
	/// Verifies every blob referenced in `manifest` already exists (V1) and
	/// that `(app, version_id)` is unique (V3) before inserting. If `active`
	/// is set, every other version of `app` is flipped to inactive in the
	/// same critical section, preserving V2.
	///
	/// # Errors
	///
	/// * [`RegistryError::UnknownApp`] if `app` is not registered.
	/// * [`RegistryError::MissingBlob`] if any manifest hash is unknown to
	///   `blobs`.
	/// * [`RegistryError::DuplicateVersion`] if the version already exists.
	pub async fn create_version(
		&self,
		blobs:       &BlobStore,
		app:         AppId,
		version_id:  String,
		entry_point: String,
		changelog:   String,
		manifest:    Manifest,
		active:      bool,
	) -> Result<Version, RegistryError> {
		if self.get_app(app).is_none() {
			return Err(RegistryError::UnknownApp(app));
		}
		let mut missing = Vec::new();
		for hash in manifest.values() {
			if !blobs.exists(hash).await {
				missing.push(*hash);
			}
		}
		if !missing.is_empty() {
			return Err(RegistryError::MissingBlob(missing));
		}
		let mut versions = self.versions.write();
		let bucket        = versions.entry(app).or_default();
		if bucket.iter().any(|v| v.version_id == version_id) {
			return Err(RegistryError::DuplicateVersion(app, version_id));
		}
		if active {
			for existing in bucket.iter_mut() {
				existing.active = false;
			}
		}
		let version = Version {
			app,
			version_id,
			entry_point,
			changelog,
			manifest,
			active,
			upload_time: Utc::now(),
		};
		bucket.push(version.clone());
		Ok(version)
	}

	//		get_active
	/// The currently-active version of `app`, if any.
	///
	/// # Errors
	///
	/// Returns [`RegistryError::UnknownApp`] if `app` is not registered.
	pub fn get_active(&self, app: AppId) -> Result<Option<Version>, RegistryError> {
		if self.get_app(app).is_none() {
			return Err(RegistryError::UnknownApp(app));
		}
		Ok(self.versions.read().get(&app).and_then(|vs| vs.iter().find(|v| v.active).cloned()))
	}

	//		get_version
	/// A specific version of `app` by its `version_id`.
	#[must_use]
	pub fn get_version(&self, app: AppId, version_id: &str) -> Option<Version> {
		self.versions.read().get(&app)?.iter().find(|v| v.version_id == version_id).cloned()
	}

	//		list_versions
	/// All versions of `app`, in upload order.
	///
	/// # Errors
	///
	/// Returns [`RegistryError::UnknownApp`] if `app` is not registered.
	pub fn list_versions(&self, app: AppId) -> Result<Vec<Version>, RegistryError> {
		if self.get_app(app).is_none() {
			return Err(RegistryError::UnknownApp(app));
		}
		Ok(self.versions.read().get(&app).cloned().unwrap_or_default())
	}

	//		set_active
	/// Makes `version_id` the active version of `app`, deactivating every
	/// other version of the same application in the same critical section
	/// (V2).
	///
	/// # Errors
	///
	/// * [`RegistryError::UnknownApp`] if `app` is not registered.
	/// * [`RegistryError::UnknownVersion`] if no such version exists.
	pub fn set_active(&self, app: AppId, version_id: &str) -> Result<(), RegistryError> {
		if self.get_app(app).is_none() {
			return Err(RegistryError::UnknownApp(app));
		}
		let mut versions = self.versions.write();
		let bucket        = versions.get_mut(&app).ok_or_else(|| RegistryError::UnknownVersion(app, version_id.to_owned()))?;
		if !bucket.iter().any(|v| v.version_id == version_id) {
			return Err(RegistryError::UnknownVersion(app, version_id.to_owned()));
		}
		for existing in bucket.iter_mut() {
			existing.active = existing.version_id == version_id;
		}
		Ok(())
	}
}
