#![allow(non_snake_case)]

//		Packages

use super::*;
use chrono::Duration;
use claims::assert_err_eq;
use tempfile::tempdir;
use velcro::btree_map;



//		Common

//		setup
async fn setup() -> (Registry, BlobStore, AppId) {
	let registry = Registry::new();
	let blobs    = BlobStore::new(tempdir().unwrap().path()).await.unwrap();
	let app      = registry.register_app("widget".to_owned(), None, None).id;
	(registry, blobs, app)
}

//		manifest_of
async fn manifest_of(blobs: &BlobStore, entries: &[(&str, &[u8])]) -> Manifest {
	let mut manifest = Manifest::new();
	for (path, bytes) in entries {
		let record = blobs.put(bytes).await.unwrap();
		let _prior = manifest.insert((*path).to_owned(), record.id);
	}
	manifest
}



//		Tests

//		register_app / get_app
#[tokio::test]
async fn register_app__then_get_app() {
	let registry = Registry::new();
	let app      = registry.register_app("widget".to_owned(), None, None);
	assert_eq!(registry.get_app(app.id), Some(app));
}

//		is_available_at (invariant A1)
#[test]
fn is_available_at__unbounded() {
	let app = Application { id: AppId::new_v4(), name: "x".to_owned(), enable_time: None, disable_time: None };
	assert!(app.is_available_at(Utc::now()));
}
#[test]
fn is_available_at__before_enable() {
	let now = Utc::now();
	let app = Application { id: AppId::new_v4(), name: "x".to_owned(), enable_time: Some(now + Duration::hours(1)), disable_time: None };
	assert!(!app.is_available_at(now));
}
#[test]
fn is_available_at__after_disable() {
	let now = Utc::now();
	let app = Application { id: AppId::new_v4(), name: "x".to_owned(), enable_time: None, disable_time: Some(now - Duration::hours(1)) };
	assert!(!app.is_available_at(now));
}
#[test]
fn is_available_at__disable_time_is_exclusive() {
	let now = Utc::now();
	let app = Application { id: AppId::new_v4(), name: "x".to_owned(), enable_time: None, disable_time: Some(now) };
	assert!(!app.is_available_at(now));
}

//		list_apps
#[test]
fn list_apps__filters_by_availability() {
	let registry = Registry::new();
	let now      = Utc::now();
	let available   = registry.register_app("available".to_owned(), None, None);
	let unavailable = registry.register_app("unavailable".to_owned(), Some(now + Duration::hours(1)), None);
	let listed      = registry.list_apps(Some(true), now);
	assert!(listed.contains(&available));
	assert!(!listed.contains(&unavailable));
}

//		create_version
#[tokio::test]
async fn create_version__succeeds_with_known_blobs() {
	let (registry, blobs, app) = setup().await;
	let manifest = manifest_of(&blobs, &[("main.py", b"print(1)")]).await;
	let version  = registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), String::new(), manifest, true).await.unwrap();
	assert_eq!(version.version_id, "1.0.0");
	assert!(version.active);
}
#[tokio::test]
async fn create_version__err_unknown_app() {
	let (registry, blobs, _app) = setup().await;
	let err = registry.create_version(&blobs, AppId::new_v4(), "1.0.0".to_owned(), "main.py".to_owned(), String::new(), Manifest::new(), false).await;
	assert!(matches!(err, Err(RegistryError::UnknownApp(_))));
}
#[tokio::test]
async fn create_version__err_missing_blob() {
	let (registry, blobs, app) = setup().await;
	let manifest = btree_map!{ "main.py".to_owned(): BlobHash::of(b"never uploaded") };
	let err      = registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), String::new(), manifest, false).await;
	assert!(matches!(err, Err(RegistryError::MissingBlob(_))));
}
#[tokio::test]
async fn create_version__err_duplicate() {
	let (registry, blobs, app) = setup().await;
	let manifest = manifest_of(&blobs, &[("main.py", b"print(1)")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), String::new(), manifest.clone(), false).await.unwrap();
	let err = registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), String::new(), manifest, false).await;
	assert_err_eq!(err, RegistryError::DuplicateVersion(app, "1.0.0".to_owned()));
}

//		active uniqueness (invariant V2, testable property 3)
#[tokio::test]
async fn create_version__activating_deactivates_others() {
	let (registry, blobs, app) = setup().await;
	let first  = manifest_of(&blobs, &[("a", b"1")]).await;
	let second = manifest_of(&blobs, &[("a", b"2")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "a".to_owned(), String::new(), first, true).await.unwrap();
	registry.create_version(&blobs, app, "1.0.1".to_owned(), "a".to_owned(), String::new(), second, true).await.unwrap();
	let versions = registry.list_versions(app).unwrap();
	assert_eq!(versions.iter().filter(|v| v.active).count(), 1);
	assert!(versions.iter().find(|v| v.version_id == "1.0.1").unwrap().active);
}

//		get_active
#[tokio::test]
async fn get_active__none_when_nothing_active() {
	let (registry, blobs, app) = setup().await;
	let manifest = manifest_of(&blobs, &[("a", b"1")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "a".to_owned(), String::new(), manifest, false).await.unwrap();
	assert_eq!(registry.get_active(app).unwrap(), None);
}

//		set_active
#[tokio::test]
async fn set_active__switches_version() {
	let (registry, blobs, app) = setup().await;
	let first  = manifest_of(&blobs, &[("a", b"1")]).await;
	let second = manifest_of(&blobs, &[("a", b"2")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "a".to_owned(), String::new(), first, true).await.unwrap();
	registry.create_version(&blobs, app, "1.0.1".to_owned(), "a".to_owned(), String::new(), second, false).await.unwrap();
	registry.set_active(app, "1.0.1").unwrap();
	assert_eq!(registry.get_active(app).unwrap().unwrap().version_id, "1.0.1");
}
#[tokio::test]
async fn set_active__err_unknown_version() {
	let (registry, blobs, app) = setup().await;
	let manifest = manifest_of(&blobs, &[("a", b"1")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "a".to_owned(), String::new(), manifest, true).await.unwrap();
	let err = registry.set_active(app, "9.9.9");
	assert!(matches!(err, Err(RegistryError::UnknownVersion(..))));
}
