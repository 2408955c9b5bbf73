#![allow(non_snake_case)]

//		Packages

use super::*;
use crate::registry::Registry;
use std::collections::BTreeSet;
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

//		paths
fn paths(entries: &[crate::wire::FileEntry]) -> BTreeSet<String> {
	entries.iter().map(|e| e.path.clone()).collect()
}



//		Tests

//		diff_manifests — testable property 5: plan partition
#[tokio::test]
async fn diff_manifests__partition_is_disjoint_and_covers_union() {
	let blobs  = BlobStore::new(tempdir().unwrap().path()).await.unwrap();
	let target = manifest_of(&blobs, &[("main.py", b"1"), ("lib/x.py", b"2"), ("readme.md", b"3")]).await;
	let local  = manifest_of(&blobs, &[("main.py", b"1"), ("old.py", b"4")]).await;

	let plan = diff_manifests(&blobs, &target, &local).await;

	assert_eq!(paths(&plan.add),    BTreeSet::from(["lib/x.py".to_owned(), "readme.md".to_owned()]));
	assert_eq!(paths(&plan.keep),   BTreeSet::from(["main.py".to_owned()]));
	assert_eq!(paths(&plan.delete), BTreeSet::from(["old.py".to_owned()]));

	let all_target_local: BTreeSet<String> = target.keys().chain(local.keys()).cloned().collect();
	let all_plan: BTreeSet<String> = paths(&plan.add).into_iter().chain(paths(&plan.keep)).chain(paths(&plan.delete)).collect();
	assert_eq!(all_plan, all_target_local);
}
#[tokio::test]
async fn diff_manifests__keep_wins_even_on_hash_mismatch() {
	let blobs  = BlobStore::new(tempdir().unwrap().path()).await.unwrap();
	let target = manifest_of(&blobs, &[("main.py", b"new content")]).await;
	let local  = manifest_of(&blobs, &[("main.py", b"old content")]).await;
	let plan   = diff_manifests(&blobs, &target, &local).await;
	assert_eq!(paths(&plan.keep), BTreeSet::from(["main.py".to_owned()]));
	assert!(plan.add.is_empty());
	assert_eq!(plan.keep[0].hash, *target.get("main.py").unwrap());
}
#[tokio::test]
async fn diff_manifests__empty_local_is_all_add() {
	let blobs  = BlobStore::new(tempdir().unwrap().path()).await.unwrap();
	let target = manifest_of(&blobs, &[("main.py", b"1"), ("lib/x.py", b"2")]).await;
	let plan   = diff_manifests(&blobs, &target, &Manifest::new()).await;
	assert_eq!(paths(&plan.add), BTreeSet::from(["main.py".to_owned(), "lib/x.py".to_owned()]));
	assert!(plan.keep.is_empty());
	assert!(plan.delete.is_empty());
}
#[tokio::test]
async fn diff_manifests__identical_manifests_only_keep() {
	let blobs    = BlobStore::new(tempdir().unwrap().path()).await.unwrap();
	let manifest = manifest_of(&blobs, &[("main.py", b"1")]).await;
	let plan     = diff_manifests(&blobs, &manifest, &manifest).await;
	assert!(plan.add.is_empty());
	assert!(plan.delete.is_empty());
	assert_eq!(paths(&plan.keep), BTreeSet::from(["main.py".to_owned()]));
}

//		check_update
#[tokio::test]
async fn check_update__err_no_active_version() {
	let (registry, blobs, app) = setup().await;
	let err = check_update(&registry, &blobs, app, None).await;
	assert!(matches!(err, Err(PlanError::NoActiveVersion(_))));
}
#[tokio::test]
async fn check_update__err_unknown_app() {
	let (registry, blobs, _app) = setup().await;
	let err = check_update(&registry, &blobs, AppId::new_v4(), None).await;
	assert!(matches!(err, Err(PlanError::UnknownApp(_))));
}
#[tokio::test]
async fn check_update__fresh_install_need_update_true() {
	let (registry, blobs, app) = setup().await;
	let manifest = manifest_of(&blobs, &[("main.py", b"1")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), "first release".to_owned(), manifest, true).await.unwrap();

	let info = check_update(&registry, &blobs, app, None).await.unwrap();
	assert!(info.need_update);
	assert_eq!(info.current_version, None);
	assert_eq!(info.active_version, "1.0.0");
	assert_eq!(info.changelog, "first release");
	assert_eq!(paths(&info.add), BTreeSet::from(["main.py".to_owned()]));
}
#[tokio::test]
async fn check_update__no_op_when_matching_installed_version() {
	let (registry, blobs, app) = setup().await;
	let manifest = manifest_of(&blobs, &[("main.py", b"1")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), String::new(), manifest, true).await.unwrap();

	let info = check_update(&registry, &blobs, app, Some("1.0.0")).await.unwrap();
	assert!(!info.need_update);
	assert!(info.add.is_empty());
	assert!(info.delete.is_empty());
}
#[tokio::test]
async fn check_update__downgrade_still_flagged_as_update() {
	let (registry, blobs, app) = setup().await;
	let v1 = manifest_of(&blobs, &[("main.py", b"1")]).await;
	let v2 = manifest_of(&blobs, &[("main.py", b"2")]).await;
	registry.create_version(&blobs, app, "1.0.0".to_owned(), "main.py".to_owned(), String::new(), v1, false).await.unwrap();
	registry.create_version(&blobs, app, "2.0.0".to_owned(), "main.py".to_owned(), String::new(), v2, false).await.unwrap();
	registry.set_active(app, "1.0.0").unwrap();

	let info = check_update(&registry, &blobs, app, Some("2.0.0")).await.unwrap();
	assert!(info.need_update);
	assert_eq!(info.active_version, "1.0.0");
}

//		entry_for / blob_url
#[tokio::test]
async fn entry_for__url_and_size() {
	let blobs  = BlobStore::new(tempdir().unwrap().path()).await.unwrap();
	let record = blobs.put(b"entry bytes").await.unwrap();
	let manifest = btree_map!{ "x".to_owned(): record.id };
	let plan     = diff_manifests(&blobs, &manifest, &Manifest::new()).await;
	assert_eq!(plan.add[0].url,  format!("/blobs/{}", record.id));
	assert_eq!(plan.add[0].size, record.size);
}
