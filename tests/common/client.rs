//! Common shared client-side functionality for integration tests.

//		Packages

use core::time::Duration;
use depotctl::client::{Client, Config as ClientConfig};
use reqwest::{multipart, Url};
use std::{io::Write as _, path::Path};
use zip::{write::SimpleFileOptions, ZipWriter};



//		Functions

//		build_zip
/// Builds a ZIP archive in memory containing `entries`.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
	let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
	let options    = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
	for (path, bytes) in entries {
		writer.start_file(*path, options).unwrap();
		writer.write_all(bytes).unwrap();
	}
	writer.finish().unwrap().into_inner()
}

//		upload_zip
/// Uploads a release archive to a running server via `POST
/// /apps/{app_id}/upload-zip/`, the same multipart shape the real client
/// would send.
pub async fn upload_zip(
	base:        &Url,
	app_id:      uuid::Uuid,
	version_id:  &str,
	entry_point: &str,
	active:      bool,
	archive:     Vec<u8>,
) {
	let url  = base.join(&format!("apps/{app_id}/upload-zip/")).unwrap();
	let form = multipart::Form::new()
		.text("version",     version_id.to_owned())
		.text("entry_point", entry_point.to_owned())
		.text("changelog",   String::new())
		.text("is_active",   active.to_string())
		.part("file", multipart::Part::bytes(archive).file_name("release.zip"))
	;
	let response = reqwest::Client::new().post(url).multipart(form).send().await.unwrap();
	assert!(response.status().is_success(), "upload-zip failed: {}", response.status());
}

//		upload_file
/// Uploads a single file to the streamed upload path via `POST
/// /apps/{app_id}/upload-file/`, returning the content hash the server
/// reports for it.
pub async fn upload_file(base: &Url, app_id: uuid::Uuid, bytes: &[u8]) -> String {
	let url  = base.join(&format!("apps/{app_id}/upload-file/")).unwrap();
	let form = multipart::Form::new()
		.part("file", multipart::Part::bytes(bytes.to_vec()).file_name("file.bin"))
	;
	let response = reqwest::Client::new().post(url).multipart(form).send().await.unwrap();
	assert!(response.status().is_success(), "upload-file failed: {}", response.status());
	let body: serde_json::Value = response.json().await.unwrap();
	body["id"].as_str().unwrap().to_owned()
}

//		test_client
/// A [`Client`] configured against `base` for `app_id`, rooted at
/// `local_dir`, with fast-failing retry settings suited to tests.
pub fn test_client(base: Url, app_id: uuid::Uuid, local_dir: &Path) -> Client {
	Client::new(ClientConfig {
		local_dir:       local_dir.to_path_buf(),
		api:             base,
		app_id,
		request_timeout: Duration::from_secs(5),
		max_retries:     2,
		retry_base:      Duration::from_millis(5),
		retry_cap:       Duration::from_millis(20),
		script_runtime:  std::path::PathBuf::from("python3"),
	})
}
