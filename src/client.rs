//! This module provides client-side functionality to add to an application:
//! the Apply Engine (C5), the hardest subsystem in the design (§4.5).
//!
//! It generalises the teacher's single-executable `Updater` into a
//! whole-tree reconciler: instead of replacing one running binary, it walks
//! an add/keep/delete [`Plan`](crate::wire::Plan) and brings `local_dir` into
//! agreement with a server-declared target manifest, with backup-based
//! rollback on failure.

//		Modules

#[cfg(test)]
#[path = "tests/client.rs"]
mod tests;



//		Packages

use crate::{
	hash::BlobHash,
	wire::{FileEntry, LocalConfig, UpdateInfo},
};
use core::{
	fmt::{self, Display},
	future::Future,
	time::Duration as CoreDuration,
};
use futures_util::StreamExt as _;
use reqwest::{Client as HttpClient, StatusCode, Url};
use sha2::{Digest as _, Sha256};
use std::{
	error::Error,
	io::ErrorKind,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::{
	fs,
	io::AsyncWriteExt as _,
	time::sleep,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;



//		Constants

/// The name of the persisted install record, relative to `local_dir` (§6).
const CONFIG_FILE: &str = ".update_config.json";

/// The name of the advisory lock file, relative to `local_dir`.
const LOCK_FILE: &str = ".update.lock";

/// The name of the single-slot backup directory, relative to `local_dir`
/// (§4.5 step 2).
const BACKUP_DIR: &str = ".backup";

/// Entry names ignored when backing up the tree.
const BACKUP_EXCLUDE: &[&str] = &["__pycache__", ".git", BACKUP_DIR];

/// Download chunk size, per the "8 KiB is typical" guidance in §4.5.
const CHUNK_SIZE: usize = 8192;



//		Enums

//		ApplyError
/// Errors that can occur while checking for or applying an update.
#[derive(Debug)]
#[non_exhaustive]
pub enum ApplyError {
	/// An HTTP error occurred (non-2xx status).
	HttpError(Url, StatusCode),

	/// The HTTP request itself failed (connection, TLS, etc).
	HttpRequestFailed(Url, String),

	/// The request exceeded its configured timeout.
	Timeout(Url),

	/// The response body could not be parsed as the expected JSON shape.
	InvalidPayload(Url),

	/// A downloaded file's hash did not match the manifest entry.
	VerificationError {
		/// The path the verification failed for.
		path:     String,
		/// The hash the manifest declared.
		expected: BlobHash,
		/// The hash actually computed.
		actual:   BlobHash,
	},

	/// The pre-apply backup could not be taken or restored.
	BackupError(PathBuf, std::io::Error),

	/// A filesystem operation failed outside of backup/restore.
	IoError(PathBuf, std::io::Error),

	/// The advisory lock for `local_dir` is already held.
	Busy,

	/// `entry_point` has no recognised launch form.
	EntryPointError(String),

	/// Rollback itself failed; `local_config` was left untouched.
	UnstableState(String),

	/// The apply was cancelled before it committed.
	Cancelled,
}

//󰭅		Display
impl Display for ApplyError {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::HttpError(ref url, status)                       => write!(f, "HTTP status {status} received when calling {url}"),
			Self::HttpRequestFailed(ref url, ref msg)              => write!(f, "HTTP request to {url} failed: {msg}"),
			Self::Timeout(ref url)                                 => write!(f, "request to {url} timed out"),
			Self::InvalidPayload(ref url)                          => write!(f, "invalid payload received from {url}"),
			Self::VerificationError { ref path, expected, actual } => write!(f, "hash mismatch for {path}: expected {expected}, got {actual}"),
			Self::BackupError(ref path, ref err)                   => write!(f, "backup operation failed at {path:?}: {err}"),
			Self::IoError(ref path, ref err)                       => write!(f, "filesystem operation failed at {path:?}: {err}"),
			Self::Busy                                             => write!(f, "an apply is already in progress for this directory"),
			Self::EntryPointError(ref entry)                       => write!(f, "no recognised launch form for entry point {entry}"),
			Self::UnstableState(ref msg)                           => write!(f, "rollback failed, local state is unstable: {msg}"),
			Self::Cancelled                                        => write!(f, "apply was cancelled"),
		}
	}
}

//󰭅		Error
impl Error for ApplyError {}

//󰭅		ApplyError
impl ApplyError {
	//		is_retryable
	/// Whether this error is a transient transport failure worth retrying
	/// (§7's "Transport" kind), as opposed to a non-retryable integrity or
	/// validation failure.
	const fn is_retryable(&self) -> bool {
		matches!(*self, Self::HttpError(..) | Self::HttpRequestFailed(..) | Self::Timeout(_))
	}
}

//		ApplyState
/// The state machine of a single apply run (§4.5).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ApplyState {
	/// No apply in progress, or nothing to do.
	Idle,
	/// A plan has been fetched.
	Planned,
	/// The pre-apply backup has been taken.
	BackedUp,
	/// `add` entries are being downloaded.
	Downloading,
	/// All downloads verified against their manifest hashes.
	Verified,
	/// `delete` entries have been removed.
	Swapped,
	/// `local_config` has been written; the apply is complete.
	Committed,
	/// The apply failed and the tree was restored from backup.
	RolledBack,
	/// Rollback itself failed; the tree is in an unknown state.
	Unstable,
}



//		Structs

//		Config
/// The configuration options for the client.
#[cfg_attr(    feature = "reasons",  allow(clippy::exhaustive_structs, reason = "Provided for configuration"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::exhaustive_structs))]
#[derive(Clone, Debug)]
pub struct Config {
	//		Public properties

	/// The directory this client manages.
	pub local_dir:       PathBuf,

	/// The base URL of the API, including protocol and any base path.
	pub api:             Url,

	/// The application id to check updates for.
	pub app_id:          uuid::Uuid,

	/// Per-request timeout (§5, default 30s).
	pub request_timeout: CoreDuration,

	/// Maximum attempts per request/download before giving up (§5).
	pub max_retries:     u32,

	/// The base delay for exponential backoff (§5).
	pub retry_base:      CoreDuration,

	/// The cap on backoff delay (§5).
	pub retry_cap:       CoreDuration,

	/// The interpreter used to launch `.py` entry points.
	pub script_runtime:  PathBuf,
}

//		ProgressFn
/// The shape of a download progress callback: `(filename, downloaded,
/// total)`. Invoked synchronously on the download task; must not block
/// (§5).
pub type ProgressFn = dyn Fn(&str, u64, u64) + Send + Sync;

//		LockGuard
/// Holds the advisory lock file for the duration of an apply, removing it on
/// drop regardless of how the apply ends.
#[derive(Debug)]
struct LockGuard {
	//		Private properties

	/// The path of the lock file.
	path: PathBuf,
}

//󰭅		Drop
impl Drop for LockGuard {
	//		drop
	fn drop(&mut self) {
		if let Err(err) = std::fs::remove_file(&self.path) {
			warn!(path = ?self.path, error = %err, "failed to remove lock file");
		}
	}
}

//		Launcher
/// The seam through which [`Client::launch`] spawns the updated program.
/// Mocked in tests so that running them never actually starts a process, in
/// the same spirit as the teacher's `std_process` mock.
#[cfg_attr(test, mockall::automock)]
pub trait Launcher: core::fmt::Debug + Send + Sync {
	//		spawn
	/// Spawns `program` with `args`, in working directory `cwd`, and does
	/// not wait for it to exit (§9 Open Question iii).
	///
	/// # Errors
	///
	/// Returns the underlying [`std::io::Error`] if spawning fails.
	fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> std::io::Result<()>;
}

//		ProcessLauncher
/// The real [`Launcher`], backed by [`std::process::Command`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessLauncher;

//󰭅		Launcher
impl Launcher for ProcessLauncher {
	//		spawn
	fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> std::io::Result<()> {
		let mut child = std::process::Command::new(program).args(args).current_dir(cwd).spawn()?;
		drop(std::thread::spawn(move || {
			if let Ok(status) = child.wait() {
				debug!(?status, "launched process exited");
			}
		}));
		Ok(())
	}
}

//		Client
/// The apply engine: fetches plans from the server and reconciles
/// `config.local_dir` against them.
#[derive(Debug)]
pub struct Client {
	//		Private properties

	/// The configuration for this client instance.
	config:   Config,

	/// The HTTP client used for all requests to the API server.
	http:     HttpClient,

	/// The seam used to launch the updated program.
	launcher: Arc<dyn Launcher>,
}

//󰭅		Client
impl Client {
	//		new
	/// Creates a new apply engine client.
	#[must_use]
	pub fn new(config: Config) -> Self {
		Self::with_launcher(config, Arc::new(ProcessLauncher))
	}

	//		with_launcher
	/// Creates a new apply engine client with an explicit launcher, for
	/// injecting a mock in tests.
	#[must_use]
	pub fn with_launcher(config: Config, launcher: Arc<dyn Launcher>) -> Self {
		let http = HttpClient::builder()
			.timeout(config.request_timeout)
			.build()
			.unwrap_or_default();
		Self { config, http, launcher }
	}

	//		check_update
	/// Fetches the update plan for the currently-installed version (read
	/// from `local_config`, or `None` if never installed).
	///
	/// # Errors
	///
	/// See [`ApplyError`]'s transport and payload variants.
	pub async fn check_update(&self) -> Result<UpdateInfo, ApplyError> {
		let local = self.read_local_config().await;
		self.fetch_update_info(local.version.as_deref()).await
	}

	//		fetch_update_info
	/// The retrying HTTP call behind [`check_update`](Self::check_update).
	async fn fetch_update_info(&self, client_version: Option<&str>) -> Result<UpdateInfo, ApplyError> {
		let mut url = self.config.api.join(&format!("apps/{}/check-update/", self.config.app_id))
			.map_err(|err| ApplyError::HttpRequestFailed(self.config.api.clone(), err.to_string()))?;
		if let Some(version) = client_version {
			url.query_pairs_mut().append_pair("version", version);
		}
		self.retry(|| {
			let url = url.clone();
			async move {
				let response = self.http.get(url.clone()).send().await
					.map_err(|err| classify_transport_error(&url, err))?;
				let status = response.status();
				if !status.is_success() {
					return Err(ApplyError::HttpError(url, status));
				}
				response.json::<UpdateInfo>().await.map_err(|_err| ApplyError::InvalidPayload(url))
			}
		}).await
	}

	//		retry
	/// Runs `f` with capped exponential backoff, per §5: up to
	/// `config.max_retries` attempts, starting at `config.retry_base` and
	/// capping at `config.retry_cap`. Only [`ApplyError::is_retryable`]
	/// errors are retried.
	async fn retry<T, Fut, F>(&self, mut f: F) -> Result<T, ApplyError>
	where
		F:   FnMut() -> Fut,
		Fut: Future<Output = Result<T, ApplyError>>,
	{
		let mut attempt = 0_u32;
		loop {
			match f().await {
				Ok(value)                                                   => return Ok(value),
				Err(err) if err.is_retryable() && attempt + 1 < self.config.max_retries => {
					let delay = self.config.retry_base.saturating_mul(2_u32.saturating_pow(attempt)).min(self.config.retry_cap);
					debug!(attempt, delay = ?delay, error = %err, "retrying after transient error");
					sleep(delay).await;
					attempt = attempt.saturating_add(1);
				},
				Err(err) => return Err(err),
			}
		}
	}

	//		apply
	/// Runs a full apply: plan acquisition, backup, staged download,
	/// keep-verification, delete, atomic commit, with rollback on failure
	/// (§4.5).
	///
	/// The keep-verification pass runs even when the target version matches
	/// what's already installed — re-applying the same version is how a
	/// locally-modified file gets repaired (§8 Property 8, §8 scenario S6).
	///
	/// Returns the terminal [`ApplyState`] reached. `Idle` means there was
	/// nothing to do: the version was unchanged and every `keep` entry
	/// already matched its manifest hash.
	///
	/// # Errors
	///
	/// See [`ApplyError`].
	pub async fn apply(&self, progress: &ProgressFn, cancel: &CancellationToken) -> Result<ApplyState, ApplyError> {
		let _lock = self.acquire_lock().await?;

		let local_config = self.read_local_config().await;
		let plan_info     = self.fetch_update_info(local_config.version.as_deref()).await?;
		if plan_info.need_update {
			info!(app = %self.config.app_id, target = %plan_info.active_version, "plan acquired");
		} else {
			debug!(app = %self.config.app_id, version = %plan_info.active_version, "already at the active version, checking for local drift");
		}

		if cancel.is_cancelled() {
			return Err(ApplyError::Cancelled);
		}

		self.backup_tree().await?;
		info!("backup taken");

		let changed = match self.stage_plan(&plan_info, progress, cancel).await {
			Ok(changed) => changed,
			Err(err)    => return Err(self.rollback(err).await),
		};

		if !plan_info.need_update && !changed {
			info!(app = %self.config.app_id, "no update needed");
			return Ok(ApplyState::Idle);
		}

		let new_config = LocalConfig {
			version:         Some(plan_info.active_version.clone()),
			last_check_time: Some(chrono::Utc::now()),
		};
		if let Err(err) = self.write_local_config(&new_config).await {
			return Err(self.rollback(err).await);
		}

		info!(app = %self.config.app_id, version = %plan_info.active_version, "apply committed");
		Ok(ApplyState::Committed)
	}

	//		stage_plan
	/// Executes steps 3–5 of §4.5: download `add`, verify-or-redownload
	/// `keep`, and remove `delete`. Runs unconditionally, independent of
	/// whether the target version differs from what's installed, so that
	/// re-applying an unchanged version still repairs a tampered `keep`
	/// file.
	///
	/// Returns whether anything was actually added, redownloaded, or
	/// removed.
	async fn stage_plan(&self, plan: &UpdateInfo, progress: &ProgressFn, cancel: &CancellationToken) -> Result<bool, ApplyError> {
		let mut changed = false;
		for entry in &plan.add {
			if cancel.is_cancelled() {
				return Err(ApplyError::Cancelled);
			}
			self.download_and_verify(entry, progress).await?;
			changed = true;
		}
		for entry in &plan.keep {
			if cancel.is_cancelled() {
				return Err(ApplyError::Cancelled);
			}
			if !self.keep_matches(entry).await {
				debug!(path = %entry.path, "keep entry locally modified or missing, re-downloading");
				self.download_and_verify(entry, progress).await?;
				changed = true;
			}
		}
		for entry in &plan.delete {
			let target = self.config.local_dir.join(&entry.path);
			match fs::remove_file(&target).await {
				Ok(())                                               => changed = true,
				Err(err) if err.kind() == ErrorKind::NotFound         => {},
				Err(err)                                              => return Err(ApplyError::IoError(target, err)),
			}
		}
		Ok(changed)
	}

	//		keep_matches
	/// Whether a `keep` entry's local bytes still match its manifest hash.
	async fn keep_matches(&self, entry: &FileEntry) -> bool {
		let target = self.config.local_dir.join(&entry.path);
		let Ok(bytes) = fs::read(&target).await else {
			return false;
		};
		BlobHash::of(&bytes) == entry.hash
	}

	//		download_and_verify
	/// Streams `entry`'s blob to a temp file beside its target path, hashing
	/// as bytes arrive, then renames into place once the computed hash
	/// matches (§4.5 step 3).
	async fn download_and_verify(&self, entry: &FileEntry, progress: &ProgressFn) -> Result<(), ApplyError> {
		let target = self.config.local_dir.join(&entry.path);
		let Some(parent) = target.parent() else {
			return Err(ApplyError::IoError(target, std::io::Error::other("target path has no parent directory")));
		};
		fs::create_dir_all(parent).await.map_err(|err| ApplyError::IoError(parent.to_path_buf(), err))?;

		let url = self.config.api.join(entry.url.trim_start_matches('/'))
			.map_err(|err| ApplyError::HttpRequestFailed(self.config.api.clone(), err.to_string()))?;

		self.retry(|| {
			let url    = url.clone();
			let entry  = entry.clone();
			let target = target.clone();
			let parent = parent.to_path_buf();
			async move {
				let response = self.http.get(url.clone()).send().await
					.map_err(|err| classify_transport_error(&url, err))?;
				let status = response.status();
				if !status.is_success() {
					return Err(ApplyError::HttpError(url, status));
				}

				let temp_path = parent.join(format!(".{}.download", entry.hash));
				let mut file  = fs::File::create(&temp_path).await.map_err(|err| ApplyError::IoError(temp_path.clone(), err))?;
				let mut hasher     = Sha256::new();
				let mut downloaded = 0_u64;
				let mut stream     = response.bytes_stream();

				while let Some(chunk) = stream.next().await {
					let chunk = chunk.map_err(|err| classify_transport_error(&url, err))?;
					for piece in chunk.chunks(CHUNK_SIZE) {
						hasher.update(piece);
						file.write_all(piece).await.map_err(|err| ApplyError::IoError(temp_path.clone(), err))?;
					}
					downloaded = downloaded.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
					progress(&entry.path, downloaded, entry.size);
				}
				file.flush().await.map_err(|err| ApplyError::IoError(temp_path.clone(), err))?;
				drop(file);

				let actual: [u8; 32] = hasher.finalize().into();
				let actual_hash = BlobHash::from_bytes(actual);
				if actual_hash != entry.hash {
					let _ignored = fs::remove_file(&temp_path).await;
					return Err(ApplyError::VerificationError { path: entry.path.clone(), expected: entry.hash, actual: actual_hash });
				}
				fs::rename(&temp_path, &target).await.map_err(|err| ApplyError::IoError(target.clone(), err))?;
				Ok(())
			}
		}).await
	}

	//		acquire_lock
	/// Takes the advisory lock file under `local_dir` (§5). Fails with
	/// [`ApplyError::Busy`] if another apply already holds it.
	async fn acquire_lock(&self) -> Result<LockGuard, ApplyError> {
		let path = self.config.local_dir.join(LOCK_FILE);
		fs::create_dir_all(&self.config.local_dir).await.map_err(|err| ApplyError::IoError(self.config.local_dir.clone(), err))?;
		match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
			Ok(_file)                                     => Ok(LockGuard { path }),
			Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(ApplyError::Busy),
			Err(err)                                      => Err(ApplyError::IoError(path, err)),
		}
	}

	//		read_local_config
	/// Reads `.update_config.json`, treating any parse or read failure as
	/// "no prior install".
	async fn read_local_config(&self) -> LocalConfig {
		let path = self.config.local_dir.join(CONFIG_FILE);
		let Ok(bytes) = fs::read(&path).await else {
			return LocalConfig::default();
		};
		serde_json::from_slice(&bytes).unwrap_or_default()
	}

	//		write_local_config
	/// Writes `.update_config.json` atomically: write to a temp file, then
	/// rename (§4.5 step 6, §6).
	async fn write_local_config(&self, config: &LocalConfig) -> Result<(), ApplyError> {
		let path      = self.config.local_dir.join(CONFIG_FILE);
		let temp_path = self.config.local_dir.join(format!("{CONFIG_FILE}.tmp"));
		let bytes     = serde_json::to_vec_pretty(config).unwrap_or_default();
		fs::write(&temp_path, &bytes).await.map_err(|err| ApplyError::IoError(temp_path.clone(), err))?;
		fs::rename(&temp_path, &path).await.map_err(|err| ApplyError::IoError(path, err))
	}

	//		backup_tree
	/// Copies `local_dir` to the single-slot backup directory, excluding
	/// well-known noise (§4.5 step 2). The previous backup is removed first.
	async fn backup_tree(&self) -> Result<(), ApplyError> {
		let backup = self.config.local_dir.join(BACKUP_DIR);
		if fs::try_exists(&backup).await.unwrap_or(false) {
			fs::remove_dir_all(&backup).await.map_err(|err| ApplyError::BackupError(backup.clone(), err))?;
		}
		fs::create_dir_all(&backup).await.map_err(|err| ApplyError::BackupError(backup.clone(), err))?;
		self.copy_tree(&self.config.local_dir, &backup, true).await
	}

	//		restore_from_backup
	/// Copies the backup directory back over `local_dir` (§4.5 step 7).
	async fn restore_from_backup(&self) -> Result<(), ApplyError> {
		let backup = self.config.local_dir.join(BACKUP_DIR);
		self.copy_tree(&backup, &self.config.local_dir, false).await
	}

	//		copy_tree
	/// Recursively copies `from` into `to`. When `exclude_noise` is set,
	/// entries named in [`BACKUP_EXCLUDE`] and `*.pyc`/`*.zip` files are
	/// skipped, as is the backup directory itself (to avoid copying it into
	/// its own copy).
	async fn copy_tree(&self, from: &Path, to: &Path, exclude_noise: bool) -> Result<(), ApplyError> {
		for entry in WalkDir::new(from).into_iter().filter_map(Result::ok) {
			let rel = match entry.path().strip_prefix(from) {
				Ok(rel) => rel,
				Err(_err) => continue,
			};
			if rel.as_os_str().is_empty() {
				continue;
			}
			if exclude_noise && is_excluded(rel) {
				continue;
			}
			let dest = to.join(rel);
			if entry.file_type().is_dir() {
				fs::create_dir_all(&dest).await.map_err(|err| ApplyError::BackupError(dest.clone(), err))?;
			} else {
				if let Some(parent) = dest.parent() {
					fs::create_dir_all(parent).await.map_err(|err| ApplyError::BackupError(parent.to_path_buf(), err))?;
				}
				fs::copy(entry.path(), &dest).await.map_err(|err| ApplyError::BackupError(dest.clone(), err))?;
			}
		}
		Ok(())
	}

	//		rollback
	/// Restores `local_dir` from the backup slot after a failed apply
	/// (§4.5 step 7). On restoration failure, surfaces
	/// [`ApplyError::UnstableState`] instead of the original error, and
	/// leaves `local_config` untouched either way.
	async fn rollback(&self, original: ApplyError) -> ApplyError {
		error!(error = %original, "apply failed, rolling back");
		match self.restore_from_backup().await {
			Ok(())   => {
				warn!("rollback complete");
				original
			},
			Err(err) => {
				error!(error = %err, "rollback failed, local state is unstable");
				ApplyError::UnstableState(format!("rollback after {original} also failed: {err}"))
			},
		}
	}

	//		launch
	/// Launches `entry_point` relative to `local_dir`, dispatching on its
	/// suffix (§4.5 "Launch"). The child inherits the parent's argv tail and
	/// runs with `local_dir` as its working directory.
	///
	/// # Errors
	///
	/// Returns [`ApplyError::EntryPointError`] for an unrecognised suffix, or
	/// [`ApplyError::IoError`] if spawning fails.
	pub async fn launch(&self, entry_point: &str) -> Result<(), ApplyError> {
		let target     = self.config.local_dir.join(entry_point);
		let tail: Vec<String> = std::env::args().skip(1).collect();

		let (program, mut args) = match Path::new(entry_point).extension().and_then(|ext| ext.to_str()) {
			Some("py")                           => (self.config.script_runtime.clone(), vec![target.to_string_lossy().into_owned()]),
			Some("sh")                           => (PathBuf::from("bash"), vec![target.to_string_lossy().into_owned()]),
			Some("bat" | "cmd") if cfg!(windows) => (PathBuf::from("cmd"), vec!["/C".to_owned(), target.to_string_lossy().into_owned()]),
			Some("bat" | "cmd")                  => return Err(ApplyError::EntryPointError(entry_point.to_owned())),
			Some("exe") | None                   => (target.clone(), Vec::new()),
			Some(_other)                         => return Err(ApplyError::EntryPointError(entry_point.to_owned())),
		};
		args.extend(tail);

		self.launcher.spawn(&program, &args, &self.config.local_dir).map_err(|err| ApplyError::IoError(target, err))?;
		info!(entry_point, "launched updated program");
		Ok(())
	}
}



//		Functions

//		is_excluded
/// Whether a backup-relative path should be skipped as noise (§4.5 step 2).
fn is_excluded(rel: &Path) -> bool {
	rel.components().any(|component| BACKUP_EXCLUDE.contains(&component.as_os_str().to_string_lossy().as_ref()))
		|| rel.extension().is_some_and(|ext| ext == "pyc" || ext == "zip")
}

//		classify_transport_error
/// Distinguishes a timed-out request from any other transport failure, per
/// the separate "Timeout" and "Transport" error kinds in §7.
fn classify_transport_error(url: &Url, err: reqwest::Error) -> ApplyError {
	if err.is_timeout() {
		ApplyError::Timeout(url.clone())
	} else {
		ApplyError::HttpRequestFailed(url.clone(), err.to_string())
	}
}
