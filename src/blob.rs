//! C1 — the Blob Store.
//!
//! Persists file contents keyed by [`BlobHash`], at most one copy per
//! distinct byte sequence (invariant B1 of the data model). The storage
//! backend is a content-addressed directory tree, encapsulated entirely
//! behind [`BlobStore`]'s public API — callers never see a filesystem path
//! directly, only a hash.

#[cfg(test)]
#[path = "tests/blob.rs"]
mod tests;

//		Packages

use crate::hash::BlobHash;
use core::{
	error::Error,
	fmt::{self, Display},
};
use std::path::{Path, PathBuf};
use tokio::{
	fs,
	io::{self, AsyncWriteExt as _},
};



//		Enums

//		BlobError
/// Errors that can occur when storing or retrieving blobs.
#[derive(Debug)]
#[non_exhaustive]
pub enum BlobError {
	/// The blob store could not write to its backing storage.
	Storage(PathBuf, io::Error),

	/// No blob exists for the given hash.
	NotFound(BlobHash),
}

//󰭅		Display
impl Display for BlobError {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::Storage(ref path, ref err) => write!(f, "failed to write blob storage at {path:?}: {err}"),
			Self::NotFound(ref id)           => write!(f, "blob {id} not found"),
		}
	}
}

//󰭅		Error
impl Error for BlobError {}



//		Structs

//		BlobRecord
/// A record describing a stored blob.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlobRecord {
	//		Public properties

	/// The content hash — the blob's primary identity.
	pub id:   BlobHash,

	/// The size of the blob in bytes.
	pub size: u64,
}

//		BlobStore
/// A content-addressed store of file bytes.
///
/// Backed by a sharded directory tree (`<root>/<first two hex chars>/<full
/// hex hash>`), in the manner of a Git object store. Writes go to a
/// same-directory temp file first and are renamed into place, so concurrent
/// callers writing identical bytes converge on a single file without ever
/// observing a partially-written one — a filesystem-level realisation of the
/// "collisions resolved by hash equality, not by who arrived first" rule in
/// §5 of the design.
#[derive(Clone, Debug)]
pub struct BlobStore {
	//		Private properties

	/// The root directory of the store.
	root: PathBuf,
}

//󰭅		BlobStore
impl BlobStore {
	//		new
	/// Opens (creating if necessary) a blob store rooted at `root`.
	///
	/// # Errors
	///
	/// Returns the underlying [`io::Error`] if the root directory cannot be
	/// created.
	pub async fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
		let root = root.into();
		fs::create_dir_all(&root).await?;
		Ok(Self { root })
	}

	//		path_for
	/// The on-disk path at which a given hash's content is, or would be,
	/// stored.
	fn path_for(&self, id: &BlobHash) -> PathBuf {
		let hex = id.to_hex();
		#[cfg_attr(    feature = "reasons",  allow(clippy::indexing_slicing, reason = "Hex digest is always at least 2 chars"))]
		#[cfg_attr(not(feature = "reasons"), allow(clippy::indexing_slicing))]
		self.root.join(&hex[..2]).join(hex)
	}

	//		put
	/// Stores `bytes`, returning the resulting record.
	///
	/// Idempotent: computing the same hash twice and calling `put` twice
	/// returns two [`BlobRecord`]s with equal `id`, and the second call is a
	/// no-op against storage (invariant B1). Safe to retry on failure, since
	/// the target location is determined entirely by content.
	///
	/// # Errors
	///
	/// Returns [`BlobError::Storage`] if the underlying store rejects the
	/// write.
	pub async fn put(&self, bytes: &[u8]) -> Result<BlobRecord, BlobError> {
		let id   = BlobHash::of(bytes);
		let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
		let dest = self.path_for(&id);
		if fs::try_exists(&dest).await.unwrap_or(false) {
			return Ok(BlobRecord { id, size });
		}
		let Some(shard_dir) = dest.parent() else {
			return Err(BlobError::Storage(dest, io::Error::other("blob path has no parent directory")));
		};
		fs::create_dir_all(shard_dir).await.map_err(|err| BlobError::Storage(shard_dir.to_path_buf(), err))?;
		let temp_path = shard_dir.join(format!(".{id}.{}.tmp", std::process::id()));
		let mut file  = fs::File::create(&temp_path).await.map_err(|err| BlobError::Storage(temp_path.clone(), err))?;
		file.write_all(bytes).await.map_err(|err| BlobError::Storage(temp_path.clone(), err))?;
		file.flush().await.map_err(|err| BlobError::Storage(temp_path.clone(), err))?;
		drop(file);
		fs::rename(&temp_path, &dest).await.map_err(|err| BlobError::Storage(dest.clone(), err))?;
		Ok(BlobRecord { id, size })
	}

	//		exists
	/// Whether a blob with the given hash is already stored.
	pub async fn exists(&self, id: &BlobHash) -> bool {
		fs::try_exists(self.path_for(id)).await.unwrap_or(false)
	}

	//		size
	/// The size in bytes of a stored blob, without reading its content.
	///
	/// # Errors
	///
	/// Returns [`BlobError::NotFound`] if no blob with that hash exists.
	pub async fn size(&self, id: &BlobHash) -> Result<u64, BlobError> {
		let path = self.path_for(id);
		let meta = fs::metadata(&path).await.map_err(|err| if err.kind() == io::ErrorKind::NotFound {
			BlobError::NotFound(*id)
		} else {
			BlobError::Storage(path, err)
		})?;
		Ok(meta.len())
	}

	//		check_existing
	/// Partitions `ids` into those already present and those absent, without
	/// reading any content. Backs the `POST /check-files/` endpoint.
	pub async fn check_existing(&self, ids: &[BlobHash]) -> (Vec<BlobHash>, Vec<BlobHash>) {
		let mut existing = Vec::new();
		let mut missing  = Vec::new();
		for id in ids {
			if self.exists(id).await {
				existing.push(*id);
			} else {
				missing.push(*id);
			}
		}
		(existing, missing)
	}

	//		get
	/// Reads the full contents of a blob into memory.
	///
	/// # Errors
	///
	/// Returns [`BlobError::NotFound`] if no blob with that hash exists, or
	/// [`BlobError::Storage`] if the read fails.
	pub async fn get(&self, id: &BlobHash) -> Result<Vec<u8>, BlobError> {
		let path = self.path_for(id);
		fs::read(&path).await.map_err(|err| if err.kind() == io::ErrorKind::NotFound {
			BlobError::NotFound(*id)
		} else {
			BlobError::Storage(path, err)
		})
	}

	//		open
	/// Opens a blob for streaming, for use by server handlers that want to
	/// stream the response body rather than buffer it.
	///
	/// # Errors
	///
	/// Returns [`BlobError::NotFound`] if no blob with that hash exists.
	pub async fn open(&self, id: &BlobHash) -> Result<fs::File, BlobError> {
		let path = self.path_for(id);
		fs::File::open(&path).await.map_err(|err| if err.kind() == io::ErrorKind::NotFound {
			BlobError::NotFound(*id)
		} else {
			BlobError::Storage(path, err)
		})
	}

	//		root
	/// The root directory backing this store. Exposed for diagnostics only.
	#[must_use]
	pub fn root(&self) -> &Path {
		&self.root
	}
}
