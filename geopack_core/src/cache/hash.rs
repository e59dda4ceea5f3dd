use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs::File, io, path::Path};

/// SHA-256 (lowercase hex) over the contents of all `paths`, in order.
///
/// Every file is prefixed with its length, so moving bytes between files changes the hash.
pub fn content_hash<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
	let mut hasher = Sha256::new();
	for path in paths {
		let path = path.as_ref();
		let mut file = File::open(path).with_context(|| format!("opening {path:?} for hashing"))?;
		let length = file.metadata()?.len();
		hasher.update(length.to_le_bytes());
		io::copy(&mut file, &mut hasher).with_context(|| format!("hashing {path:?}"))?;
	}
	Ok(format!("{:x}", hasher.finalize()))
}
