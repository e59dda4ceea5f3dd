//! Reading and atomically writing JSON files.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{
	fs::{self, File},
	io::{BufReader, Write},
	path::Path,
};
use tempfile::NamedTempFile;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
	serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing JSON in {path:?}"))
}

/// Writes `value` as pretty JSON with a trailing newline.
///
/// The data goes into a temporary file next to `path` which then replaces `path`,
/// so readers never observe a half written file.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
	let mut bytes = serde_json::to_vec_pretty(value).with_context(|| format!("serializing {path:?}"))?;
	bytes.push(b'\n');
	write_atomic(path, &bytes)
}

/// Writes `value` as compact JSON.
pub fn write_json_compact<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
	let bytes = serde_json::to_vec(value).with_context(|| format!("serializing {path:?}"))?;
	write_atomic(path, &bytes)
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
	let parent = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	fs::create_dir_all(parent).with_context(|| format!("creating directory {parent:?}"))?;

	let mut temp = NamedTempFile::new_in(parent).with_context(|| format!("creating temporary file in {parent:?}"))?;
	temp.write_all(bytes)?;
	temp.as_file().sync_all()?;
	temp.persist(path).with_context(|| format!("replacing {path:?}"))?;
	Ok(())
}
