//! Discovery of packs below the source root.

use crate::config::Conventions;
use anyhow::{Context, Result, ensure};
use log::{debug, warn};
use std::{
	fs, io,
	path::{Path, PathBuf},
};

/// The inputs of one pack, every list sorted by file name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackSource {
	/// the directory name
	pub id: String,
	pub dir: PathBuf,
	pub geometry_files: Vec<PathBuf>,
	pub style_files: Vec<PathBuf>,
	pub images: Vec<PathBuf>,
	pub wmts_config: Option<PathBuf>,
}

impl PackSource {
	/// `path` relative to the pack directory, with `/` separators.
	pub fn relative(&self, path: &Path) -> String {
		let relative = path.strip_prefix(&self.dir).unwrap_or(path);
		relative
			.components()
			.map(|component| component.as_os_str().to_string_lossy())
			.collect::<Vec<_>>()
			.join("/")
	}

	pub fn has_layers(&self) -> bool {
		!self.geometry_files.is_empty() || !self.images.is_empty()
	}
}

fn is_hidden(path: &Path) -> bool {
	path
		.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.starts_with('.'))
}

/// Files directly inside `dir` accepted by `filter`. A missing directory has no files.
fn list_files(dir: &Path, filter: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
	if !dir.is_dir() {
		return Ok(Vec::new());
	}
	let mut files = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && !is_hidden(&path) && filter(&path) {
			files.push(path);
		}
	}
	sort_by_file_name(&mut files);
	Ok(files)
}

fn sort_by_file_name(files: &mut [PathBuf]) {
	files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
}

fn scan_pack(dir: &Path, conventions: &Conventions) -> io::Result<PackSource> {
	let is_geometry = |path: &Path| conventions.is_geometry_file(path);
	let mut geometry_files = list_files(&dir.join(&conventions.geometry_folder), is_geometry)?;
	geometry_files.extend(list_files(dir, is_geometry)?);
	sort_by_file_name(&mut geometry_files);

	let wmts_config = dir.join(&conventions.wmts_config);
	Ok(PackSource {
		id: dir.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default(),
		dir: dir.to_path_buf(),
		geometry_files,
		style_files: list_files(&dir.join(&conventions.styles_folder), |path| conventions.is_style_file(path))?,
		images: list_files(&dir.join(&conventions.images_folder), |path| conventions.is_image_file(path))?,
		wmts_config: wmts_config.is_file().then_some(wmts_config),
	})
}

/// Candidate pack directories, sorted. Entries that cannot be read are skipped.
fn pack_dirs(entries: impl IntoIterator<Item = io::Result<PathBuf>>) -> Vec<PathBuf> {
	let mut dirs = Vec::new();
	for entry in entries {
		match entry {
			Ok(path) if path.is_dir() && !is_hidden(&path) => dirs.push(path),
			Ok(_) => {}
			Err(error) => warn!("skipping unreadable source entry: {error}"),
		}
	}
	dirs.sort();
	dirs
}

/// Finds all packs below `source_root`, sorted by id.
///
/// A pack is a non-hidden subdirectory with at least one geometry document or image, or with a
/// WMTS declaration file. Unreadable directories are skipped with a warning.
pub fn scan_packs(source_root: &Path, conventions: &Conventions) -> Result<Vec<PackSource>> {
	ensure!(source_root.is_dir(), "source directory {source_root:?} does not exist");

	let entries = fs::read_dir(source_root).with_context(|| format!("reading source directory {source_root:?}"))?;
	let dirs = pack_dirs(entries.map(|entry| entry.map(|entry| entry.path())));

	let mut packs = Vec::new();
	for dir in dirs {
		match scan_pack(&dir, conventions) {
			Ok(pack) if pack.has_layers() || pack.wmts_config.is_some() => {
				debug!(
					"pack '{}': {} geometry files, {} styles, {} images",
					pack.id,
					pack.geometry_files.len(),
					pack.style_files.len(),
					pack.images.len()
				);
				packs.push(pack);
			}
			Ok(_) => debug!("skipping {dir:?}: no layers"),
			Err(error) => warn!("skipping pack {dir:?}: {error}"),
		}
	}
	Ok(packs)
}
