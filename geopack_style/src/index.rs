use crate::CimDocument;
use geopack_core::{MatchKind, NameIndex};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Finds the style document for a layer name among the style documents of one pack.
///
/// File stems are matched first, names recorded inside the documents second.
#[derive(Clone, Debug, Default)]
pub struct StyleIndex {
	names: NameIndex<PathBuf>,
}

impl StyleIndex {
	/// Builds the index over `paths`, which should be sorted so that ties resolve the same way
	/// on every run.
	pub fn build(paths: &[PathBuf]) -> Self {
		let mut names = NameIndex::new();
		for path in paths {
			if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
				names.insert(stem, path.clone());
			}
		}
		for path in paths {
			match CimDocument::from_path(path) {
				Ok(document) => {
					for name in document.metadata_names() {
						names.insert_alias(&name, path.clone());
					}
				}
				Err(error) => warn!("cannot read layer names from {path:?}: {error:#}"),
			}
		}
		Self { names }
	}

	pub fn lookup(&self, layer_name: &str) -> Option<(&Path, MatchKind)> {
		let found = self.names.lookup(layer_name).map(|(path, kind)| (path.as_path(), kind));
		debug!("style for layer '{layer_name}': {found:?}");
		found
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}
