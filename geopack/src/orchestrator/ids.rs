use std::collections::HashSet;

/// Hands out layer ids unique within one pack: the first layer with a stem gets the stem,
/// later ones `_2`, `_3` and so on, in the order they are asked for.
#[derive(Debug, Default)]
pub struct IdAllocator {
	taken: HashSet<String>,
}

impl IdAllocator {
	/// Marks `id` as taken by something that is not a source file.
	pub fn reserve(&mut self, id: &str) {
		self.taken.insert(id.to_string());
	}

	pub fn allocate(&mut self, stem: &str) -> String {
		let mut id = stem.to_string();
		let mut counter = 1;
		while self.taken.contains(&id) {
			counter += 1;
			id = format!("{stem}_{counter}");
		}
		self.taken.insert(id.clone());
		id
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn suffixes_collisions() {
		let mut ids = IdAllocator::default();
		let allocated: Vec<String> = ["roads", "roads", "rail", "roads", "roads_2"]
			.iter()
			.map(|stem| ids.allocate(stem))
			.collect();
		assert_eq!(allocated, vec!["roads", "roads_2", "rail", "roads_3", "roads_2_2"]);
	}

	#[test]
	fn reserved_ids_are_skipped() {
		let mut ids = IdAllocator::default();
		ids.reserve("satellite");
		assert_eq!(ids.allocate("satellite"), "satellite_2");
		assert_eq!(ids.allocate("topo"), "topo");
	}
}
