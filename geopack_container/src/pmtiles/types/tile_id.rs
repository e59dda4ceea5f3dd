use anyhow::{Result, ensure};

fn rotate(s: i64, x: &mut i64, y: &mut i64, rx: i64, ry: i64) {
	if ry == 0 {
		if rx == 1 {
			*x = s - 1 - *x;
			*y = s - 1 - *y;
		}
		std::mem::swap(x, y);
	}
}

/// PMTiles tile id: the number of tiles on all lower zoom levels plus the position of the tile
/// on the Hilbert curve of its own level.
pub fn tile_id(z: u8, x: u32, y: u32) -> Result<u64> {
	ensure!(z < 32, "zoom level {z} exceeds the 64-bit tile id range");
	let size = 1i64 << z;
	ensure!(
		i64::from(x) < size && i64::from(y) < size,
		"tile {z}/{x}/{y} lies outside its zoom level"
	);

	let mut acc = 0u64;
	for level in 0..u64::from(z) {
		acc += 1 << (level * 2);
	}

	// signed, because rotating reflects coordinates around the quadrant size
	let (mut tx, mut ty) = (i64::from(x), i64::from(y));
	let mut d = 0u64;
	let mut s = size / 2;
	while s > 0 {
		let rx = i64::from(tx & s > 0);
		let ry = i64::from(ty & s > 0);
		d += s.unsigned_abs() * s.unsigned_abs() * ((3 * rx) ^ ry).unsigned_abs();
		rotate(s, &mut tx, &mut ty, rx, ry);
		s /= 2;
	}
	Ok(acc + d)
}
