use anyhow::{Result, bail};

/// Appends `value` as an unsigned LEB128 varint.
pub fn write_varint(buffer: &mut Vec<u8>, mut value: u64) {
	while value >= 0x80 {
		buffer.push((value as u8 & 0x7F) | 0x80);
		value >>= 7;
	}
	buffer.push(value as u8);
}

/// Reads one varint from the front of `bytes`, advancing the slice.
pub fn read_varint(bytes: &mut &[u8]) -> Result<u64> {
	let mut value = 0u64;
	let mut shift = 0;
	loop {
		let Some((&byte, rest)) = bytes.split_first() else {
			bail!("unexpected end of varint data");
		};
		*bytes = rest;
		if shift >= 64 {
			bail!("varint is longer than 64 bits");
		}
		value |= u64::from(byte & 0x7F) << shift;
		if byte & 0x80 == 0 {
			return Ok(value);
		}
		shift += 7;
	}
}
