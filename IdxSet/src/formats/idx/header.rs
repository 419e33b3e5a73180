//! IDX header reading.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// Read `field_count` consecutive big-endian signed 32-bit header fields.
///
/// The source is a forward-only cursor: after a successful read it is left
/// positioned at the first payload byte, exactly `field_count * 4` bytes
/// in, and is never rewound. Subsequent reads continue past the header.
///
/// # Errors
///
/// Returns [`Error::TruncatedHeader`] if the source ends before
/// `field_count * 4` bytes could be read.
///
/// [`Error::TruncatedHeader`]: crate::Error::TruncatedHeader
pub fn read_header<R: Read>(source: &mut R, field_count: usize) -> Result<Vec<i32>> {
    let expected = field_count * 4;
    let mut raw = vec![0u8; expected];

    let mut filled = 0;
    while filled < expected {
        let n = source.read(&mut raw[filled..])?;
        if n == 0 {
            return Err(Error::TruncatedHeader {
                expected,
                actual: filled,
            });
        }
        filled += n;
    }

    let mut cursor = &raw[..];
    let mut fields = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        fields.push(cursor.read_i32::<BigEndian>()?);
    }

    Ok(fields)
}
