//! Uncompressed 24-bit truecolor TGA encoder.
//!
//! Layout: an 18-byte header, then every pixel top row first, three
//! bytes each in blue, green, red order.

use std::io::{self, Write};

/// Length of the fixed header.
pub const HEADER_LEN: usize = 18;

/// Image type code for uncompressed truecolor.
const TRUECOLOR: u8 = 2;

/// Builds the header for an image of the given size.  The caller is
/// responsible for keeping both dimensions within `u16`.
pub fn header(width: u16, height: u16) -> [u8; HEADER_LEN] {
    let w = width.to_le_bytes();
    let h = height.to_le_bytes();
    [
        0, // no image ID
        0, // no colour map
        TRUECOLOR,
        0, 0, 0, 0, 0, // colour map specification
        0, 0, // x origin
        0, 0, // y origin
        w[0], w[1],
        h[0], h[1],
        24, // bits per pixel
        0,  // image descriptor
    ]
}

/// Writes a complete image.  `rows` must yield `height` rows of
/// `width` packed `0xRRGGBB` pixels, top to bottom.
pub fn encode<'a, W, I>(out: W, width: u16, height: u16, rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a [u32]>,
{
    let mut out = io::BufWriter::new(out);
    out.write_all(&header(width, height))?;

    let mut written = 0;
    let mut line = Vec::with_capacity(usize::from(width) * 3);
    for row in rows {
        if row.len() != usize::from(width) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("row of {} pixels in a {} pixel wide image", row.len(), width),
            ));
        }
        line.clear();
        for pixel in row {
            line.push((pixel & 0xFF) as u8);
            line.push(((pixel >> 8) & 0xFF) as u8);
            line.push(((pixel >> 16) & 0xFF) as u8);
        }
        out.write_all(&line)?;
        written += 1;
    }

    if written != usize::from(height) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} rows in a {} row image", written, height),
        ));
    }
    out.flush()
}
