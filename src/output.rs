//! Picks an image format from the output file name and writes the
//! finished rows to disk.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use log::{debug, info};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::tga;

/// The on-disk formats the renderer can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Uncompressed truecolor TGA, blue-green-red.
    Tga,
    /// Binary RGB pixmap.
    Pnm,
}

impl OutputFormat {
    /// `.ppm` and `.pnm` select a pixmap; everything else, including no
    /// extension at all, is TGA.
    pub fn from_path(path: &Path) -> OutputFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
        {
            Some(ref e) if e == "ppm" || e == "pnm" => OutputFormat::Pnm,
            _ => OutputFormat::Tga,
        }
    }
}

/// The directory an image for `path` is staged in: the target's own,
/// or the working directory for a bare file name.
pub fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Writes the image to `path`, in the format its extension asks for.
/// The bytes go to a temporary file in the same directory, which is
/// renamed onto `path` only once the whole image is written; on any
/// error the temporary is removed and `path` is left untouched.
pub fn write_image<'a, I>(path: &Path, width: u16, height: u16, rows: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a [u32]>,
{
    let format = OutputFormat::from_path(path);
    let mut staged = NamedTempFile::new_in(staging_dir(path))?;
    debug!("staging {} in {}", path.display(), staged.path().display());
    match format {
        OutputFormat::Tga => tga::encode(&mut staged, width, height, rows)?,
        OutputFormat::Pnm => write_pnm(&mut staged, width, height, rows)?,
    }
    staged.persist(path).map_err(|e| e.error)?;
    info!("wrote {}x{} {:?} image to {}", width, height, format, path.display());
    Ok(())
}

fn write_pnm<'a, W, I>(output: W, width: u16, height: u16, rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a [u32]>,
{
    let mut bytes = Vec::with_capacity(usize::from(width) * usize::from(height) * 3);
    for row in rows {
        for pixel in row {
            bytes.push(((pixel >> 16) & 0xFF) as u8);
            bytes.push(((pixel >> 8) & 0xFF) as u8);
            bytes.push((pixel & 0xFF) as u8);
        }
    }
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(&bytes[..], u32::from(width), u32::from(height), ColorType::RGB(8))?;
    Ok(())
}
