//! The in-memory pixel grid and the per-band views handed to tasks.

use crate::bands::Band;
use crate::palette::Rgb;

/// `height` rows of `width` packed pixels, row-major, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

/// Exclusive access to the rows of one band.  The only way to obtain
/// one is `Raster::split_bands`, which guarantees that no two views
/// share a row.
#[derive(Debug)]
pub struct BandView<'a> {
    /// The rows this view covers.
    pub band: Band,
    /// Width of every row.
    pub width: usize,
    /// `band.rows() * width` pixels.
    pub pixels: &'a mut [u32],
}

impl<'a> BandView<'a> {
    /// The view's pixels one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // chunks() rejects a zero size; a zero width has no rows anyway
        self.pixels.chunks(self.width.max(1))
    }
}

impl Raster {
    /// A zeroed raster.
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            width,
            height,
            pixels: vec![0 as u32; width * height],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        Rgb(self.pixels[y * self.width + x])
    }

    /// The whole buffer, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// The raster one row at a time, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Carves the buffer into one mutable view per band.  The bands
    /// must be contiguous and in order, starting at row zero and ending
    /// at the last row, as `bands::partition` produces them.
    pub fn split_bands(&mut self, bands: &[Band]) -> Vec<BandView> {
        let width = self.width;
        let mut rest: &mut [u32] = &mut self.pixels;
        let mut views = Vec::with_capacity(bands.len());
        let mut next_row = 0;
        for band in bands {
            assert_eq!(band.y_start, next_row, "bands must be contiguous");
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.rows() * width);
            views.push(BandView {
                band: *band,
                width,
                pixels: head,
            });
            rest = tail;
            next_row = band.y_stop;
        }
        assert!(rest.is_empty(), "bands must cover the whole raster");
        views
    }
}
