// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-band compute task.

use itertools::iproduct;
use log::debug;

use crate::barrier::CompletionBarrier;
use crate::escape::escape_iterations;
use crate::palette::Palette;
use crate::planes::{Pixel, PlaneMapper};
use crate::raster::BandView;

/// Everything a compute task reads but never writes.  One copy is
/// shared by reference between all the tasks of a render.
#[derive(Copy, Clone, Debug)]
pub struct BandJob {
    /// Pixel to complex-plane mapping for the whole image.
    pub plane: PlaneMapper,
    /// Inside and outside colors.
    pub palette: Palette,
    /// Iteration bound; a point reaching it is inside.
    pub limit: usize,
}

impl BandJob {
    /// Fills every pixel of the view with the inside or outside color.
    /// Rows are absolute image rows, so the mapping is the same as for
    /// a single-threaded render.
    pub fn fill(&self, view: &mut BandView) {
        let width = self.plane.width;
        for (row, column) in iproduct!(view.band.range(), 0..width) {
            let c = self.plane.pixel_to_point(&Pixel(column, row));
            let iterations = escape_iterations(c, self.limit);
            let offset = (row - view.band.y_start) * width + column;
            view.pixels[offset] = self.palette.color(iterations, self.limit).0;
        }
    }

    /// The whole task: fill the band, then hand it to the barrier.
    /// This is the task's one and only synchronized operation.
    pub fn run<'a>(&self, mut view: BandView<'a>, barrier: &CompletionBarrier<BandView<'a>>) {
        debug!(
            "band {} computing rows {}..{}",
            view.band.index, view.band.y_start, view.band.y_stop
        );
        self.fill(&mut view);
        let index = view.band.index;
        let finished = barrier.signal(view);
        debug!("band {} done, {} bands finished", index, finished);
    }
}
