//! Splits the rows of an image into horizontal bands, one per task.

use log::warn;
use std::ops::Range;

/// A half-open range of rows, `[y_start, y_stop)`, owned by one task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Band {
    /// Position of the band, top to bottom.
    pub index: usize,
    /// First row of the band.
    pub y_start: usize,
    /// One past the last row of the band.
    pub y_stop: usize,
}

impl Band {
    /// Number of rows in the band.  May be zero when there are more
    /// tasks than rows.
    pub fn rows(&self) -> usize {
        self.y_stop - self.y_start
    }

    /// The band as a row range.
    pub fn range(&self) -> Range<usize> {
        self.y_start..self.y_stop
    }
}

/// Divides `height` rows into `tasks` contiguous bands.  Every band is
/// `height / tasks` rows tall except the last, which also absorbs the
/// remainder, so the bands cover `0..height` exactly once.
///
/// `tasks` must be at least one; see `resolve_tasks`.
pub fn partition(height: usize, tasks: usize) -> Vec<Band> {
    assert!(tasks > 0, "cannot partition an image into zero bands");
    let step = height / tasks;
    (0..tasks)
        .map(|index| {
            let y_start = index * step;
            let y_stop = if index == tasks - 1 {
                height
            } else {
                y_start + step
            };
            Band {
                index,
                y_start,
                y_stop,
            }
        })
        .collect()
}

/// Clamps a requested task count.  Anything non-positive, or anything
/// above what the host can run in parallel, becomes the host's
/// parallelism.  A host reporting no parallelism at all still gets
/// one task.
pub fn resolve_tasks(requested: i64, available: usize) -> usize {
    let resolved = if requested <= 0 || requested as u64 > available as u64 {
        if requested > 0 {
            warn!(
                "{} tasks requested but only {} available, using {}",
                requested, available, available
            );
        }
        available
    } else {
        requested as usize
    };
    resolved.max(1)
}
