#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Banded Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never carries `z` more than two units from the origin.  Each
//! pixel of the image is a test of one such point, and each test is
//! independent of every other, which makes the problem embarrassingly
//! parallel.
//!
//! This crate cuts the image into horizontal bands, one per thread.
//! Every thread owns its band's rows and paints each pixel one of two
//! flat colors, inside or outside.  When a thread is done it hands its
//! band to a completion barrier.  A separate encoder thread sleeps on
//! that barrier and, once every band has arrived, writes the image as
//! an uncompressed truecolor TGA (or a binary PPM).
//!
//! ```no_run
//! use bandbrot::{RenderConfig, Renderer};
//! use std::path::Path;
//!
//! let renderer = Renderer::new(RenderConfig::default()).unwrap();
//! let report = renderer.render(Path::new("output.tga")).unwrap();
//! println!("took {:?}", report.elapsed);
//! ```

pub mod bands;
pub mod barrier;
pub mod compute;
pub mod errors;
pub mod escape;
pub mod output;
pub mod palette;
pub mod planes;
pub mod raster;
pub mod render;
pub mod tga;

pub use bands::{partition, resolve_tasks, Band};
pub use barrier::CompletionBarrier;
pub use errors::RenderError;
pub use escape::escape_iterations;
pub use palette::{Palette, Rgb};
pub use planes::{PlaneMapper, PlaneWindow};
pub use raster::Raster;
pub use render::{RenderConfig, RenderReport, Renderer};
