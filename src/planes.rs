//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the top left corner, and a window on the complex plane described
//! by its left, right, top and bottom edges.
use num::Complex;

/// The four edges of the region of the complex plane that gets
/// rendered.  The real part runs left to right, the imaginary part
/// top to bottom, so `top` is conventionally greater than `bottom`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneWindow {
    /// Real value at the left edge of the image.
    pub left: f64,
    /// Real value at the right edge of the image.
    pub right: f64,
    /// Imaginary value at the top row of the image.
    pub top: f64,
    /// Imaginary value at the bottom row of the image.
    pub bottom: f64,
}

impl PlaneWindow {
    /// Builds a window from its four edges.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        PlaneWindow {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Builds a window from the left-upper and right-lower corners,
    /// treating the real part of each value as the x-component and the
    /// imaginary part of each value as the y-component.
    pub fn from_corners(leftupper: Complex<f64>, rightlower: Complex<f64>) -> Self {
        PlaneWindow::new(leftupper.re, rightlower.re, leftupper.im, rightlower.im)
    }

    /// True when all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
            && self.bottom.is_finite()
    }
}

impl Default for PlaneWindow {
    /// The whole of the set, framed for a 3:2 image.
    fn default() -> Self {
        PlaneWindow::new(-2.0, 1.0, 1.125, -1.125)
    }
}

/// Describes the x, y of a pixel on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of an image of a given size onto points inside a
/// PlaneWindow.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// Width of the integral plane.
    pub width: usize,
    /// Height of the integral plane.
    pub height: usize,
    /// The complex window the image covers.
    pub window: PlaneWindow,
}

impl PlaneMapper {
    /// Constructor.  Dimensions are assumed to have been validated.
    pub fn new(width: usize, height: usize, window: PlaneWindow) -> PlaneMapper {
        PlaneMapper {
            width,
            height,
            window,
        }
    }

    /// The total number of pixels in the integral grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given the column and row of a pixel, return the complex number
    /// at the equivalent location of the window.  The arithmetic order
    /// matters for reproducibility: `left + x * (right - left) / width`.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let w = &self.window;
        Complex::new(
            w.left + (pixel.0 as f64) * (w.right - w.left) / (self.width as f64),
            w.top + (pixel.1 as f64) * (w.bottom - w.top) / (self.height as f64),
        )
    }
}
