//! Everything that can go wrong with a render.

use failure::Fail;
use std::io;

/// The three ways a render can fail.  None of them is retried.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The parameters were rejected before any task started.
    #[fail(display = "Invalid render configuration: {}", _0)]
    InvalidConfig(String),

    /// A task could not be started; nothing was written.
    #[fail(display = "Could not start render task: {}", _0)]
    Spawn(#[cause] io::Error),

    /// The finished image could not be written.
    #[fail(display = "Could not write image: {}", _0)]
    Io(#[cause] io::Error),
}

impl RenderError {
    /// The process exit status the command line tool reports.
    pub fn exit_code(&self) -> i32 {
        match *self {
            RenderError::InvalidConfig(_) => 2,
            RenderError::Spawn(_) => 3,
            RenderError::Io(_) => 4,
        }
    }
}
