// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render orchestrator.
//!
//! A render allocates the raster, splits it into bands, and then runs
//! `T + 1` scoped threads: one encoder, which sleeps on the completion
//! barrier, and `T` compute tasks, one per band.  Each compute task
//! owns its band's rows outright and gives them up to the barrier when
//! it is done; the encoder only ever sees rows that have been handed
//! over, and only once all `T` have arrived.

use log::{error, info};
use std::io;
use std::panic;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bands::{self, Band};
use crate::barrier::CompletionBarrier;
use crate::compute::BandJob;
use crate::errors::RenderError;
use crate::output;
use crate::palette::Palette;
use crate::planes::{PlaneMapper, PlaneWindow};
use crate::raster::{BandView, Raster};

/// Largest width or height the output header can describe.
pub const MAX_DIMENSION: usize = u16::max_value() as usize;

/// The parameters of one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// The region of the complex plane to draw.
    pub window: PlaneWindow,
    /// Iterations before a point is presumed to be in the set.
    pub iterations: usize,
    /// Inside and outside colors.
    pub palette: Palette,
    /// Requested number of compute tasks.  Zero or negative means "as
    /// many as the host can run in parallel"; so does anything above
    /// that number.
    pub threads: i64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 480,
            height: 320,
            window: PlaneWindow::default(),
            iterations: 500,
            palette: Palette::default(),
            threads: 0,
        }
    }
}

impl RenderConfig {
    /// Rejects anything a render cannot be started with.  The task
    /// count is never rejected, only clamped later.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));
        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return invalid(format!(
                "image dimensions must not exceed {}, got {}x{}",
                MAX_DIMENSION, self.width, self.height
            ));
        }
        if self.iterations == 0 {
            return invalid("iteration count must be positive".to_string());
        }
        if !self.window.is_finite() {
            return invalid(format!("plane window {:?} is not finite", self.window));
        }
        Ok(())
    }
}

/// What a finished render reports back.
#[derive(Clone, Debug)]
pub struct RenderReport {
    /// Number of compute tasks actually used.
    pub tasks: usize,
    /// The band each task computed.
    pub bands: Vec<Band>,
    /// Wall-clock time from starting the first task to the last join,
    /// encoding included.
    pub elapsed: Duration,
}

/// Runs renders for a validated configuration.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    available: usize,
}

impl Renderer {
    /// Validates the configuration.  The host's parallelism is read
    /// from `num_cpus`.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Renderer {
            config,
            available: num_cpus::get(),
        })
    }

    /// Overrides the host parallelism the task count is clamped to.
    pub fn with_parallelism(mut self, available: usize) -> Self {
        self.available = available;
        self
    }

    /// The configuration this renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The number of compute tasks a render will use.
    pub fn tasks(&self) -> usize {
        bands::resolve_tasks(self.config.threads, self.available)
    }

    /// Renders and writes the image to `path`.  The file is created
    /// only after every band is complete.
    pub fn render(&self, path: &Path) -> Result<RenderReport, RenderError> {
        let (width, height) = (self.config.width as u16, self.config.height as u16);
        let (_, report) = self.render_with(|rows| {
            output::write_image(path, width, height, rows.iter().cloned())
        })?;
        Ok(report)
    }

    /// Renders and hands the finished rows, top to bottom, to `sink`,
    /// which runs on the encoder thread exactly once.  Returns the
    /// raster along with the report.
    pub fn render_with<F>(&self, sink: F) -> Result<(Raster, RenderReport), RenderError>
    where
        F: FnOnce(&[&[u32]]) -> io::Result<()> + Send,
    {
        self.render_bands(sink, |job, view, barrier| job.run(view, barrier))
    }

    // `task` runs once per band and must either signal the barrier with
    // its view or abort it.
    fn render_bands<F, R>(&self, sink: F, task: R) -> Result<(Raster, RenderReport), RenderError>
    where
        F: FnOnce(&[&[u32]]) -> io::Result<()> + Send,
        R: for<'v> Fn(&BandJob, BandView<'v>, &CompletionBarrier<BandView<'v>>) + Sync,
    {
        let config = &self.config;
        let tasks = self.tasks();
        let bands = bands::partition(config.height, tasks);
        let mut raster = Raster::new(config.width, config.height);
        let job = BandJob {
            plane: PlaneMapper::new(config.width, config.height, config.window),
            palette: config.palette,
            limit: config.iterations,
        };

        info!(
            "rendering {}x{} with {} tasks, {} iterations",
            config.width, config.height, tasks, config.iterations
        );
        let start = Instant::now();

        let outcome = {
            let barrier: CompletionBarrier<BandView> = CompletionBarrier::new();
            let views = raster.split_bands(&bands);
            let (barrier, job, task) = (&barrier, &job, &task);

            let scoped = crossbeam::scope(|spawner| -> Result<(), RenderError> {
                // An aborted barrier hands the encoder the reason instead
                // of the bands, and the encoder reports it as a failure to
                // start.
                let consumer = spawner
                    .builder()
                    .name("encoder".to_string())
                    .spawn(move |_| -> Result<(), RenderError> {
                        let mut finished =
                            barrier.wait_until(tasks).map_err(RenderError::Spawn)?;
                        finished.sort_by_key(|view| view.band.index);
                        let rows: Vec<&[u32]> =
                            finished.iter().flat_map(|view| view.rows()).collect();
                        sink(&rows).map_err(RenderError::Io)
                    })
                    .map_err(RenderError::Spawn)?;

                let mut workers = Vec::with_capacity(tasks);
                for view in views {
                    let spawned = spawner
                        .builder()
                        .name(format!("band-{}", view.band.index))
                        .spawn(move |_| task(job, view, barrier));
                    match spawned {
                        Ok(worker) => workers.push(worker),
                        Err(err) => {
                            error!("could not start band task: {}", err);
                            barrier.abort(err);
                            break;
                        }
                    }
                }

                // A task that dies never signals, so release the encoder
                // before waiting on it.
                let mut crashed = None;
                for worker in workers {
                    if let Err(payload) = worker.join() {
                        barrier.abort(io::Error::new(
                            io::ErrorKind::Other,
                            "band task panicked",
                        ));
                        crashed.get_or_insert(payload);
                    }
                }
                let encoded = consumer.join();
                if let Some(payload) = crashed {
                    panic::resume_unwind(payload);
                }
                match encoded {
                    Ok(encoded) => encoded,
                    Err(payload) => panic::resume_unwind(payload),
                }
            });

            match scoped {
                Ok(outcome) => outcome,
                Err(payload) => panic::resume_unwind(payload),
            }
        };

        let elapsed = start.elapsed();
        outcome?;

        info!("rendered {} bands in {:?}", tasks, elapsed);
        Ok((
            raster,
            RenderReport {
                tasks,
                bands,
                elapsed,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::is_inside;
    use crate::palette::Rgb;
    use crate::planes::Pixel;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    fn config(width: usize, height: usize, threads: i64) -> RenderConfig {
        RenderConfig {
            width,
            height,
            threads,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn bad_configurations_are_rejected() {
        for bad in &[
            config(0, 10, 1),
            config(10, 0, 1),
            config(MAX_DIMENSION + 1, 10, 1),
            RenderConfig {
                iterations: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                window: PlaneWindow::new(std::f64::NAN, 1.0, 1.0, -1.0),
                ..RenderConfig::default()
            },
        ] {
            match Renderer::new(*bad) {
                Err(RenderError::InvalidConfig(_)) => {}
                other => panic!("{:?} accepted: {:?}", bad, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn task_count_is_clamped_to_the_host() {
        let r = Renderer::new(config(8, 8, 0)).unwrap().with_parallelism(3);
        assert_eq!(r.tasks(), 3);
        let r = Renderer::new(config(8, 8, 64)).unwrap().with_parallelism(3);
        assert_eq!(r.tasks(), 3);
        let r = Renderer::new(config(8, 8, 0)).unwrap().with_parallelism(0);
        assert_eq!(r.tasks(), 1);
    }

    #[test]
    fn rendered_raster_matches_direct_evaluation() {
        let cfg = RenderConfig {
            palette: Palette::new(Rgb(0x00_0000), Rgb(0xFF_FFFF)),
            ..config(48, 32, 5)
        };
        let renderer = Renderer::new(cfg).unwrap().with_parallelism(5);
        let (raster, report) = renderer.render_with(|_| Ok(())).unwrap();
        assert_eq!(report.tasks, 5);
        assert_eq!(report.bands.len(), 5);

        let plane = PlaneMapper::new(48, 32, cfg.window);
        for y in 0..32 {
            for x in 0..48 {
                let inside = is_inside(plane.pixel_to_point(&Pixel(x, y)), cfg.iterations);
                let expected = if inside {
                    cfg.palette.inside
                } else {
                    cfg.palette.outside
                };
                assert_eq!(raster.get(x, y), expected);
            }
        }
    }

    #[test]
    fn sink_sees_every_row_in_order_exactly_once() {
        let calls = Mutex::new(Vec::new());
        let renderer = Renderer::new(config(6, 7, 3)).unwrap().with_parallelism(3);
        let (raster, _) = renderer
            .render_with(|rows| {
                calls
                    .lock()
                    .unwrap()
                    .push(rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>());
                Ok(())
            })
            .unwrap();
        let calls = calls.into_inner().unwrap();
        assert_eq!(calls.len(), 1);
        let expected: Vec<Vec<u32>> = raster.rows().map(|r| r.to_vec()).collect();
        assert_eq!(calls[0], expected);
    }

    #[test]
    fn sink_failure_is_an_io_error() {
        let renderer = Renderer::new(config(4, 4, 2)).unwrap().with_parallelism(2);
        let result =
            renderer.render_with(|_| Err(io::Error::new(io::ErrorKind::Other, "disk full")));
        match result {
            Err(RenderError::Io(ref e)) => assert_eq!(e.to_string(), "disk full"),
            other => panic!("expected an I/O error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn more_tasks_than_rows_still_finishes() {
        let cfg = RenderConfig {
            palette: Palette::new(Rgb(0x12_3456), Rgb(0xAB_CDEF)),
            ..config(5, 2, 6)
        };
        let renderer = Renderer::new(cfg).unwrap().with_parallelism(6);
        let (raster, report) = renderer.render_with(|_| Ok(())).unwrap();
        assert_eq!(report.tasks, 6);
        assert_eq!(report.bands[5].range(), 0..2);
        assert!(raster.pixels().iter().all(|p| *p == 0x12_3456 || *p == 0xAB_CDEF));
    }

    #[test]
    fn panicking_band_unwinds_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lost.tga");
        let encoded = AtomicBool::new(false);
        let renderer = Renderer::new(config(8, 6, 3)).unwrap().with_parallelism(3);

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            renderer.render_bands(
                |rows| {
                    encoded.store(true, Ordering::SeqCst);
                    output::write_image(&path, 8, 6, rows.iter().cloned())
                },
                |job, view, barrier| {
                    if view.band.index == 1 {
                        panic!("band 1 lost");
                    }
                    job.run(view, barrier)
                },
            )
        }));

        assert!(result.is_err(), "the panic was swallowed");
        assert!(!encoded.load(Ordering::SeqCst));
        assert!(!path.exists());
    }

    #[test]
    fn aborted_band_is_a_spawn_failure_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refused.tga");
        let encoded = AtomicBool::new(false);
        let renderer = Renderer::new(config(8, 6, 3)).unwrap().with_parallelism(3);

        let result = renderer.render_bands(
            |rows| {
                encoded.store(true, Ordering::SeqCst);
                output::write_image(&path, 8, 6, rows.iter().cloned())
            },
            |job, view, barrier| {
                if view.band.index == 2 {
                    barrier.abort(io::Error::new(io::ErrorKind::Other, "out of threads"));
                } else {
                    job.run(view, barrier)
                }
            },
        );

        match result {
            Err(ref e @ RenderError::Spawn(_)) => {
                assert!(e.to_string().contains("out of threads"));
                assert_eq!(e.exit_code(), 3);
            }
            other => panic!("expected a spawn failure, got {:?}", other.map(|_| ())),
        }
        assert!(!encoded.load(Ordering::SeqCst));
        assert!(!path.exists());
    }
}
