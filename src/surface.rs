use crate::common::Surface;
use crate::error::Result;
use crate::playground::Playground;
use crossbeam::channel::{bounded, Sender, TrySendError};
use slog::{debug, warn, Logger};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

const CLEAR: &str = "\x1b[2J\x1b[H";

/// Draws the playground as text on a dedicated render thread.
///
/// `repaint` renders the frame on the calling thread and hands it over
/// without waiting. A frame that arrives while the previous one is still
/// being written is dropped. `flush` redraws the last generation if its
/// frame was one of those.
pub struct TerminalSurface {
    frames: Option<Sender<String>>,
    // generation of the newest frame handed to the render thread
    sent: Mutex<Option<u64>>,
    thread: Option<JoinHandle<()>>,
    logger: Logger,
}

impl TerminalSurface {
    pub fn new(logger: Logger) -> Result<Self> {
        TerminalSurface::with_writer(io::stdout(), logger)
    }

    pub fn with_writer<W>(mut writer: W, logger: Logger) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        let (sender, receiver) = bounded::<String>(1);
        let render_logger = logger.clone();
        let thread = thread::Builder::new()
            .name("gol-render".to_string())
            .spawn(move || {
                for frame in receiver {
                    if let Err(e) = writer
                        .write_all(frame.as_bytes())
                        .and_then(|_| writer.flush())
                    {
                        warn!(render_logger, "unable to draw frame"; "error" => %e);
                    }
                }
            })?;

        Ok(TerminalSurface {
            frames: Some(sender),
            sent: Mutex::new(None),
            thread: Some(thread),
            logger,
        })
    }

    fn mark_sent(&self, generation: u64) {
        *self.sent.lock().unwrap_or_else(PoisonError::into_inner) = Some(generation);
    }
}

fn frame(playground: &Playground, generation: u64) -> String {
    format!("{}generation {}\n{}", CLEAR, generation, playground.render())
}

impl Surface for TerminalSurface {
    fn repaint(&self, playground: &Playground, generation: u64) {
        if let Some(frames) = &self.frames {
            match frames.try_send(frame(playground, generation)) {
                Ok(()) => self.mark_sent(generation),
                Err(TrySendError::Full(_)) => {
                    debug!(self.logger, "render busy, frame dropped"; "generation" => generation);
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!(self.logger, "render thread is gone"; "generation" => generation);
                }
            }
        }
    }

    fn flush(&self, playground: &Playground, generation: u64) {
        if *self.sent.lock().unwrap_or_else(PoisonError::into_inner) == Some(generation) {
            return;
        }
        if let Some(frames) = &self.frames {
            debug!(self.logger, "redrawing final frame"; "generation" => generation);
            if frames.send(frame(playground, generation)).is_ok() {
                self.mark_sent(generation);
            } else {
                warn!(self.logger, "render thread is gone"; "generation" => generation);
            }
        }
    }
}

// flush the pending frame before going away
impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.frames.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(self.logger, "render thread panicked");
            }
        }
    }
}
