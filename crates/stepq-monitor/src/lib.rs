#![forbid(unsafe_code)]

//! Frame capture driven by step-queue activity.
//!
//! A [`FrameMonitor`] is checked once per host tick. It reads a
//! [`StepQueue`]'s pop counter and asks an injected [`CaptureSink`] to
//! record a frame whenever enough steps have elapsed since the last
//! capture, plus one final frame when the queue empties. The monitor never
//! mutates the queue; the sink is the host's capture primitive (save an
//! image, snapshot a canvas, copy a buffer).
//!
//! ```ignore
//! let mut monitor = FrameMonitor::new(sink, 128)?;
//! monitor.start();
//! loop {
//!     queue.step_until(32, 0);
//!     draw(&queue);
//!     monitor.check(&queue, "squares");
//! }
//! ```

use std::fmt;

use stepq_core::{EndMode, StepQueue};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from monitor construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// `steps_per_frame` must be at least 1.
    ZeroStepsPerFrame,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::ZeroStepsPerFrame => {
                write!(f, "steps_per_frame must be at least 1")
            }
        }
    }
}

impl std::error::Error for MonitorError {}

// ---------------------------------------------------------------------------
// Capture requests
// ---------------------------------------------------------------------------

/// One capture request, stamped with the queue state it fired at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStamp {
    /// Caller-chosen identifier for the running scene.
    pub slug: String,
    /// Pop mode of the queue at capture time.
    pub pop_mode: EndMode,
    /// Add mode of the queue at capture time.
    pub add_mode: EndMode,
    /// Pop count at capture time.
    pub pops: u64,
}

impl FrameStamp {
    /// Base name for capture files: `slug-popmode-addmode`.
    ///
    /// Sinks append their own frame numbering and extension.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}-{}-{}", self.slug, self.pop_mode, self.add_mode)
    }
}

/// Host capture primitive invoked by the monitor.
///
/// Sinks own their numbering and their error policy; a capture is a side
/// effect the monitor fires and forgets.
pub trait CaptureSink {
    /// Record one frame.
    fn capture(&mut self, frame: &FrameStamp);
}

impl<F> CaptureSink for F
where
    F: FnMut(&FrameStamp),
{
    fn capture(&mut self, frame: &FrameStamp) {
        self(frame)
    }
}

// ---------------------------------------------------------------------------
// FrameMonitor
// ---------------------------------------------------------------------------

/// Watches queue counters from a host tick loop and requests a capture
/// every `steps_per_frame` pops.
pub struct FrameMonitor<S: CaptureSink> {
    sink: S,
    steps_per_frame: u64,
    /// Pop count when the last capture fired.
    last_frame: u64,
    running: bool,
    /// Stop, with one final capture, on the first check after the queue
    /// empties. Defaults to true.
    pub stop_on_empty: bool,
}

impl<S: CaptureSink> FrameMonitor<S> {
    /// Create a monitor that captures every `steps_per_frame` pops.
    pub fn new(sink: S, steps_per_frame: u64) -> Result<Self, MonitorError> {
        if steps_per_frame < 1 {
            return Err(MonitorError::ZeroStepsPerFrame);
        }
        Ok(Self {
            sink,
            steps_per_frame,
            last_frame: 0,
            running: false,
            stop_on_empty: true,
        })
    }

    /// Enable [`Self::check`]. Monitors start stopped.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Disable [`Self::check`].
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether checks are active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Per-tick check against the queue's pop counter.
    ///
    /// Captures when the pop count lands on a `steps_per_frame` boundary,
    /// or when more than `steps_per_frame` pops have elapsed since the last
    /// capture (the bounded run may not divide evenly). The first check
    /// after the queue empties stops the monitor, when [`Self::stop_on_empty`]
    /// is set, and still forces one final capture.
    ///
    /// Returns true if a capture was requested during this check.
    pub fn check<E>(&mut self, queue: &StepQueue<E>, slug: &str) -> bool {
        if !self.running {
            return false;
        }
        if queue.is_empty() && self.stop_on_empty {
            self.running = false;
        }
        let pops = queue.pops();
        if pops % self.steps_per_frame == 0
            || pops - self.last_frame > self.steps_per_frame
            || !self.running
        {
            self.grab(queue, slug);
            return true;
        }
        false
    }

    /// Request a capture unconditionally, recording the pop count it fired
    /// at.
    pub fn grab<E>(&mut self, queue: &StepQueue<E>, slug: &str) {
        self.last_frame = queue.pops();
        let frame = FrameStamp {
            slug: slug.to_string(),
            pop_mode: queue.pop_mode,
            add_mode: queue.add_mode,
            pops: self.last_frame,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(stem = %frame.file_stem(), pops = frame.pops, "capture requested");
        self.sink.capture(&frame);
    }

    /// Consume the monitor and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: CaptureSink> fmt::Debug for FrameMonitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameMonitor")
            .field("steps_per_frame", &self.steps_per_frame)
            .field("last_frame", &self.last_frame)
            .field("running", &self.running)
            .field("stop_on_empty", &self.stop_on_empty)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
