//! # Presentation Loop
//!
//! The presentation thread's entire body: bind the primary context, apply the
//! vsync policy once, then until the window closes ask the renderer for a
//! ready frame with a bounded wait and swap buffers every iteration, whether
//! or not a frame arrived. Swapping on every iteration keeps the window
//! responsive while the producer stalls.
//!
//! ## Exit
//!
//! Closing the window is the only way out. The open flag is re-read once per
//! iteration, so after a close request the loop finishes within one frame
//! wait plus one swap.

pub mod mailbox;

pub use mailbox::FrameMailbox;

use std::time::Duration;

/// Default upper bound on each wait for a ready frame
pub const DEFAULT_PRESENT_TIMEOUT_MS: u64 = 100;

/// Buffer swap pacing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsyncMode {
    /// Swap as soon as requested
    Immediate,
    /// Wait for the display refresh before swapping
    SyncToRefresh,
}

impl VsyncMode {
    /// Policy for a vsync on/off setting
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::SyncToRefresh
        } else {
            Self::Immediate
        }
    }

    /// Swap interval value understood by GL window systems
    pub fn swap_interval(self) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::SyncToRefresh => 1,
        }
    }
}

/// Producer of completed frames, reached from the presentation thread
///
/// Implementations must only report a frame as ready after the producer has
/// inserted a GPU-side sync point for it.
pub trait Renderer {
    /// Hand over a completed frame, waiting at most `timeout`
    ///
    /// Returns whether a frame was obtained.
    fn try_present(&self, timeout: Duration) -> bool;
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn try_present(&self, timeout: Duration) -> bool {
        (**self).try_present(timeout)
    }
}

/// The window-system operations the presentation loop needs
pub trait PresentSurface {
    /// Bind the primary context to the calling thread
    fn make_primary_current(&mut self);

    /// Release the primary context from the calling thread
    fn done_primary_current(&mut self);

    /// Apply a swap interval to the current context
    fn set_swap_interval(&mut self, vsync: VsyncMode);

    /// Display the back buffer of the visible window
    fn swap_buffers(&mut self);

    /// Process pending window-system events
    fn pump_events(&mut self);

    /// Whether the visible window is still open
    fn is_open(&self) -> bool;
}

/// Counters from one run of the presentation loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PresentStats {
    /// Loop iterations
    pub iterations: u64,
    /// Iterations where the renderer handed over a frame
    pub frames_presented: u64,
    /// Buffer swaps requested
    pub swaps: u64,
}

/// Blocking presentation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationLoop {
    vsync: VsyncMode,
    timeout: Duration,
}

impl PresentationLoop {
    /// Create a loop with the given vsync policy and frame wait timeout
    pub fn new(vsync: VsyncMode, timeout: Duration) -> Self {
        Self { vsync, timeout }
    }

    /// Vsync policy applied at entry
    pub fn vsync(&self) -> VsyncMode {
        self.vsync
    }

    /// Frame wait timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run until the surface reports the window closed
    pub fn run<S, R>(&self, surface: &mut S, renderer: &R) -> PresentStats
    where
        S: PresentSurface + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut stats = PresentStats::default();

        surface.make_primary_current();
        surface.set_swap_interval(self.vsync);
        log::debug!(
            "Presentation started (vsync {:?}, frame timeout {:?})",
            self.vsync,
            self.timeout
        );

        while surface.is_open() {
            stats.iterations += 1;
            if renderer.try_present(self.timeout) {
                stats.frames_presented += 1;
            }

            surface.swap_buffers();
            stats.swaps += 1;

            surface.pump_events();
        }

        surface.done_primary_current();
        log::info!(
            "Presentation finished: {} frames presented over {} swaps",
            stats.frames_presented,
            stats.swaps
        );

        stats
    }
}
