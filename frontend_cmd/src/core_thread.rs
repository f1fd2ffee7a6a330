//! Stand-in core thread
//!
//! Binds the core's shared context on its own thread and publishes a frame to
//! the mailbox at a fixed rate until asked to stop. It does no GPU work, so
//! there is nothing to fence before publishing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use emu_frontend::context::GraphicsContext;
use emu_frontend::present::FrameMailbox;

/// Interval between published frames (60 Hz)
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

pub struct CoreThread {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<u64>,
}

impl CoreThread {
    pub fn spawn<C>(mut context: C, mailbox: Arc<FrameMailbox>) -> std::io::Result<Self>
    where
        C: GraphicsContext + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("core".to_string())
            .spawn(move || {
                context.make_current();
                if !context.is_current() {
                    log::error!("Core thread could not bind its shared context");
                    return 0;
                }
                log::debug!("Core thread bound its shared context");

                let mut frames = 0;
                while !stop_flag.load(Ordering::Acquire) {
                    thread::sleep(FRAME_INTERVAL);
                    mailbox.publish();
                    frames += 1;
                }

                context.done_current();
                frames
            })?;

        Ok(Self { stop, handle })
    }

    /// Stop publishing and wait for the thread; returns the frames it published
    pub fn stop(self) -> u64 {
        self.stop.store(true, Ordering::Release);
        self.handle.join().unwrap_or_else(|_| {
            log::error!("Core thread panicked");
            0
        })
    }
}
