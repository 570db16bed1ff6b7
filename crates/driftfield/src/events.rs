//! Per-frame input handling.

use driftfield_core::{Event, Scancode};
use tracing::{info, trace};

use crate::backend::GraphicsBackend;

/// Reduces the backend's event queue to a single "keep running" flag.
#[derive(Debug)]
pub struct EventPump {
    /// Cleared for good once a stop event is seen.
    running: bool,
}

impl Default for EventPump {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPump {
    pub fn new() -> Self {
        Self { running: true }
    }

    /// Read every queued event and report whether the loop should go on.
    ///
    /// The queue is always emptied, even after a stop event.
    pub fn drain<B: GraphicsBackend>(&mut self, backend: &mut B) -> bool {
        while let Some(event) = backend.poll_event() {
            if is_stop_event(&event) {
                if self.running {
                    info!(?event, "stop requested");
                }
                self.running = false;
            } else {
                trace!(?event, "ignored event");
            }
        }
        self.running
    }
}

/// Window close, or Escape released.
fn is_stop_event(event: &Event) -> bool {
    matches!(
        event,
        Event::Quit
            | Event::KeyUp {
                scancode: Scancode::Escape
            }
    )
}
