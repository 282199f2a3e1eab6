//! Single-slot handoff between a capture stage and the tick thread.
//!
//! Built on a `crossbeam_channel::bounded(1)` channel. Publishing while a
//! frame is still unconsumed drains the stale frame and sends the new one,
//! so a slow consumer always sees the newest frame and never builds up a
//! backlog. Either side closes the handoff by dropping its handle.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::trace;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Outcome of [`FramePublisher::publish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    /// The slot was empty
    Delivered,
    /// An unconsumed value was dropped in favor of the new one
    Replaced,
    /// The receiver is gone; the value was discarded
    Closed,
}

/// Producer half of a frame handoff
///
/// Cloneable; the handoff ends for the receiver once every publisher is
/// dropped and the last frame was taken.
#[derive(Debug)]
pub struct FramePublisher<T> {
    tx: Sender<T>,
    stale: Receiver<T>,
    receiver_alive: Receiver<()>,
    dropped: Arc<AtomicU64>,
}

impl<T> Clone for FramePublisher<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            stale: self.stale.clone(),
            receiver_alive: self.receiver_alive.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

/// Consumer half of a frame handoff
#[derive(Debug)]
pub struct FrameReceiver<T> {
    rx: Receiver<T>,
    // Dropped with the receiver, which disconnects `receiver_alive`.
    _alive: Sender<()>,
    dropped: Arc<AtomicU64>,
}

/// Create a connected publisher/receiver pair
#[must_use]
pub fn frame_handoff<T>() -> (FramePublisher<T>, FrameReceiver<T>) {
    let (tx, rx) = bounded(1);
    let (alive_tx, alive_rx) = bounded(0);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        FramePublisher {
            tx,
            stale: rx.clone(),
            receiver_alive: alive_rx,
            dropped: Arc::clone(&dropped),
        },
        FrameReceiver {
            rx,
            _alive: alive_tx,
            dropped,
        },
    )
}

impl<T> FramePublisher<T> {
    /// Send `value`, replacing any unconsumed frame
    pub fn publish(&self, value: T) -> Publish {
        if self.is_closed() {
            return Publish::Closed;
        }
        let mut value = value;
        let mut replaced = false;
        loop {
            match self.tx.try_send(value) {
                Ok(()) => {
                    return if replaced {
                        Publish::Replaced
                    } else {
                        Publish::Delivered
                    };
                }
                Err(TrySendError::Full(rejected)) => {
                    // The consumer may win the race for the stale frame.
                    if self.stale.try_recv().is_ok() {
                        let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        trace!("Handoff replaced an unconsumed frame ({dropped} dropped)");
                        replaced = true;
                    }
                    value = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return Publish::Closed,
            }
        }
    }

    /// Whether the receiver was dropped
    pub fn is_closed(&self) -> bool {
        matches!(self.receiver_alive.try_recv(), Err(TryRecvError::Disconnected))
    }
}

impl<T> FrameReceiver<T> {
    /// Block until a frame is available and take it
    ///
    /// Returns `None` once every publisher is dropped and the slot is empty.
    pub fn take(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Frames replaced before being consumed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
