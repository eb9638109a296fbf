use life_common::Snapshot;
use std::sync::mpsc;
use std::sync::Arc;

/// Receives every snapshot the coordinator publishes.
///
/// Called on the simulation thread, once per populate or generation, in order.
/// Implementations schedule their own redraw and must return promptly: the
/// simulation loop does not continue until `set_field` returns.
pub trait Display: Send {
    fn set_field(&mut self, snapshot: Arc<Snapshot>);
}

/// Discards snapshots. For callers that only poll `Coordinator::current_snapshot`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn set_field(&mut self, _snapshot: Arc<Snapshot>) {}
}

/// Forwards snapshots over a channel to another thread.
///
/// A disconnected receiver is not an error; snapshots are then dropped.
#[derive(Debug, Clone)]
pub struct ChannelDisplay {
    tx: mpsc::Sender<Arc<Snapshot>>,
}

impl ChannelDisplay {
    pub fn new() -> (Self, mpsc::Receiver<Arc<Snapshot>>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl Display for ChannelDisplay {
    fn set_field(&mut self, snapshot: Arc<Snapshot>) {
        let _ = self.tx.send(snapshot);
    }
}
