use std::sync::Arc;

use tokio::sync::watch;

use super::snapshot::Snapshot;

/// Writer half: owned by the sampling loop.
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<Snapshot>>,
}

/// Reader half: cheaply cloned into every HTTP handler. `current()` never
/// blocks and never observes a half-built snapshot — publication is a single
/// pointer swap of an immutable value.
#[derive(Clone)]
pub struct SnapshotCache {
    rx: watch::Receiver<Arc<Snapshot>>,
}

/// Seeds the channel with [`Snapshot::empty`] so readers have a well-defined
/// value before the first sampling pass completes.
pub fn channel() -> (SnapshotPublisher, SnapshotCache) {
    let (tx, rx) = watch::channel(Arc::new(Snapshot::empty()));
    (SnapshotPublisher { tx }, SnapshotCache { rx })
}

impl SnapshotPublisher {
    pub fn publish(&self, snapshot: Snapshot) {
        // send_replace delivers even with zero active readers.
        self.tx.send_replace(Arc::new(snapshot));
    }
}

impl SnapshotCache {
    pub fn current(&self) -> Arc<Snapshot> {
        self.rx.borrow().clone()
    }

    /// False once the publisher (the sampling loop) has gone away.
    pub fn is_live(&self) -> bool {
        self.rx.has_changed().is_ok()
    }
}
