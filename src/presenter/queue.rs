//! Single-writer apply queue in front of a `MapPresenter`

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{Generation, MapPresenter, OverlayBatch, PlanStatus};

enum Command {
    Begin(Generation),
    Apply(OverlayBatch),
    Status(Generation, PlanStatus),
    Flush(oneshot::Sender<Generation>),
}

/// Cloneable sender side of the queue
#[derive(Clone)]
pub struct PresenterHandle {
    tx: mpsc::UnboundedSender<Command>,
}

pub struct PresenterQueue;

impl PresenterQueue {
    /// Move `presenter` into a task that owns it and return the handle used
    /// to write to it. Must be called from within a tokio runtime.
    pub fn spawn<P: MapPresenter + 'static>(presenter: P) -> PresenterHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(presenter, rx));
        PresenterHandle { tx }
    }
}

async fn run<P: MapPresenter>(mut presenter: P, mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut current: Generation = 0;

    while let Some(command) = rx.recv().await {
        match command {
            Command::Begin(generation) if generation > current => {
                current = generation;
                presenter.clear_overlays();
                presenter.show_status(&PlanStatus::Searching);
            }
            Command::Begin(generation) => {
                debug!("Ignoring begin of generation {} (current {})", generation, current);
            }
            Command::Apply(batch) if batch.generation == current => {
                batch.apply_to(&mut presenter);
            }
            Command::Apply(batch) => {
                debug!(
                    "Dropping stale overlay batch of generation {} (current {})",
                    batch.generation, current
                );
            }
            Command::Status(generation, status) if generation == current => {
                presenter.show_status(&status);
            }
            Command::Status(generation, status) => {
                debug!("Dropping stale status '{}' of generation {}", status, generation);
            }
            Command::Flush(ack) => {
                let _ = ack.send(current);
            }
        }
    }

    debug!("Presenter queue closed");
}

impl PresenterHandle {
    /// Start drawing `generation`: clears the map if it is the newest
    pub fn begin(&self, generation: Generation) {
        self.send(Command::Begin(generation));
    }

    pub fn apply(&self, batch: OverlayBatch) {
        if !batch.is_empty() {
            self.send(Command::Apply(batch));
        }
    }

    pub fn status(&self, generation: Generation, status: PlanStatus) {
        self.send(Command::Status(generation, status));
    }

    /// Wait until every command sent before this call has been handled.
    /// Returns the generation the map is showing.
    pub async fn flush(&self) -> Option<Generation> {
        let (ack, done) = oneshot::channel();
        self.send(Command::Flush(ack));
        done.await.ok()
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("Presenter queue is closed, dropping map update");
        }
    }
}
