//! Background note store runtime.
//!
//! # Responsibility
//! - Run one `NoteViewModel` on a dedicated worker thread that owns the
//!   SQLite connection.
//! - Accept events from any thread over a channel and publish snapshots
//!   through a redraw callback.
//!
//! # Invariants
//! - Exactly one writer: the worker thread.
//! - `spawn` returns only after the database opened and the first snapshot
//!   was published, or with the startup error.
//! - `shutdown` processes every event sent before it was called.

use crate::db::open_db;
use crate::repo::note_repo::SqliteNoteRepository;
use crate::state::{NoteEvent, NoteState, SystemClock};
use crate::viewmodel::NoteViewModel;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "notepad-store";

/// Runtime lifecycle error.
#[derive(Debug)]
pub enum RuntimeError {
    /// The worker thread could not be created.
    Spawn(std::io::Error),
    /// The worker failed to open storage or load initial data.
    Startup(String),
    /// The worker is no longer receiving events.
    WorkerStopped,
    /// The worker thread panicked.
    WorkerPanicked,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(err) => write!(f, "failed to spawn note store worker: {err}"),
            Self::Startup(message) => write!(f, "note store failed to start: {message}"),
            Self::WorkerStopped => write!(f, "note store worker has stopped"),
            Self::WorkerPanicked => write!(f, "note store worker panicked"),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

/// Handle to the background note store.
pub struct NoteRuntime {
    sender: Option<Sender<NoteEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl NoteRuntime {
    /// Starts the worker on the database at `db_path`.
    ///
    /// `redraw` runs on the worker thread with every new snapshot, starting
    /// with the initial one.
    pub fn spawn<F>(db_path: impl Into<PathBuf>, redraw: F) -> Result<Self, RuntimeError>
    where
        F: FnMut(&NoteState) + Send + 'static,
    {
        let db_path = db_path.into();
        let (sender, receiver) = mpsc::channel();
        let (ready_sender, ready_receiver) = mpsc::channel();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(db_path, receiver, ready_sender, redraw))
            .map_err(RuntimeError::Spawn)?;

        match ready_receiver.recv() {
            Ok(Ok(())) => {
                info!("event=runtime_start module=runtime status=ok");
                Ok(Self {
                    sender: Some(sender),
                    worker: Some(worker),
                })
            }
            Ok(Err(message)) => {
                let _ = worker.join();
                Err(RuntimeError::Startup(message))
            }
            Err(_) => match worker.join() {
                Ok(()) => Err(RuntimeError::WorkerStopped),
                Err(_) => Err(RuntimeError::WorkerPanicked),
            },
        }
    }

    /// Queues one event for the worker.
    pub fn send(&self, event: NoteEvent) -> Result<(), RuntimeError> {
        let sender = self.sender.as_ref().ok_or(RuntimeError::WorkerStopped)?;
        sender.send(event).map_err(|_| RuntimeError::WorkerStopped)
    }

    /// Stops accepting events, waits for queued ones and joins the worker.
    pub fn shutdown(mut self) -> Result<(), RuntimeError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), RuntimeError> {
        drop(self.sender.take());
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| RuntimeError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for NoteRuntime {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!("event=runtime_stop module=runtime status=error error={err}");
        }
    }
}

fn run_worker<F>(
    db_path: PathBuf,
    receiver: Receiver<NoteEvent>,
    ready: Sender<Result<(), String>>,
    mut redraw: F,
) where
    F: FnMut(&NoteState) + Send + 'static,
{
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            let _ = ready.send(Err(err.to_string()));
            return;
        }
    };
    let repo = match SqliteNoteRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            let _ = ready.send(Err(err.to_string()));
            return;
        }
    };
    let mut view_model = match NoteViewModel::new(repo, SystemClock) {
        Ok(view_model) => view_model,
        Err(err) => {
            let _ = ready.send(Err(err.to_string()));
            return;
        }
    };

    redraw(view_model.state());
    view_model.add_listener(Box::new(redraw));
    let _ = ready.send(Ok(()));

    let mut processed: u64 = 0;
    for event in receiver {
        view_model.dispatch(event);
        processed += 1;
    }
    info!("event=runtime_stop module=runtime status=ok processed_events={processed}");
}
