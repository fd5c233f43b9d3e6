//! The capture session — owns the device handle, the frame buffer and the
//! state machine behind `start` / `stop` / `save`.
//!
//! # Ownership windows
//!
//! The frame buffer is written only by the capture worker while Recording
//! and read only after Stopped.  Those windows never overlap: the buffer
//! lives inside the worker closure during capture and is handed back **by
//! value** through [`JoinHandle::join`] when the session reaps the worker.
//! The join doubles as the memory-visibility barrier, so the buffer itself
//! needs no lock.
//!
//! The device guard never leaves the control thread (cpal streams are not
//! `Send` everywhere); the worker only holds the receiving half of the
//! chunk channel.
//!
//! # Stop sequence
//!
//! `stop()` sets the cooperative stop flag, joins the worker (a receive
//! already in flight completes first — at most ~23 ms of added latency),
//! and only then drops the device guard.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::wav::{self, WriteError};

use super::capture::{CaptureError, DeviceStream, InputBackend, SourceMessage};
use super::chunk::{AudioChunk, FRAMES_PER_CHUNK, SAMPLE_RATE};
use super::state::{new_shared_state, SessionState, SharedState};

/// How long one blocking receive waits before re-checking the stop flag.
///
/// A live stream delivers a chunk roughly every 23 ms, so this only matters
/// when the device has gone quiet; it is a wake-up interval, not a deadline
/// — `stop()` itself waits unboundedly on the join.
const READ_WAKE: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// RecorderError
// ---------------------------------------------------------------------------

/// Everything the recorder can report to its caller.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The input device could not be opened at `start()`.
    #[error("audio input unavailable: {0}")]
    DeviceUnavailable(#[from] CaptureError),

    /// The device failed while Recording.  Capture has stopped; the partial
    /// buffer is preserved and may still be saved.
    #[error("capture interrupted: {0}")]
    CaptureInterrupted(String),

    /// Disk I/O failed while writing the output file.
    #[error("failed to write recording: {0}")]
    WriteFailure(#[from] WriteError),

    /// An operation was called in a state that does not allow it.
    #[error("cannot {op} while in state {state:?}")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },

    /// The buffer was empty at `save()`.  No file is written — an empty
    /// recording is an error, never a zero-length WAV.
    #[error("no audio captured; nothing to save")]
    EmptyRecording,

    /// Worker thread spawn failure or panic.
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Out-of-band notifications from the capture worker.
///
/// Delivered on the std mpsc channel supplied to [`RecorderSession::new`];
/// the UI drains it alongside its own event loop.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The device failed mid-recording.  The session has already
    /// transitioned to Stopped; `stop()` (or `save()`) will reap the worker
    /// and keep whatever was captured before the failure.
    CaptureInterrupted { message: String },
}

// ---------------------------------------------------------------------------
// RecorderSession
// ---------------------------------------------------------------------------

struct CaptureWorker {
    handle: JoinHandle<CaptureOutcome>,
    stop_flag: Arc<AtomicBool>,
    /// Dropped only after the worker has been joined.
    device: Box<dyn DeviceStream>,
}

struct CaptureOutcome {
    frames: Vec<AudioChunk>,
    fault: Option<String>,
}

/// A recording session: one device, one growing buffer, one state machine.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::mpsc;
/// use micrec::audio::{CpalBackend, RecorderSession};
///
/// let (event_tx, _event_rx) = mpsc::channel();
/// let mut session = RecorderSession::new(Box::new(CpalBackend::new(None)), event_tx);
///
/// session.start().unwrap();
/// std::thread::sleep(std::time::Duration::from_secs(3));
/// session.stop().unwrap();
/// let path = session.save(std::path::Path::new(".")).unwrap();
/// println!("saved {}", path.display());
/// ```
pub struct RecorderSession {
    backend: Box<dyn InputBackend>,
    state: SharedState,
    frames: Vec<AudioChunk>,
    worker: Option<CaptureWorker>,
    event_tx: mpsc::Sender<SessionEvent>,
    /// Chunks appended so far in the current recording; lets the UI show a
    /// running duration without touching the worker-owned buffer.
    chunks_captured: Arc<AtomicUsize>,
}

impl RecorderSession {
    pub fn new(backend: Box<dyn InputBackend>, event_tx: mpsc::Sender<SessionEvent>) -> Self {
        Self {
            backend,
            state: new_shared_state(),
            frames: Vec::new(),
            worker: None,
            event_tx,
            chunks_captured: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Clonable handle the UI can poll for the current state.
    pub fn state_handle(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// The captured buffer.  Empty while Recording (the worker owns the
    /// growing buffer until it is reaped).
    pub fn frames(&self) -> &[AudioChunk] {
        &self.frames
    }

    /// Seconds of audio captured in the current (or last) recording.
    pub fn duration_secs(&self) -> f32 {
        let chunks = self.chunks_captured.load(Ordering::SeqCst);
        (chunks * FRAMES_PER_CHUNK) as f32 / SAMPLE_RATE as f32
    }

    /// Begin a new recording.
    ///
    /// Clears the previous buffer, opens the device, transitions to
    /// Recording and spawns the capture worker.
    ///
    /// # Errors
    ///
    /// [`RecorderError::InvalidState`] when already Recording (the running
    /// session is left untouched), [`RecorderError::DeviceUnavailable`] when
    /// the device cannot be opened (state is left unchanged).
    pub fn start(&mut self) -> Result<(), RecorderError> {
        let prev = self.state();
        if prev.is_recording() {
            return Err(RecorderError::InvalidState {
                op: "start",
                state: prev,
            });
        }

        // A worker that faulted before stop() was called is reaped here;
        // its partial buffer is discarded like any previous recording.
        if self.worker.is_some() {
            self.reap_worker()?;
        }

        self.frames.clear();
        self.chunks_captured.store(0, Ordering::SeqCst);

        let (tx, rx) = mpsc::channel();
        let device = self.backend.open(tx)?;

        let stop_flag = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop_flag);
        let state = Arc::clone(&self.state);
        let counter = Arc::clone(&self.chunks_captured);
        let event_tx = self.event_tx.clone();

        // Transition before the spawn so the worker can only ever move the
        // state forward (Recording → Stopped on fault).
        *self.state.lock().unwrap() = SessionState::Recording;

        let handle = thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || capture_loop(rx, flag, state, counter, event_tx))
            .map_err(|e| {
                *self.state.lock().unwrap() = prev;
                RecorderError::Internal(format!("failed to spawn capture worker: {e}"))
            })?;

        self.worker = Some(CaptureWorker {
            handle,
            stop_flag,
            device,
        });

        log::info!("recording started");
        Ok(())
    }

    /// End the current recording.
    ///
    /// Idempotent no-op when nothing is being captured — no device handle is
    /// touched.  Otherwise joins the worker, takes ownership of the buffer,
    /// releases the device and transitions to Stopped.
    ///
    /// # Errors
    ///
    /// [`RecorderError::CaptureInterrupted`] when the capture had already
    /// died to a device fault (the partial buffer is still available).
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if self.worker.is_none() {
            log::debug!("stop called with no active capture");
            return Ok(());
        }

        match self.reap_worker()? {
            Some(message) => Err(RecorderError::CaptureInterrupted(message)),
            None => {
                log::info!("recording stopped ({} chunks)", self.frames.len());
                Ok(())
            }
        }
    }

    /// Write the captured buffer to a WAV file in `output_dir` and return
    /// the path used.  On success the session resets to Idle, ready for the
    /// next recording.
    ///
    /// # Errors
    ///
    /// [`RecorderError::InvalidState`] unless Stopped,
    /// [`RecorderError::EmptyRecording`] when nothing was captured, and
    /// [`RecorderError::WriteFailure`] on any I/O error.
    pub fn save(&mut self, output_dir: &Path) -> Result<PathBuf, RecorderError> {
        let state = self.state();
        if state != SessionState::Stopped {
            return Err(RecorderError::InvalidState { op: "save", state });
        }

        // A capture that faulted mid-recording may not have been reaped yet;
        // collect the partial buffer so it can still be saved.
        if self.worker.is_some() {
            self.reap_worker()?;
        }

        if self.frames.is_empty() {
            return Err(RecorderError::EmptyRecording);
        }

        let path = wav::write_recording(&self.frames, output_dir)?;
        *self.state.lock().unwrap() = SessionState::Idle;

        log::info!("recording saved to {}", path.display());
        Ok(path)
    }

    /// Signal the worker, join it, take the buffer, release the device and
    /// mark the session Stopped.  Returns the fault message when the capture
    /// ended on a device failure.
    fn reap_worker(&mut self) -> Result<Option<String>, RecorderError> {
        let Some(worker) = self.worker.take() else {
            return Ok(None);
        };

        worker.stop_flag.store(true, Ordering::SeqCst);
        let outcome = worker
            .handle
            .join()
            .map_err(|_| RecorderError::Internal("capture worker panicked".into()))?;

        // The worker has finished its last read; now the device may go.
        drop(worker.device);

        self.frames = outcome.frames;
        *self.state.lock().unwrap() = SessionState::Stopped;
        Ok(outcome.fault)
    }
}

// ---------------------------------------------------------------------------
// Capture worker
// ---------------------------------------------------------------------------

/// The background capture loop.
///
/// One blocking receive per iteration is the intended suspension point; the
/// short [`READ_WAKE`] timeout exists only so the stop flag is re-checked
/// when the device goes quiet.  On a device fault the worker reports the
/// interruption itself (state + event) because the control thread may be
/// blocked in its own UI loop at that moment.
fn capture_loop(
    rx: mpsc::Receiver<SourceMessage>,
    stop_flag: Arc<AtomicBool>,
    state: SharedState,
    counter: Arc<AtomicUsize>,
    event_tx: mpsc::Sender<SessionEvent>,
) -> CaptureOutcome {
    let mut frames = Vec::new();

    let fault = loop {
        if stop_flag.load(Ordering::SeqCst) {
            break None;
        }
        match rx.recv_timeout(READ_WAKE) {
            Ok(SourceMessage::Chunk(chunk)) => {
                frames.push(chunk);
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(SourceMessage::Fault(message)) => break Some(message),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                break Some("input stream closed unexpectedly".into())
            }
        }
    };

    match fault {
        Some(message) => {
            log::warn!("capture interrupted: {message}");
            *state.lock().unwrap() = SessionState::Stopped;
            // Receiver may be gone if the UI already shut down.
            let _ = event_tx.send(SessionEvent::CaptureInterrupted {
                message: message.clone(),
            });
            CaptureOutcome {
                frames,
                fault: Some(message),
            }
        }
        None => {
            // Stop flag path: salvage chunks the device delivered before the
            // flag was observed so nothing already captured is dropped.
            while let Ok(SourceMessage::Chunk(chunk)) = rx.try_recv() {
                frames.push(chunk);
                counter.fetch_add(1, Ordering::SeqCst);
            }
            CaptureOutcome {
                frames,
                fault: None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
