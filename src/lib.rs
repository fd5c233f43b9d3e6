//! micrec — minimal desktop microphone recorder.
//!
//! Captures 16-bit mono 44.1 kHz PCM from an input device into an in-memory
//! frame buffer and saves it to a WAV file.  The library exposes exactly the
//! surface a UI layer needs: `start()`, `stop()`, `save(dir)`, a pollable
//! state handle and an event channel for mid-capture device failures.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use micrec::audio::{CpalBackend, RecorderSession};
//!
//! let (event_tx, _event_rx) = mpsc::channel();
//! let mut session = RecorderSession::new(Box::new(CpalBackend::new(None)), event_tx);
//!
//! session.start().unwrap();
//! std::thread::sleep(std::time::Duration::from_secs(3));
//! session.stop().unwrap();
//! let path = session.save(std::path::Path::new(".")).unwrap();
//! println!("saved {}", path.display());
//! ```

pub mod audio;
pub mod config;
pub mod wav;

pub use audio::{RecorderError, RecorderSession, SessionEvent, SessionState};
pub use config::RecorderConfig;
