//! Audio capture — device seam → chunk assembly → capture session.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → ChunkAssembler → SourceMessage (mpsc)
//!           → capture worker → frame buffer → (join at stop) → save
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use micrec::audio::{CpalBackend, RecorderSession};
//!
//! let (event_tx, _event_rx) = mpsc::channel();
//! let mut session = RecorderSession::new(Box::new(CpalBackend::new(None)), event_tx);
//!
//! session.start().unwrap();
//! std::thread::sleep(std::time::Duration::from_secs(2));
//! session.stop().unwrap();
//! session.save(std::path::Path::new(".")).unwrap();
//! ```

pub mod capture;
pub mod chunk;
pub mod session;
pub mod state;

pub use capture::{CaptureError, CpalBackend, DeviceStream, InputBackend, SourceMessage};
pub use chunk::{
    AudioChunk, ChunkAssembler, BITS_PER_SAMPLE, CHANNELS, FRAMES_PER_CHUNK, SAMPLE_RATE,
};
pub use session::{RecorderError, RecorderSession, SessionEvent};
pub use state::{new_shared_state, SessionState, SharedState};
