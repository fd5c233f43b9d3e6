//! File writer — serializes a captured frame buffer into a RIFF/WAVE file.
//!
//! Two pieces: the collision-safe naming policy ([`naming`]) and the actual
//! WAV encoding via `hound` ([`writer`]).  Saving is synchronous on the
//! calling thread; no extra concurrency is spawned here.

pub mod naming;
pub mod writer;

pub use naming::next_output_path;
pub use writer::{write_recording, WriteError};
