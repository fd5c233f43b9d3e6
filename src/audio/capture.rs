//! Input device seam and the cpal production backend.
//!
//! [`InputBackend::open`] opens the microphone with the fixed capture format
//! and starts pushing [`SourceMessage`]s to the capture worker over an mpsc
//! channel.  The returned [`DeviceStream`] is a RAII guard — dropping it
//! releases the device.  [`CpalBackend`] is the production implementation;
//! tests substitute a scripted backend behind the same trait.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::mpsc;
use thiserror::Error;

use super::chunk::{AudioChunk, ChunkAssembler, CHANNELS, SAMPLE_RATE};

// ---------------------------------------------------------------------------
// SourceMessage
// ---------------------------------------------------------------------------

/// What an open device pushes to the capture worker.
#[derive(Debug)]
pub enum SourceMessage {
    /// One complete fixed-size block of captured audio.
    Chunk(AudioChunk),

    /// The stream failed (device unplugged, backend error).  No further
    /// chunks will arrive after this message.
    Fault(String),
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while opening the input device.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("input device {0:?} not found")]
    DeviceNotFound(String),

    #[error("failed to enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// InputBackend / DeviceStream
// ---------------------------------------------------------------------------

/// Scoped handle to an open input stream.
///
/// Implementations release the underlying device in `Drop`.  The session
/// keeps the guard on the control thread for the duration of Recording
/// (cpal streams are not `Send` on every platform) and drops it after the
/// capture worker has been joined.
pub trait DeviceStream {}

/// Factory seam for opening the input device.
///
/// `tx` is the sender half of the chunk channel; the backend pushes
/// [`SourceMessage`]s into it from whatever thread the platform uses for
/// its audio callbacks.  Send errors must be ignored — the receiver is
/// dropped when the capture worker exits.
pub trait InputBackend {
    /// Open the input with the fixed capture format (16-bit mono 44.1 kHz).
    fn open(&self, tx: mpsc::Sender<SourceMessage>) -> Result<Box<dyn DeviceStream>, CaptureError>;
}

// ---------------------------------------------------------------------------
// CpalBackend
// ---------------------------------------------------------------------------

/// Production [`InputBackend`] built on `cpal`.
///
/// Captures from the named input device, or the system default when no name
/// is configured.  Whatever native sample format the device reports
/// (i16/u16/f32) is converted to i16 in the callback, and the callback
/// buffers are re-blocked through [`ChunkAssembler`] so downstream code only
/// ever sees exact [`FRAMES_PER_CHUNK`](super::chunk::FRAMES_PER_CHUNK)-frame
/// chunks.
pub struct CpalBackend {
    device_name: Option<String>,
}

impl CpalBackend {
    /// `device_name: None` selects the system default input device.
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }

    fn resolve_device(&self, host: &cpal::Host) -> Result<cpal::Device, CaptureError> {
        match &self.device_name {
            Some(wanted) => host
                .input_devices()?
                .find(|d| d.name().map(|n| n == *wanted).unwrap_or(false))
                .ok_or_else(|| CaptureError::DeviceNotFound(wanted.clone())),
            None => host.default_input_device().ok_or(CaptureError::NoDevice),
        }
    }

    fn build_stream_typed<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        tx: mpsc::Sender<SourceMessage>,
    ) -> Result<cpal::Stream, CaptureError>
    where
        T: SizedSample,
        i16: FromSample<T>,
    {
        let mut assembler = ChunkAssembler::new();
        let mut scratch: Vec<i16> = Vec::new();
        let fault_tx = tx.clone();

        let stream = device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                scratch.clear();
                scratch.extend(data.iter().map(|&s| i16::from_sample(s)));
                for chunk in assembler.push(&scratch) {
                    // Ignore send errors; the worker may already have exited.
                    let _ = tx.send(SourceMessage::Chunk(chunk));
                }
            },
            move |err: cpal::StreamError| {
                log::error!("input stream fault: {err}");
                let _ = fault_tx.send(SourceMessage::Fault(err.to_string()));
            },
            None, // no timeout
        )?;

        stream.play()?;
        Ok(stream)
    }
}

impl InputBackend for CpalBackend {
    fn open(&self, tx: mpsc::Sender<SourceMessage>) -> Result<Box<dyn DeviceStream>, CaptureError> {
        let host = cpal::default_host();
        let device = self.resolve_device(&host)?;

        log::info!(
            "opening input device: {}",
            device.name().unwrap_or_else(|_| "<unnamed>".into())
        );

        let sample_format = device.default_input_config()?.sample_format();

        // Fixed capture format; buffer size is left to the platform because
        // the assembler re-blocks to 1024-frame chunks anyway.
        let config = cpal::StreamConfig {
            channels: CHANNELS,
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match sample_format {
            cpal::SampleFormat::I16 => self.build_stream_typed::<i16>(&device, &config, tx),
            cpal::SampleFormat::U16 => self.build_stream_typed::<u16>(&device, &config, tx),
            cpal::SampleFormat::F32 => self.build_stream_typed::<f32>(&device, &config, tx),
            other => Err(CaptureError::UnsupportedFormat(other)),
        }?;

        Ok(Box::new(CpalStream { _stream: stream }))
    }
}

/// RAII guard over the live cpal stream.  Dropping it stops capture and
/// releases the device.
struct CpalStream {
    _stream: cpal::Stream,
}

impl DeviceStream for CpalStream {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// `SourceMessage` crosses from the audio callback thread to the worker.
    #[test]
    fn source_message_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SourceMessage>();
    }

    #[test]
    fn capture_error_messages_are_descriptive() {
        assert_eq!(
            CaptureError::NoDevice.to_string(),
            "no input device found on the default audio host"
        );
        assert!(CaptureError::DeviceNotFound("USB Mic".into())
            .to_string()
            .contains("USB Mic"));
    }
}
