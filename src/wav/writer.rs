//! WAV encoding via `hound`.
//!
//! Writes the standard 44-byte RIFF/WAVE header (PCM format tag, 1 channel,
//! 44.1 kHz, 16 bits per sample) followed by the chunk data byte-concatenated
//! in original capture order.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use crate::audio::{AudioChunk, BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE};

use super::naming::next_output_path;

/// Errors that can occur while writing the output file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Writing a zero-length WAV is never useful; the caller gets an error
    /// instead of a header-only file on disk.
    #[error("refusing to write an empty recording")]
    EmptyData,

    /// Disk full, permission denied, invalid path, or a hound-level fault.
    #[error("{0}")]
    Wav(#[from] hound::Error),
}

/// Encode `frames` into a new WAV file in `output_dir`.
///
/// The destination name follows the policy in [`super::naming`]; the path
/// actually used is returned.  `output_dir` must already exist.
pub fn write_recording(frames: &[AudioChunk], output_dir: &Path) -> Result<PathBuf, WriteError> {
    if frames.is_empty() {
        return Err(WriteError::EmptyData);
    }

    let path = next_output_path(output_dir);
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(&path, spec)?;
    for chunk in frames {
        for &sample in chunk.samples() {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;

    log::debug!(
        "wrote {} chunks to {}",
        frames.len(),
        path.display()
    );
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FRAMES_PER_CHUNK;

    fn chunk_of(value: i16) -> AudioChunk {
        AudioChunk::new(vec![value; FRAMES_PER_CHUNK])
    }

    // ---- Happy path ---

    #[test]
    fn header_matches_the_capture_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_recording(&[chunk_of(1)], dir.path()).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, SampleFormat::Int);
    }

    #[test]
    fn data_is_chunk_bytes_in_capture_order() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![chunk_of(-3), chunk_of(0), chunk_of(7)];
        let path = write_recording(&frames, dir.path()).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

        let expected: Vec<i16> = frames
            .iter()
            .flat_map(|c| c.samples().iter().copied())
            .collect();
        assert_eq!(samples, expected);
    }

    #[test]
    fn file_size_is_header_plus_data() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![chunk_of(0); 10];
        let path = write_recording(&frames, dir.path()).unwrap();

        // 44-byte RIFF header + 10 × 1024 frames × 2 bytes.
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, 44 + 10 * 1024 * 2);
    }

    // ---- Collision policy ---

    #[test]
    fn existing_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_recording(&[chunk_of(1)], dir.path()).unwrap();
        let second = write_recording(&[chunk_of(2)], dir.path()).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());

        // The first file still holds its original data.
        let mut reader = hound::WavReader::open(&first).unwrap();
        let sample = reader.samples::<i16>().next().unwrap().unwrap();
        assert_eq!(sample, 1);
    }

    // ---- Error paths ---

    #[test]
    fn empty_frames_are_rejected_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_recording(&[], dir.path()).unwrap_err();

        assert!(matches!(err, WriteError::EmptyData));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_surfaces_a_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-subdir");

        let err = write_recording(&[chunk_of(1)], &missing).unwrap_err();
        assert!(matches!(err, WriteError::Wav(_)));
    }
}
