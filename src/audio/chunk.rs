//! Fixed capture format and the [`AudioChunk`] unit of buffered audio.
//!
//! The recorder captures with one fixed format: 16-bit signed PCM, mono,
//! 44.1 kHz, 1024 frames per chunk.  Every chunk in the frame buffer has
//! exactly [`FRAMES_PER_CHUNK`] samples; [`ChunkAssembler`] re-blocks the
//! arbitrarily-sized buffers the OS delivers into that shape.

// ---------------------------------------------------------------------------
// Capture format constants
// ---------------------------------------------------------------------------

/// Capture sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Number of interleaved channels (mono).
pub const CHANNELS: u16 = 1;

/// Bits per sample in the capture format and the output file.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Frames per [`AudioChunk`].  At 44.1 kHz this is ~23 ms of audio, which is
/// also the worst-case extra latency a cooperative stop can add.
pub const FRAMES_PER_CHUNK: usize = 1024;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One fixed-size block of captured PCM samples.
///
/// Immutable once produced: the capture worker appends chunks to the frame
/// buffer and nothing ever mutates them afterwards.  `samples.len()` is
/// always [`FRAMES_PER_CHUNK`] (mono, so frames == samples).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    samples: Box<[i16]>,
}

impl AudioChunk {
    /// Wrap exactly [`FRAMES_PER_CHUNK`] samples into a chunk.
    ///
    /// # Panics
    ///
    /// Panics if `samples.len() != FRAMES_PER_CHUNK`.  Chunks are only built
    /// by [`ChunkAssembler`] and by tests, both of which control the length.
    pub fn new(samples: Vec<i16>) -> Self {
        assert_eq!(
            samples.len(),
            FRAMES_PER_CHUNK,
            "AudioChunk requires exactly {FRAMES_PER_CHUNK} samples"
        );
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    /// The raw samples in capture order.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

// ---------------------------------------------------------------------------
// ChunkAssembler
// ---------------------------------------------------------------------------

/// Re-blocks incoming samples into exact [`FRAMES_PER_CHUNK`]-sized chunks.
///
/// The OS audio callback delivers buffers of whatever size the platform
/// chose, even when a 1024-frame buffer was requested.  The assembler
/// accumulates samples and emits a chunk each time a full block is
/// available; a trailing partial block stays pending until more samples
/// arrive (and is discarded when the assembler is dropped at stream close,
/// which loses at most one partial block — under 23 ms).
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    pending: Vec<i16>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `samples` in and collect every complete chunk they produce.
    pub fn push(&mut self, samples: &[i16]) -> Vec<AudioChunk> {
        self.pending.extend_from_slice(samples);

        let full = self.pending.len() / FRAMES_PER_CHUNK;
        let mut out = Vec::with_capacity(full);
        for _ in 0..full {
            let rest = self.pending.split_off(FRAMES_PER_CHUNK);
            let block = std::mem::replace(&mut self.pending, rest);
            out.push(AudioChunk::new(block));
        }
        out
    }

    /// Number of samples waiting for the next full block.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: i16, len: usize) -> Vec<i16> {
        (0..len).map(|i| start.wrapping_add(i as i16)).collect()
    }

    // ---- AudioChunk ---

    #[test]
    fn chunk_holds_exact_block() {
        let chunk = AudioChunk::new(vec![7; FRAMES_PER_CHUNK]);
        assert_eq!(chunk.samples().len(), FRAMES_PER_CHUNK);
        assert!(chunk.samples().iter().all(|&s| s == 7));
    }

    #[test]
    #[should_panic(expected = "exactly")]
    fn short_chunk_panics() {
        let _ = AudioChunk::new(vec![0; FRAMES_PER_CHUNK - 1]);
    }

    // ---- ChunkAssembler ---

    #[test]
    fn small_pushes_accumulate_until_full() {
        let mut asm = ChunkAssembler::new();
        assert!(asm.push(&ramp(0, 1000)).is_empty());
        assert_eq!(asm.pending_len(), 1000);

        let chunks = asm.push(&ramp(1000, 24));
        assert_eq!(chunks.len(), 1);
        assert_eq!(asm.pending_len(), 0);
        assert_eq!(chunks[0].samples(), ramp(0, FRAMES_PER_CHUNK).as_slice());
    }

    #[test]
    fn oversized_push_emits_multiple_chunks() {
        let mut asm = ChunkAssembler::new();
        let chunks = asm.push(&ramp(0, FRAMES_PER_CHUNK * 2 + 100));

        assert_eq!(chunks.len(), 2);
        assert_eq!(asm.pending_len(), 100);
        // Sample order must be preserved across chunk boundaries.
        assert_eq!(chunks[0].samples()[FRAMES_PER_CHUNK - 1], 1023);
        assert_eq!(chunks[1].samples()[0], 1024);
    }

    #[test]
    fn exact_block_leaves_nothing_pending() {
        let mut asm = ChunkAssembler::new();
        let chunks = asm.push(&ramp(0, FRAMES_PER_CHUNK));
        assert_eq!(chunks.len(), 1);
        assert_eq!(asm.pending_len(), 0);
    }

    #[test]
    fn empty_push_is_noop() {
        let mut asm = ChunkAssembler::new();
        assert!(asm.push(&[]).is_empty());
        assert_eq!(asm.pending_len(), 0);
    }
}
