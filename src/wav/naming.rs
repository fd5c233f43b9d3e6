//! Output filename policy.
//!
//! The first recording in a directory is named `recording.wav`; when that
//! name is taken the suffix counts up (`recording_1.wav`, `recording_2.wav`,
//! …) until a free name is found.  Existing files are never overwritten.

use std::path::{Path, PathBuf};

/// Base file name for saved recordings.
pub const BASE_NAME: &str = "recording";

/// File extension for saved recordings.
pub const EXTENSION: &str = "wav";

/// First free output path in `dir` under the naming policy.
///
/// There is a window between picking the name and creating the file in
/// which another process could take it; for a desktop recorder saving one
/// file per user action that window is not worth closing with `O_EXCL`
/// plumbing through `hound`.
pub fn next_output_path(dir: &Path) -> PathBuf {
    let candidate = dir.join(format!("{BASE_NAME}.{EXTENSION}"));
    if !candidate.exists() {
        return candidate;
    }

    let mut n: u32 = 1;
    loop {
        let candidate = dir.join(format!("{BASE_NAME}_{n}.{EXTENSION}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn empty_directory_gets_the_base_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            next_output_path(dir.path()),
            dir.path().join("recording.wav")
        );
    }

    #[test]
    fn taken_base_name_falls_back_to_suffix_one() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("recording.wav")).unwrap();

        assert_eq!(
            next_output_path(dir.path()),
            dir.path().join("recording_1.wav")
        );
    }

    #[test]
    fn suffix_keeps_incrementing_past_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("recording.wav")).unwrap();
        File::create(dir.path().join("recording_1.wav")).unwrap();
        File::create(dir.path().join("recording_2.wav")).unwrap();

        assert_eq!(
            next_output_path(dir.path()),
            dir.path().join("recording_3.wav")
        );
    }

    #[test]
    fn gaps_in_the_sequence_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("recording.wav")).unwrap();
        File::create(dir.path().join("recording_2.wav")).unwrap();

        // _1 is free; the policy takes the lowest free suffix, not max+1.
        assert_eq!(
            next_output_path(dir.path()),
            dir.path().join("recording_1.wav")
        );
    }
}
