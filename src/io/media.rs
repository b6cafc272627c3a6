//! Registry of playable media, addressed by url.
//!
//! A url stays resolvable until it is revoked. Files are decoded lazily on
//! resolve. Only the most recently decoded file keeps its samples cached;
//! decoding another file releases them, so memory holds one track at a time
//! no matter how long the playlist runs.

use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    sync::Arc,
};

use tracing::debug;

use super::decoder::{decode_file, DecodedAudio};
use crate::error::{PlayerError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaUrl(String);

impl MediaUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct MediaEntry {
    path: Option<PathBuf>,
    audio: Option<Arc<DecodedAudio>>,
}

#[derive(Default)]
pub struct MediaStore {
    entries: HashMap<MediaUrl, MediaEntry>,
    /// File entry whose decoded audio is currently cached.
    decoded_file: Option<MediaUrl>,
    next_id: u64,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file; decoding happens on first `resolve`.
    pub fn register_file(&mut self, path: impl Into<PathBuf>) -> MediaUrl {
        let path = path.into();
        let url = self.mint_url(&path.display().to_string());
        self.entries.insert(
            url.clone(),
            MediaEntry {
                path: Some(path),
                audio: None,
            },
        );
        url
    }

    /// Register audio that is already in memory.
    pub fn register_decoded(&mut self, audio: DecodedAudio) -> MediaUrl {
        let url = self.mint_url("memory");
        self.entries.insert(
            url.clone(),
            MediaEntry {
                path: None,
                audio: Some(Arc::new(audio)),
            },
        );
        url
    }

    /// Decoded audio behind `url`. Decoding a file releases the samples
    /// cached for the previously decoded one.
    pub fn resolve(&mut self, url: &MediaUrl) -> Result<Arc<DecodedAudio>> {
        let entry = self
            .entries
            .get(url)
            .ok_or_else(|| PlayerError::UnknownMedia(url.clone()))?;

        if let Some(audio) = &entry.audio {
            return Ok(Arc::clone(audio));
        }

        let path = entry
            .path
            .clone()
            .ok_or_else(|| PlayerError::UnknownMedia(url.clone()))?;
        let audio = Arc::new(decode_file(&path)?);

        self.release_decoded_file();
        if let Some(entry) = self.entries.get_mut(url) {
            entry.audio = Some(Arc::clone(&audio));
        }
        self.decoded_file = Some(url.clone());
        Ok(audio)
    }

    /// True if `url` can be resolved without decoding.
    pub fn is_cached(&self, url: &MediaUrl) -> bool {
        self.entries
            .get(url)
            .is_some_and(|entry| entry.audio.is_some())
    }

    /// Release `url`. Returns false if it was not registered.
    pub fn revoke(&mut self, url: &MediaUrl) -> bool {
        let removed = self.entries.remove(url).is_some();
        if self.decoded_file.as_ref() == Some(url) {
            self.decoded_file = None;
        }
        if removed {
            debug!(%url, "revoked media url");
        }
        removed
    }

    pub fn contains(&self, url: &MediaUrl) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn release_decoded_file(&mut self) {
        let Some(url) = self.decoded_file.take() else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(&url) {
            entry.audio = None;
            debug!(%url, "released decoded audio");
        }
    }

    fn mint_url(&mut self, label: &str) -> MediaUrl {
        self.next_id += 1;
        MediaUrl(format!("media:{}#{}", self.next_id, label))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn clip() -> DecodedAudio {
        DecodedAudio::from_samples(vec![0.25; 480], 1, 48_000)
    }

    fn write_wav(path: &Path, seconds: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(seconds * 8_000.0) as usize {
            writer.write_sample(8_000i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decoded_media_resolves_to_shared_buffer() {
        let mut store = MediaStore::new();
        let url = store.register_decoded(clip());

        let a = store.resolve(&url).unwrap();
        let b = store.resolve(&url).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn urls_are_unique() {
        let mut store = MediaStore::new();
        let a = store.register_decoded(clip());
        let b = store.register_decoded(clip());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn revoked_url_no_longer_resolves() {
        let mut store = MediaStore::new();
        let url = store.register_decoded(clip());

        assert!(store.revoke(&url));
        assert!(!store.revoke(&url));
        assert!(matches!(
            store.resolve(&url),
            Err(PlayerError::UnknownMedia(_))
        ));
    }

    #[test]
    fn missing_file_fails_on_resolve_not_register() {
        let mut store = MediaStore::new();
        let url = store.register_file("/nonexistent/song.mp3");
        assert!(store.contains(&url));
        assert!(store.resolve(&url).is_err());
    }

    #[test]
    fn decoding_a_new_file_releases_the_previous_one() {
        let dir = tempfile::tempdir().unwrap();
        let (a_path, b_path) = (dir.path().join("a.wav"), dir.path().join("b.wav"));
        write_wav(&a_path, 0.5);
        write_wav(&b_path, 0.5);

        let mut store = MediaStore::new();
        let a = store.register_file(&a_path);
        let b = store.register_file(&b_path);

        let a_audio = store.resolve(&a).unwrap();
        assert!(store.is_cached(&a));
        assert_eq!(Arc::strong_count(&a_audio), 2);

        let b_audio = store.resolve(&b).unwrap();
        assert_eq!(Arc::strong_count(&a_audio), 1, "store let go of a");
        assert!(!store.is_cached(&a));
        assert!(store.is_cached(&b));
        assert!(Arc::ptr_eq(&b_audio, &store.resolve(&b).unwrap()));
    }

    #[test]
    fn in_memory_audio_stays_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, 0.25);

        let mut store = MediaStore::new();
        let memory = store.register_decoded(clip());
        let file = store.register_file(&path);
        store.resolve(&file).unwrap();

        assert!(store.is_cached(&memory));
        assert!(store.revoke(&file));
        assert!(!store.is_cached(&file));
    }
}
