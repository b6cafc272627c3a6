use std::path::PathBuf;

use crate::io::media::MediaUrl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub url: MediaUrl,
    pub file: Option<PathBuf>,
}

/// What `Playlist::remove` took out.
#[derive(Debug, Clone)]
pub struct Removal {
    pub song: Song,
    pub index: usize,
    pub was_current: bool,
}

/// Ordered songs plus the index of the one loaded into the player.
#[derive(Debug, Default)]
pub struct Playlist {
    songs: Vec<Song>,
    current: Option<usize>,
    next_id: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a song and hand back its assigned id.
    pub fn push(&mut self, title: impl Into<String>, url: MediaUrl, file: Option<PathBuf>) -> &Song {
        self.next_id += 1;
        self.songs.push(Song {
            id: SongId(self.next_id),
            title: title.into(),
            url,
            file,
        });
        &self.songs[self.songs.len() - 1]
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn index_of(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|song| song.id == id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.current.and_then(|index| self.songs.get(index))
    }

    /// Point at `index`, or at nothing. Out-of-range indices clear it.
    pub fn set_current(&mut self, index: Option<usize>) {
        self.current = index.filter(|&i| i < self.songs.len());
    }

    /// Index after the current one, wrapping. First song when nothing is current.
    pub fn next_index(&self) -> Option<usize> {
        if self.songs.is_empty() {
            return None;
        }
        Some(match self.current {
            Some(index) => (index + 1) % self.songs.len(),
            None => 0,
        })
    }

    /// Index before the current one, wrapping. Last song when nothing is current.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.songs.len();
        if len == 0 {
            return None;
        }
        Some(match self.current {
            Some(index) => (index + len - 1) % len,
            None => len - 1,
        })
    }

    /// Remove a song. Removing the current song clears the current index;
    /// removing an earlier song shifts it down so it keeps naming the same song.
    pub fn remove(&mut self, id: SongId) -> Option<Removal> {
        let index = self.index_of(id)?;
        let song = self.songs.remove(index);

        let was_current = self.current == Some(index);
        self.current = match self.current {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        Some(Removal {
            song,
            index,
            was_current,
        })
    }
}
