use serde::{Deserialize, Serialize};

pub type Seconds = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub difficulty: Difficulty,
    /// Total length of the play session.
    pub duration: Seconds,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// Pitch name such as `C4` or `F#5`.
    pub note: String,
    pub time: Seconds,
    #[serde(default)]
    pub duration: Seconds,
}

impl Song {
    /// True when notes are in non-decreasing start-time order.
    pub fn is_sorted(&self) -> bool {
        self.notes.windows(2).all(|w| w[0].time <= w[1].time)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Time of the last note onset, or `None` for an empty song.
    pub fn last_note_time(&self) -> Option<Seconds> {
        self.notes.iter().map(|n| n.time).reduce(f64::max)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SongCatalog {
    pub songs: Vec<Song>,
}

impl SongCatalog {
    pub fn find(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Song> {
        self.songs.iter().filter(move |s| s.difficulty == difficulty)
    }
}
