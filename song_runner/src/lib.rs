use std::{fs, path::Path};

use anyhow::{bail, Context};
use log::warn;
use song_schema::{Song, SongCatalog};

pub fn load_song_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<Song> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read song: {}", path.display()))?;
    let song: Song = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse song json: {}", path.display()))?;
    check_song(&song).with_context(|| format!("invalid song: {}", path.display()))?;
    Ok(song)
}

pub fn load_song_json_from_str(json: &str) -> anyhow::Result<Song> {
    let song: Song = serde_json::from_str(json).context("failed to parse song json")?;
    check_song(&song)?;
    Ok(song)
}

pub fn load_catalog_from_path(path: impl AsRef<Path>) -> anyhow::Result<SongCatalog> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read catalog: {}", path.display()))?;
    let catalog: SongCatalog = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse catalog json: {}", path.display()))?;
    check_catalog(&catalog).with_context(|| format!("invalid catalog: {}", path.display()))?;
    Ok(catalog)
}

pub fn load_catalog_from_str(json: &str) -> anyhow::Result<SongCatalog> {
    let catalog: SongCatalog = serde_json::from_str(json).context("failed to parse catalog json")?;
    check_catalog(&catalog)?;
    Ok(catalog)
}

/// Rejects times the engine cannot order. Unsorted notes are accepted with
/// a warning; the engine indexes them by time anyway.
pub fn check_song(song: &Song) -> anyhow::Result<()> {
    if !song.duration.is_finite() || song.duration < 0.0 {
        bail!("song `{}` has invalid duration {}", song.id, song.duration);
    }
    for (i, note) in song.notes.iter().enumerate() {
        if !note.time.is_finite() || note.time < 0.0 {
            bail!("song `{}` note {} ({}) has invalid time {}", song.id, i, note.note, note.time);
        }
        if note.note.is_empty() {
            bail!("song `{}` note {} has an empty pitch", song.id, i);
        }
    }
    if !song.is_sorted() {
        warn!("song `{}` notes are not sorted by time", song.id);
    }
    Ok(())
}

fn check_catalog(catalog: &SongCatalog) -> anyhow::Result<()> {
    for (i, song) in catalog.songs.iter().enumerate() {
        if catalog.songs[..i].iter().any(|s| s.id == song.id) {
            bail!("duplicate song id `{}`", song.id);
        }
        check_song(song)?;
    }
    Ok(())
}
