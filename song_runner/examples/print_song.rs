use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let song = song_runner::load_song_json_from_path(args.path)?;
    println!("id={}", song.id);
    println!("title={}", song.title);
    println!("artist={}", song.artist);
    println!("difficulty={}", song.difficulty.as_str());
    println!("duration={:.3}", song.duration);
    println!("notes={}", song.note_count());
    Ok(())
}
