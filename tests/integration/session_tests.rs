use dupfinder::app::{Session, SessionEnd, SessionOptions};
use dupfinder::duplicates::{FinderConfig, SortOrder};
use dupfinder::error::ExitCode;
use dupfinder::prompt::{LinePrompt, ScriptedPrompt};
use std::fs;
use tempfile::{tempdir, TempDir};

fn music_library() -> TempDir {
    let dir = tempdir().unwrap();
    let albums = dir.path().join("albums");
    let inbox = dir.path().join("inbox");
    fs::create_dir_all(&albums).unwrap();
    fs::create_dir_all(&inbox).unwrap();

    fs::write(albums.join("song.mp3"), "m".repeat(300)).unwrap();
    fs::write(inbox.join("song (1).mp3"), "m".repeat(300)).unwrap();
    fs::write(albums.join("intro.mp3"), "i".repeat(30)).unwrap();
    fs::write(inbox.join("intro.mp3"), "i".repeat(30)).unwrap();
    fs::write(inbox.join("other.mp3"), "o".repeat(30)).unwrap();
    fs::write(inbox.join("notes.txt"), "m".repeat(300)).unwrap();
    dir
}

#[test]
fn test_listing_is_numbered_in_table_order() {
    let dir = music_library();
    let prompt = ScriptedPrompt::new([".mp3", "2", "y", "n"]);
    let mut session = Session::new(
        FinderConfig::default(),
        SessionOptions::default(),
        prompt,
        Vec::new(),
    );

    let report = session.run(dir.path()).unwrap();
    let out = String::from_utf8(session.into_parts().1).unwrap();

    assert_eq!(report.end, SessionEnd::DeletionDeclined);
    assert_eq!(report.duplicate_files, Some(4));

    // Ascending: the 30-byte group is numbered first
    let small = out.find("1. ").unwrap();
    let large = out.find("3. ").unwrap();
    assert!(out[small..].starts_with(&format!(
        "1. {}",
        dir.path().join("albums").join("intro.mp3").display()
    )));
    assert!(out[large..].contains("song.mp3"));
    assert!(!out
        .lines()
        .any(|line| line.contains(". ") && line.ends_with("other.mp3")));
    assert!(!out.contains("notes.txt"));
}

#[test]
fn test_invalid_answers_are_reasked() {
    let dir = music_library();
    let prompt = ScriptedPrompt::new([
        ".mp3", "0", "1", "sure", "y", "yes", "", "5", "4 4",
    ]);
    let mut session = Session::new(
        FinderConfig::default(),
        SessionOptions::default(),
        prompt,
        Vec::new(),
    );

    let report = session.run(dir.path()).unwrap();
    let (prompt, out) = session.into_parts();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(report.end, SessionEnd::Deleted);
    assert_eq!(prompt.remaining(), 0);
    // Descending: number 4 is the second 30-byte file
    assert!(!dir.path().join("inbox").join("intro.mp3").exists());
    assert!(dir.path().join("albums").join("intro.mp3").exists());
    assert_eq!(report.bytes_freed(), 30);
    assert!(out.contains("Total freed up space: 30 bytes"));
    assert_eq!(out.matches("Wrong option").count(), 4);
}

#[test]
fn test_session_over_line_prompt() {
    let dir = music_library();
    let input = b"\n1\ny\ny\n1 3\n" as &[u8];
    let mut shown = Vec::new();
    let mut session = Session::new(
        FinderConfig::default(),
        SessionOptions::default(),
        LinePrompt::new(input, &mut shown),
        Vec::new(),
    );

    let report = session.run(dir.path()).unwrap();
    drop(session);

    // Empty suffix: notes.txt joins the 300-byte bucket and the song group
    assert_eq!(report.end, SessionEnd::Deleted);
    assert_eq!(report.bytes_freed(), 600);
    assert_eq!(report.exit_code(), ExitCode::Success);
    let questions = String::from_utf8(shown).unwrap();
    assert!(questions.starts_with("Enter file format:\n"));
}

#[test]
fn test_preanswered_session_asks_nothing() {
    let dir = music_library();
    let options = SessionOptions {
        suffix: Some(".txt".to_string()),
        sort_order: Some(SortOrder::Descending),
        check: true,
        ..Default::default()
    };
    let mut session = Session::new(
        FinderConfig::default(),
        options,
        ScriptedPrompt::new(Vec::<String>::new()),
        Vec::new(),
    );

    let report = session.run(dir.path()).unwrap();

    assert_eq!(report.end, SessionEnd::NoDuplicates);
    assert_eq!(report.exit_code(), ExitCode::NoDuplicates);
    assert!(session.into_parts().0.asked.is_empty());
}
