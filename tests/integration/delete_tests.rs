use clap::Parser;
use dupes::actions::Prompt;
use dupes::cli::Cli;
use dupes::config::{Action, ScanConfig};
use dupes::duplicates::{DuplicateFinder, FinderError, ScanReport};
use dupes::error::ExitCode;
use dupes::signal::ShutdownHandler;
use std::fs;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// One source file and three identical target files.
fn layout() -> (TempDir, PathBuf, PathBuf, Vec<PathBuf>) {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("a.txt"), "x").unwrap();
    let targets = ["1.txt", "2.txt", "3.txt"]
        .iter()
        .map(|name| {
            let path = dst.join(name);
            fs::write(&path, "x").unwrap();
            path
        })
        .collect();
    (dir, src, dst, targets)
}

/// Run a confirmed delete scan, returning the report and how many prompts were shown.
fn run_delete(src: &Path, dst: &Path, answers: &[u8]) -> (ScanReport, usize) {
    let config = ScanConfig::new(src, dst)
        .with_action(Action::Delete { confirm: true })
        .validate()
        .unwrap();
    let mut prompt = Prompt::new(Cursor::new(answers.to_vec()), Vec::new());
    let report = DuplicateFinder::new(config)
        .run(&mut prompt, &mut Vec::new())
        .unwrap();
    let shown = String::from_utf8(prompt.into_output()).unwrap();
    (report, shown.matches("[Y/n/a/q]").count())
}

fn remaining(targets: &[PathBuf]) -> usize {
    targets.iter().filter(|path| path.exists()).count()
}

#[test]
fn test_decline_then_quit_stops_immediately() {
    let (_dir, src, dst, targets) = layout();

    let (report, prompts) = run_delete(&src, &dst, b"n\nq\n");

    assert!(report.quit);
    assert_eq!(prompts, 2);
    assert_eq!(report.declined, 1);
    assert_eq!(report.deleted, 0);
    assert_eq!(remaining(&targets), 3);
}

#[test]
fn test_decline_then_quit_exits_successfully() {
    let (dir, src, dst, targets) = layout();
    let cli = Cli::try_parse_from([
        "dupes".to_string(),
        "--config".to_string(),
        dir.path().join("absent.toml").display().to_string(),
        src.display().to_string(),
        dst.display().to_string(),
        "--action".to_string(),
        "delete".to_string(),
    ])
    .unwrap();

    let mut out = Vec::new();
    let code = dupes::run_app(cli, &ShutdownHandler::new(), Cursor::new("n\nq\n"), &mut out).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(out.is_empty());
    assert_eq!(remaining(&targets), 3);
}

#[test]
fn test_empty_answer_means_yes() {
    let (_dir, src, dst, targets) = layout();

    let (report, prompts) = run_delete(&src, &dst, b"\n\n\n");

    assert_eq!(prompts, 3);
    assert_eq!(report.deleted, 3);
    assert_eq!(remaining(&targets), 0);
}

#[test]
fn test_all_stops_asking() {
    let (_dir, src, dst, targets) = layout();

    let (report, prompts) = run_delete(&src, &dst, b"n\na\n");

    assert_eq!(prompts, 2);
    assert_eq!(report.declined, 1);
    assert_eq!(report.deleted, 2);
    assert_eq!(remaining(&targets), 1);
    assert!(!report.quit);
}

#[test]
fn test_end_of_input_quits() {
    let (_dir, src, dst, targets) = layout();

    let (report, prompts) = run_delete(&src, &dst, b"y\n");

    assert!(report.quit);
    assert_eq!(prompts, 2);
    assert_eq!(report.deleted, 1);
    assert_eq!(remaining(&targets), 2);
}

#[test]
fn test_no_confirm_deletes_everything() {
    let (dir, src, dst, targets) = layout();
    fs::write(dst.join("keep.txt"), "different").unwrap();
    let cli = Cli::try_parse_from([
        "dupes".to_string(),
        "--config".to_string(),
        dir.path().join("absent.toml").display().to_string(),
        src.display().to_string(),
        dst.display().to_string(),
        "--action".to_string(),
        "delete".to_string(),
        "--no-confirm".to_string(),
    ])
    .unwrap();

    // an empty input would quit at the first prompt, so nothing may ask
    let code = dupes::run_app(cli, &ShutdownHandler::new(), Cursor::new(""), Vec::new()).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(remaining(&targets), 0);
    assert!(dst.join("keep.txt").exists());
    assert!(src.join("a.txt").exists());
}

#[test]
fn test_invalid_utf8_answer_is_asked_again() {
    let (_dir, src, dst, targets) = layout();

    let (report, prompts) = run_delete(&src, &dst, b"\xff\n\n\n\n");

    assert!(!report.quit);
    assert_eq!(prompts, 4);
    assert_eq!(report.deleted, 3);
    assert_eq!(remaining(&targets), 0);
}

/// Console that fails on every read.
struct Unreadable;

impl Read for Unreadable {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("terminal gone"))
    }
}

#[test]
fn test_unreadable_console_is_an_error() {
    let (dir, src, dst, targets) = layout();
    let cli = Cli::try_parse_from([
        "dupes".to_string(),
        "--config".to_string(),
        dir.path().join("absent.toml").display().to_string(),
        src.display().to_string(),
        dst.display().to_string(),
        "--action".to_string(),
        "delete".to_string(),
    ])
    .unwrap();

    let result = dupes::run_app(
        cli,
        &ShutdownHandler::new(),
        BufReader::new(Unreadable),
        Vec::new(),
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FinderError>(),
        Some(FinderError::Prompt(_))
    ));
    assert_eq!(remaining(&targets), 3);
}

#[cfg(unix)]
#[test]
fn test_undeletable_duplicate_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    let locked = dst.join("locked");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&locked).unwrap();
    fs::write(src.join("a.txt"), "x").unwrap();
    fs::write(locked.join("a.txt"), "x").unwrap();
    fs::write(dst.join("b.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // root ignores directory permissions
    if fs::File::create(locked.join("probe")).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let config = ScanConfig::new(&src, &dst)
        .with_recursive(true)
        .with_action(Action::Delete { confirm: false })
        .validate()
        .unwrap();
    let mut prompt = Prompt::new(Cursor::new(""), Vec::new());
    let report = DuplicateFinder::new(config)
        .run(&mut prompt, &mut Vec::new())
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(report.duplicates, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.deleted, 1);
    assert!(locked.join("a.txt").exists());
    assert!(!dst.join("b.txt").exists());
}
