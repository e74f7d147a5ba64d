use clap::Parser;
use dupes::cli::Cli;
use dupes::config::{Action, ScanConfig};
use dupes::duplicates::DuplicateFinder;
use dupes::error::ExitCode;
use dupes::signal::ShutdownHandler;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn layout() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(dst.join("one")).unwrap();
    fs::create_dir_all(dst.join("two")).unwrap();
    fs::write(src.join("a.txt"), "x").unwrap();
    fs::write(dst.join("one/a.txt"), "x").unwrap();
    fs::write(dst.join("two/a.txt"), "x").unwrap();
    (dir, src, dst)
}

fn run_cli(dir: &TempDir, src: &Path, dst: &Path, extra: &[&str]) -> (ExitCode, String) {
    let mut args = vec![
        "dupes".to_string(),
        "--config".to_string(),
        dir.path().join("absent.toml").display().to_string(),
        src.display().to_string(),
        dst.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    let cli = Cli::try_parse_from(args).unwrap();

    let mut out = Vec::new();
    let code = dupes::run_app(cli, &ShutdownHandler::new(), Cursor::new(""), &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_move_renames_on_collision() {
    let (dir, src, dst) = layout();
    let moved = dir.path().join("moved");
    fs::create_dir(&moved).unwrap();

    let (code, out) = run_cli(&dir, &src, &dst, &["-r", "--move", moved.to_str().unwrap()]);

    assert_eq!(code, ExitCode::Success);
    assert!(out.is_empty());
    assert!(moved.join("a.txt").is_file());
    assert!(moved.join("a_1.txt").is_file());
    assert!(!dst.join("one/a.txt").exists());
    assert!(!dst.join("two/a.txt").exists());
}

#[test]
fn test_move_never_overwrites_existing_files() {
    let (dir, src, dst) = layout();
    let moved = dir.path().join("moved");
    fs::create_dir(&moved).unwrap();
    fs::write(moved.join("a.txt"), "already here").unwrap();

    run_cli(&dir, &src, &dst, &["-r", "--move", moved.to_str().unwrap()]);

    assert_eq!(fs::read_to_string(moved.join("a.txt")).unwrap(), "already here");
    assert!(moved.join("a_1.txt").is_file());
    assert!(moved.join("a_2.txt").is_file());
}

#[test]
fn test_move_keep_tree_mirrors_target_layout() {
    let (dir, src, dst) = layout();
    let moved = dir.path().join("moved");

    let (code, _) = run_cli(
        &dir,
        &src,
        &dst,
        &["-r", "--move", moved.to_str().unwrap(), "--keep-tree"],
    );

    assert_eq!(code, ExitCode::Success);
    assert!(moved.join("one/a.txt").is_file());
    assert!(moved.join("two/a.txt").is_file());
    assert!(!moved.join("a_1.txt").exists());
}

#[test]
fn test_move_creates_missing_destination() {
    let (dir, src, dst) = layout();
    let moved = dir.path().join("not/yet/there");

    run_cli(&dir, &src, &dst, &["-r", "--move", moved.to_str().unwrap()]);
    assert!(moved.join("a.txt").is_file());
}

#[test]
fn test_move_report_counts() {
    let (dir, src, dst) = layout();
    fs::write(dst.join("other.txt"), "unrelated").unwrap();
    let config = ScanConfig::new(&src, &dst)
        .with_recursive(true)
        .with_action(Action::Move {
            destination: dir.path().join("moved"),
            keep_tree: false,
        })
        .validate()
        .unwrap();

    let mut prompt = dupes::actions::Prompt::new(Cursor::new(""), Vec::new());
    let report = DuplicateFinder::new(config)
        .run(&mut prompt, &mut Vec::new())
        .unwrap();

    assert_eq!(report.duplicates, 2);
    assert_eq!(report.moved, 2);
    assert_eq!(report.failed, 0);
    assert!(report.registry.is_empty());
    assert!(dst.join("other.txt").exists());
}

#[test]
fn test_moved_target_is_not_matched_again() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("a.txt"), "x").unwrap();
    fs::write(src.join("b.txt"), "x").unwrap();
    fs::write(dst.join("t.txt"), "x").unwrap();

    let config = ScanConfig::new(&src, &dst)
        .with_action(Action::Move {
            destination: dir.path().join("moved"),
            keep_tree: false,
        })
        .validate()
        .unwrap();
    let mut prompt = dupes::actions::Prompt::new(Cursor::new(""), Vec::new());
    let report = DuplicateFinder::new(config)
        .run(&mut prompt, &mut Vec::new())
        .unwrap();

    assert_eq!(report.moved, 1);
    assert_eq!(report.vanished, 1);
    assert!(!dir.path().join("moved/t_1.txt").exists());
}
