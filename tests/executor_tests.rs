//! Integration tests for the plan runner.
//!
//! Tests cover:
//! - Renames and moves on disk
//! - Partial failure
//! - Cancellation between operations
//! - Dry run leaves the filesystem alone

use merge_into_series::core::executor::{Runner, RunnerConfig};
use merge_into_series::models::media::EpisodeId;
use merge_into_series::models::plan::{ActionType, Operation, OperationStatus};
use merge_into_series::utils::cancel::CancelToken;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn runner() -> Runner {
    Runner::with_config(RunnerConfig {
        show_progress: false,
        ..Default::default()
    })
}

fn op(e: u32, source: &Path, destination: PathBuf, action: ActionType) -> Operation {
    Operation {
        episode: EpisodeId::new(1, e),
        source: source.to_path_buf(),
        destination,
        action,
        status: OperationStatus::Pending,
        reason: None,
    }
}

#[test]
fn test_execute_rename_and_move() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let series_dir = target.path().join("Storyville");

    let a = source.path().join("armageddon.mkv");
    let b = series_dir.join("contestant.mp4");
    fs::write(&a, "episode one").unwrap();
    fs::create_dir_all(&series_dir).unwrap();
    fs::write(&b, "episode two").unwrap();

    let moved = series_dir.join("Storyville - S01E01 - Praying for Armageddon.mkv");
    let renamed = series_dir.join("Storyville - S01E02 - The Contestant.mp4");
    let ops = vec![
        op(1, &a, moved.clone(), ActionType::Move),
        op(2, &b, renamed.clone(), ActionType::Rename),
    ];

    let report = runner().execute(ops, &CancelToken::new());

    assert!(report.is_success());
    assert_eq!(report.executed(), 2);
    assert!(!a.exists());
    assert!(!b.exists());
    assert_eq!(fs::read_to_string(&moved).unwrap(), "episode one");
    assert_eq!(fs::read_to_string(&renamed).unwrap(), "episode two");
}

#[test]
fn test_move_creates_target_directory() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let a = source.path().join("a.mkv");
    fs::write(&a, "x").unwrap();

    let destination = target.path().join("New Series").join("Show - S01E01 - Pilot.mkv");
    let report = runner().execute(
        vec![op(1, &a, destination.clone(), ActionType::Move)],
        &CancelToken::new(),
    );

    assert_eq!(report.executed(), 1);
    assert!(destination.exists());
}

#[test]
fn test_failure_does_not_stop_the_batch() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let vanished = source.path().join("gone.mkv");
    let present = source.path().join("here.mkv");
    fs::write(&present, "x").unwrap();

    let ops = vec![
        op(1, &vanished, target.path().join("one.mkv"), ActionType::Move),
        op(2, &present, target.path().join("two.mkv"), ActionType::Move),
    ];
    let report = runner().execute(ops, &CancelToken::new());

    assert!(!report.is_success());
    assert_eq!(report.failed(), 1);
    assert_eq!(report.executed(), 1);
    assert_eq!(report.operations[0].status, OperationStatus::Failed);
    assert!(report.operations[0].reason.is_some());
    assert!(target.path().join("two.mkv").exists());
}

#[test]
fn test_existing_destination_is_never_overwritten() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let a = source.path().join("a.mkv");
    let taken = target.path().join("taken.mkv");
    fs::write(&a, "new").unwrap();
    fs::write(&taken, "old").unwrap();

    let report = runner().execute(
        vec![op(1, &a, taken.clone(), ActionType::Move)],
        &CancelToken::new(),
    );

    assert_eq!(report.failed(), 1);
    assert_eq!(fs::read_to_string(&taken).unwrap(), "old");
    assert!(a.exists());
}

#[test]
fn test_cancelled_before_execution_leaves_everything_pending() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let a = source.path().join("a.mkv");
    let b = source.path().join("b.mkv");
    fs::write(&a, "x").unwrap();
    fs::write(&b, "y").unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let report = runner().execute(
        vec![
            op(1, &a, target.path().join("1.mkv"), ActionType::Move),
            op(2, &b, target.path().join("2.mkv"), ActionType::Move),
        ],
        &cancel,
    );

    assert!(report.cancelled);
    assert_eq!(report.executed(), 0);
    assert_eq!(report.not_attempted(), 2);
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_non_pending_operations_pass_through() {
    let source = TempDir::new().unwrap();
    let a = source.path().join("a.mkv");
    fs::write(&a, "x").unwrap();

    let mut skipped = op(1, &a, source.path().join("a.mkv"), ActionType::Rename);
    skipped.skip("already in place");

    let report = runner().execute(vec![skipped], &CancelToken::new());

    assert!(report.is_success());
    assert_eq!(report.skipped(), 1);
    assert!(a.exists());
}

#[test]
fn test_dry_run_touches_nothing() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let a = source.path().join("armageddon.mkv");
    let b = target.path().join("contestant.mp4");
    fs::write(&a, "x").unwrap();
    fs::write(&b, "y").unwrap();

    let ops = vec![
        op(
            1,
            &a,
            target.path().join("Storyville - S01E01 - Praying for Armageddon.mkv"),
            ActionType::Move,
        ),
        op(
            2,
            &b,
            target.path().join("Storyville - S01E02 - The Contestant.mp4"),
            ActionType::Rename,
        ),
    ];

    let preview = runner().dry_run(&ops).unwrap();

    assert!(preview.contains("[S01E01] move"));
    assert!(preview.contains("[S01E02] rename contestant.mp4 -> Storyville - S01E02 - The Contestant.mp4"));
    assert!(a.exists());
    assert!(b.exists());
    assert_eq!(fs::read_dir(target.path()).unwrap().count(), 1);

    // Executing the same plan lands on exactly the previewed destinations.
    let report = runner().execute(ops.clone(), &CancelToken::new());
    assert!(report.is_success());
    for (planned, done) in ops.iter().zip(&report.operations) {
        assert_eq!(planned.destination, done.destination);
        assert!(done.destination.exists());
    }
}

#[test]
fn test_dry_run_rejects_duplicate_destinations() {
    let ops = vec![
        op(1, Path::new("/a.mkv"), PathBuf::from("/t/x.mkv"), ActionType::Move),
        op(2, Path::new("/b.mkv"), PathBuf::from("/t/x.mkv"), ActionType::Move),
    ];
    assert!(matches!(
        runner().dry_run(&ops),
        Err(merge_into_series::Error::Conflict(_))
    ));
}

#[test]
fn test_cancel_between_operations_stops_the_batch() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let a = source.path().join("a.mkv");
    let b = source.path().join("b.mkv");
    fs::write(&a, "x").unwrap();
    fs::write(&b, "y").unwrap();
    let first = target.path().join("1.mkv");
    let second = target.path().join("2.mkv");

    let cancel = CancelToken::new();
    let mut finished = 0;
    let report = runner().execute_with(
        vec![
            op(1, &a, first.clone(), ActionType::Move),
            op(2, &b, second.clone(), ActionType::Move),
        ],
        &cancel,
        |_| {
            finished += 1;
            cancel.cancel();
        },
    );

    assert_eq!(finished, 1);
    assert!(report.cancelled);
    assert_eq!(report.executed(), 1);
    assert_eq!(report.not_attempted(), 1);
    assert_eq!(report.operations[1].status, OperationStatus::Pending);
    // Completed work is not undone.
    assert_eq!(fs::read_to_string(&first).unwrap(), "x");
    assert!(!a.exists());
    assert!(b.exists());
    assert!(!second.exists());
}

#[test]
fn test_dry_run_lists_every_operation() {
    let mut failed = op(3, Path::new("/in/c.mkv"), PathBuf::from("/t/c.mkv"), ActionType::Move);
    failed.fail("destination already exists");
    let ops = vec![
        op(1, Path::new("/in/a.mkv"), PathBuf::from("/t/a.mkv"), ActionType::Move),
        op(2, Path::new("/t/b.mkv"), PathBuf::from("/t/B.mkv"), ActionType::Rename),
        failed,
    ];

    let preview = runner().dry_run(&ops).unwrap();
    let lines: Vec<_> = preview.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "[S01E02] rename b.mkv -> B.mkv");
    assert_eq!(lines[2], "[S01E03] Failed c.mkv (destination already exists)");
}
