use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use dirstat_clean::{CandidateInventory, CleanupExecutor, CleanupResolver};

/// Lay out two support roots with app directories of known sizes.
///
/// caches/MyApp holds 300 bytes, support/myapp holds 700, and an
/// unrelated app lives next to them.
fn support_fixture() -> (TempDir, Vec<PathBuf>) {
    let temp = TempDir::new().unwrap();
    let caches = temp.path().join("caches");
    let support = temp.path().join("support");

    fs::create_dir_all(caches.join("MyApp")).unwrap();
    fs::write(caches.join("MyApp/blob.bin"), vec![0u8; 300]).unwrap();

    fs::create_dir_all(support.join("myapp/state")).unwrap();
    fs::write(support.join("myapp/state/db.sqlite"), vec![0u8; 700]).unwrap();

    fs::create_dir_all(caches.join("Other")).unwrap();
    fs::write(caches.join("Other/data"), vec![0u8; 50]).unwrap();

    let roots = vec![caches, support];
    (temp, roots)
}

#[test]
fn resolver_finds_directories_under_real_roots() {
    let (_temp, roots) = support_fixture();
    let resolver = CleanupResolver::new(CandidateInventory::from_roots(&roots));

    let candidates = resolver.resolve("myapp");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0], roots[0].join("MyApp"));
    assert_eq!(candidates[1], roots[1].join("myapp"));

    assert!(resolver.resolve("ghost").is_empty());
}

#[test]
fn preview_sizes_candidates_and_omits_missing() {
    let (_temp, roots) = support_fixture();
    let resolver = CleanupResolver::new(CandidateInventory::from_roots(&roots));
    let mut candidates = resolver.resolve("myapp");
    candidates.push(roots[0].join("NeverExisted"));

    let preview = CleanupExecutor::new().preview(&candidates);
    assert_eq!(preview.len(), 2);
    assert_eq!(preview[0], (roots[0].join("MyApp"), 300));
    assert_eq!(preview[1], (roots[1].join("myapp"), 700));
}

#[test]
fn execute_without_confirmation_deletes_nothing() {
    let (_temp, roots) = support_fixture();
    let resolver = CleanupResolver::new(CandidateInventory::from_roots(&roots));
    let candidates = resolver.resolve("myapp");

    let result = CleanupExecutor::new().execute(&candidates, false);
    assert!(result.is_err());
    assert!(roots[0].join("MyApp/blob.bin").exists());
    assert!(roots[1].join("myapp/state/db.sqlite").exists());
}

#[test]
fn confirmed_execute_deletes_and_reports_freed_bytes() {
    let (_temp, roots) = support_fixture();
    let resolver = CleanupResolver::new(CandidateInventory::from_roots(&roots));
    let candidates = resolver.resolve("myapp");

    let executor = CleanupExecutor::new();
    let expected: u64 = executor.preview(&candidates).iter().map(|(_, s)| s).sum();

    let report = executor.execute(&candidates, true).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.deleted, candidates);
    assert_eq!(report.freed_bytes, expected);
    assert!(!roots[0].join("MyApp").exists());
    assert!(!roots[1].join("myapp").exists());

    // The unrelated application is untouched.
    assert!(roots[0].join("Other/data").exists());
}

#[test]
fn vanished_candidate_is_recorded_but_does_not_stop_the_batch() {
    let (_temp, roots) = support_fixture();
    let resolver = CleanupResolver::new(CandidateInventory::from_roots(&roots));
    let mut candidates = vec![roots[0].join("Vanished")];
    candidates.extend(resolver.resolve("myapp"));

    let report = CleanupExecutor::new().execute(&candidates, true).unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, roots[0].join("Vanished"));
    assert_eq!(report.deleted.len(), 2);
    assert_eq!(report.freed_bytes, 1000);
}

#[test]
fn file_candidates_are_deleted_too() {
    let temp = TempDir::new().unwrap();
    let stray = temp.path().join("stray.log");
    fs::write(&stray, vec![0u8; 42]).unwrap();

    let report = CleanupExecutor::new()
        .execute(std::slice::from_ref(&stray), true)
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(report.freed_bytes, 42);
    assert!(!stray.exists());
}
