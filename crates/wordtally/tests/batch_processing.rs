//! Batch processing integration tests.
//!
//! Covers folder scanning, ordering, failure containment and the sync wrapper.

use tempfile::tempdir;
use wordtally::{
    SourceFile, TallyConfig, TallyError, normalize_folder_input, process_batch, process_batch_sync, scan_folder,
};

mod helpers;
use helpers::{build_docx, build_pdf, paragraph, write_file};

#[tokio::test]
async fn test_single_file_per_format() {
    let files = vec![
        SourceFile::from_bytes("a.docx", build_docx(&paragraph("docx words"))),
        SourceFile::from_bytes("b.pdf", build_pdf(&["pdf words here"])),
        SourceFile::from_bytes("c.txt", "纯文本".as_bytes()),
        SourceFile::from_bytes("d.md", "*markdown* text".as_bytes()),
    ];

    let batch = process_batch(files, &TallyConfig::default()).await.unwrap();

    assert_eq!(batch.count, 4);
    assert_eq!(batch.success_count(), 4);
    let counts: Vec<_> = batch.results.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![2, 3, 3, 2]);
}

#[tokio::test]
async fn test_results_sorted_regardless_of_input_order() {
    let files = vec![
        SourceFile::from_bytes("b.txt", "b".as_bytes()),
        SourceFile::from_bytes("a.txt", "a".as_bytes()),
        SourceFile::from_bytes("c.txt", "c".as_bytes()),
    ];

    let batch = process_batch(files, &TallyConfig::default()).await.unwrap();
    let names: Vec<_> = batch.results.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
}

#[tokio::test]
async fn test_corrupt_file_does_not_abort_batch() {
    let files = vec![
        SourceFile::from_bytes("1.txt", "one".as_bytes()),
        SourceFile::from_bytes("2.md", "two words".as_bytes()),
        SourceFile::from_bytes("3.docx", build_docx(&paragraph("三个字"))),
        SourceFile::from_bytes("4.pdf", build_pdf(&["four"])),
        SourceFile::from_bytes("5.pdf", b"garbage that is not a pdf".to_vec()),
    ];

    let batch = process_batch(files, &TallyConfig::default()).await.unwrap();

    assert_eq!(batch.count, 5);
    assert_eq!(batch.success_count(), 4);
    let broken = &batch.results[4];
    assert_eq!(broken.filename, "5.pdf");
    assert_eq!(broken.count, 0);
    assert!(broken.status.starts_with("failure: "));
    assert_eq!(batch.total_count(), 1 + 2 + 3 + 1);
}

#[tokio::test]
async fn test_unsupported_file_in_explicit_batch() {
    let files = vec![
        SourceFile::from_bytes("notes.rtf", b"{\\rtf1}".to_vec()),
        SourceFile::from_bytes("notes.txt", "fine".as_bytes()),
    ];

    let batch = process_batch(files, &TallyConfig::default()).await.unwrap();
    let rtf = batch.results.iter().find(|r| r.filename == "notes.rtf").unwrap();
    assert!(rtf.status.contains(".rtf"));
    assert_eq!(rtf.count, 0);
}

#[tokio::test]
async fn test_empty_batch() {
    let result = process_batch(Vec::new(), &TallyConfig::default()).await;
    assert!(matches!(result, Err(TallyError::NoValidFiles(_))));
}

#[test]
fn test_lock_files_excluded_by_scan_but_processed_directly() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "~$draft.docx", &build_docx(&paragraph("locked")));
    write_file(dir.path(), "draft.docx", &build_docx(&paragraph("real draft")));

    let scanned = scan_folder(dir.path(), &TallyConfig::default()).unwrap();
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].filename, "draft.docx");

    let direct = vec![SourceFile::from_path(dir.path().join("~$draft.docx"))];
    let batch = process_batch_sync(direct, &TallyConfig::default()).unwrap();
    assert_eq!(batch.results[0].filename, "~$draft.docx");
    assert!(batch.results[0].is_success());
}

#[test]
fn test_scan_and_process_folder() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "b.txt", "字数 count".as_bytes());
    write_file(dir.path(), "a.md", "# Title".as_bytes());
    write_file(dir.path(), "c.pdf", &build_pdf(&["one two three"]));
    write_file(dir.path(), "ignored.rtf", b"{\\rtf1}");

    let config = TallyConfig::default();
    let files = scan_folder(dir.path(), &config).unwrap();
    let batch = process_batch_sync(files, &config).unwrap();

    let rows: Vec<_> = batch
        .results
        .iter()
        .map(|r| (r.filename.as_str(), r.file_type.as_str(), r.count))
        .collect();
    assert_eq!(rows, vec![("a.md", ".md", 1), ("b.txt", ".txt", 3), ("c.pdf", ".pdf", 3)]);
}

#[test]
fn test_quoted_and_recursive_folder_input() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("chapter one");
    std::fs::create_dir(&nested).unwrap();
    write_file(&nested, "inner.txt", "inner words".as_bytes());
    write_file(dir.path(), "outer.txt", "outer".as_bytes());

    let typed = format!("  \"{}\"  ", dir.path().display());
    let folder = normalize_folder_input(&typed);

    let config = TallyConfig {
        recursive: true,
        ..Default::default()
    };
    let files = scan_folder(&folder, &config).unwrap();
    let batch = process_batch_sync(files, &config).unwrap();

    assert_eq!(batch.count, 2);
    assert_eq!(batch.total_count(), 3);
}

#[test]
fn test_missing_path_becomes_failure_row() {
    let dir = tempdir().unwrap();
    let files = vec![
        SourceFile::from_path(dir.path().join("gone.txt")),
        SourceFile::from_bytes("here.txt", "present".as_bytes()),
    ];

    let batch = process_batch_sync(files, &TallyConfig::default()).unwrap();
    assert_eq!(batch.count, 2);
    assert_eq!(batch.results[0].filename, "gone.txt");
    assert!(!batch.results[0].is_success());
    assert!(batch.results[1].is_success());
}

#[tokio::test]
async fn test_parallel_batch_preserves_order_and_counts() {
    let files: Vec<_> = (0..12)
        .map(|i| SourceFile::from_bytes(format!("doc{:02}.docx", 11 - i), build_docx(&paragraph(&"词".repeat(i + 1)))))
        .collect();

    let config = TallyConfig {
        max_concurrent_files: Some(4),
        file_timeout_secs: Some(60),
        ..Default::default()
    };
    let batch = process_batch(files, &config).await.unwrap();

    let names: Vec<_> = batch.results.iter().map(|r| r.filename.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(batch.total_count(), (1..=12).sum::<u64>());
}
