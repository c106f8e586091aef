//! Integration tests for the scan pipeline.
//!
//! These tests run the real readers against generated PNG fixtures:
//! - 16:9 filtering and statistics
//! - Exact duplicate grouping
//! - Unreadable roots and corrupt files
//! - Report output
//!
//! Video fixtures are fake, so they behave the same whether or not
//! ffprobe is installed: the file is neither processed nor skipped.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{Rgb, RgbImage};
use media_scanner::core::pipeline::{Pipeline, ScanResult};
use media_scanner::{write_report, OutputFormat};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn save_png(path: &Path, width: u32, height: u32, colour: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(colour)).save(path).unwrap();
}

/// wide.png (16:9), square.png, tall.png (9:16), copy_of_wide.png
fn media_tree() -> TempDir {
    let temp = TempDir::new().unwrap();

    save_png(temp.child("wide.png").path(), 32, 18, [200, 10, 10]);
    save_png(temp.child("square.png").path(), 20, 20, [10, 200, 10]);
    save_png(temp.child("tall.png").path(), 18, 32, [10, 10, 200]);

    let bytes = std::fs::read(temp.child("wide.png").path()).unwrap();
    temp.child("nested").create_dir_all().unwrap();
    temp.child("nested/copy_of_wide.png").write_binary(&bytes).unwrap();

    temp
}

fn scan(paths: Vec<PathBuf>) -> ScanResult {
    Pipeline::builder()
        .paths(paths)
        .tool_timeout(Some(Duration::from_secs(10)))
        .build()
        .unwrap()
        .run()
        .unwrap()
}

fn file_names(result: &ScanResult) -> Vec<String> {
    result
        .matches
        .iter()
        .map(|m| m.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn pipeline_handles_empty_directory() {
    let temp = TempDir::new().unwrap();

    let result = scan(vec![temp.path().to_path_buf()]);

    assert_eq!(result.stats.total_files, 0);
    assert!(result.matches.is_empty());
    assert!(result.duplicates.is_empty());
}

#[test]
fn only_16_by_9_images_are_matched() {
    let temp = media_tree();

    let result = scan(vec![temp.path().to_path_buf()]);

    assert_eq!(result.stats.total_files, 4);
    assert_eq!(result.stats.images_processed, 4);
    assert_eq!(result.stats.match_count, 2);
    // Walk order is by file name: "nested" sorts before "wide.png"
    assert_eq!(file_names(&result), vec!["copy_of_wide.png", "wide.png"]);

    for media in &result.matches {
        assert_eq!((media.width, media.height), (32, 18));
        assert_eq!(media.format, "png");
        assert!(media.path.is_absolute());
        assert!(media.size > 0);
    }
}

#[test]
fn identical_matches_form_one_group() {
    let temp = media_tree();

    let result = scan(vec![temp.path().to_path_buf()]);

    assert_eq!(result.duplicates.len(), 1);
    let group = &result.duplicates[0];
    assert_eq!(group.count, 2);
    assert_eq!(group.hash.len(), 64);
    assert_eq!(result.stats.duplicate_count, 1);

    // The first-discovered file is the original
    let original = &result.matches[0];
    let copy = &result.matches[1];
    assert_eq!(group.files, vec![original.path.clone(), copy.path.clone()]);
    assert_eq!(original.is_duplicate, None);
    assert_eq!(copy.is_duplicate, Some(true));
    assert_eq!(copy.duplicate_of.as_ref(), Some(&original.path));
    assert_eq!(original.hash, copy.hash);
}

#[test]
fn corrupt_and_fake_media_are_not_fatal() {
    let temp = TempDir::new().unwrap();
    temp.child("corrupt.jpg").write_str("this is not a valid image file").unwrap();
    temp.child("fake.mp4").write_str("not a video either").unwrap();
    save_png(temp.child("wide.png").path(), 1920, 1080, [1, 2, 3]);

    let result = scan(vec![temp.path().to_path_buf()]);

    assert_eq!(result.stats.total_files, 3);
    assert_eq!(result.stats.images_processed, 1);
    assert_eq!(result.stats.videos_processed, 0);
    assert_eq!(result.stats.match_count, 1);
    assert!(result.skipped.is_empty());
}

#[test]
fn nonexistent_root_does_not_block_sibling_roots() {
    let temp = media_tree();

    let result = scan(vec![
        PathBuf::from("/nonexistent/path/that/does/not/exist"),
        temp.path().to_path_buf(),
    ]);

    assert_eq!(result.stats.total_files, 4);
    assert_eq!(result.stats.match_count, 2);
}

#[test]
fn roots_are_concatenated_in_the_order_given() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    save_png(second.child("b_wide.png").path(), 64, 36, [5, 5, 5]);
    save_png(first.child("z_wide.png").path(), 16, 9, [6, 6, 6]);

    let result = scan(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

    assert_eq!(file_names(&result), vec!["z_wide.png", "b_wide.png"]);
}

#[test]
fn repeated_scans_are_identical() {
    let temp = media_tree();
    let roots = vec![temp.path().to_path_buf()];

    let first = scan(roots.clone());
    let second = scan(roots);

    assert_eq!(first.matches, second.matches);
    assert_eq!(first.duplicates, second.duplicates);
    assert_eq!(first.skipped, second.skipped);
}

#[test]
fn hidden_files_can_be_skipped() {
    let temp = TempDir::new().unwrap();
    temp.child(".thumbnails").create_dir_all().unwrap();
    save_png(temp.child(".thumbnails/wide.png").path(), 32, 18, [9, 9, 9]);
    save_png(temp.child("visible.png").path(), 32, 18, [8, 8, 8]);

    let all = scan(vec![temp.path().to_path_buf()]);
    assert_eq!(all.stats.match_count, 2);

    let visible = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .skip_hidden(true)
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(file_names(&visible), vec!["visible.png"]);
}

#[test]
fn json_report_is_written_to_file() {
    let temp = media_tree();
    let result = scan(vec![temp.path().to_path_buf()]);
    let report = temp.child("report.json");

    write_report(&result, OutputFormat::Json, Some(report.path())).unwrap();

    report.assert(predicate::path::is_file());
    report.assert(predicate::str::contains("\"is16by9\": true"));
    report.assert(predicate::str::contains("\"duplicateOf\""));
    report.assert(predicate::str::contains("\"scanDuration\""));
}

#[test]
fn csv_report_has_one_row_per_match() {
    let temp = media_tree();
    let result = scan(vec![temp.path().to_path_buf()]);
    let report = temp.child("report.csv");

    write_report(&result, OutputFormat::Csv, Some(report.path())).unwrap();

    report.assert(predicate::str::starts_with(
        "path,type,width,height,aspectRatio,format,size,isDuplicate,duplicateOf\n",
    ));
    report.assert(predicate::str::contains(",image,32,18,1.7778,png,"));

    let text = std::fs::read_to_string(report.path()).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn disabling_duplicates_leaves_matches_unhashed() {
    let temp = media_tree();

    let result = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .detect_duplicates(false)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.stats.match_count, 2);
    assert!(result.duplicates.is_empty());
    assert!(result.matches.iter().all(|m| m.hash.is_none() && m.is_duplicate.is_none()));
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_file_names_do_not_break_reports() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    save_png(temp.child("ok.png").path(), 32, 18, [1, 1, 1]);
    let odd = temp.path().join(OsStr::from_bytes(b"caf\xe9.png"));
    save_png(&odd, 32, 18, [2, 2, 2]);

    let result = scan(vec![temp.path().to_path_buf()]);
    assert_eq!(result.stats.match_count, 2);

    let json = temp.child("report.json");
    let csv = temp.child("report.csv");
    write_report(&result, OutputFormat::Json, Some(json.path())).unwrap();
    write_report(&result, OutputFormat::Csv, Some(csv.path())).unwrap();

    json.assert(predicate::str::contains("caf\u{FFFD}.png"));
    csv.assert(predicate::str::contains("caf\u{FFFD}.png"));
}
