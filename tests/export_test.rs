//! Excel出力の統合テスト

use tempfile::tempdir;
use wasthere::export::{self, excel};
use wasthere_common::FlyerRecord;

fn create_test_record(index: usize, needs_review: bool) -> FlyerRecord {
    FlyerRecord {
        file_name: format!("flyer_{}.jpg", index),
        event_name: format!("Event {}", index),
        venue_name: "Fabric".to_string(),
        acts: vec!["Erol Alkan".to_string(), "Sasha".to_string()],
        date_text: "Fri 20th May".to_string(),
        month: Some(5),
        day: Some(20),
        weekday: Some("Friday".to_string()),
        year: Some(2005),
        candidate_years: if needs_review { vec![1994, 2005, 2011] } else { vec![2005] },
        needs_review,
        ..Default::default()
    }
}

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("flyers.xlsx");

    let records: Vec<FlyerRecord> = (1..=5).map(|i| create_test_record(i, i % 2 == 0)).collect();

    let result = excel::generate_excel(&records, &output_path, "Flyers");

    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    let metadata = std::fs::metadata(&output_path).expect("ファイルメタデータ取得失敗");
    assert!(metadata.len() > 0, "Excelファイルが空");
}

#[test]
fn test_excel_generation_empty_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("empty.xlsx");

    let result = excel::generate_excel(&[], &output_path, "Flyers");
    assert!(result.is_ok(), "空データでExcel生成に失敗: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_export_results_into_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let records = vec![create_test_record(1, false)];

    let path = export::export_results(&records, dir.path(), "Archive").unwrap();

    assert_eq!(path, dir.path().join("Archive.xlsx"));
    assert!(path.exists());
}

#[test]
fn test_output_path_for_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("review.xlsx");
    assert_eq!(export::output_path_for(&file, "Flyers"), file);
}
