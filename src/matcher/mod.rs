//! マスタ照合モジュール
//!
//! 既知エンティティマスタを読み込み、解析結果の名称を正式名称に統一する。

use crate::error::{Result, WasThereError};
use rayon::prelude::*;
use std::path::Path;
use wasthere_common::{FlyerRecord, KnownEntities, MatchCorrection};

/// マスタファイルを読み込む
pub fn load_master(master_path: &Path) -> Result<KnownEntities> {
    if !master_path.exists() {
        return Err(WasThereError::FileNotFound(master_path.display().to_string()));
    }

    KnownEntities::from_file(master_path).map_err(|e| match e {
        wasthere_common::Error::Io(io) => WasThereError::Io(io),
        other => WasThereError::InvalidMaster(format!("JSONパースエラー: {}", other)),
    })
}

/// レコードの名称をマスタの正式名称に寄せる
///
/// # Arguments
/// * `records` - 解析結果（その場で書き換える）
/// * `master` - 既知エンティティ
/// * `threshold` - 採用する類似度の下限
///
/// # Returns
/// 書き換えた名称の一覧（ファイル順）
pub fn match_with_master(records: &mut [FlyerRecord], master: &KnownEntities, threshold: f64) -> Vec<MatchCorrection> {
    if master.is_empty() {
        tracing::warn!("マスタが空のため名称統一をスキップします");
        return Vec::new();
    }

    records
        .par_iter_mut()
        .map(|record| master.canonicalize(record, threshold))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// 書き換えずに統一結果だけを求める（ドライラン用）
pub fn preview_master(records: &[FlyerRecord], master: &KnownEntities, threshold: f64) -> Vec<MatchCorrection> {
    let mut copies = records.to_vec();
    match_with_master(&mut copies, master, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasthere_common::MatchField;

    fn record(file_name: &str, venue: &str, acts: &[&str]) -> FlyerRecord {
        FlyerRecord {
            file_name: file_name.to_string(),
            venue_name: venue.to_string(),
            acts: acts.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    fn master() -> KnownEntities {
        KnownEntities {
            venues: vec!["Fabric".into(), "Cream".into(), "Sugar Suite".into()],
            acts: vec!["Erol Alkan".into(), "Sasha".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_match_with_master_keeps_file_order() {
        let mut records = vec![
            record("a.jpg", "Fabric, 77a Charterhouse Street", &[]),
            record("b.jpg", "Sugar Suite, 123 Corporation Street, Birmingham B1 5QS", &["Erol Alkan"]),
        ];
        let corrections = match_with_master(&mut records, &master(), 0.8);

        assert_eq!(corrections.len(), 2);
        assert_eq!(corrections[0].file_name, "a.jpg");
        assert_eq!(corrections[1].file_name, "b.jpg");
        assert_eq!(records[0].venue_name, "Fabric");
        assert_eq!(records[1].venue_name, "Sugar Suite");
        // 既に正式名称のアクトは変更なし
        assert_eq!(records[1].acts, vec!["Erol Alkan"]);
    }

    #[test]
    fn test_preview_does_not_modify() {
        let records = vec![record("a.jpg", "cream", &["sasha"])];
        let corrections = preview_master(&records, &master(), 0.8);

        assert_eq!(corrections.len(), 2);
        assert_eq!(corrections[0].field, MatchField::Venue);
        assert_eq!(corrections[1].field, MatchField::Act);
        assert_eq!(records[0].venue_name, "cream");
    }

    #[test]
    fn test_unmatched_name_is_kept() {
        let mut records = vec![record("a.jpg", "Gatecrasher", &[])];
        let corrections = match_with_master(&mut records, &master(), 0.8);
        assert!(corrections.is_empty());
        assert_eq!(records[0].venue_name, "Gatecrasher");
    }

    #[test]
    fn test_empty_master_changes_nothing() {
        let mut records = vec![record("a.jpg", "fabric", &[])];
        let corrections = match_with_master(&mut records, &KnownEntities::default(), 0.8);
        assert!(corrections.is_empty());
        assert_eq!(records[0].venue_name, "fabric");
    }

    #[test]
    fn test_load_master_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.json");
        std::fs::write(&path, r#"{"venues": ["Fabric"], "clubNights": ["Bugged Out!"]}"#).unwrap();

        let master = load_master(&path).unwrap();
        assert_eq!(master.venues, vec!["Fabric"]);
        assert_eq!(master.club_nights, vec!["Bugged Out!"]);
        assert!(master.acts.is_empty());
    }

    #[test]
    fn test_load_master_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert!(matches!(load_master(&missing), Err(WasThereError::FileNotFound(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ venues: ").unwrap();
        assert!(matches!(load_master(&broken), Err(WasThereError::InvalidMaster(_))));
    }
}
