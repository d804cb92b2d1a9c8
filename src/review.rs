//! 対話式の年確認モジュール
//!
//! 年が確定していないフライヤーを1枚ずつ表示し、候補年から選ぶか
//! 年を直接入力してもらう。

use crate::error::{Result, WasThereError};
use dialoguer::Input;
use std::path::Path;
use wasthere_common::{is_consistent, FlyerRecord};

/// 直接入力を受け付ける年（4桁）
const MANUAL_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// 確認が必要なレコードのインデックスを抽出
pub fn extract_unresolved(records: &[FlyerRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.needs_review || r.year.is_none())
        .map(|(i, _)| i)
        .collect()
}

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// 年を確定
    Year(i32),
    /// このフライヤーをスキップ
    Skip,
    /// 残り全部スキップ
    SkipAll,
    /// 保存して終了
    Quit,
    /// 解釈できない入力
    Invalid(String),
}

/// 入力文字列をアクションに変換
///
/// 候補番号（1始まり）または4桁の年を受け付ける。
pub fn parse_review_input(input: &str, candidates: &[i32]) -> ReviewAction {
    let trimmed = input.trim();

    match trimmed {
        "" | "s" => return ReviewAction::Skip,
        "S" => return ReviewAction::SkipAll,
        "q" | "Q" => return ReviewAction::Quit,
        _ => {}
    }

    match trimmed.parse::<i32>() {
        Ok(n) if n >= 1 && (n as usize) <= candidates.len() => ReviewAction::Year(candidates[n as usize - 1]),
        Ok(n) if MANUAL_YEARS.contains(&n) => ReviewAction::Year(n),
        _ => ReviewAction::Invalid(trimmed.to_string()),
    }
}

/// 年を確定する。4桁でない年や日付・曜日と矛盾する場合は変更せず `false`
pub fn apply_year(record: &mut FlyerRecord, year: i32) -> bool {
    if !MANUAL_YEARS.contains(&year) {
        return false;
    }
    if let Some((month, day)) = record.month_day() {
        if !is_consistent(year, month, day, record.weekday.as_deref()) {
            return false;
        }
    }
    record.year = Some(year);
    record.candidate_years = vec![year];
    record.needs_review = false;
    true
}

/// 対話式で年を確認
pub fn run_interactive_review(input_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(input_path)?;
    let mut records: Vec<FlyerRecord> = serde_json::from_str(&content)?;

    let unresolved = extract_unresolved(&records);

    if unresolved.is_empty() {
        println!("✓ すべてのフライヤーの年が確定しています");
        return Ok(());
    }

    println!("📅 年が未確定のフライヤー: {}枚", unresolved.len());
    println!("---");
    println!("操作: [番号]候補を選択 [年]直接入力 [s]スキップ [S]残り全スキップ [q]終了");
    println!("---\n");

    let mut confirmed = 0;

    'records: for (count, &idx) in unresolved.iter().enumerate() {
        let record = &records[idx];
        println!(
            "[{}/{}] {} {} @ {}",
            count + 1,
            unresolved.len(),
            record.file_name,
            record.event_name,
            record.venue_name
        );
        println!("  日付: {} ({})", record.display_date(), record.date_text);

        let candidates = record.candidate_years.clone();
        if !candidates.is_empty() {
            let list = candidates
                .iter()
                .enumerate()
                .map(|(i, y)| format!("{}:{}", i + 1, y))
                .collect::<Vec<_>>()
                .join("  ");
            println!("  候補: {}", list);
        }

        loop {
            let input = prompt_year()?;
            match parse_review_input(&input, &candidates) {
                ReviewAction::Year(year) => {
                    if apply_year(&mut records[idx], year) {
                        confirmed += 1;
                        println!("  → {}\n", year);
                        break;
                    }
                    println!("  ✗ {}年は日付・曜日と一致しません", year);
                }
                ReviewAction::Skip => {
                    println!("  → スキップ\n");
                    break;
                }
                ReviewAction::SkipAll => {
                    println!("  → 残り全部スキップ\n");
                    break 'records;
                }
                ReviewAction::Quit => {
                    println!("保存して終了します...");
                    break 'records;
                }
                ReviewAction::Invalid(text) => {
                    println!("  ✗ 解釈できません: {}", text);
                }
            }
        }
    }

    let output = output_path.unwrap_or(input_path);
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(output, json)?;

    println!("\n✓ {}件確定、保存しました: {}", confirmed, output.display());

    Ok(())
}

fn prompt_year() -> Result<String> {
    Input::<String>::new()
        .with_prompt("年 (番号/年 s:スキップ S:全スキップ q:終了)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| WasThereError::CliExecution(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unresolved_record() -> FlyerRecord {
        FlyerRecord {
            file_name: "flyer.jpg".into(),
            month: Some(5),
            day: Some(20),
            weekday: Some("Fri".into()),
            year: Some(2005),
            candidate_years: vec![1994, 2005, 2011],
            needs_review: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_unresolved() {
        let records = vec![
            FlyerRecord { year: Some(2001), ..Default::default() },
            FlyerRecord { year: None, ..Default::default() },
            FlyerRecord { year: Some(2005), needs_review: true, ..Default::default() },
        ];
        assert_eq!(extract_unresolved(&records), vec![1, 2]);
    }

    #[test]
    fn test_parse_review_input() {
        let candidates = [1994, 2005, 2011];
        assert_eq!(parse_review_input("2", &candidates), ReviewAction::Year(2005));
        assert_eq!(parse_review_input(" 1999 ", &candidates), ReviewAction::Year(1999));
        assert_eq!(parse_review_input("", &candidates), ReviewAction::Skip);
        assert_eq!(parse_review_input("S", &candidates), ReviewAction::SkipAll);
        assert_eq!(parse_review_input("q", &candidates), ReviewAction::Quit);
        assert_eq!(parse_review_input("7", &candidates), ReviewAction::Invalid("7".into()));
        assert_eq!(parse_review_input("May", &candidates), ReviewAction::Invalid("May".into()));
    }

    #[test]
    fn test_parse_review_input_rejects_non_year_numbers() {
        let candidates = [1994, 2005, 2011];
        assert_eq!(parse_review_input("-123", &candidates), ReviewAction::Invalid("-123".into()));
        assert_eq!(parse_review_input("0005", &candidates), ReviewAction::Invalid("0005".into()));
        assert_eq!(parse_review_input("12345", &candidates), ReviewAction::Invalid("12345".into()));
    }

    #[test]
    fn test_apply_year_accepts_consistent() {
        let mut record = unresolved_record();
        assert!(apply_year(&mut record, 2011));
        assert_eq!(record.year, Some(2011));
        assert_eq!(record.candidate_years, vec![2011]);
        assert!(!record.needs_review);
    }

    #[test]
    fn test_apply_year_rejects_wrong_weekday() {
        let mut record = unresolved_record();
        // 2006-05-20 は土曜日
        assert!(!apply_year(&mut record, 2006));
        assert_eq!(record.year, Some(2005));
        assert!(record.needs_review);
    }

    #[test]
    fn test_apply_year_without_date() {
        let mut record = FlyerRecord { needs_review: true, ..Default::default() };
        assert!(apply_year(&mut record, 1998));
        assert_eq!(record.year, Some(1998));

        let mut record = FlyerRecord { needs_review: true, ..Default::default() };
        assert!(!apply_year(&mut record, 5));
        assert!(!apply_year(&mut record, -123));
        assert_eq!(record.year, None);
        assert!(record.needs_review);
    }
}
