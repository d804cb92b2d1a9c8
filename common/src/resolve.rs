//! 解析結果の解決処理（CLI/WASM共通）
//!
//! AIの読み取り結果をレコードに変換し、年なし日付に年を割り当てる。

use crate::calendar::{is_valid_date, weekday_of, Weekday};
use crate::types::{FlyerExtraction, FlyerRecord};
use crate::year::YearInference;

/// 読み取り結果をレコードに変換し、年を解決する
///
/// # Arguments
/// * `extraction` - AIの読み取り結果
/// * `file_path` - 画像ファイルのパス（不明なら空文字）
/// * `inference` - 年推定器
pub fn resolve_record(extraction: FlyerExtraction, file_path: &str, inference: &YearInference) -> FlyerRecord {
    let mut record = FlyerRecord {
        file_name: extraction.file_name,
        file_path: file_path.to_string(),
        event_name: extraction.event_name,
        club_night: extraction.club_night,
        venue_name: extraction.venue_name,
        acts: extraction.acts,
        date_text: extraction.date_text,
        month: extraction.month,
        day: extraction.day,
        weekday: extraction.weekday,
        year: extraction.year,
        ..Default::default()
    };
    resolve_year(&mut record, inference);
    record
}

/// レコードの年・候補年・要確認フラグを更新する
///
/// - 印刷された年が日付・曜日と矛盾しなければそのまま採用
/// - 矛盾する、または年がなければ月・日・曜日から推定
/// - 月・日がなければ年なし（印刷された年も破棄）で要確認
pub fn resolve_year(record: &mut FlyerRecord, inference: &YearInference) {
    let (month, day) = match record.month_day() {
        Some(month_day) => month_day,
        None => {
            record.year = None;
            record.candidate_years.clear();
            record.needs_review = true;
            return;
        }
    };
    let weekday = record.weekday.as_deref();

    if let Some(year) = record.year {
        if is_consistent(year, month, day, weekday) {
            record.candidate_years = vec![year];
            record.needs_review = false;
            return;
        }
    }

    record.year = inference.infer_year(month, day, weekday);
    record.candidate_years = inference.candidate_years(month, day, weekday);
    record.needs_review = record.candidate_years.len() != 1;
}

/// 年・月・日・曜日が暦上整合するか（曜日が読めない場合は日付のみ判定）
pub fn is_consistent(year: i32, month: u32, day: u32, weekday_name: Option<&str>) -> bool {
    if !is_valid_date(year, month, day) {
        return false;
    }
    match weekday_name.and_then(Weekday::parse) {
        Some(wanted) => weekday_of(year, month, day) == Some(wanted),
        None => true,
    }
}
