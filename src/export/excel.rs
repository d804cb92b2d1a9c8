//! レビュー用Excel生成
//!
//! 1行1フライヤーの一覧表。年が未確定の行は色付けして目立たせる。

use crate::error::{Result, WasThereError};
use rust_xlsxwriter::*;
use std::path::Path;
use wasthere_common::FlyerRecord;

/// 列定義（見出し, 列幅）
const COLUMNS: &[(&str, f64)] = &[
    ("File", 24.0),
    ("Date", 22.0),
    ("Year", 8.0),
    ("Candidates", 26.0),
    ("Event", 28.0),
    ("Club Night", 22.0),
    ("Venue", 24.0),
    ("Acts", 48.0),
    ("Printed Date", 22.0),
    ("Needs Review", 12.0),
];

const REVIEW_FILL: u32 = 0xFFF2CC;

/// Excelをバッファに生成
///
/// # Arguments
/// * `records` - 解析結果
/// * `sheet_name` - シート名（Excelの制約上31文字まで）
pub fn generate_excel_buffer(records: &[FlyerRecord], sheet_name: &str) -> std::result::Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x333333))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let value_format = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let review_format = value_format
        .clone()
        .set_background_color(Color::RGB(REVIEW_FILL));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col, *title, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let format = if record.needs_review { &review_format } else { &value_format };

        let candidates = record
            .candidate_years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let cells = [
            record.file_name.clone(),
            record.display_date(),
            String::new(),
            candidates,
            record.event_name.clone(),
            record.club_night.clone(),
            record.venue_name.clone(),
            record.acts.join(", "),
            record.date_text.clone(),
            if record.needs_review { "yes".to_string() } else { String::new() },
        ];

        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, value.as_str(), format)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }

        // 年は数値で書く（フィルタ・並べ替え用）
        if let Some(year) = record.year {
            worksheet
                .write_number_with_format(row, 2, year as f64, format)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    if !records.is_empty() {
        worksheet
            .autofilter(0, 0, records.len() as u32, COLUMNS.len() as u16 - 1)
            .map_err(|e| format!("フィルタ設定エラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

pub fn generate_excel(records: &[FlyerRecord], output_path: &Path, sheet_name: &str) -> Result<()> {
    let buffer = generate_excel_buffer(records, sheet_name).map_err(WasThereError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
