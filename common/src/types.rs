//! フライヤー解析結果の型定義
//!
//! - FlyerExtraction: AIがフライヤー画像から読み取った生データ
//! - FlyerRecord: 年推定・名称照合を経たレコード（各工程の入出力）

use serde::{Deserialize, Serialize};

/// AIの出力: フライヤー1枚分の読み取り結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlyerExtraction {
    pub file_name: String,
    pub event_name: String,
    pub club_night: String,
    pub venue_name: String,
    pub acts: Vec<String>,
    /// フライヤーに印刷された日付表記そのまま（"FRI 20TH MAY" など）
    pub date_text: String,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday: Option<String>,
    /// 年が印刷されている場合のみ
    pub year: Option<i32>,
}

/// 解析・照合済みレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerRecord {
    pub file_name: String,

    /// 画像ファイルの絶対パス
    #[serde(default)]
    pub file_path: String,

    #[serde(default)]
    pub event_name: String,

    #[serde(default)]
    pub club_night: String,

    #[serde(default)]
    pub venue_name: String,

    #[serde(default)]
    pub acts: Vec<String>,

    #[serde(default)]
    pub date_text: String,

    #[serde(default)]
    pub month: Option<u32>,

    #[serde(default)]
    pub day: Option<u32>,

    #[serde(default)]
    pub weekday: Option<String>,

    /// 確定（または推定）した年
    #[serde(default)]
    pub year: Option<i32>,

    /// レビュー用の候補年
    #[serde(default)]
    pub candidate_years: Vec<i32>,

    /// 人手による確認が必要
    #[serde(default)]
    pub needs_review: bool,
}

impl FlyerRecord {
    /// 年を除いた日付（月・日がそろっている場合のみ）
    pub fn month_day(&self) -> Option<(u32, u32)> {
        self.month.zip(self.day)
    }

    /// "2005-05-20 (Friday)" 形式の表示用文字列
    pub fn display_date(&self) -> String {
        let date = match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => format!("{:04}-{:02}-{:02}", y, m, d),
            (None, Some(m), Some(d)) => format!("????-{:02}-{:02}", m, d),
            _ => return self.date_text.clone(),
        };
        match &self.weekday {
            Some(w) if !w.is_empty() => format!("{} ({})", date, w),
            _ => date,
        }
    }
}
