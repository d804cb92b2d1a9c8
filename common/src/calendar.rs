//! グレゴリオ暦の基本計算
//!
//! 日付の妥当性チェックと曜日計算を、例外や外部ライブラリに頼らず
//! テーブルと算術だけで行う。

use serde::{Deserialize, Serialize};

/// 各月の日数（平年、index 0 は未使用）
const DAYS_IN_MONTH: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Sakamoto法の月オフセット
const MONTH_OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

/// 曜日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// 曜日名の表記ゆれテーブル（小文字トークン → 曜日）
const WEEKDAY_TOKENS: &[(&str, Weekday)] = &[
    ("mon", Weekday::Monday),
    ("monday", Weekday::Monday),
    ("tue", Weekday::Tuesday),
    ("tues", Weekday::Tuesday),
    ("tuesday", Weekday::Tuesday),
    ("wed", Weekday::Wednesday),
    ("weds", Weekday::Wednesday),
    ("wednesday", Weekday::Wednesday),
    ("thu", Weekday::Thursday),
    ("thur", Weekday::Thursday),
    ("thurs", Weekday::Thursday),
    ("thursday", Weekday::Thursday),
    ("fri", Weekday::Friday),
    ("friday", Weekday::Friday),
    ("sat", Weekday::Saturday),
    ("saturday", Weekday::Saturday),
    ("sun", Weekday::Sunday),
    ("sunday", Weekday::Sunday),
];

impl Weekday {
    /// 曜日名をパースする
    ///
    /// 大文字小文字を無視し、"Fri" / "fri" / "Friday" / "Fri." を受け付ける。
    /// 認識できない文字列は `None`（エラーではなく「制約なし」扱い）。
    pub fn parse(name: &str) -> Option<Self> {
        let token = name.trim().trim_end_matches('.').to_lowercase();
        WEEKDAY_TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, w)| *w)
    }

    /// Sakamoto法の戻り値（0=日曜）から変換
    fn from_sunday_index(index: i32) -> Self {
        match index {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// うるう年判定
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 指定年月の日数。月が範囲外なら0
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// (年, 月, 日) が暦上存在するか
pub fn is_valid_date(year: i32, month: u32, day: u32) -> bool {
    day >= 1 && day <= days_in_month(year, month)
}

/// 曜日を計算する。存在しない日付なら `None`
pub fn weekday_of(year: i32, month: u32, day: u32) -> Option<Weekday> {
    if !is_valid_date(year, month, day) {
        return None;
    }

    // 1月・2月は前年の13月・14月として扱う
    let y = if month < 3 { year - 1 } else { year };
    let index = (y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        + MONTH_OFFSETS[(month - 1) as usize]
        + day as i32)
        .rem_euclid(7);

    Some(Weekday::from_sunday_index(index))
}
