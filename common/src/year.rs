//! 年推定モジュール
//!
//! フライヤーから読み取れるのは「5月20日（金）」のような年なしの日付が多い。
//! 月・日・曜日から暦上ありうる年を探し、アーカイブ対象の年代
//! （優先範囲）に近いものを選ぶ。
//!
//! ## 処理フロー
//! 1. 優先範囲を昇順に走査し、日付として成立し曜日も一致する年を集める
//! 2. 見つかれば優先範囲の中央に最も近い年を返す（同距離は小さい年）
//! 3. 見つからなければ検索範囲の残り（範囲の下→上）で同じ判定を行う

use crate::calendar::{is_valid_date, weekday_of, Weekday};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 年の閉区間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// 中央値（整数除算）
    pub fn midpoint(&self) -> i32 {
        self.start + (self.end - self.start).div_euclid(2)
    }

    fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl std::str::FromStr for YearRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid year range: {}. Use START-END (e.g. 1995-2010)", s))?;
        let start = start
            .trim()
            .parse()
            .map_err(|_| format!("Invalid start year: {}", start))?;
        let end = end
            .trim()
            .parse()
            .map_err(|_| format!("Invalid end year: {}", end))?;
        Ok(Self { start, end })
    }
}

/// アーカイブ対象の年代（優先範囲）
pub const DEFAULT_PREFERRED: YearRange = YearRange::new(1995, 2010);

/// 優先範囲で見つからない場合に広げる範囲
pub const DEFAULT_SEARCH: YearRange = YearRange::new(1990, 2025);

/// 扱える年の下限・上限
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// 検索範囲の最大幅（年数）
pub const MAX_SEARCH_SPAN: i32 = 400;

/// 年推定器
///
/// 状態を持たないので、1つのインスタンスを複数スレッドから共有してよい。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearInference {
    preferred: YearRange,
    search: YearRange,
}

impl Default for YearInference {
    fn default() -> Self {
        Self {
            preferred: DEFAULT_PREFERRED,
            search: DEFAULT_SEARCH,
        }
    }
}

impl YearInference {
    /// 範囲を指定して生成する
    ///
    /// 優先範囲は検索範囲に含まれていなければならない。検索範囲は
    /// `MIN_YEAR..=MAX_YEAR` 内で、幅は `MAX_SEARCH_SPAN` 年まで。
    pub fn new(preferred: YearRange, search: YearRange) -> Result<Self> {
        if search.start < MIN_YEAR || search.end > MAX_YEAR {
            return Err(Error::Config(format!(
                "search window {} must lie within {}-{}",
                search, MIN_YEAR, MAX_YEAR
            )));
        }
        if preferred.start > preferred.end {
            return Err(Error::Config(format!("preferred window {} is empty", preferred)));
        }
        if search.start > search.end {
            return Err(Error::Config(format!("search window {} is empty", search)));
        }
        if search.end - search.start >= MAX_SEARCH_SPAN {
            return Err(Error::Config(format!(
                "search window {} is wider than {} years",
                search, MAX_SEARCH_SPAN
            )));
        }
        if preferred.start < search.start || preferred.end > search.end {
            return Err(Error::Config(format!(
                "preferred window {} is outside search window {}",
                preferred, search
            )));
        }
        Ok(Self { preferred, search })
    }

    pub fn preferred(&self) -> YearRange {
        self.preferred
    }

    pub fn search(&self) -> YearRange {
        self.search
    }

    /// 最も妥当な年を1つ推定する
    ///
    /// # Arguments
    /// * `month` - 月（1-12）
    /// * `day` - 日（1-31、月の日数との整合は年ごとに判定）
    /// * `weekday_name` - 曜日名（省略可、認識できない場合は無視）
    ///
    /// # Returns
    /// 条件を満たす年。月・日が範囲外、または該当年がなければ `None`
    pub fn infer_year(&self, month: u32, day: u32, weekday_name: Option<&str>) -> Option<i32> {
        if !is_plausible_month_day(month, day) {
            return None;
        }
        let weekday = weekday_name.and_then(Weekday::parse);
        let midpoint = self.preferred.midpoint();

        closest_match(self.preferred.years(), midpoint, month, day, weekday).or_else(|| {
            let outside = self.years_below().chain(self.years_above());
            closest_match(outside, midpoint, month, day, weekday)
        })
    }

    /// レビュー用の候補年一覧（昇順）
    ///
    /// 優先範囲内の該当年すべてに、範囲の直前・直後で最も近い年を
    /// それぞれ最大1つずつ加える。
    pub fn candidate_years(&self, month: u32, day: u32, weekday_name: Option<&str>) -> Vec<i32> {
        if !is_plausible_month_day(month, day) {
            return Vec::new();
        }
        let weekday = weekday_name.and_then(Weekday::parse);
        let matches = |y: &i32| matches_constraints(*y, month, day, weekday);

        let mut years = Vec::new();
        if let Some(below) = self.years_below().rev().find(&matches) {
            years.push(below);
        }
        years.extend(self.preferred.years().filter(&matches));
        if let Some(above) = self.years_above().find(&matches) {
            years.push(above);
        }

        years
    }

    fn years_below(&self) -> std::ops::Range<i32> {
        self.search.start..self.preferred.start
    }

    fn years_above(&self) -> std::ops::RangeInclusive<i32> {
        (self.preferred.end + 1)..=self.search.end
    }
}

/// 既定範囲で年を推定する
pub fn infer_year(month: u32, day: u32, weekday_name: Option<&str>) -> Option<i32> {
    YearInference::default().infer_year(month, day, weekday_name)
}

/// 既定範囲で候補年を取得する
pub fn get_candidate_years(month: u32, day: u32, weekday_name: Option<&str>) -> Vec<i32> {
    YearInference::default().candidate_years(month, day, weekday_name)
}

fn is_plausible_month_day(month: u32, day: u32) -> bool {
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// 条件を満たす年のうち中央に最も近いもの（同距離なら先に走査した方）
fn closest_match(
    years: impl Iterator<Item = i32>,
    midpoint: i32,
    month: u32,
    day: u32,
    weekday: Option<Weekday>,
) -> Option<i32> {
    years
        .filter(|&y| matches_constraints(y, month, day, weekday))
        .min_by_key(|&y| (y - midpoint).abs())
}

fn matches_constraints(year: i32, month: u32, day: u32, weekday: Option<Weekday>) -> bool {
    match (weekday_of(year, month, day), weekday) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(actual), Some(wanted)) => actual == wanted,
    }
}
