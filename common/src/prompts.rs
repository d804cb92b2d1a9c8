//! プロンプト生成モジュール
//!
//! フライヤー画像から以下を読み取らせるプロンプトを組み立てる:
//! - イベント名・クラブナイト名・会場名
//! - 出演アクト
//! - 日付（月・日・曜日を分けて、年は印刷されている場合のみ）

/// 会場名のヒントとしてプロンプトに含める最大件数
pub const MAX_VENUE_HINTS: usize = 200;

/// フライヤー解析プロンプト生成
///
/// # Arguments
/// * `file_names` - 解析対象の画像ファイル名
/// * `known_venues` - 既知の会場名（表記をそろえるためのヒント、空でもよい）
///
/// # Returns
/// 解析用のプロンプト文字列
pub fn build_flyer_prompt<S: AsRef<str>>(file_names: &[S], known_venues: &[S]) -> String {
    let flyer_list = file_names
        .iter()
        .map(|name| format!("- {}", name.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    let venue_hint = if known_venues.is_empty() {
        String::new()
    } else {
        let venues = known_venues
            .iter()
            .take(MAX_VENUE_HINTS)
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "\n## Known venues\nIf the venue on the flyer is one of these, copy the name exactly as written here:\n{}\n",
            venues
        )
    };

    format!(
        r#"You are an archivist cataloguing club-night flyers from 1995-2005. Read each flyer image and extract the event details.
{venue_hint}
## Output format (a JSON array, exactly this shape)
[
  {{
    "fileName": "file name",
    "eventName": "event title as printed",
    "clubNight": "recurring club night brand, empty if none",
    "venueName": "venue name only, without the street address",
    "acts": ["DJ or live act", "..."],
    "dateText": "the date exactly as printed",
    "month": 1-12 or null,
    "day": 1-31 or null,
    "weekday": "weekday name as printed, or null",
    "year": four-digit year only if printed on the flyer, otherwise null
  }}
]

## Rules
- Do not guess the year. If it is not printed, use null
- Report month, day and weekday separately even when they are printed together
- Keep act names as printed, one act per entry
- Leave a field empty (or null) when it cannot be read
- Output only the JSON array, no commentary

Flyers:
{flyer_list}"#
    )
}
