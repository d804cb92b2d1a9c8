//! AIレスポンスパーサー
//!
//! AI CLIのレスポンスからJSONを抽出し、フライヤー解析結果をパースする

use crate::error::{Error, Result};
use crate::types::FlyerExtraction;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use wasthere_common::extract_json;
///
/// let response = "Here you go: [{\"fileName\": \"flyer.jpg\"}]";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('['));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON array in response".into()))
}

/// フライヤー解析レスポンスをパース
///
/// # Returns
/// * `Ok(Vec<FlyerExtraction>)` - パース成功
/// * `Err` - JSONが見つからないかパース失敗
pub fn parse_flyer_response(response: &str) -> Result<Vec<FlyerExtraction>> {
    let json_str = extract_json(response)?;
    let extractions: Vec<FlyerExtraction> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("flyer JSON: {}", e)))?;
    Ok(extractions)
}
