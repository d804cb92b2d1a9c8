//! あいまい文字列照合モジュール
//!
//! AIがフライヤーから読み取った会場名・イベント名を既存の正式名称と
//! 照合し、"Fabric" / "fabric," / "Fabric, London" のような軽微な表記ゆれで
//! 重複レコードを作らないようにする。
//!
//! ## 処理フロー
//! 1. 正規化（小文字化、住所断片の除去、記号除去、空白の統一）
//! 2. 編集距離（レーベンシュタイン距離）から類似度を計算
//! 3. 閾値以上で最も類似度の高い候補を採用

use regex::Regex;
use serde::Serialize;

/// 既定の採用閾値
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.8;

lazy_static::lazy_static! {
    /// 末尾の住所断片パターン（上から順に独立して適用）
    static ref ADDRESS_PATTERNS: Vec<Regex> = vec![
        // ", 123 corporation street, birmingham b1 5qs"
        Regex::new(r",\s*\d+[a-z]?\s+[a-z\s]+,\s*[a-z\s]+\s+[a-z0-9]+(\s+[a-z0-9]+)?\s*$").unwrap(),
        // ", 77a charterhouse street" / ", old kent road"
        Regex::new(r",[^,]*\b(street|st|road|rd|avenue|ave|lane|ln|way|place|square|sq|drive|dr)\b.*$").unwrap(),
    ];
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 照合候補とそのスコア
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate<'a> {
    /// 呼び出し側が渡した元の文字列
    pub value: &'a str,
    /// 正規化後の文字列
    pub normalized: String,
    /// 類似度（0.0-1.0）
    pub score: f64,
}

/// 照合用に名称を正規化する
///
/// 2回適用しても結果は変わらない。
pub fn normalize(text: &str) -> String {
    let mut result = text.trim().to_lowercase();

    for pattern in ADDRESS_PATTERNS.iter() {
        result = pattern.replace(&result, "").into_owned();
    }

    let result: String = result
        .chars()
        .filter_map(|c| match c {
            '\'' | '\u{2019}' | '.' | ',' => None,
            '-' | '_' => Some(' '),
            _ => Some(c),
        })
        .collect();

    WHITESPACE_RE.replace_all(&result, " ").trim().to_string()
}

/// 類似度を計算（編集距離ベース）
///
/// 両方とも正規化してから比較する。対称で、結果は常に0.0-1.0。
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let distance = levenshtein_distance(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());

    1.0 - (distance as f64 / max_len as f64)
}

/// 最も類似度の高い候補を返す
///
/// 同点の場合は先に現れた候補を優先する。最高スコアが `min_similarity`
/// 未満なら `None`。
pub fn find_best_match<'a, S: AsRef<str>>(
    input: &str,
    candidates: &'a [S],
    min_similarity: f64,
) -> Option<&'a str> {
    find_best_match_scored(input, candidates, min_similarity).map(|m| m.value)
}

/// `find_best_match` のスコア付き版
pub fn find_best_match_scored<'a, S: AsRef<str>>(
    input: &str,
    candidates: &'a [S],
    min_similarity: f64,
) -> Option<MatchCandidate<'a>> {
    if input.trim().is_empty() || candidates.is_empty() {
        return None;
    }

    let normalized_input = normalize(input);
    let mut best: Option<MatchCandidate<'a>> = None;

    for candidate in candidates {
        let value = candidate.as_ref();
        let normalized = normalize(value);
        let score = calculate_similarity(&normalized_input, &normalized);

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(MatchCandidate { value, normalized, score });
        }
    }

    best.filter(|b| b.score >= min_similarity)
}

/// レーベンシュタイン距離を計算
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // 2行だけ保持する
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Fabric  "), "fabric");
        assert_eq!(normalize("fabric,"), "fabric");
        assert_eq!(normalize("Fabric, London"), "fabric london");
        assert_eq!(normalize("Ministry-of_Sound"), "ministry of sound");
        assert_eq!(normalize("Bagley's   Studios"), "bagleys studios");
        assert_eq!(normalize("Bagley\u{2019}s"), "bagleys");
        assert_eq!(normalize("D.J. Sneak"), "dj sneak");
    }

    #[test]
    fn test_normalize_strips_full_address() {
        assert_eq!(
            normalize("Sugar Suite, 123 Corporation Street, Birmingham B1 5QS"),
            "sugar suite"
        );
    }

    #[test]
    fn test_normalize_strips_street_suffix() {
        assert_eq!(normalize("Fabric, 77a Charterhouse Street"), "fabric");
        assert_eq!(normalize("The Cross, Goods Way"), "the cross");
        assert_eq!(normalize("Cream, Wolstenholme Square, Liverpool"), "cream");
    }

    #[test]
    fn test_normalize_keeps_name_without_comma() {
        assert_eq!(normalize("Gatecrasher Street Party"), "gatecrasher street party");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "Fabric, 77a Charterhouse Street",
            "Sugar Suite, 123 Corporation Street, Birmingham B1 5QS",
            "  Bagley's -- Studios_, ",
            "Ministry of Sound.",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_similarity_identity_and_empty() {
        assert_eq!(calculate_similarity("Fabric", "Fabric"), 1.0);
        assert_eq!(calculate_similarity("", ""), 1.0);
        assert_eq!(calculate_similarity("", "x"), 0.0);
        assert_eq!(calculate_similarity("x", ""), 0.0);
        assert_eq!(calculate_similarity("Fabric", "fabric,"), 1.0);
    }

    #[test]
    fn test_similarity_symmetric_and_bounded() {
        let pairs = [
            ("Fabric", "Fabrik"),
            ("Cream", "Ministry of Sound"),
            ("Home", "Homelands"),
            ("abc", "xyz"),
        ];
        for (a, b) in pairs {
            let ab = calculate_similarity(a, b);
            let ba = calculate_similarity(b, a);
            assert_eq!(ab, ba);
            assert!((0.0..=1.0).contains(&ab));
        }
        assert_eq!(calculate_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_partial() {
        let score = calculate_similarity("Fabric", "Fabrik");
        assert!((score - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_best_match() {
        let candidates = ["Fabric", "Ministry of Sound", "Cream"];
        assert_eq!(find_best_match("fabric", &candidates, 0.8), Some("Fabric"));
        assert_eq!(find_best_match("Ministry of Sound, 103 Gaunt Street", &candidates, 0.8), Some("Ministry of Sound"));
        assert_eq!(find_best_match("xyz123", &["Fabric", "Cream"], 0.8), None);
    }

    #[test]
    fn test_find_best_match_empty_inputs() {
        let candidates = vec!["Fabric".to_string()];
        assert_eq!(find_best_match("   ", &candidates, 0.8), None);
        let empty: Vec<String> = Vec::new();
        assert_eq!(find_best_match("Fabric", &empty, 0.8), None);
    }

    #[test]
    fn test_find_best_match_tie_keeps_first() {
        let candidates = ["Fabric", "fabric", "FABRIC"];
        let best = find_best_match_scored("Fabric", &candidates, 0.8).unwrap();
        assert_eq!(best.value, "Fabric");
        assert_eq!(best.score, 1.0);

        let candidates = ["Fabrix", "Fabrik"];
        assert_eq!(find_best_match("Fabric", &candidates, 0.5), Some("Fabrix"));
    }

    #[test]
    fn test_find_best_match_threshold_boundary() {
        // 5/6 ≈ 0.833
        assert_eq!(find_best_match("Fabrik", &["Fabric"], 0.8), Some("Fabric"));
        assert_eq!(find_best_match("Fabrik", &["Fabric"], 0.9), None);
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
