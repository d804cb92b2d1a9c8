//! WasThere Common Library
//!
//! フライヤーアーカイブの中核ロジック（CLIと将来のWeb版で共有）
//! - 年なし日付からの年推定
//! - 会場名・イベント名のあいまい照合
//! - AI解析結果の型・プロンプト・パーサー

pub mod calendar;
pub mod error;
pub mod fuzzy;
pub mod master;
pub mod parser;
pub mod prompts;
pub mod resolve;
pub mod types;
pub mod year;

pub use calendar::{is_leap_year, is_valid_date, weekday_of, Weekday};
pub use error::{Error, Result};
pub use fuzzy::{calculate_similarity, find_best_match, find_best_match_scored, normalize, MatchCandidate, DEFAULT_MIN_SIMILARITY};
pub use master::{KnownEntities, MatchCorrection, MatchField};
pub use parser::{extract_json, parse_flyer_response};
pub use prompts::build_flyer_prompt;
pub use resolve::{is_consistent, resolve_record, resolve_year};
pub use types::{FlyerExtraction, FlyerRecord};
pub use year::{get_candidate_years, infer_year, YearInference, YearRange};
