//! 既知エンティティマスタ
//!
//! 登録済みの会場・イベント・クラブナイト・アクトの正式名称を保持し、
//! AIが読み取った名称を正式名称へ寄せる。

use crate::error::Result;
use crate::fuzzy::find_best_match_scored;
use crate::types::FlyerRecord;
use serde::{Deserialize, Serialize};

/// 照合対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    Venue,
    Event,
    ClubNight,
    Act,
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchField::Venue => write!(f, "会場"),
            MatchField::Event => write!(f, "イベント"),
            MatchField::ClubNight => write!(f, "クラブナイト"),
            MatchField::Act => write!(f, "アクト"),
        }
    }
}

impl std::str::FromStr for MatchField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "venue" | "venues" => Ok(MatchField::Venue),
            "event" | "events" => Ok(MatchField::Event),
            "club-night" | "clubnight" | "club_night" | "night" => Ok(MatchField::ClubNight),
            "act" | "acts" | "artist" => Ok(MatchField::Act),
            _ => Err(format!("Unknown kind: {}. Use venue, event, club-night or act", s)),
        }
    }
}

/// 1件の名称統一
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCorrection {
    pub file_name: String,
    pub field: MatchField,
    pub original: String,
    pub corrected: String,
    pub score: f64,
}

/// 既知エンティティ一覧
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownEntities {
    #[serde(default)]
    pub venues: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub club_nights: Vec<String>,
    #[serde(default)]
    pub acts: Vec<String>,
}

impl KnownEntities {
    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let entities: Self = serde_json::from_str(json)?;
        Ok(entities)
    }

    /// フィールドに対応する正式名称一覧
    pub fn names(&self, field: MatchField) -> &[String] {
        match field {
            MatchField::Venue => &self.venues,
            MatchField::Event => &self.events,
            MatchField::ClubNight => &self.club_nights,
            MatchField::Act => &self.acts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty() && self.events.is_empty() && self.club_nights.is_empty() && self.acts.is_empty()
    }

    /// 1件のレコードの名称を正式名称へ寄せる
    ///
    /// 変更したフィールドごとに `MatchCorrection` を返す。
    pub fn canonicalize(&self, record: &mut FlyerRecord, min_similarity: f64) -> Vec<MatchCorrection> {
        let mut corrections = Vec::new();
        let file_name = record.file_name.clone();

        let mut apply = |field: MatchField, value: &mut String| {
            if let Some(correction) = self.correction_for(&file_name, field, value, min_similarity) {
                *value = correction.corrected.clone();
                corrections.push(correction);
            }
        };

        apply(MatchField::Venue, &mut record.venue_name);
        apply(MatchField::Event, &mut record.event_name);
        apply(MatchField::ClubNight, &mut record.club_night);
        for act in record.acts.iter_mut() {
            apply(MatchField::Act, act);
        }

        corrections
    }

    fn correction_for(
        &self,
        file_name: &str,
        field: MatchField,
        value: &str,
        min_similarity: f64,
    ) -> Option<MatchCorrection> {
        let best = find_best_match_scored(value, self.names(field), min_similarity)?;
        if best.value == value {
            return None;
        }
        Some(MatchCorrection {
            file_name: file_name.to_string(),
            field,
            original: value.to_string(),
            corrected: best.value.to_string(),
            score: best.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> KnownEntities {
        KnownEntities {
            venues: vec!["Fabric".into(), "Ministry of Sound".into(), "The End".into()],
            events: vec!["Gatecrasher Summer Sound System".into()],
            club_nights: vec!["Cream".into(), "Renaissance".into()],
            acts: vec!["Sasha".into(), "John Digweed".into(), "Carl Cox".into()],
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"venues": ["Fabric"], "clubNights": ["Cream"]}"#;
        let entities = KnownEntities::from_json(json).unwrap();
        assert_eq!(entities.venues, vec!["Fabric"]);
        assert_eq!(entities.club_nights, vec!["Cream"]);
        assert!(entities.acts.is_empty());
        assert!(!entities.is_empty());
        assert!(KnownEntities::default().is_empty());
    }

    #[test]
    fn test_canonicalize_record() {
        let mut record = FlyerRecord {
            file_name: "flyer.jpg".into(),
            venue_name: "fabric, 77a Charterhouse Street".into(),
            club_night: "CREAM".into(),
            acts: vec!["Sasha".into(), "john digweed".into(), "Unknown DJ".into()],
            ..Default::default()
        };

        let corrections = master().canonicalize(&mut record, 0.8);

        assert_eq!(record.venue_name, "Fabric");
        assert_eq!(record.club_night, "Cream");
        assert_eq!(record.acts, vec!["Sasha", "John Digweed", "Unknown DJ"]);
        assert_eq!(corrections.len(), 3);
        assert_eq!(corrections[0].field, MatchField::Venue);
        assert_eq!(corrections[0].original, "fabric, 77a Charterhouse Street");
        assert_eq!(corrections[1].field, MatchField::ClubNight);
        assert_eq!(corrections[2].field, MatchField::Act);
        assert_eq!(corrections[2].corrected, "John Digweed");
    }

    #[test]
    fn test_canonicalize_exact_match_is_not_a_correction() {
        let mut record = FlyerRecord {
            venue_name: "The End".into(),
            ..Default::default()
        };
        assert!(master().canonicalize(&mut record, 0.8).is_empty());
        assert_eq!(record.venue_name, "The End");
    }

    #[test]
    fn test_match_field_from_str() {
        assert_eq!("venue".parse::<MatchField>(), Ok(MatchField::Venue));
        assert_eq!("Club-Night".parse::<MatchField>(), Ok(MatchField::ClubNight));
        assert_eq!("acts".parse::<MatchField>(), Ok(MatchField::Act));
        assert!("promoter".parse::<MatchField>().is_err());
    }
}
