use crate::error::{Result, WasThereError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wasthere_common::year::{DEFAULT_PREFERRED, DEFAULT_SEARCH};
use wasthere_common::{YearInference, YearRange, DEFAULT_MIN_SIMILARITY};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_batch_size: usize,
    pub timeout_seconds: u64,
    /// アーカイブ対象の年代
    pub preferred_years: YearRange,
    /// 年推定で探索する範囲
    pub search_years: YearRange,
    /// 名称照合の既定閾値
    pub min_similarity: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_batch_size: 5,
            timeout_seconds: 180,
            preferred_years: DEFAULT_PREFERRED,
            search_years: DEFAULT_SEARCH,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WasThereError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("wasthere").join("config.json"))
    }

    /// 設定された範囲で年推定器を作る
    pub fn year_inference(&self) -> Result<YearInference> {
        Ok(YearInference::new(self.preferred_years, self.search_years)?)
    }

    /// 設定値を検証する（保存前に呼ぶ）
    pub fn validate(&self) -> Result<()> {
        self.year_inference()?;
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(WasThereError::Config(format!(
                "min_similarity は0.0-1.0で指定してください: {}",
                self.min_similarity
            )));
        }
        if self.default_batch_size == 0 {
            return Err(WasThereError::Config("バッチサイズは1以上にしてください".into()));
        }
        Ok(())
    }
}
