//! 解析結果キャッシュモジュール
//!
//! 画像のSHA-256ハッシュをキーにして読み取り結果をキャッシュし、
//! 同じフライヤーの再解析をスキップする。

use crate::error::Result;
use crate::scanner::ImageInfo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use wasthere_common::FlyerExtraction;

const CACHE_FILE_NAME: &str = ".wasthere-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイルハッシュ → 読み取り結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    /// 解析日時（RFC 3339）
    pub analyzed_at: String,
    pub extraction: FlyerExtraction,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    ///
    /// 存在しない・壊れている・バージョン違いの場合は空のキャッシュを返す。
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("キャッシュを開けません {}: {}", cache_path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::warn!("キャッシュバージョン不一致 (v{})、再生成します", cache.version);
                Self::default()
            }
            Err(e) => {
                tracing::warn!("キャッシュが壊れています、再生成します: {}", e);
                Self::default()
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除。削除した場合は `true`
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    /// キャッシュをルックアップ
    pub fn get(&self, hash: &str) -> Option<&FlyerExtraction> {
        self.entries.get(hash).map(|e| &e.extraction)
    }

    pub fn entry(&self, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    /// キャッシュに追加
    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, extraction: FlyerExtraction) {
        self.entries.insert(hash, CacheEntry {
            file_name,
            file_size,
            analyzed_at: chrono::Local::now().to_rfc3339(),
            extraction,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 画像ファイルのハッシュを計算（SHA-256）
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// キャッシュ済みの画像と未解析の画像を振り分ける
///
/// 戻り値の未解析側にはハッシュを添える（計算失敗時は空文字）。
pub fn filter_cached_images(
    images: &[ImageInfo],
    cache: &CacheFile,
) -> (Vec<FlyerExtraction>, Vec<(ImageInfo, String)>) {
    let mut cached = Vec::new();
    let mut uncached = Vec::new();

    for img in images {
        let hash = match compute_file_hash(&img.path) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!("ハッシュ計算に失敗 {}: {}", img.file_name, e);
                uncached.push((img.clone(), String::new()));
                continue;
            }
        };

        match cache.get(&hash) {
            Some(extraction) => {
                tracing::debug!("キャッシュヒット: {}", img.file_name);
                // 同じ画像が別名で置かれている場合は現在のファイル名を使う
                let mut extraction = extraction.clone();
                extraction.file_name = img.file_name.clone();
                cached.push(extraction);
            }
            None => uncached.push((img.clone(), hash)),
        }
    }

    (cached, uncached)
}
