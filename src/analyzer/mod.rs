//! フライヤー解析モジュール
//!
//! 画像をバッチに分けてAI CLIに読ませ、`FlyerExtraction` を集める。
//! `--use-cache` 指定時は解析済みの画像をキャッシュから取り出す。

mod ai_cli;
mod cache;

pub use cache::{compute_file_hash, filter_cached_images, CacheEntry, CacheFile};

use crate::ai_provider::AiProvider;
use crate::error::Result;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use wasthere_common::FlyerExtraction;

/// 解析の実行設定
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub provider: AiProvider,
    pub batch_size: usize,
    pub timeout_secs: u64,
    /// 会場名のヒント（マスタから）
    pub known_venues: Vec<String>,
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len}枚 {msg}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

pub async fn analyze_images(images: &[ImageInfo], options: &AnalyzeOptions) -> Result<Vec<FlyerExtraction>> {
    let mut results = Vec::new();
    let pb = progress_bar(images.len());

    // バッチに分割
    for (batch_idx, batch) in images.chunks(options.batch_size.max(1)).enumerate() {
        pb.set_message(format!("バッチ {}", batch_idx + 1));
        tracing::debug!("バッチ {}: {}枚", batch_idx + 1, batch.len());

        let batch_results = ai_cli::analyze_batch(
            batch,
            options.provider,
            &options.known_venues,
            options.timeout_secs,
        )
        .await?;
        results.extend(batch_results);
        pb.inc(batch.len() as u64);
    }

    pb.finish_and_clear();
    sort_by_file_name(&mut results);
    Ok(results)
}

/// キャッシュを使って解析（未解析の画像だけAIに渡す）
///
/// バッチごとにキャッシュを保存するため、途中で失敗しても
/// それまでの結果は次回に再利用される。
pub async fn analyze_images_with_cache(
    images: &[ImageInfo],
    folder: &Path,
    options: &AnalyzeOptions,
) -> Result<Vec<FlyerExtraction>> {
    let mut cache = CacheFile::load(folder);
    let (mut results, uncached) = filter_cached_images(images, &cache);

    tracing::info!("キャッシュヒット: {}枚 / 未解析: {}枚", results.len(), uncached.len());

    if uncached.is_empty() {
        sort_by_file_name(&mut results);
        return Ok(results);
    }

    let pb = progress_bar(uncached.len());

    for (batch_idx, batch) in uncached.chunks(options.batch_size.max(1)).enumerate() {
        pb.set_message(format!("バッチ {}", batch_idx + 1));
        let batch_images: Vec<ImageInfo> = batch.iter().map(|(img, _)| img.clone()).collect();

        let batch_results = ai_cli::analyze_batch(
            &batch_images,
            options.provider,
            &options.known_venues,
            options.timeout_secs,
        )
        .await?;

        for extraction in &batch_results {
            let entry = batch.iter().find(|(img, _)| img.file_name == extraction.file_name);
            if let Some((img, hash)) = entry {
                if hash.is_empty() {
                    continue;
                }
                let file_size = std::fs::metadata(&img.path).map(|m| m.len()).unwrap_or(0);
                cache.insert(hash.clone(), img.file_name.clone(), file_size, extraction.clone());
            }
        }
        cache.save(folder)?;

        results.extend(batch_results);
        pb.inc(batch.len() as u64);
    }

    pb.finish_and_clear();
    sort_by_file_name(&mut results);
    Ok(results)
}

/// スキャン結果と同じファイル名順に並べる（キャッシュ有無で出力順を変えない）
fn sort_by_file_name(results: &mut [FlyerExtraction]) {
    results.sort_by(|a, b| a.file_name.cmp(&b.file_name));
}
