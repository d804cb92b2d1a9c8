//! AI CLI連携モジュール
//!
//! ## 処理フロー
//! 1. 画像を作業ディレクトリ（temp-images）にコピー
//! 2. 共通プロンプトに画像パスを添えて組み立て
//! 3. 選択されたAI CLIを非対話モードで実行（タイムアウト付き）
//! 4. レスポンスのJSON配列を共通パーサーで読み取り

use crate::ai_provider::AiProvider;
use crate::error::{Result, WasThereError};
use crate::scanner::ImageInfo;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use wasthere_common::{build_flyer_prompt, parse_flyer_response, FlyerExtraction};

/// 作業用ディレクトリ名（scanner側でも除外される）
const WORK_DIR_NAME: &str = "temp-images";

/// 1バッチ分のフライヤーを解析
///
/// # Arguments
/// * `images` - 解析対象の画像
/// * `provider` - 呼び出すAI CLI
/// * `known_venues` - 会場名のヒント
/// * `timeout_secs` - CLI呼び出しのタイムアウト（秒）
pub async fn analyze_batch(
    images: &[ImageInfo],
    provider: AiProvider,
    known_venues: &[String],
    timeout_secs: u64,
) -> Result<Vec<FlyerExtraction>> {
    let temp_dir = get_temp_dir()?;
    let local_paths = copy_to_temp(images, &temp_dir)?;

    let image_list = local_paths
        .iter()
        .map(|p| p.display().to_string().replace('\\', "/"))
        .collect::<Vec<_>>()
        .join(", ");

    let file_names: Vec<&str> = images.iter().map(|img| img.file_name.as_str()).collect();
    let venues: Vec<&str> = known_venues.iter().map(String::as_str).collect();
    let flyer_prompt = build_flyer_prompt(&file_names, &venues);

    let prompt = format!(
        "Read the following flyer image files and analyze them: {}\n\n{}",
        image_list, flyer_prompt
    );

    tracing::debug!("プロンプト長: {} chars", prompt.len());

    let response = run_ai_cli(provider, &prompt, timeout_secs).await?;

    tracing::debug!("レスポンス長: {} chars", response.len());

    parse_response(&response)
}

fn get_temp_dir() -> Result<PathBuf> {
    let temp_dir = std::env::current_dir()?.join(WORK_DIR_NAME);
    std::fs::create_dir_all(&temp_dir)?;
    Ok(temp_dir)
}

fn copy_to_temp(images: &[ImageInfo], temp_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut local_paths = Vec::new();

    for img in images {
        let dest = temp_dir.join(&img.file_name);
        std::fs::copy(&img.path, &dest)?;
        // 絶対パスに変換
        let abs_path = std::fs::canonicalize(&dest)?;
        local_paths.push(abs_path);
    }

    Ok(local_paths)
}

async fn run_ai_cli(provider: AiProvider, prompt: &str, timeout_secs: u64) -> Result<String> {
    let name = provider.command_name();

    // Windowsではcmd /c経由
    #[cfg(windows)]
    let mut command = {
        let mut c = Command::new("cmd");
        c.arg("/c").arg(name);
        c
    };
    #[cfg(not(windows))]
    let mut command = Command::new(name);

    command.args(provider.prompt_args(prompt)).kill_on_drop(true);

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), command.output())
        .await
        .map_err(|_| WasThereError::Timeout(timeout_secs))?
        .map_err(|e| WasThereError::CliExecution(format!("{} の起動に失敗: {}", name, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WasThereError::ApiCall(format!(
            "{} failed (code {:?}): {}",
            name,
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();

    let preview: String = response.chars().take(500).collect();
    tracing::trace!("レスポンス: {}", preview);

    Ok(response)
}

/// レスポンスをパース（共通パーサーをラップ）
fn parse_response(response: &str) -> Result<Vec<FlyerExtraction>> {
    parse_flyer_response(response)
        .map_err(|e| WasThereError::ApiParse(format!("JSONパースエラー: {}", e)))
}
