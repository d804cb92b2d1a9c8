use clap::Parser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use wasthere::analyzer::{self, AnalyzeOptions, CacheFile};
use wasthere::{cli, config, error, export, logger, matcher, review, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, WasThereError};
use wasthere_common::{
    calculate_similarity, find_best_match_scored, normalize, resolve_record, resolve_year, FlyerRecord,
    MatchCorrection, Weekday,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Year { month, day, weekday, candidates } => {
            let inference = config.year_inference()?;

            if let Some(name) = weekday.as_deref() {
                if Weekday::parse(name).is_none() {
                    println!("⚠ 曜日を解釈できません（無視します）: {}", name);
                }
            }

            match inference.infer_year(month, day, weekday.as_deref()) {
                Some(year) => println!("{}", year),
                None => println!("該当する年がありません: {}/{} (探索範囲 {})", month, day, inference.search()),
            }

            if candidates {
                let years = inference.candidate_years(month, day, weekday.as_deref());
                let list = years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", ");
                println!("候補: [{}]", list);
            }
        }

        Commands::Similarity { a, b } => {
            let score = calculate_similarity(&a, &b);
            println!("{:.3}", score);
            tracing::debug!("正規化: {:?} / {:?}", normalize(&a), normalize(&b));
        }

        Commands::Match { input, candidates, master, kind, threshold } => {
            let threshold = threshold.unwrap_or(config.min_similarity);
            let names = match master {
                Some(path) => matcher::load_master(&path)?.names(kind).to_vec(),
                None => candidates,
            };

            if names.is_empty() {
                return Err(WasThereError::Config(
                    "候補がありません。--candidates か --master を指定してください".into(),
                ));
            }

            match find_best_match_scored(&input, &names, threshold) {
                Some(best) => println!("{} ({:.3})", best.value, best.score),
                None => println!("該当なし（閾値 {:.2}）", threshold),
            }
        }

        Commands::Analyze { folder, output, batch_size, master, threshold, use_cache, recursive } => {
            println!("🎫 wasthere - フライヤー解析\n");

            let batch_size = batch_size.unwrap_or(config.default_batch_size);
            if batch_size == 0 {
                return Err(WasThereError::Config("バッチサイズは1以上にしてください".into()));
            }
            let inference = config.year_inference()?;
            let known = master.as_deref().map(matcher::load_master).transpose()?;

            // 1. 画像スキャン
            println!("[1/4] フライヤーをスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(WasThereError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {}枚のフライヤーを検出\n", images.len());

            // 2. AI解析
            println!(
                "[2/4] AI解析中 ({})...{}",
                cli.ai_provider.command_name(),
                if use_cache { " (キャッシュ有効)" } else { "" }
            );
            let options = AnalyzeOptions {
                provider: cli.ai_provider,
                batch_size,
                timeout_secs: config.timeout_seconds,
                known_venues: known.as_ref().map(|k| k.venues.clone()).unwrap_or_default(),
            };
            let extractions = if use_cache {
                analyzer::analyze_images_with_cache(&images, &folder, &options).await?
            } else {
                analyzer::analyze_images(&images, &options).await?
            };
            println!("✔ {}件の読み取り完了\n", extractions.len());

            // 3. 年推定
            println!("[3/4] 年を推定中...");
            let paths: HashMap<&str, String> = images
                .iter()
                .map(|img| (img.file_name.as_str(), img.path.display().to_string()))
                .collect();
            let mut records: Vec<FlyerRecord> = extractions
                .into_iter()
                .map(|extraction| {
                    let file_path = paths.get(extraction.file_name.as_str()).cloned().unwrap_or_else(|| {
                        tracing::warn!("スキャン結果にないファイル名: {}", extraction.file_name);
                        String::new()
                    });
                    resolve_record(extraction, &file_path, &inference)
                })
                .collect();
            println!("✔ 年推定完了\n");

            // 4. マスタ照合
            if let Some(known) = &known {
                println!("[4/4] マスタ照合中...");
                let threshold = threshold.unwrap_or(config.min_similarity);
                let corrections = matcher::match_with_master(&mut records, known, threshold);
                print_corrections(&corrections);
                println!("✔ マスタ照合完了 ({}件統一)\n", corrections.len());
            }

            let output = output.unwrap_or_else(|| folder.join("flyers.json"));
            save_records(&records, &output)?;
            println!("✔ 結果を保存: {}", output.display());

            print_review_summary(&records);
            println!("\n✅ 解析完了");
        }

        Commands::Resolve { input, output } => {
            let inference = config.year_inference()?;
            let mut records = load_records(&input)?;
            for record in &mut records {
                resolve_year(record, &inference);
            }

            let output = output.unwrap_or(input);
            save_records(&records, &output)?;
            println!("✔ {}件の年を再計算: {}", records.len(), output.display());
            print_review_summary(&records);
        }

        Commands::Normalize { input, master, output, threshold, dry_run } => {
            let threshold = threshold.unwrap_or(config.min_similarity);
            let known = matcher::load_master(&master)?;
            let mut records = load_records(&input)?;

            if dry_run {
                let corrections = matcher::preview_master(&records, &known, threshold);
                print_corrections(&corrections);
                println!("\n（ドライラン）{}件が統一対象です", corrections.len());
                return Ok(());
            }

            let corrections = matcher::match_with_master(&mut records, &known, threshold);
            print_corrections(&corrections);

            let output = output.unwrap_or(input);
            save_records(&records, &output)?;
            println!("\n✔ {}件統一、保存しました: {}", corrections.len(), output.display());
        }

        Commands::Review { input, output } => {
            println!("📅 wasthere - 年の確認\n");
            review::run_interactive_review(&input, output.as_deref())?;
        }

        Commands::Export { input, output, title } => {
            println!("📄 wasthere - エクスポート\n");
            let records = load_records(&input)?;
            let output_dir = output.unwrap_or_else(|| {
                input.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
            });
            export::export_results(&records, &output_dir, &title)?;
            println!("\n✅ エクスポート完了");
        }

        Commands::Config { show, preferred, search, min_similarity, timeout, batch_size } => {
            let mut config = config;
            let changed = preferred.is_some()
                || search.is_some()
                || min_similarity.is_some()
                || timeout.is_some()
                || batch_size.is_some();

            if let Some(range) = preferred {
                config.preferred_years = range;
            }
            if let Some(range) = search {
                config.search_years = range;
            }
            if let Some(value) = min_similarity {
                config.min_similarity = value;
            }
            if let Some(secs) = timeout {
                config.timeout_seconds = secs;
            }
            if let Some(size) = batch_size {
                config.default_batch_size = size;
            }

            if changed {
                config.validate()?;
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  優先年代: {}", config.preferred_years);
                println!("  探索範囲: {}", config.search_years);
                println!("  照合閾値: {:.2}", config.min_similarity);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  バッチサイズ: {}", config.default_batch_size);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<FlyerRecord>> {
    if !path.exists() {
        return Err(WasThereError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn save_records(records: &[FlyerRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn print_corrections(corrections: &[MatchCorrection]) {
    for c in corrections {
        println!("  {} [{}] {} → {} ({:.3})", c.file_name, c.field, c.original, c.corrected, c.score);
    }
}

fn print_review_summary(records: &[FlyerRecord]) {
    let pending = records.iter().filter(|r| r.needs_review).count();
    if pending > 0 {
        println!("⚠ 年の確認が必要: {}件（`wasthere review` で確認できます）", pending);
    }
}
