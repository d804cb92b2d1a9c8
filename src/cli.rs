use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;
use wasthere_common::{MatchField, YearRange};

#[derive(Parser)]
#[command(name = "wasthere")]
#[command(about = "クラブナイト・フライヤーのAI解析とアーカイブ登録支援ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (claude/codex/gemini)
    #[arg(long, default_value = "claude", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 月・日・曜日から年を推定
    Year {
        /// 月 (1-12)
        month: u32,

        /// 日 (1-31)
        day: u32,

        /// 曜日（Fri, Friday など）
        #[arg(short, long)]
        weekday: Option<String>,

        /// 候補年の一覧も表示
        #[arg(short, long)]
        candidates: bool,
    },

    /// 2つの名称の類似度を表示
    Similarity {
        a: String,
        b: String,
    },

    /// 候補から最も近い名称を探す
    Match {
        /// 照合する名称
        input: String,

        /// 候補（カンマ区切り）
        #[arg(short, long, value_delimiter = ',', conflicts_with = "master")]
        candidates: Vec<String>,

        /// 既知エンティティマスタJSONファイル
        #[arg(short, long)]
        master: Option<PathBuf>,

        /// マスタのどの一覧と照合するか (venue/event/club-night/act)
        #[arg(short, long, default_value = "venue")]
        kind: MatchField,

        /// 採用の閾値（0.0-1.0、省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// フライヤー画像フォルダを解析してJSONを出力
    Analyze {
        /// フライヤー画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/flyers.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// バッチサイズ（一度に解析する枚数、省略時は設定値）
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// 既知エンティティマスタJSONファイル
        #[arg(short, long)]
        master: Option<PathBuf>,

        /// 名称照合の閾値（省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// キャッシュを使用（再解析をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 解析結果JSONの年を再計算（範囲設定の変更後など）
    Resolve {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 解析結果の名称をマスタの正式名称に統一
    Normalize {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 既知エンティティマスタJSONファイル
        #[arg(short, long, required = true)]
        master: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 名称照合の閾値（省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// ドライラン（変更を適用せずプレビュー）
        #[arg(long)]
        dry_run: bool,
    },

    /// 年が確定していないフライヤーを対話的に確認
    Review {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 解析結果からレビュー用Excelを生成
    Export {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// シート名
        #[arg(short, long, default_value = "Flyers")]
        title: String,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 優先する年代（例: 1995-2010）
        #[arg(long)]
        preferred: Option<YearRange>,

        /// 年推定の探索範囲（例: 1990-2025）
        #[arg(long)]
        search: Option<YearRange>,

        /// 名称照合の既定閾値
        #[arg(long)]
        min_similarity: Option<f64>,

        /// AI呼び出しのタイムアウト（秒）
        #[arg(long)]
        timeout: Option<u64>,

        /// 既定のバッチサイズ
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_command() {
        let cli = Cli::try_parse_from(["wasthere", "year", "5", "20", "--weekday", "Fri", "-c"]).unwrap();
        match cli.command {
            Commands::Year { month, day, weekday, candidates } => {
                assert_eq!((month, day), (5, 20));
                assert_eq!(weekday.as_deref(), Some("Fri"));
                assert!(candidates);
            }
            _ => panic!("Expected Year command"),
        }
    }

    #[test]
    fn test_parse_match_candidates() {
        let cli = Cli::try_parse_from(["wasthere", "match", "fabric", "-c", "Fabric,Cream"]).unwrap();
        match cli.command {
            Commands::Match { input, candidates, master, kind, threshold } => {
                assert_eq!(input, "fabric");
                assert_eq!(candidates, vec!["Fabric", "Cream"]);
                assert!(master.is_none());
                assert_eq!(kind, MatchField::Venue);
                assert!(threshold.is_none());
            }
            _ => panic!("Expected Match command"),
        }
    }

    #[test]
    fn test_parse_config_ranges() {
        let cli = Cli::try_parse_from(["wasthere", "config", "--preferred", "1996-2004"]).unwrap();
        match cli.command {
            Commands::Config { preferred, search, .. } => {
                assert_eq!(preferred, Some(YearRange::new(1996, 2004)));
                assert!(search.is_none());
            }
            _ => panic!("Expected Config command"),
        }
        assert!(Cli::try_parse_from(["wasthere", "config", "--preferred", "1996"]).is_err());
    }

    #[test]
    fn test_global_provider_flag() {
        let cli = Cli::try_parse_from(["wasthere", "--ai-provider", "gemini", "cache", "--info"]).unwrap();
        assert_eq!(cli.ai_provider.command_name(), "gemini");
    }
}
