//! ログ初期化
//!
//! 進捗表示は標準出力（println!）、診断情報は tracing で標準エラーへ出す。
//! `RUST_LOG` が設定されていればそちらを優先する。

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("wasthere=debug,wasthere_common=debug,warn")
        } else {
            EnvFilter::new("wasthere=warn")
        }
    });

    // テストなどで二重に初期化された場合は無視する
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
