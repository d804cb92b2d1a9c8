use thiserror::Error;

#[derive(Error, Debug)]
pub enum WasThereError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("AI呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("AIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("AI呼び出しがタイムアウトしました（{0}秒）。`wasthere config --timeout` で延長できます")]
    Timeout(u64),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("マスタファイルが不正: {0}")]
    InvalidMaster(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] wasthere_common::Error),
}

pub type Result<T> = std::result::Result<T, WasThereError>;
