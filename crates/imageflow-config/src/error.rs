use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error("設定ファイルの読み込みに失敗しました: {path}\n理由: {message}")]
    Parse { path: String, message: String },

    #[error(
        "必須の設定 {0} がありません。\n\
        環境変数・imageflow.yaml・コマンドライン引数のいずれかで指定してください"
    )]
    Missing(&'static str),

    #[error("不正な設定値です ({key}): {message}")]
    Invalid { key: &'static str, message: String },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
