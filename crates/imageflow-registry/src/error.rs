//! Registry エラー型

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("認証情報の取得に失敗しました ({registry}): {message}")]
    AuthFailed { registry: String, message: String },

    #[error("HTTP リクエストに失敗しました: {0}")]
    Http(#[from] reqwest::Error),

    #[error("想定外のステータス {status}: {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("不正なイメージ名です: {0}")]
    InvalidImage(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
