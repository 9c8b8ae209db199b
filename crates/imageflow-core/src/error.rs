use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("リリース情報の取得に失敗しました: {datasource}/{name}\n理由: {message}")]
    LookupFailed {
        datasource: String,
        name: String,
        message: String,
    },

    #[error("タグの存在確認に失敗しました: {image}:{tag}\n理由: {message}")]
    TagLookupFailed {
        image: String,
        tag: String,
        message: String,
    },

    #[error("未対応のバージョンスキームです: {0}")]
    UnknownScheme(String),

    #[error("未対応のデータソースです: {0}")]
    UnknownDatasource(String),
}

impl CoreError {
    pub fn lookup_failed(
        datasource: impl Into<String>,
        name: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        CoreError::LookupFailed {
            datasource: datasource.into(),
            name: name.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
