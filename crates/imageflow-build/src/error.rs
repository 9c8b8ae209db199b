use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Invalid image tag: {tag}")]
    InvalidTag { tag: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BuildError::Spawn { program, source } => {
                format!(
                    "{} を起動できませんでした: {}\n\
                     \n\
                     Docker CLI がインストールされ、PATH が通っているか確認してください。\n\
                     別の実行ファイルを使う場合は DOCKER_BIN を指定してください。",
                    program, source
                )
            }
            BuildError::CommandFailed { command, code } => {
                let code = code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "シグナルで終了".to_string());
                format!(
                    "コマンドが失敗しました（終了コード: {}）\n  {}",
                    code, command
                )
            }
            BuildError::InvalidTag { tag } => {
                format!(
                    "イメージタグとして使えないバージョンです: {}\n\
                     \n\
                     タグに使えるのは英数字・ピリオド・ハイフン・アンダースコア（128文字以内）です。",
                    tag
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
