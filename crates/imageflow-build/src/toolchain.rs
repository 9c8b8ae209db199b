//! Docker CLI によるビルド・プッシュ・タグ付け

use crate::error::{BuildError, BuildResult};
use crate::process::{OutputLine, command_line, run_streaming};
use async_trait::async_trait;
use colored::Colorize;
use std::path::PathBuf;

/// イメージのビルド・公開を行う外部ツール
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// `reference` をビルドする（ビルド引数 `build_arg=version` 付き）
    async fn build(&self, reference: &str, build_arg: &str, version: &str) -> BuildResult<()>;

    /// `reference` をレジストリにプッシュする
    async fn push(&self, reference: &str) -> BuildResult<()>;

    /// ローカルイメージ `source` に `target` のタグを付ける
    async fn tag(&self, source: &str, target: &str) -> BuildResult<()>;
}

/// `docker` コマンドを呼び出す Toolchain
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: PathBuf,
    context: PathBuf,
    dockerfile: Option<PathBuf>,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            context: PathBuf::from("."),
            dockerfile: None,
        }
    }

    /// ビルドコンテキストを指定
    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    /// Dockerfile を指定（省略時はコンテキスト直下の Dockerfile）
    pub fn with_dockerfile(mut self, dockerfile: Option<PathBuf>) -> Self {
        self.dockerfile = dockerfile;
        self
    }

    /// `docker build` の引数
    pub fn build_args(&self, reference: &str, build_arg: &str, version: &str) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--build-arg".to_string(),
            format!("{}={}", build_arg, version),
            "-t".to_string(),
            reference.to_string(),
        ];
        if let Some(dockerfile) = &self.dockerfile {
            args.push("-f".to_string());
            args.push(dockerfile.display().to_string());
        }
        args.push(self.context.display().to_string());
        args
    }

    async fn docker(&self, args: Vec<String>) -> BuildResult<()> {
        let command = command_line(&self.program, &args);
        println!("{}", command.dimmed());

        let status = run_streaming(&self.program, &args, |line| match line {
            OutputLine::Stdout(line) => println!("{}", line),
            OutputLine::Stderr(line) => eprintln!("{}", line),
        })
        .await?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CommandFailed {
                command,
                code: status.code(),
            })
        }
    }
}

#[async_trait]
impl Toolchain for DockerCli {
    async fn build(&self, reference: &str, build_arg: &str, version: &str) -> BuildResult<()> {
        tracing::info!("Building image: {}", reference);
        self.docker(self.build_args(reference, build_arg, version))
            .await
    }

    async fn push(&self, reference: &str) -> BuildResult<()> {
        tracing::info!("Pushing image: {}", reference);
        self.docker(vec!["push".to_string(), reference.to_string()])
            .await
    }

    async fn tag(&self, source: &str, target: &str) -> BuildResult<()> {
        self.docker(vec![
            "tag".to_string(),
            source.to_string(),
            target.to_string(),
        ])
        .await
    }
}
