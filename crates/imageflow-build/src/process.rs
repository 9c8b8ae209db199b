//! 外部プロセスの実行
//!
//! stdout / stderr を1行ずつ受け取りながら、プロセスの終了を待ちます。
//! 出力は溜め込まずに届いた順にコールバックへ渡します。

use crate::error::{BuildError, BuildResult};
use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// プロセスの出力1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// ログ表示用のコマンドライン文字列
pub fn command_line(program: impl AsRef<OsStr>, args: &[String]) -> String {
    let mut line = program.as_ref().to_string_lossy().into_owned();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// コマンドを実行し、出力を逐次 `on_output` に渡す
///
/// 子プロセスは `kill_on_drop` 付きで起動するため、
/// 呼び出し側の Future が途中で破棄されても残らない。
pub async fn run_streaming<F>(
    program: impl AsRef<OsStr>,
    args: &[String],
    mut on_output: F,
) -> BuildResult<ExitStatus>
where
    F: FnMut(OutputLine),
{
    let program = program.as_ref();
    tracing::debug!("Running: {}", command_line(program, args));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BuildError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, tx.clone(), OutputLine::Stdout));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, tx.clone(), OutputLine::Stderr));
    }
    drop(tx);

    // 両方のストリームが閉じるまで転送
    while let Some(line) = rx.recv().await {
        on_output(line);
    }

    for reader in readers {
        if let Err(e) = reader.await {
            tracing::debug!("Output reader task failed: {}", e);
        }
    }

    Ok(child.wait().await?)
}

fn spawn_reader<R>(
    reader: R,
    tx: mpsc::UnboundedSender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(wrap(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("Failed to read process output: {}", e);
                    break;
                }
            }
        }
    })
}
