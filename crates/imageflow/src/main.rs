mod args;
mod commands;

use args::RunArgs;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imageflow")]
#[command(
    about = "上流リリースに追従して、未公開バージョンのイメージをビルド・公開します",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 未公開バージョンをビルドしてプッシュ
    Build {
        #[command(flatten)]
        args: RunArgs,
    },
    /// ビルド対象のバージョンを表示（ビルドはしない）
    Plan {
        #[command(flatten)]
        args: RunArgs,
        /// JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build { args } => commands::build::handle(args).await,
        Commands::Plan { args, json } => commands::plan::handle(args, json).await,
        Commands::Version => {
            println!("imageflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
