//! ビルド計画の実行
//!
//! 計画されたバージョンを1つずつビルドし、必要ならプッシュします。
//! 個々のバージョンの失敗は記録して次へ進み、全体を止めません。

use crate::error::BuildResult;
use crate::tag::{LATEST_TAG, image_reference};
use crate::toolchain::Toolchain;
use colored::Colorize;
use imageflow_core::{BuildPlan, ExecutionReport};

pub struct BuildExecutor<'a> {
    toolchain: &'a dyn Toolchain,
    image: String,
    build_arg: String,
    build_only: bool,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(
        toolchain: &'a dyn Toolchain,
        image: impl Into<String>,
        build_arg: impl Into<String>,
    ) -> Self {
        Self {
            toolchain,
            image: image.into(),
            build_arg: build_arg.into(),
            build_only: false,
        }
    }

    /// プッシュせずビルドだけ行う
    pub fn build_only(mut self, build_only: bool) -> Self {
        self.build_only = build_only;
        self
    }

    /// 計画内の全バージョンを順番に処理する
    pub async fn execute_plan(&self, plan: &BuildPlan) -> ExecutionReport {
        let mut report = ExecutionReport::new();

        for version in &plan.versions {
            println!();
            println!(
                "{}",
                format!("Building {}:{}...", self.image, version).blue()
            );

            match self.build_version(version, plan.is_latest_stable(version)).await {
                Ok(()) => {
                    println!("  {} {}", "✓".green(), version.cyan());
                    report.record(version.clone(), true);
                }
                Err(e) => {
                    eprintln!("  {} {}", "✗".red().bold(), e.user_message());
                    tracing::warn!("Failed to build version {}: {}", version, e);
                    report.record(version.clone(), false);
                }
            }
        }

        report
    }

    async fn build_version(&self, version: &str, is_latest: bool) -> BuildResult<()> {
        let reference = image_reference(&self.image, version)?;

        self.toolchain
            .build(&reference, &self.build_arg, version)
            .await?;

        if self.build_only {
            return Ok(());
        }

        self.toolchain.push(&reference).await?;

        if is_latest {
            let latest = image_reference(&self.image, LATEST_TAG)?;
            println!("  → {} に {} を付与", version, LATEST_TAG.cyan());
            self.toolchain.tag(&reference, &latest).await?;
            self.toolchain.push(&latest).await?;
        }

        Ok(())
    }
}

/// 結果サマリーを表示（成功・失敗の両方を常に出す）
pub fn print_summary(report: &ExecutionReport) {
    let built = report.built();
    let failed = report.failed();

    println!();
    println!("{}", "結果サマリー:".bold());
    println!(
        "  {} ビルド成功 ({}): {}",
        "✓".green(),
        built.len(),
        format_versions(&built)
    );
    println!(
        "  {} ビルド失敗 ({}): {}",
        "✗".red().bold(),
        failed.len(),
        format_versions(&failed)
    );
}

fn format_versions(versions: &[&str]) -> String {
    if versions.is_empty() {
        "-".dimmed().to_string()
    } else {
        versions.join(", ")
    }
}
