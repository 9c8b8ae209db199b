use crate::args::RunArgs;
use crate::commands::{exit_with_resolve_error, prepare_config, print_config, resolve_plan};
use anyhow::Context;
use colored::Colorize;
use imageflow_build::{BuildExecutor, DockerCli, print_summary};

pub async fn handle(args: RunArgs) -> anyhow::Result<()> {
    let config = prepare_config(&args)?;
    print_config(&config);

    let plan = match resolve_plan(&config).await {
        Ok(plan) => plan,
        Err(e) => exit_with_resolve_error(e),
    };

    if plan.is_empty() {
        println!("{}", "✓ ビルドが必要なバージョンはありません".green());
    } else {
        println!(
            "{}",
            format!("{}個のバージョンをビルドします: {}", plan.len(), plan.versions.join(", ")).blue()
        );
        if let Some(latest) = &plan.latest_stable_version {
            println!("  latest: {}", latest.cyan());
        }
    }

    let image = config.image.as_deref().context("IMAGE が未設定です")?;
    let build_arg = config
        .build_arg_name()
        .context("ビルド引数名を決定できません")?;
    let toolchain = DockerCli::new(&config.docker_bin)
        .with_context(&config.context)
        .with_dockerfile(config.dockerfile.clone());

    let report = BuildExecutor::new(&toolchain, image, build_arg)
        .build_only(config.build_only)
        .execute_plan(&plan)
        .await;

    print_summary(&report);

    if !report.is_success() {
        println!();
        println!(
            "{}",
            format!("✗ {}個のバージョンが失敗しました", report.failed().len())
                .red()
                .bold()
        );
        std::process::exit(1);
    }

    if plan.is_empty() {
        return Ok(());
    }

    println!();
    if config.build_only {
        println!("{}", "✓ すべてのイメージがビルドされました！".green().bold());
    } else {
        println!(
            "{}",
            "✓ すべてのイメージがビルド＆プッシュされました！".green().bold()
        );
    }

    Ok(())
}
