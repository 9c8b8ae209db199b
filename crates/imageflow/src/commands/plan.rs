use crate::args::RunArgs;
use crate::commands::{exit_with_resolve_error, prepare_config, print_config, resolve_plan};
use colored::Colorize;

pub async fn handle(args: RunArgs, json: bool) -> anyhow::Result<()> {
    let config = prepare_config(&args)?;
    if !json {
        print_config(&config);
    }

    let plan = match resolve_plan(&config).await {
        Ok(plan) => plan,
        Err(e) => exit_with_resolve_error(e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("{}", "✓ ビルドが必要なバージョンはありません".green());
        return Ok(());
    }

    println!("{}", "ビルド計画:".bold());
    for version in &plan.versions {
        if plan.is_latest_stable(version) {
            println!("  • {} ({})", version.cyan(), "latest".green());
        } else {
            println!("  • {}", version.cyan());
        }
    }

    Ok(())
}
