pub mod build;
pub mod plan;

use crate::args::RunArgs;
use anyhow::Context;
use colored::Colorize;
use imageflow_build::split_image_tag;
use imageflow_config::{BuilderConfig, CiEnv, apply_ci_override, load_config};
use imageflow_core::{BuildListResolver, BuildPlan, LookupCache, versioning};
use imageflow_datasource::{DatasourceLookup, Endpoints};
use imageflow_registry::RegistryTagChecker;

/// 設定を読み込み、CI の上書きと検証まで行う
pub fn prepare_config(args: &RunArgs) -> anyhow::Result<BuilderConfig> {
    let mut config = load_config(args.config.clone())?;
    args.apply_to(&mut config);

    if apply_ci_override(&mut config, &CiEnv::from_env()) {
        tracing::warn!("CI のブランチビルドを検出: 最新版のみ強制ビルドし、プッシュしません");
    }

    config.validate()?;

    if let Some(image) = config.image.as_deref()
        && let (name, Some(tag)) = split_image_tag(image)
    {
        anyhow::bail!(
            "IMAGE にはタグを含めないでください: {} (タグ '{}' を除いて {} を指定)",
            image,
            tag,
            name
        );
    }

    Ok(config)
}

/// 実行に使う設定を表示
pub fn print_config(config: &BuilderConfig) {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    println!("{}", "設定:".bold());
    println!("  image:          {}", or_dash(config.image.as_deref()).cyan());
    println!(
        "  datasource:     {} ({})",
        or_dash(config.datasource.as_deref()).cyan(),
        or_dash(config.lookup_name.as_deref())
    );
    if let Some(lookup_type) = &config.lookup_type {
        println!("  lookup type:    {}", lookup_type);
    }
    println!("  version scheme: {}", config.version_scheme_name());
    if let Some(start) = &config.start_version {
        println!("  start version:  {}", start);
    }
    if !config.ignored_versions.is_empty() {
        println!("  ignored:        {}", config.ignored_versions.join(", "));
    }
    println!(
        "  build arg:      {}",
        or_dash(config.build_arg_name().as_deref())
    );

    let flags: Vec<&str> = [
        (config.build_only, "build-only"),
        (config.last_only, "last-only"),
        (config.force, "force"),
        (config.force_unstable, "force-unstable"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !flags.is_empty() {
        println!("  flags:          {}", flags.join(", ").yellow());
    }
    println!();
}

/// ビルド計画を算出
pub async fn resolve_plan(config: &BuilderConfig) -> anyhow::Result<BuildPlan> {
    let scheme = versioning::get(config.version_scheme_name())?;

    let mut endpoints = Endpoints::default();
    let mut tags = RegistryTagChecker::new().with_mode(config.tag_check);
    if let Some(hub_api) = &config.hub_api {
        endpoints.docker_hub_api = hub_api.clone();
        tags = tags.with_hub_api(hub_api.clone());
    }
    let lookup = DatasourceLookup::new().with_endpoints(endpoints);
    let cache = LookupCache::new();

    let image = config.image.as_deref().context("IMAGE が未設定です")?;
    let resolver = BuildListResolver::new(&lookup, scheme.as_ref(), &tags, &cache);
    let plan = resolver
        .compute_build_plan(&config.lookup_query(), image, &config.version_policy())
        .await?;
    tracing::debug!("Resolved build plan: {:?}", plan);

    Ok(plan)
}

/// 解決エラーを表示して終了
pub fn exit_with_resolve_error(error: anyhow::Error) -> ! {
    tracing::debug!("Resolve failed: {:?}", error);
    eprintln!("{}", "Error in imageflow".red().bold());
    eprintln!("{:#}", error);
    std::process::exit(1);
}
