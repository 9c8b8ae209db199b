use clap::Args;
use imageflow_config::BuilderConfig;
use imageflow_registry::TagCheckMode;
use std::path::PathBuf;

/// build / plan 共通の引数（指定したものが環境変数・設定ファイルより優先）
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// 設定ファイルのパス（未指定なら IMAGEFLOW_CONFIG_PATH、カレントディレクトリの順に探す）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// データソース (npm, github-releases, github-tags, docker, file)
    #[arg(long)]
    pub datasource: Option<String>,

    /// パッケージ名（例: yarn, nodejs/node）
    #[arg(long)]
    pub lookup_name: Option<String>,

    /// データソース固有の検索種別（例: github の releases）
    #[arg(long)]
    pub lookup_type: Option<String>,

    /// バージョンスキーム (semver, loose)
    #[arg(long)]
    pub version_scheme: Option<String>,

    /// これ未満のバージョンは対象外
    #[arg(long)]
    pub start_version: Option<String>,

    /// 公開先イメージ（タグなし、例: renovate/yarn）
    #[arg(short, long)]
    pub image: Option<String>,

    /// ビルド引数名（デフォルト: <IMAGE>_VERSION）
    #[arg(long)]
    pub build_arg: Option<String>,

    /// 除外するバージョン（カンマ区切り・複数指定可）
    #[arg(long = "ignore", value_delimiter = ',')]
    pub ignored_versions: Vec<String>,

    /// プッシュせずビルドのみ
    #[arg(long)]
    pub build_only: bool,

    /// 最新の1バージョンのみ
    #[arg(long, visible_alias = "latest-only")]
    pub last_only: bool,

    /// 公開済みでも再ビルド
    #[arg(short, long)]
    pub force: bool,

    /// --force 時に不安定版も含める
    #[arg(long)]
    pub force_unstable: bool,

    /// ビルドコンテキスト
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Dockerfile のパス
    #[arg(long)]
    pub dockerfile: Option<PathBuf>,

    /// docker 実行ファイル
    #[arg(long)]
    pub docker_bin: Option<String>,

    /// 公開済み確認に失敗したときの扱い (optimistic, strict)
    #[arg(long)]
    pub tag_check: Option<TagCheckMode>,

    /// Docker Hub API のベース URL
    #[arg(long, hide = true)]
    pub hub_api: Option<String>,
}

impl RunArgs {
    /// 指定された引数で設定を上書き
    pub fn apply_to(&self, config: &mut BuilderConfig) {
        let strings = [
            (&self.datasource, &mut config.datasource),
            (&self.lookup_name, &mut config.lookup_name),
            (&self.lookup_type, &mut config.lookup_type),
            (&self.version_scheme, &mut config.version_scheme),
            (&self.start_version, &mut config.start_version),
            (&self.image, &mut config.image),
            (&self.build_arg, &mut config.build_arg),
            (&self.hub_api, &mut config.hub_api),
        ];
        for (arg, field) in strings {
            if let Some(value) = arg {
                *field = Some(value.clone());
            }
        }

        if !self.ignored_versions.is_empty() {
            config.ignored_versions = self.ignored_versions.clone();
        }

        // フラグは有効化のみ
        config.build_only |= self.build_only;
        config.last_only |= self.last_only;
        config.force |= self.force;
        config.force_unstable |= self.force_unstable;

        if let Some(context) = &self.context {
            config.context = context.clone();
        }
        if let Some(dockerfile) = &self.dockerfile {
            config.dockerfile = Some(dockerfile.clone());
        }
        if let Some(docker_bin) = &self.docker_bin {
            config.docker_bin = docker_bin.clone();
        }
        if let Some(tag_check) = self.tag_check {
            config.tag_check = tag_check;
        }
    }
}
