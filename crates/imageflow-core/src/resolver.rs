//! ビルドリストの算出
//!
//! 上流のリリース一覧とポリシーから、ビルドすべきバージョンを昇順で求めます。
//!
//! 処理順:
//! 1. リリース一覧を取得（空ならそのまま空の計画を返す）
//! 2. スキームで有効なものだけ残し、先頭の `v` を1つ除去してから昇順に並べる
//! 3. 下限バージョン未満と除外指定を取り除く
//! 4. `latest` 対象の安定版と、最新バージョンを決める
//! 5. last_only なら最新の1件に絞る
//! 6. force の有無に応じて候補を選ぶ（force なしならタグの存在を1件ずつ確認）

use crate::cache::LookupCache;
use crate::error::Result;
use crate::model::{BuildPlan, LookupQuery, ReleaseSet, VersionPolicy};
use crate::provider::{ReleaseLookup, TagExistence, VersionScheme};

/// 先頭の `v` を1つだけ除去
pub fn strip_v_prefix(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

pub struct BuildListResolver<'a> {
    lookup: &'a dyn ReleaseLookup,
    scheme: &'a dyn VersionScheme,
    tags: &'a dyn TagExistence,
    cache: &'a LookupCache,
}

impl<'a> BuildListResolver<'a> {
    pub fn new(
        lookup: &'a dyn ReleaseLookup,
        scheme: &'a dyn VersionScheme,
        tags: &'a dyn TagExistence,
        cache: &'a LookupCache,
    ) -> Self {
        Self {
            lookup,
            scheme,
            tags,
            cache,
        }
    }

    /// ビルド計画を算出
    ///
    /// リリース取得やタグ確認のエラーはそのまま返す（不完全な情報で計画を作らない）。
    pub async fn compute_build_plan(
        &self,
        query: &LookupQuery,
        image: &str,
        policy: &VersionPolicy,
    ) -> Result<BuildPlan> {
        tracing::info!("Looking up versions");
        let releases = self.fetch_releases(query).await?;

        let all_versions = self.normalize(&releases);
        tracing::info!("Found {} total versions", all_versions.len());
        if all_versions.is_empty() {
            tracing::info!("Nothing to build");
            return Ok(BuildPlan::empty());
        }

        let filtered = self.apply_policy_filters(all_versions, policy);
        tracing::info!("Found {} versions within our range", filtered.len());

        let Some(most_recent) = filtered.last().cloned() else {
            tracing::info!("Nothing to build");
            return Ok(BuildPlan::empty());
        };

        let latest_stable_version = releases
            .latest_version
            .as_deref()
            .map(|v| strip_v_prefix(v.trim()).to_string())
            .or_else(|| self.newest_stable(&filtered));
        match &latest_stable_version {
            Some(v) => tracing::info!("Latest stable version is {}", v),
            None => tracing::info!("No stable version found, latest tag will not be updated"),
        }
        tracing::info!("Most recent version is {}", most_recent);

        let candidates = if policy.last_only {
            tracing::info!("Building last version only");
            vec![most_recent.clone()]
        } else {
            filtered
        };

        let versions = if policy.force {
            if policy.force_unstable {
                tracing::info!("Force building all versions");
                candidates
            } else {
                tracing::info!("Force building all stable versions");
                candidates
                    .into_iter()
                    .filter(|v| *v == most_recent || self.scheme.is_stable(v))
                    .collect()
            }
        } else {
            tracing::info!("Checking to see which versions need to be built");
            self.missing_tags(image, candidates).await?
        };

        if versions.is_empty() {
            tracing::info!("Nothing to build");
        } else {
            tracing::info!("Build list: {}", versions.join(" "));
        }

        Ok(BuildPlan {
            versions,
            latest_stable_version,
        })
    }

    async fn fetch_releases(&self, query: &LookupQuery) -> Result<ReleaseSet> {
        if let Some(cached) = self.cache.get(query) {
            tracing::debug!(
                "Using cached releases for {}/{}",
                query.datasource,
                query.lookup_name
            );
            return Ok(cached);
        }

        let releases = self.lookup.get_releases(query).await?;
        self.cache.insert(query.clone(), releases.clone());
        Ok(releases)
    }

    /// 有効なバージョンだけを残して前後の空白と `v` を除去し、昇順に並べる
    ///
    /// 重複は除去しない（同じバージョンが2回ビルドされうる）。
    pub fn normalize(&self, releases: &ReleaseSet) -> Vec<String> {
        let mut versions: Vec<String> = releases
            .versions()
            .filter(|v| self.scheme.is_version(v))
            .map(|v| strip_v_prefix(v.trim()).to_string())
            .collect();
        versions.sort_by(|a, b| self.scheme.compare(a, b));
        versions
    }

    /// 下限バージョンと除外指定を適用（順序は保持）
    pub fn apply_policy_filters(
        &self,
        versions: Vec<String>,
        policy: &VersionPolicy,
    ) -> Vec<String> {
        versions
            .into_iter()
            .filter(|v| match policy.start_version.as_deref() {
                Some(start) => !self.scheme.is_less_than_range(v, start),
                None => true,
            })
            .filter(|v| !policy.is_ignored(v))
            .collect()
    }

    fn newest_stable(&self, versions: &[String]) -> Option<String> {
        versions
            .iter()
            .rev()
            .find(|v| self.scheme.is_stable(v))
            .cloned()
    }

    /// タグが未公開のバージョンだけを残す
    ///
    /// レジストリへの問い合わせは1件ずつ順番に行う。
    async fn missing_tags(&self, image: &str, candidates: Vec<String>) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for version in candidates {
            if self.tags.tag_exists(image, &version).await? {
                tracing::debug!("{}:{} already exists", image, version);
            } else {
                tracing::info!("{}:{} needs to be built", image, version);
                missing.push(version);
            }
        }
        Ok(missing)
    }
}
