//! モデル定義
//!
//! imageflow で使用されるデータモデルを定義します。

mod plan;
mod policy;
mod release;

// Re-exports
pub use plan::*;
pub use policy::*;
pub use release::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_set_deserialize_camel_case() {
        let json = r#"{
            "releases": [{ "version": "1.0.0" }, { "version": "1.1.0" }],
            "latestVersion": "1.1.0"
        }"#;

        let set: ReleaseSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.versions().collect::<Vec<_>>(), vec!["1.0.0", "1.1.0"]);
        assert_eq!(set.latest_version.as_deref(), Some("1.1.0"));
    }

    #[test]
    fn test_release_set_missing_fields_default() {
        let set: ReleaseSet = serde_json::from_str("{}").unwrap();
        assert!(set.is_empty());
        assert!(set.latest_version.is_none());
    }

    #[test]
    fn test_policy_latest_only_alias() {
        let policy: VersionPolicy =
            serde_json::from_str(r#"{ "latest_only": true, "ignored_versions": ["1.2.0"] }"#)
                .unwrap();
        assert!(policy.last_only);
        assert!(policy.is_ignored("1.2.0"));
        assert!(!policy.is_ignored("1.2"));
    }

    #[test]
    fn test_plan_latest_stable() {
        let plan = BuildPlan {
            versions: vec!["1.0.0".to_string(), "1.1.0".to_string()],
            latest_stable_version: Some("1.1.0".to_string()),
        };
        assert!(plan.is_latest_stable("1.1.0"));
        assert!(!plan.is_latest_stable("1.0.0"));
        assert!(!BuildPlan::empty().is_latest_stable("1.1.0"));
    }

    #[test]
    fn test_execution_report_partial_failure() {
        let mut report = ExecutionReport::new();
        report.record("1.0.0", true);
        report.record("1.1.0", false);

        assert_eq!(report.built(), vec!["1.0.0"]);
        assert_eq!(report.failed(), vec!["1.1.0"]);
        assert!(!report.is_success());
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = ExecutionReport::new();
        assert!(report.is_success());
        assert!(report.built().is_empty());
        assert!(report.failed().is_empty());
    }
}
