//! Detection of affected projects from a change set

use std::collections::BTreeSet;

use crate::config::Config;
use crate::matcher;

/// Find projects owning at least one changed file
///
/// A project is affected as soon as one of its patterns matches one changed
/// file; remaining files are skipped for that project. Projects with no
/// patterns are never affected.
pub fn detect_affected(config: &Config, changed_files: &[String]) -> BTreeSet<String> {
    let mut affected: BTreeSet<String> = BTreeSet::new();

    for (id, project) in &config.projects {
        for file in changed_files {
            if matcher::matches(file, &project.patterns) {
                affected.insert(id.clone());
                break;
            }
        }
    }

    affected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::from_json_str(
            r#"{
                "core": {"path": "src/Core/Core.csproj", "patterns": ["src/Core/*"]},
                "api": {"path": "src/Api/Api.csproj", "patterns": ["src/Api/*"], "dependencies": ["core"]},
                "docs": {"path": "docs", "patterns": ["docs/*"]},
                "meta": {"path": "meta"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn projects_with_matching_files_are_affected() {
        let config = test_config();
        let changed = vec!["src/Core/lib.cs".to_string(), "docs/index.md".to_string()];

        let affected = detect_affected(&config, &changed);

        assert!(affected.contains("core"));
        assert!(affected.contains("docs"));
        assert!(!affected.contains("api"));
    }

    #[test]
    fn project_without_patterns_is_never_affected() {
        let config = test_config();
        let changed = vec!["meta".to_string(), "anything/at/all".to_string()];

        let affected = detect_affected(&config, &changed);

        assert!(!affected.contains("meta"));
    }

    #[test]
    fn no_changes_means_nothing_affected() {
        let config = test_config();

        assert!(detect_affected(&config, &[]).is_empty());
    }

    #[test]
    fn result_does_not_depend_on_file_order() {
        let config = test_config();
        let forward = vec!["src/Api/a.cs".to_string(), "src/Core/b.cs".to_string()];
        let reverse: Vec<String> = forward.iter().rev().cloned().collect();

        assert_eq!(
            detect_affected(&config, &forward),
            detect_affected(&config, &reverse)
        );
    }
}
