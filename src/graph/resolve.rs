//! Dependency-aware ordering of affected projects
//!
//! Post-order depth-first traversal over the affected subgraph: every
//! affected dependency of a project is emitted before the project itself.
//! Dependencies outside the affected set are not rebuilt and impose no
//! ordering constraint, so they are skipped entirely. A cycle among
//! affected projects fails the whole run.

use std::collections::{BTreeSet, HashMap};

use crate::config::Config;
use crate::error::{ChangePlanError, Result};

/// Ordered build plan for the affected projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOrder {
    /// Affected project IDs, every affected dependency before its dependents
    pub ordered: Vec<String>,
    /// Whether any affected project publishes via a .nuspec manifest
    pub has_nuspec: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    InProgress,
    Done,
}

/// Order the affected projects so that every affected dependency precedes
/// its dependents.
///
/// Roots are visited in lexicographic ID order, so the emitted order is
/// deterministic across runs.
pub fn resolve_order(config: &Config, affected: &BTreeSet<String>) -> Result<BuildOrder> {
    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut ordered: Vec<String> = Vec::new();

    for id in affected {
        visit(id, config, affected, &mut state, &mut ordered)?;
    }

    let has_nuspec = affected
        .iter()
        .filter_map(|id| config.get(id))
        .any(|project| project.path.ends_with(".nuspec"));

    Ok(BuildOrder { ordered, has_nuspec })
}

fn visit<'a>(
    id: &'a str,
    config: &'a Config,
    affected: &BTreeSet<String>,
    state: &mut HashMap<&'a str, VisitState>,
    ordered: &mut Vec<String>,
) -> Result<()> {
    match state.get(id) {
        Some(VisitState::Done) => return Ok(()),
        Some(VisitState::InProgress) => {
            return Err(ChangePlanError::CircularDependency {
                project: id.to_string(),
            });
        }
        None => {}
    }

    state.insert(id, VisitState::InProgress);

    if let Some(project) = config.get(id) {
        for dep in &project.dependencies {
            // Dangling dependency IDs never appear in the affected set,
            // so they are skipped here without a separate existence check.
            if affected.contains(dep) {
                visit(dep, config, affected, state, ordered)?;
            }
        }
    }

    state.insert(id, VisitState::Done);
    ordered.push(id.to_string());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::detect_affected;

    fn config(json: &str) -> Config {
        Config::from_json_str(json).unwrap()
    }

    fn affected(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dependencies_precede_dependents() {
        let config = config(
            r#"{
                "core": {"path": "core/", "dependencies": []},
                "api": {"path": "api/", "dependencies": ["core"]},
                "web": {"path": "web/", "dependencies": ["api", "core"]}
            }"#,
        );

        let order = resolve_order(&config, &affected(&["web", "api", "core"])).unwrap();

        let pos = |id: &str| order.ordered.iter().position(|x| x == id).unwrap();
        assert!(pos("core") < pos("api"));
        assert!(pos("api") < pos("web"));
        assert_eq!(order.ordered.len(), 3);
    }

    #[test]
    fn unaffected_dependencies_impose_no_constraint() {
        let config = config(
            r#"{
                "core": {"path": "core/", "dependencies": []},
                "api": {"path": "api/", "dependencies": ["core"]}
            }"#,
        );

        let order = resolve_order(&config, &affected(&["api"])).unwrap();

        assert_eq!(order.ordered, vec!["api"]);
    }

    #[test]
    fn cycle_among_affected_projects_is_fatal() {
        let config = config(
            r#"{
                "a": {"path": "a/", "dependencies": ["b"]},
                "b": {"path": "b/", "dependencies": ["c"]},
                "c": {"path": "c/", "dependencies": ["a"]}
            }"#,
        );

        let err = resolve_order(&config, &affected(&["a", "b", "c"])).unwrap_err();

        assert!(matches!(err, ChangePlanError::CircularDependency { .. }));
    }

    #[test]
    fn cycle_through_an_unaffected_project_is_broken() {
        let config = config(
            r#"{
                "a": {"path": "a/", "dependencies": ["b"]},
                "b": {"path": "b/", "dependencies": ["c"]},
                "c": {"path": "c/", "dependencies": ["a"]}
            }"#,
        );

        // c is not affected, so the a -> b -> c -> a loop never closes.
        let order = resolve_order(&config, &affected(&["a", "b"])).unwrap();

        assert_eq!(order.ordered, vec!["b", "a"]);
    }

    #[test]
    fn dangling_dependencies_are_ignored() {
        let config = config(
            r#"{"a": {"path": "a/", "dependencies": ["never-declared"]}}"#,
        );

        let order = resolve_order(&config, &affected(&["a"])).unwrap();

        assert_eq!(order.ordered, vec!["a"]);
    }

    #[test]
    fn order_is_deterministic_across_runs() {
        let config = config(
            r#"{
                "a": {"path": "a/"},
                "b": {"path": "b/"},
                "c": {"path": "c/", "dependencies": ["a"]}
            }"#,
        );
        let set = affected(&["a", "b", "c"]);

        let first = resolve_order(&config, &set).unwrap();
        let second = resolve_order(&config, &set).unwrap();

        assert_eq!(first, second);
        // Roots visit in lexicographic order, dependencies still first.
        assert_eq!(first.ordered, vec!["a", "b", "c"]);
    }

    #[test]
    fn nuspec_flag_reflects_affected_paths_only() {
        let config = config(
            r#"{
                "pkg": {"path": "pkg/foo.nuspec"},
                "app": {"path": "app/app.csproj"}
            }"#,
        );

        let with_pkg = resolve_order(&config, &affected(&["pkg", "app"])).unwrap();
        assert!(with_pkg.has_nuspec);

        let without_pkg = resolve_order(&config, &affected(&["app"])).unwrap();
        assert!(!without_pkg.has_nuspec);
    }

    #[test]
    fn detection_and_ordering_compose() {
        let config = config(
            r#"{
                "A": {"path": "a/", "patterns": ["a/*"], "dependencies": []},
                "B": {"path": "b/", "patterns": ["b/*"], "dependencies": ["A"]}
            }"#,
        );
        let changed = vec!["a/x.txt".to_string(), "b/y.txt".to_string()];

        let detected = detect_affected(&config, &changed);
        assert_eq!(detected, affected(&["A", "B"]));

        let order = resolve_order(&config, &detected).unwrap();
        assert_eq!(order.ordered, vec!["A", "B"]);
    }
}
