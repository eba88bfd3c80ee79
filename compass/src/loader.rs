//! Catalog and plan loading
//!
//! Builds the immutable startup state: the catalog [`Scope`] from a single
//! YAML file, and the [`MapperSet`] from the configured plugin directories.
//! Load failures are fatal; the service never starts with a partial index.

use std::fs;
use std::path::Path;

use beacon_common::catalog::Catalog;
use beacon_common::plan::AssessmentPlan;
use beacon_common::{BeaconError, BeaconResult};
use tracing::{debug, info};

use crate::config::CompassConfig;
use crate::mapper::{factory, Mapper, MapperId, MapperSet, Scope};

/// Load the catalog file and wrap it in a single-entry scope.
pub fn load_scope(catalog_path: &Path) -> BeaconResult<Scope> {
    debug!(path = %catalog_path.display(), "loading catalog");

    let content = fs::read_to_string(catalog_path)?;
    let catalog: Catalog = serde_yaml::from_str(&content)?;

    debug!(catalog_id = %catalog.metadata.id, "catalog loaded");

    let mut scope = Scope::new();
    scope.insert(catalog.metadata.id.clone(), catalog);
    Ok(scope)
}

/// Build the mapper registry from the configured plugins.
///
/// Plugins without an evaluations directory are skipped with an info log;
/// missing or non-directory paths fail the load.
pub fn build_mapper_set(config: &CompassConfig) -> BeaconResult<MapperSet> {
    let mut set = MapperSet::new();
    debug!(count = config.plugins.len(), "loading plugins");

    for plugin in &config.plugins {
        let id = MapperId::new(plugin.id.clone());
        if plugin.evaluations_dir.is_empty() {
            info!(plugin_id = %id, "plugin has no evaluations; skipping");
            continue;
        }

        let dir = Path::new(&plugin.evaluations_dir);
        let metadata = fs::metadata(dir).map_err(|e| BeaconError::InvalidPlanDir {
            path: dir.to_path_buf(),
            plugin: plugin.id.clone(),
            reason: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(BeaconError::InvalidPlanDir {
                path: dir.to_path_buf(),
                plugin: plugin.id.clone(),
                reason: "not a directory".into(),
            });
        }

        let mapper = load_mapper_from_dir(id.clone(), dir)?;
        set.insert(id, mapper);
    }

    debug!(count = set.len(), "plugins loaded");
    Ok(set)
}

/// Build one mapper by parsing every regular file under `dir` as an
/// assessment plan.
pub fn load_mapper_from_dir(id: MapperId, dir: &Path) -> BeaconResult<Box<dyn Mapper>> {
    let mut mapper = factory::mapper_for(&id);
    add_plans_from_dir(mapper.as_mut(), dir)?;
    info!(plugin_id = %id, dir = %dir.display(), "plugin evaluations loaded");
    Ok(mapper)
}

fn add_plans_from_dir(mapper: &mut dyn Mapper, dir: &Path) -> BeaconResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            add_plans_from_dir(mapper, &path)?;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let content = fs::read_to_string(&path)?;
        // Files that are not assessment plans are ignored.
        let Ok(plan) = serde_yaml::from_str::<AssessmentPlan>(&content) else {
            continue;
        };

        // Plans without a catalog reference cannot be routed; drop them.
        if plan.control.reference_id.is_empty() {
            continue;
        }
        let catalog_id = plan.control.reference_id.clone();
        mapper.add_plan(&catalog_id, plan);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginConfig;
    use beacon_common::Policy;
    use std::io::Write;

    const CATALOG_YAML: &str = r#"
metadata:
  id: test-catalog
control_families:
  - title: Access Control
    controls:
      - id: AC-1
        guideline_mappings:
          - reference_id: NIST-800-53
            entries:
              - reference_id: AC-1
"#;

    const PLAN_YAML: &str = r#"
control:
  entry_id: AC-1
  reference_id: test-catalog
assessments:
  - requirement:
      entry_id: AC-1-REQ
    procedures:
      - id: AC-1
        documentation: Test procedure
"#;

    const UNROUTABLE_PLAN_YAML: &str = r#"
control:
  entry_id: AC-2
assessments: []
"#;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_scope() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "catalog.yaml", CATALOG_YAML);

        let scope = load_scope(&dir.path().join("catalog.yaml")).unwrap();
        assert_eq!(scope.len(), 1);
        assert!(scope.contains_key("test-catalog"));
    }

    #[test]
    fn test_load_scope_missing_file_fails() {
        let result = load_scope(Path::new("/nonexistent/catalog.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_mapper_from_dir_recurses_and_drops_unroutable() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "ac-1.yaml", PLAN_YAML);
        write_file(dir.path(), "no-ref.yaml", UNROUTABLE_PLAN_YAML);
        write_file(dir.path(), "README.md", "not a plan at all");
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_file(&nested, "ac-1-copy.yaml", PLAN_YAML);

        let mapper = load_mapper_from_dir(MapperId::new("test"), dir.path()).unwrap();

        let scope = load_scope_from_str();
        let compliance = mapper.map(
            &Policy {
                policy_rule_id: "AC-1".into(),
                policy_engine_name: "test".into(),
            },
            &scope,
        );
        assert_eq!(compliance.control.id, "AC-1-REQ");
    }

    fn load_scope_from_str() -> Scope {
        let catalog: beacon_common::catalog::Catalog =
            serde_yaml::from_str(CATALOG_YAML).unwrap();
        let mut scope = Scope::new();
        scope.insert(catalog.metadata.id.clone(), catalog);
        scope
    }

    #[test]
    fn test_build_mapper_set_skips_empty_dir_entries() {
        let config = CompassConfig {
            plugins: vec![PluginConfig {
                id: "no-evals".into(),
                evaluations_dir: String::new(),
            }],
            ..Default::default()
        };
        let set = build_mapper_set(&config).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_build_mapper_set_missing_dir_is_fatal() {
        let config = CompassConfig {
            plugins: vec![PluginConfig {
                id: "broken".into(),
                evaluations_dir: "/nonexistent/evaluations".into(),
            }],
            ..Default::default()
        };
        assert!(build_mapper_set(&config).is_err());
    }

    #[test]
    fn test_build_mapper_set_file_as_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "not-a-dir", "");
        let config = CompassConfig {
            plugins: vec![PluginConfig {
                id: "broken".into(),
                evaluations_dir: dir.path().join("not-a-dir").display().to_string(),
            }],
            ..Default::default()
        };
        assert!(build_mapper_set(&config).is_err());
    }

    #[test]
    fn test_build_mapper_set_keys_by_plugin_id() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "ac-1.yaml", PLAN_YAML);

        let config = CompassConfig {
            plugins: vec![PluginConfig {
                id: "kyverno".into(),
                evaluations_dir: dir.path().display().to_string(),
            }],
            ..Default::default()
        };
        let set = build_mapper_set(&config).unwrap();
        assert!(set.contains_key(&MapperId::new("kyverno")));
    }
}
