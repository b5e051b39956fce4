use crate::error::{RiskError, Result};
use crate::types::config::RiskConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "credit-risk.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".credit-risk/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/credit-risk/config.toml";

/// Loads layered configuration rooted at `root`, falling back to defaults
/// when no layer exists.
pub fn load_config(root: &Path) -> Result<RiskConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<RiskConfig> {
    let mut merged = Value::Table(Map::new());
    let mut sources = Vec::new();
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path, &mut sources)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE), &mut sources)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE), &mut sources)?;

    if sources.is_empty() {
        return Ok(RiskConfig::default());
    }

    let mut cfg: RiskConfig = merged.try_into()?;
    cfg.validate()?;
    cfg.sources = sources;
    Ok(cfg)
}

fn merge_file_if_exists(
    merged: &mut Value,
    path: &Path,
    sources: &mut Vec<PathBuf>,
) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let mut value = read_toml_value(path)?;
    if let Some(dir) = path.parent() {
        resolve_model_path(&mut value, dir);
    }
    merge_toml(merged, value);
    sources.push(path.to_path_buf());
    Ok(())
}

/// Anchors a relative `[model] path` to the directory of the layer that set it.
fn resolve_model_path(layer: &mut Value, dir: &Path) {
    let Some(Value::String(raw)) = layer
        .get_mut("model")
        .and_then(|model| model.get_mut("path"))
    else {
        return;
    };
    let path = Path::new(raw.as_str());
    if path.is_relative() {
        *raw = dir.join(path).to_string_lossy().into_owned();
    }
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| RiskError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_uses_defaults_when_no_layer_exists() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert_eq!(cfg.score_scale().base_score, 300.0);
        assert_eq!(cfg.score_scale().scale_length, 600.0);
        assert!(cfg.insight_command().is_none());
        assert!(cfg.sources.is_empty());
    }

    #[test]
    fn load_config_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[insights]
command = "global-llm"
timeout_secs = 30

[scoring]
base_score = 250.0
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[model]
path = "artifacts/model.json"

[scoring]
base_score = 300.0
scale_length = 600.0

[insights]
command = "repo-llm"
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".credit-risk")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[insights]
enabled = false
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed");

        assert_eq!(cfg.score_scale().base_score, 300.0);
        assert_eq!(cfg.model_path(), root.path().join("artifacts/model.json"));
        let insights = cfg.insights.as_ref().expect("insights section merged");
        assert_eq!(insights.command.as_deref(), Some("repo-llm"));
        assert_eq!(insights.timeout_secs, Some(30));
        assert!(!insights.enabled);
        assert!(cfg.insight_command().is_none());
        assert_eq!(
            cfg.sources,
            vec![
                global_path.clone(),
                root.path().join(DEFAULT_CONFIG_FILE),
                root.path().join(DEFAULT_LOCAL_FILE),
            ]
        );
    }

    #[test]
    fn model_path_from_global_layer_resolves_against_global_dir() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");
        fs::write(
            &global_path,
            r#"
[model]
path = "models/m.json"
"#,
        )
        .expect("global config should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed");
        assert_eq!(cfg.model_path(), global_root.path().join("models/m.json"));
    }

    #[test]
    fn model_path_from_local_layer_resolves_against_local_dir() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[model]
path = "artifacts/model.json"
"#,
        )
        .expect("repo config should write");
        fs::create_dir_all(root.path().join(".credit-risk")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[model]
path = "override.json"
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), None).expect("load should succeed");
        assert_eq!(
            cfg.model_path(),
            root.path().join(".credit-risk").join("override.json")
        );
    }

    #[test]
    fn absolute_model_path_is_kept() {
        let root = TempDir::new().expect("root temp dir should be created");
        let model = root.path().join("elsewhere/model.json");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            format!("[model]\npath = {:?}\n", model.display().to_string()),
        )
        .expect("repo config should write");

        let cfg = load_config_with_global(root.path(), None).expect("load should succeed");
        assert_eq!(cfg.model_path(), model);
    }

    #[test]
    fn load_config_reports_type_mismatch_as_toml_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[scoring]
scale_length = "wide"
"#,
        )
        .expect("repo config should write");

        let err = load_config_with_global(root.path(), None).expect_err("string scale fails");
        assert!(matches!(err, RiskError::Toml(_)));
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[scoring]
scale_length = -600.0
"#,
        )
        .expect("repo config should write");

        let err = load_config_with_global(root.path(), None).expect_err("negative scale fails");
        assert!(matches!(err, RiskError::ConfigParse(_)));
    }

    #[test]
    fn load_config_reports_malformed_toml_with_path() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[scoring\n")
            .expect("repo config should write");

        let err = load_config_with_global(root.path(), None).expect_err("malformed toml fails");
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }
}
