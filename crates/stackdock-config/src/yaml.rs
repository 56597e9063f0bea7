//! application.ymlのスキャン
//!
//! `# DockerInclude` コメントの直後のキーを対象として記録したうえで
//! ドキュメント全体をパースし、ネストしたキーを `_` で連結しながら
//! 再帰的に値を取り込みます。

use crate::error::{ConfigError, Result};
use crate::keys::format_property_key;
use crate::scanner::ModuleScan;
use crate::{DOCKER_INCLUDE_MARKER, SERVER_PORT_PROPERTY};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// YAMLファイルを1つスキャンして結果に取り込む
pub fn scan_yaml_file(path: &Path, jdbc_prefix: &str, scan: &mut ModuleScan) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // 前段パス: マーカーコメントの直後に現れるキーを記録する
    let mut include_keys: HashSet<String> = HashSet::new();
    let mut awaiting_key = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            if line.contains(DOCKER_INCLUDE_MARKER) {
                awaiting_key = true;
            }
            continue;
        }
        if awaiting_key && !line.is_empty() {
            if let Some(colon_index) = line.find(':') {
                if colon_index > 0 {
                    include_keys.insert(line[..colon_index].trim().to_string());
                    awaiting_key = false;
                }
            }
        }
    }

    let document: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let normalized_jdbc_prefix = format_property_key(jdbc_prefix);
    if let serde_yaml::Value::Mapping(mapping) = &document {
        traverse("", mapping, &normalized_jdbc_prefix, &include_keys, scan);
    }

    debug!(
        file = %path.display(),
        marked_key_count = include_keys.len(),
        "Scanned YAML file"
    );
    Ok(())
}

/// ネストしたマッピングを再帰的に走査する
fn traverse(
    parent_key: &str,
    mapping: &serde_yaml::Mapping,
    jdbc_prefix: &str,
    include_keys: &HashSet<String>,
    scan: &mut ModuleScan,
) {
    for (key, value) in mapping {
        let Some(key_str) = key.as_str() else {
            continue;
        };
        let current_key = if parent_key.is_empty() {
            key_str.to_string()
        } else {
            format!("{}_{}", parent_key, key_str)
        };

        match value {
            serde_yaml::Value::Mapping(child) => {
                traverse(&current_key, child, jdbc_prefix, include_keys, scan);
            }
            serde_yaml::Value::Null => {}
            scalar => {
                // マーカーが付いていた元のYAMLキーのみ取り込む
                if !include_keys.contains(key_str) {
                    continue;
                }
                let Some(string_value) = scalar_to_string(scalar) else {
                    continue;
                };
                let formatted_key = format_property_key(&current_key);

                if formatted_key.starts_with(jdbc_prefix) {
                    scan.jdbc_configs
                        .insert(formatted_key.clone(), string_value.clone());
                }
                if formatted_key == format_property_key(SERVER_PORT_PROPERTY) {
                    scan.add_port(&string_value);
                }
                scan.environment.insert(formatted_key, string_value);
            }
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.trim().to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scan(content: &str) -> ModuleScan {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.yml");
        fs::write(&path, content).unwrap();

        let mut result = ModuleScan::default();
        scan_yaml_file(&path, "spring.datasource.", &mut result).unwrap();
        result
    }

    #[test]
    fn test_marked_nested_key_included_with_joined_name() {
        let result = scan(
            "logging:\n  level:\n    # DockerInclude\n    root: info\n",
        );

        assert_eq!(result.environment.get("LOGGING_LEVEL_ROOT").unwrap(), "info");
    }

    #[test]
    fn test_unmarked_keys_ignored() {
        let result = scan("app:\n  name: demo\n  mode: fast\n");

        assert!(result.environment.is_empty());
    }

    #[test]
    fn test_server_port_feeds_ports() {
        let result = scan("server:\n  # DockerInclude\n  port: 8443\n");

        assert_eq!(result.ports, vec!["8443".to_string()]);
        assert_eq!(result.environment.get("SERVER_PORT").unwrap(), "8443");
    }

    #[test]
    fn test_jdbc_prefix_feeds_jdbc_map() {
        let result = scan(
            "spring:\n  datasource:\n    # DockerInclude\n    url: jdbc:mysql://db:3306/app\n",
        );

        assert_eq!(
            result.jdbc_configs.get("SPRING_DATASOURCE_URL").unwrap(),
            "jdbc:mysql://db:3306/app"
        );
        assert_eq!(
            result.environment.get("SPRING_DATASOURCE_URL").unwrap(),
            "jdbc:mysql://db:3306/app"
        );
    }

    #[test]
    fn test_scalar_types_stringified() {
        let result = scan(
            "feature:\n  # DockerInclude\n  enabled: true\napp:\n  # DockerInclude\n  workers: 4\n",
        );

        assert_eq!(result.environment.get("FEATURE_ENABLED").unwrap(), "true");
        assert_eq!(result.environment.get("APP_WORKERS").unwrap(), "4");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.yml");
        fs::write(&path, "key: [unclosed\n").unwrap();

        let mut result = ModuleScan::default();
        let outcome = scan_yaml_file(&path, "spring.datasource.", &mut result);

        assert!(matches!(outcome, Err(ConfigError::YamlParse { .. })));
    }
}
