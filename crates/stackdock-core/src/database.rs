//! データベース用composeファイルの生成
//!
//! JDBC設定が見つかった場合に、固定のMySQLサービスを持つ
//! `docker-compose-db.yml` を生成します。アルゴリズム的な処理はなく、
//! 決定的な整形のみです。

use crate::error::{ComposeError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// データベース用composeファイルの内容を生成する
///
/// JDBCキーは設定されたプレフィックス（生の形・正規化済みの形どちらも）
/// を取り除き、大文字・`_`区切りに整形して出力します。
pub fn render_database_compose(
    jdbc_configs: &HashMap<String, String>,
    jdbc_prefix: &str,
) -> String {
    let normalized_prefix = jdbc_prefix.to_uppercase().replace(['.', '-'], "_");

    let mut content = String::new();
    content.push_str("version: '3.8'\n");
    content.push_str("services:\n");
    content.push_str("  database:\n");
    content.push_str("    image: mysql:8.0\n");
    content.push_str("    environment:\n");

    let mut entries: Vec<(&String, &String)> = jdbc_configs.iter().collect();
    entries.sort_by_key(|(key, _)| *key);
    for (key, value) in entries {
        let stripped = key
            .strip_prefix(jdbc_prefix)
            .or_else(|| key.strip_prefix(&normalized_prefix))
            .unwrap_or(key);
        let variable = stripped.to_uppercase().replace(['.', '-'], "_");
        content.push_str(&format!("      - {}={}\n", variable, value));
    }

    content.push_str("    ports:\n");
    content.push_str("      - \"3306:3306\"\n");
    content
}

/// データベース用composeファイルを書き込む
pub fn write_database_compose(
    output_dir: &Path,
    jdbc_configs: &HashMap<String, String>,
    jdbc_prefix: &str,
) -> Result<PathBuf> {
    let path = output_dir.join("docker-compose-db.yml");
    fs::write(&path, render_database_compose(jdbc_configs, jdbc_prefix)).map_err(|e| {
        ComposeError::Io {
            path: path.clone(),
            message: e.to_string(),
        }
    })?;
    info!(path = %path.display(), "Generated database compose file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_prefix_stripped() {
        let mut configs = HashMap::new();
        configs.insert(
            "spring.datasource.url".to_string(),
            "jdbc:mysql://db:3306/app".to_string(),
        );
        configs.insert("spring.datasource.username".to_string(), "app".to_string());

        let content = render_database_compose(&configs, "spring.datasource.");

        assert!(content.contains("      - URL=jdbc:mysql://db:3306/app\n"));
        assert!(content.contains("      - USERNAME=app\n"));
        assert!(content.contains("    image: mysql:8.0\n"));
        assert!(content.contains("      - \"3306:3306\"\n"));
    }

    #[test]
    fn test_normalized_prefix_stripped() {
        // YAML経由で取り込まれたキーは既に正規化済みの形をしている
        let mut configs = HashMap::new();
        configs.insert("SPRING_DATASOURCE_PASSWORD".to_string(), "secret".to_string());

        let content = render_database_compose(&configs, "spring.datasource.");

        assert!(content.contains("      - PASSWORD=secret\n"));
    }

    #[test]
    fn test_entries_sorted() {
        let mut configs = HashMap::new();
        configs.insert("spring.datasource.username".to_string(), "app".to_string());
        configs.insert("spring.datasource.password".to_string(), "secret".to_string());

        let content = render_database_compose(&configs, "spring.datasource.");

        let password = content.find("PASSWORD").unwrap();
        let username = content.find("USERNAME").unwrap();
        assert!(password < username);
    }
}
