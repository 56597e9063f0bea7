//! .envファイルの生成
//!
//! composeファイル内のプレースホルダ（`${<SERVICE>_<KEY>}`）が解決できる
//! よう、共通環境変数とサービスごとの環境変数をまとめた.envファイルを
//! 生成します。共通変数は素のキーで、サービス固有の変数はサービス名の
//! プレフィックス付きで出力します。

use crate::error::Result;
use crate::model::ServiceDescriptor;
use crate::render::{name_entry, value_entry};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// .envファイルの内容を生成する
///
/// 共通変数（キー順）、続いて各サービスの残余変数（サービスごとにキー順）。
pub fn render_env_file(
    common_environment: &HashMap<String, String>,
    services: &[ServiceDescriptor],
) -> String {
    let mut content = String::new();

    let mut common: Vec<(&String, &String)> = common_environment.iter().collect();
    common.sort_by_key(|(key, _)| *key);
    for (key, value) in common {
        content.push_str(&format!("{}={}\n", key, value_entry(false, key, value, None)));
    }

    for service in services {
        let mut entries: Vec<(&String, &String)> = service.environment.iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        for (key, value) in entries {
            content.push_str(&format!(
                "{}={}\n",
                name_entry(key, &service.name),
                value_entry(false, key, value, None)
            ));
        }
    }

    content
}

/// .envファイルを書き込む
pub fn write_env_file(
    output_dir: &Path,
    common_environment: &HashMap<String, String>,
    services: &[ServiceDescriptor],
) -> Result<PathBuf> {
    let path = output_dir.join(".env");
    fs::write(&path, render_env_file(common_environment, services)).map_err(|e| {
        crate::error::ComposeError::Io {
            path: path.clone(),
            message: e.to_string(),
        }
    })?;
    info!(path = %path.display(), "Generated environment file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_first_then_service_entries() {
        let mut common = HashMap::new();
        common.insert("SERVER_PORT".to_string(), "8080".to_string());

        let mut environment = HashMap::new();
        environment.insert("LOG_LEVEL".to_string(), "debug".to_string());
        let services = vec![ServiceDescriptor {
            name: "svc-a".to_string(),
            environment,
            ..Default::default()
        }];

        let content = render_env_file(&common, &services);

        assert_eq!(content, "SERVER_PORT=8080\nSVC-A_LOG_LEVEL=debug\n");
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let common = HashMap::new();
        let mut environment = HashMap::new();
        environment.insert("ZETA".to_string(), "1".to_string());
        environment.insert("ALPHA".to_string(), "2".to_string());
        let services = vec![ServiceDescriptor {
            name: "app".to_string(),
            environment,
            ..Default::default()
        }];

        let content = render_env_file(&common, &services);

        assert_eq!(content, "APP_ALPHA=2\nAPP_ZETA=1\n");
    }

    #[test]
    fn test_value_with_spaces_is_quoted() {
        let mut common = HashMap::new();
        common.insert("GREETING".to_string(), "hello world".to_string());

        let content = render_env_file(&common, &[]);

        assert_eq!(content, "GREETING='hello world'\n");
    }
}
