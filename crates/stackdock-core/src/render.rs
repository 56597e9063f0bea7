//! サービスエントリのレンダリング
//!
//! サービス1つ分のYAML断片を生成します。共有ブロック名が与えられた場合は
//! マージ参照（`<<: *name`）付きの断片を、与えられない場合は独立した
//! 断片を出力します。キーとポートは常にソートしてから出力するため、
//! 同じ入力からは必ず同じバイト列が得られます。

use crate::model::ServiceDescriptor;

/// レンダリングオプション
///
/// 共有ブロックが存在する場合のみ各フィールドを設定します。
/// `common_environment_name` は共通環境変数が空でない場合のみ設定します。
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// 共有ブロック全体のアンカー名（`<<: *name` で参照）
    pub common_name: Option<&'a str>,
    /// 共有環境変数サブブロックのアンカー名
    pub common_environment_name: Option<&'a str>,
}

/// サービス1つ分のYAML断片を生成する
pub fn service_entry(service: &ServiceDescriptor, options: RenderOptions<'_>) -> String {
    let mut entry = String::new();

    entry.push_str(&format!("  {}:\n", service.name));
    if let Some(common_name) = options.common_name {
        entry.push_str(&format!("    <<: *{}\n", common_name));
    }
    entry.push_str(&format!("    image: {}\n", service.image()));

    entry.push_str("    environment:\n");
    let mut env: Vec<(&String, &String)> = service.environment.iter().collect();
    env.sort_by_key(|(key, _)| *key);

    if let Some(env_name) = options.common_environment_name {
        // 共有環境変数をマージ参照し、残余キーをマップ形式で上書きする
        entry.push_str(&format!("      <<: *{}\n", env_name));
        for (key, value) in env {
            entry.push_str(&format!(
                "      {}: {}\n",
                key,
                value_entry(service.use_env_file, key, value, Some(&service.name))
            ));
        }
    } else {
        for (key, value) in env {
            entry.push_str(&format!(
                "      - {}={}\n",
                key,
                value_entry(service.use_env_file, key, value, Some(&service.name))
            ));
        }
    }

    if !service.ports.is_empty() {
        entry.push_str("    ports:\n");
        let mut ports = service.ports.clone();
        ports.sort();
        for port in ports {
            entry.push_str(&format!("      - \"{}:{}\"\n", port, port));
        }
    }

    if !service.volumes.is_empty() {
        entry.push_str("    volumes:\n");
        for volume in &service.volumes {
            entry.push_str(&format!("      - {}\n", volume));
        }
    }

    entry
}

/// 値1つ分の出力を生成する
///
/// `use_env_file` がtrueの場合はリテラル値を無視して
/// `${<SERVICE>_<KEY>}` プレースホルダを返します。falseの場合は
/// 空白を含む値のみシングルクォートで包みます。
pub fn value_entry(use_env_file: bool, key: &str, value: &str, service_name: Option<&str>) -> String {
    if use_env_file {
        let prefix = match service_name {
            Some(name) if !name.trim().is_empty() => format!("{}_", name.to_uppercase()),
            _ => String::new(),
        };
        format!("${{{}{}}}", prefix, key)
    } else if value.contains(char::is_whitespace) {
        format!("'{}'", value)
    } else {
        value.to_string()
    }
}

/// .envファイル用のキー名を生成する（`<SERVICE>_<KEY>`）
pub fn name_entry(key: &str, service_name: &str) -> String {
    if service_name.trim().is_empty() {
        key.to_string()
    } else {
        format!("{}_{}", service_name.to_uppercase(), key)
    }
}
