//! 環境変数キーの正規化
//!
//! Spring形式のプロパティキーをDocker準拠の環境変数名に整形します。

use std::collections::HashMap;

/// プロパティキー1つをDocker準拠の形に整形する
///
/// 大文字化し、`.` `-` `[` `]` を `_` に置き換え、連続する `_` を
/// 1つにまとめます（例: `spring.profiles.active` → `SPRING_PROFILES_ACTIVE`、
/// `my.list[0]` → `MY_LIST_0_`）。
pub fn format_property_key(property_key: &str) -> String {
    let replaced: String = property_key
        .to_uppercase()
        .chars()
        .map(|c| match c {
            '.' | '-' | '[' | ']' => '_',
            other => other,
        })
        .collect();

    let mut formatted = String::with_capacity(replaced.len());
    let mut previous_underscore = false;
    for c in replaced.chars() {
        if c == '_' && previous_underscore {
            continue;
        }
        previous_underscore = c == '_';
        formatted.push(c);
    }
    formatted
}

/// マップのキーをすべて整形する（値はそのまま）
pub fn format_environment_keys(environment: HashMap<String, String>) -> HashMap<String, String> {
    environment
        .into_iter()
        .map(|(key, value)| (format_property_key(&key), value))
        .collect()
}
