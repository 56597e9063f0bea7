//! ボリュームマッピング定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// ボリュームマッピング定義
///
/// ホスト側パス（相対パス可）とコンテナ側パスの対。構造的等価性を持ち、
/// 出現回数の集計キーとしても各サービスのリスト要素としても使われます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeMapping {
    /// ホスト側パス（例: ../ssl, ./data）
    pub external: String,
    /// コンテナ側パス（例: /opt/ssl）
    pub internal: String,
}

impl VolumeMapping {
    pub fn new(external: impl Into<String>, internal: impl Into<String>) -> Self {
        Self {
            external: external.into(),
            internal: internal.into(),
        }
    }
}

impl fmt::Display for VolumeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.external, self.internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_structural_equality() {
        let a = VolumeMapping::new("../ssl", "/opt/ssl");
        let b = VolumeMapping::new("../ssl", "/opt/ssl");
        let c = VolumeMapping::new("./data", "/opt/ssl");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_usable_as_map_key() {
        let mut counts: HashMap<VolumeMapping, usize> = HashMap::new();
        *counts.entry(VolumeMapping::new("../ssl", "/opt/ssl")).or_insert(0) += 1;
        *counts.entry(VolumeMapping::new("../ssl", "/opt/ssl")).or_insert(0) += 1;

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&VolumeMapping::new("../ssl", "/opt/ssl")], 2);
    }

    #[test]
    fn test_display() {
        let mapping = VolumeMapping::new("./data", "/var/data");
        assert_eq!(mapping.to_string(), "./data:/var/data");
    }
}
