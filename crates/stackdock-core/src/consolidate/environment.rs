//! 共通環境変数の抽出
//!
//! 2つ以上のサービスが同一のキーと値で持つ環境変数を共通定義へ昇格させます。
//! 昇格したキーは各サービスの残余マップから取り除かれます。

use crate::model::ServiceDescriptor;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// 環境変数統合の結果
///
/// `common` と各サービスの `environment` は互いに素で、合併すると
/// 統合前の各サービスの環境変数と一致します。
#[derive(Debug, Clone, Default)]
pub struct EnvConsolidation {
    /// 共通環境変数（キーと値が一致し、2つ以上のサービスに現れたもの）
    pub common: HashMap<String, String>,
    /// 残余環境変数を持つサービス群（入力と同じ順序）
    pub services: Vec<ServiceDescriptor>,
}

/// 共通環境変数を抽出する
///
/// キー `k` が昇格するのは次の両方を満たす場合のみ:
/// - `k` を定義する他のすべてのサービスで値が参照値（サービスリスト順で
///   最初に現れた値）と一致する。1つでも食い違えば `k` は昇格しない
/// - 参照サービス以外に `k` を定義するサービスが少なくとも1つある
///
/// サービスが2つ未満の場合は何も抽出しません。
pub fn consolidate_environment(services: Vec<ServiceDescriptor>) -> EnvConsolidation {
    if services.len() < 2 {
        return EnvConsolidation {
            common: HashMap::new(),
            services,
        };
    }

    let mut common: HashMap<String, String> = HashMap::new();
    let mut examined: HashSet<String> = HashSet::new();

    for (index, service) in services.iter().enumerate() {
        // 結果はマップの走査順に依存しないが、ログを安定させるためソートする
        let mut keys: Vec<&String> = service.environment.keys().collect();
        keys.sort();

        for key in keys {
            if !examined.insert(key.clone()) {
                continue;
            }
            let reference = &service.environment[key];

            let mut occurrences = 0usize;
            let mut conflicting = false;
            for (other_index, other) in services.iter().enumerate() {
                if other_index == index {
                    continue;
                }
                match other.environment.get(key) {
                    Some(value) if value == reference => occurrences += 1,
                    Some(_) => {
                        conflicting = true;
                        break;
                    }
                    None => {}
                }
            }

            if conflicting {
                debug!(key = %key, "Conflicting values, key stays service-specific");
            } else if occurrences > 0 {
                common.insert(key.clone(), reference.clone());
            }
        }
    }

    // 昇格したキーを各サービスの残余マップから取り除いた新しい値を作る
    let services: Vec<ServiceDescriptor> = services
        .into_iter()
        .map(|mut service| {
            service.environment.retain(|key, _| !common.contains_key(key));
            service
        })
        .collect();

    info!(
        common_count = common.len(),
        service_count = services.len(),
        "Consolidated common environment variables"
    );

    EnvConsolidation { common, services }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, env: &[(&str, &str)]) -> ServiceDescriptor {
        ServiceDescriptor {
            name: name.to_string(),
            image_prefix: "demo/".to_string(),
            version: "1.0.0".to_string(),
            environment: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_shared_key_promoted_and_removed() {
        let services = vec![
            service("svc-a", &[("SERVER_PORT", "8080"), ("ONLY_A", "x")]),
            service("svc-b", &[("SERVER_PORT", "8080"), ("ONLY_B", "y")]),
        ];

        let result = consolidate_environment(services);

        assert_eq!(result.common.get("SERVER_PORT").unwrap(), "8080");
        // 昇格したキーは両サービスから取り除かれる
        assert!(!result.services[0].environment.contains_key("SERVER_PORT"));
        assert!(!result.services[1].environment.contains_key("SERVER_PORT"));
        // 固有キーは残る
        assert_eq!(result.services[0].environment.get("ONLY_A").unwrap(), "x");
        assert_eq!(result.services[1].environment.get("ONLY_B").unwrap(), "y");
    }

    #[test]
    fn test_conflicting_value_disqualifies_key() {
        let services = vec![
            service("svc-a", &[("LOG_LEVEL", "info")]),
            service("svc-b", &[("LOG_LEVEL", "info")]),
            service("svc-c", &[("LOG_LEVEL", "debug")]),
        ];

        let result = consolidate_environment(services);

        // 多数派が一致していても、1つでも食い違えば昇格しない
        assert!(result.common.is_empty());
        for s in &result.services {
            assert!(s.environment.contains_key("LOG_LEVEL"));
        }
    }

    #[test]
    fn test_conflict_with_earlier_service_disqualifies_key() {
        // 参照値より後のサービス同士が一致していても、先頭の値と食い違えば昇格しない
        let services = vec![
            service("svc-a", &[("LOG_LEVEL", "debug")]),
            service("svc-b", &[("LOG_LEVEL", "info")]),
            service("svc-c", &[("LOG_LEVEL", "info")]),
        ];

        let result = consolidate_environment(services);

        assert!(result.common.is_empty());
        assert_eq!(result.services[0].environment.get("LOG_LEVEL").unwrap(), "debug");
        assert_eq!(result.services[1].environment.get("LOG_LEVEL").unwrap(), "info");
        assert_eq!(result.services[2].environment.get("LOG_LEVEL").unwrap(), "info");
    }

    #[test]
    fn test_unique_key_never_promoted() {
        let services = vec![
            service("svc-a", &[("ONLY_A", "x")]),
            service("svc-b", &[("ONLY_B", "y")]),
        ];

        let result = consolidate_environment(services);

        assert!(result.common.is_empty());
        assert_eq!(result.services[0].environment.len(), 1);
        assert_eq!(result.services[1].environment.len(), 1);
    }

    #[test]
    fn test_fewer_than_two_services_is_noop() {
        let services = vec![service("svc-a", &[("SERVER_PORT", "8080")])];

        let result = consolidate_environment(services);

        assert!(result.common.is_empty());
        assert_eq!(result.services[0].environment.len(), 1);
    }

    #[test]
    fn test_disjoint_union_invariant() {
        let services = vec![
            service("svc-a", &[("A", "1"), ("B", "2"), ("C", "3")]),
            service("svc-b", &[("A", "1"), ("B", "9")]),
        ];
        let originals = services.clone();

        let result = consolidate_environment(services);

        // common ∪ residual == 元の環境変数（サービスごとに成立）
        for (service, original) in result.services.iter().zip(&originals) {
            let mut reunited = service.environment.clone();
            for (key, value) in &result.common {
                if original.environment.contains_key(key) {
                    assert!(reunited.insert(key.clone(), value.clone()).is_none());
                }
            }
            assert_eq!(reunited, original.environment);
        }
    }
}
