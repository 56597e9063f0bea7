//! 共通ボリュームの抽出
//!
//! 2つ以上のサービスに現れるボリュームマッピングを共通定義へ昇格させ、
//! 3通りの戦略で各サービスの残余リストを決めます。
//!
//! YAMLのマージ参照はコレクションを部分的に上書きできないため、
//! 固有ボリュームを持つサービスは共通分も含めた全リストを自前で列挙し、
//! 共通分しか持たないサービスはリストを空にして参照のみで済ませます。

use crate::model::{ServiceDescriptor, VolumeMapping};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// ボリューム統合で選ばれた戦略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeStrategy {
    /// 共通ボリュームなし。全サービスが元のリストを保持する
    NoCommon,
    /// 全サービスのボリュームが共通集合に含まれる。全サービスのリストを
    /// 空にし、共有ブロックへの参照のみとする
    FullOverlap,
    /// 少なくとも1つのサービスが固有ボリュームを持つ。固有分を持つ
    /// サービスは「共通（共通順）＋固有（元の順）」の全列挙に置き換え、
    /// 共通分のみのサービスはリストを空にする
    Mixed {
        /// 固有ボリュームを持つサービス名 → 置き換え後の全列挙リスト
        residuals: BTreeMap<String, Vec<VolumeMapping>>,
    },
}

/// ボリューム統合の結果
#[derive(Debug, Clone)]
pub struct VolumeConsolidation {
    /// 共通ボリューム（初出順）
    pub common: Vec<VolumeMapping>,
    /// 適用された戦略
    pub strategy: VolumeStrategy,
    /// 残余ボリュームを持つサービス群（入力と同じ順序）
    pub services: Vec<ServiceDescriptor>,
}

/// 共通ボリュームを抽出する
///
/// マッピングが「共通」となるのは、それを定義するサービスが2つ以上ある
/// 場合です（1つのサービス内での重複は数えません）。共通リストの順序は
/// サービスリストを順に走査したときの初出順で、入力内容のみで決まります。
///
/// サービスが2つ未満の場合は何も抽出しません。
pub fn consolidate_volumes(services: Vec<ServiceDescriptor>) -> VolumeConsolidation {
    if services.len() < 2 {
        return VolumeConsolidation {
            common: Vec::new(),
            strategy: VolumeStrategy::NoCommon,
            services,
        };
    }

    // マッピングごとに、定義しているサービス数を数える
    let mut counts: HashMap<&VolumeMapping, usize> = HashMap::new();
    for service in &services {
        let distinct: HashSet<&VolumeMapping> = service.volumes.iter().collect();
        for mapping in distinct {
            *counts.entry(mapping).or_insert(0) += 1;
        }
    }

    // 共通ボリュームを初出順に集める
    let mut common: Vec<VolumeMapping> = Vec::new();
    for service in &services {
        for mapping in &service.volumes {
            if counts.get(mapping).copied().unwrap_or(0) >= 2 && !common.contains(mapping) {
                debug!(volume = %mapping, "Found common volume");
                common.push(mapping.clone());
            }
        }
    }

    if common.is_empty() {
        return VolumeConsolidation {
            common,
            strategy: VolumeStrategy::NoCommon,
            services,
        };
    }

    let has_specific = services
        .iter()
        .any(|service| service.volumes.iter().any(|v| !common.contains(v)));

    if !has_specific {
        // 完全重複: 全サービスが共有ブロックの参照のみで済む
        let services: Vec<ServiceDescriptor> = services
            .into_iter()
            .map(|mut service| {
                service.volumes.clear();
                service
            })
            .collect();
        info!(common_count = common.len(), "All service volumes covered by common set");
        return VolumeConsolidation {
            common,
            strategy: VolumeStrategy::FullOverlap,
            services,
        };
    }

    // 混在: 固有分を持つサービスは共通＋固有の全列挙に置き換える。
    // 固有リスト内の重複はそのまま残す（共通分とだけ重複排除する）
    let mut residuals: BTreeMap<String, Vec<VolumeMapping>> = BTreeMap::new();
    let services: Vec<ServiceDescriptor> = services
        .into_iter()
        .map(|mut service| {
            if service.volumes.iter().any(|v| !common.contains(v)) {
                let mut full: Vec<VolumeMapping> = common.clone();
                full.extend(
                    service
                        .volumes
                        .iter()
                        .filter(|v| !common.contains(v))
                        .cloned(),
                );
                residuals.insert(service.name.clone(), full.clone());
                service.volumes = full;
            } else {
                service.volumes.clear();
            }
            service
        })
        .collect();

    info!(
        common_count = common.len(),
        mixed_count = residuals.len(),
        "Consolidated volumes with service-specific extras"
    );

    VolumeConsolidation {
        common,
        strategy: VolumeStrategy::Mixed { residuals },
        services,
    }
}
