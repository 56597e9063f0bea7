//! モジュール設定のスキャンとサービス定義の組み立て
//!
//! モジュールごとに設定ファイル一式（ベース＋プロファイル別の
//! .properties / .yml）を読み、正規化済みのサービス定義を組み立てます。

use crate::error::Result;
use crate::keys::format_environment_keys;
use crate::properties::scan_properties_file;
use crate::yaml::scan_yaml_file;
use stackdock_core::{ServiceDescriptor, VolumeMapping};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// スキャンの途中結果
///
/// キーは取り込み元の形のまま（.properties由来は生のキー、YAML由来は
/// 正規化済みキー）。正規化は組み立て時にまとめて行われます。
#[derive(Debug, Clone, Default)]
pub struct ModuleScan {
    /// 取り込まれた環境変数
    pub environment: HashMap<String, String>,
    /// JDBC関連の設定
    pub jdbc_configs: HashMap<String, String>,
    /// 公開ポート（重複なし、取り込み順）
    pub ports: Vec<String>,
}

impl ModuleScan {
    /// ポートを追加する（既出のポートは無視）
    pub fn add_port(&mut self, port: impl Into<String>) {
        let port = port.into();
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
    }
}

/// モジュール設定のスキャナ
#[derive(Debug, Clone)]
pub struct ModuleScanner {
    /// モジュールディレクトリからの相対パスで指定する設定ディレクトリ群
    pub properties_dirs: Vec<String>,
    /// アクティブなプロファイル名（空文字列はデフォルトプロファイル）
    pub profiles: Vec<String>,
    /// JDBC設定のキープレフィックス
    pub jdbc_prefix: String,
}

impl ModuleScanner {
    /// モジュール1つ分の設定ファイル一式をスキャンする
    ///
    /// 各設定ディレクトリについて `application.properties` /
    /// `application.yml`、続いてプロファイル別ファイルの順に読みます。
    /// 後に読んだファイルのキーが先のものを上書きします。
    pub fn scan_module(&self, module_dir: &Path) -> Result<ModuleScan> {
        let mut scan = ModuleScan::default();

        for properties_dir in &self.properties_dirs {
            let dir = module_dir.join(properties_dir);
            if !dir.exists() {
                warn!(dir = %dir.display(), "Properties directory not found");
                continue;
            }
            debug!(dir = %dir.display(), "Processing properties directory");

            self.scan_pair(&dir, "application", &mut scan)?;
            for profile in &self.profiles {
                if profile.trim().is_empty() {
                    continue;
                }
                self.scan_pair(&dir, &format!("application-{}", profile), &mut scan)?;
            }
        }

        Ok(scan)
    }

    fn scan_pair(&self, dir: &Path, stem: &str, scan: &mut ModuleScan) -> Result<()> {
        let properties_file = dir.join(format!("{}.properties", stem));
        if properties_file.exists() {
            scan_properties_file(&properties_file, &self.jdbc_prefix, scan)?;
        }
        let yaml_file = dir.join(format!("{}.yml", stem));
        if yaml_file.exists() {
            scan_yaml_file(&yaml_file, &self.jdbc_prefix, scan)?;
        }
        Ok(())
    }
}

/// スキャン結果からサービス定義を組み立てる
///
/// キーを正規化し、`SPRING_PROFILES_ACTIVE` と `SERVER_PORT` の
/// デフォルトを補います。ポートが1つも見つからなかった場合は
/// 8080番を割り当てます。
pub fn build_service(
    name: &str,
    scan: ModuleScan,
    volumes: Vec<VolumeMapping>,
    image_prefix: &str,
    version: &str,
    use_env_file: bool,
    profiles: &[String],
) -> ServiceDescriptor {
    let mut environment = format_environment_keys(scan.environment);
    let mut ports = scan.ports;

    if !environment.contains_key("SPRING_PROFILES_ACTIVE") {
        environment.insert("SPRING_PROFILES_ACTIVE".to_string(), profiles.join(","));
    }
    if !environment.contains_key("SERVER_PORT") {
        environment.insert("SERVER_PORT".to_string(), "8080".to_string());
        if !ports.contains(&"8080".to_string()) {
            ports.push("8080".to_string());
        }
        info!(service = %name, "Using default port 8080");
    }

    info!(
        service = %name,
        env_count = environment.len(),
        port_count = ports.len(),
        volume_count = volumes.len(),
        "Assembled service descriptor"
    );

    ServiceDescriptor {
        name: name.to_string(),
        image_prefix: image_prefix.to_string(),
        version: version.to_string(),
        environment,
        jdbc_configs: scan.jdbc_configs,
        ports,
        volumes,
        use_env_file,
    }
}

/// CLIの `ext:int` 形式のボリューム指定をパースする
///
/// どちらか片方しか持たない指定は診断を出してスキップし、残りの
/// 処理を続けます。
pub fn parse_volume_specs(specs: &[String]) -> Vec<VolumeMapping> {
    let mut mappings = Vec::new();
    for spec in specs {
        match spec.split_once(':') {
            Some((external, internal))
                if !external.trim().is_empty() && !internal.trim().is_empty() =>
            {
                let mapping = VolumeMapping::new(external.trim(), internal.trim());
                debug!(volume = %mapping, "Added volume mapping");
                mappings.push(mapping);
            }
            _ => {
                warn!(spec = %spec, "Skipping incomplete volume configuration");
            }
        }
    }
    mappings
}
