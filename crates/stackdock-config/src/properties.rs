//! .propertiesファイルのスキャン
//!
//! `DockerInclude` マーカー付きコメントの直後にあるプロパティを
//! 環境変数として取り込みます。`server.port` はポートリストへ、
//! 設定されたJDBCプレフィックスを持つキーはJDBCマップへも取り込みます。

use crate::error::{ConfigError, Result};
use crate::scanner::ModuleScan;
use crate::{DOCKER_INCLUDE_MARKER, SERVER_PORT_PROPERTY};
use std::fs;
use std::path::Path;
use tracing::debug;

/// .propertiesファイルを1つスキャンして結果に取り込む
pub fn scan_properties_file(path: &Path, jdbc_prefix: &str, scan: &mut ModuleScan) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut include_next = false;
    let mut count = 0usize;
    for line in content.lines() {
        let line = line.trim();

        // 空行とコメント行はスキップ。ただしマーカー付きコメントは
        // 次のプロパティ行を取り込む合図になる
        if line.is_empty() || line.starts_with('#') {
            if line.starts_with('#') && line.contains(DOCKER_INCLUDE_MARKER) {
                include_next = true;
            }
            continue;
        }

        if include_next {
            if let Some((key, value)) = line.split_once('=') {
                scan.environment
                    .insert(key.trim().to_string(), value.trim().to_string());
                count += 1;
            }
            include_next = false;
        }

        // server.portはマーカーの有無にかかわらずポートに反映する
        if let Some(port) = line.strip_prefix(&format!("{}=", SERVER_PORT_PROPERTY)) {
            scan.add_port(port.trim());
        }

        if line.starts_with(jdbc_prefix) {
            if let Some((key, value)) = line.split_once('=') {
                scan.jdbc_configs
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    debug!(
        file = %path.display(),
        included_count = count,
        "Scanned properties file"
    );
    Ok(())
}
