//! composeドキュメントの組み立て
//!
//! ヘッダコメント、`name:` 宣言、共有定義ブロック（`x-<doc>-common`）、
//! サービスブロックの順にドキュメント全体を組み立てます。
//! 共有ブロックは共通環境変数か共通ボリュームが存在する場合のみ出力され、
//! 各サービスからマージ参照（YAMLアンカー）で参照されます。

use crate::error::{ComposeError, Result};
use crate::model::{ServiceDescriptor, VolumeMapping};
use crate::render::{RenderOptions, service_entry, value_entry};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// composeドキュメント1つ分の入力
///
/// 統合済みのサービス群と共通定義から、決定的なテキストを生成します。
/// 生成時刻は呼び出し側が与えるため、同じ値に対する `render()` は
/// 常にバイト単位で同一の結果を返します。
#[derive(Debug, Clone)]
pub struct ComposeDocument {
    /// 統合済みのサービス群（出力順）
    pub services: Vec<ServiceDescriptor>,
    /// 共通環境変数（共有ブロックに1度だけ出力）
    pub common_environment: HashMap<String, String>,
    /// 共通ボリューム（共有ブロックに1度だけ出力）
    pub common_volumes: Vec<VolumeMapping>,
    /// ドキュメント名。`name:` 行と共有ブロックのアンカー名に使用
    pub document_name: String,
    /// アクティブなビルドプロファイル名。ヘッダとファイル名に反映
    pub active_profile: Option<String>,
    /// ヘッダに記載する生成時刻
    pub generated_at: NaiveDateTime,
}

impl ComposeDocument {
    /// ドキュメント全体をレンダリングする
    pub fn render(&self) -> String {
        let mut document = String::new();
        document.push_str(&self.comment_section());
        document.push_str(&format!("name: {}\n", self.document_name));

        let has_common_environment = !self.common_environment.is_empty();
        let has_common = has_common_environment || !self.common_volumes.is_empty();

        let common_name = format!("{}-common", self.document_name);
        let environment_name = format!("{}-env", self.document_name);

        if has_common {
            document.push_str(&self.common_block(&common_name, &environment_name));
        }

        let options = RenderOptions {
            common_name: has_common.then_some(common_name.as_str()),
            common_environment_name: has_common_environment
                .then_some(environment_name.as_str()),
        };

        document.push_str("services:\n");
        for service in &self.services {
            document.push_str(&service_entry(service, options));
        }
        document
    }

    /// 単一サービスモード: 指定したサービスだけを含むドキュメントを生成する
    ///
    /// モジュールごとの出力ファイル用。独立形式のエントリには共有ブロックが
    /// 存在しないため、昇格済みの共通環境変数と共通ボリュームをサービス側へ
    /// 戻してから単体で完結する形でレンダリングします。
    pub fn render_for_module(&self, module_name: &str) -> Result<String> {
        let service = self
            .services
            .iter()
            .find(|service| service.name == module_name)
            .ok_or_else(|| ComposeError::ServiceNotFound(module_name.to_string()))?;

        // 統合は残余と共通の非交和なので、戻しても値が衝突することはない
        let mut service = service.clone();
        for (key, value) in &self.common_environment {
            service
                .environment
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        if !self.common_volumes.is_empty() {
            let mut volumes = self.common_volumes.clone();
            volumes.extend(
                service
                    .volumes
                    .iter()
                    .filter(|volume| !self.common_volumes.contains(volume))
                    .cloned(),
            );
            service.volumes = volumes;
        }

        let mut document = String::new();
        document.push_str(&self.comment_section());
        document.push_str(&format!("name: {}\n", self.document_name));
        document.push_str("services:\n");
        document.push_str(&service_entry(&service, RenderOptions::default()));
        Ok(document)
    }

    /// 集約ファイル名（`docker-compose[-<profile>].yml`）
    pub fn file_name(&self) -> String {
        match self.profile() {
            Some(profile) => format!("docker-compose-{}.yml", profile),
            None => "docker-compose.yml".to_string(),
        }
    }

    /// モジュール別ファイル名（`docker-compose-<module>[-<profile>].yml`）
    pub fn module_file_name(&self, module_name: &str) -> String {
        match self.profile() {
            Some(profile) => format!("docker-compose-{}-{}.yml", module_name, profile),
            None => format!("docker-compose-{}.yml", module_name),
        }
    }

    /// 集約ドキュメントをレンダリングして書き込む
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(self.file_name());
        write_text(&path, &self.render())?;
        info!(path = %path.display(), "Generated docker compose file");
        Ok(path)
    }

    /// 単一サービスのドキュメントをレンダリングして書き込む
    pub fn write_module_file(&self, output_dir: &Path, module_name: &str) -> Result<PathBuf> {
        let path = output_dir.join(self.module_file_name(module_name));
        write_text(&path, &self.render_for_module(module_name)?)?;
        info!(path = %path.display(), module = %module_name, "Generated module compose file");
        Ok(path)
    }

    fn profile(&self) -> Option<&str> {
        self.active_profile
            .as_deref()
            .filter(|profile| !profile.trim().is_empty())
    }

    /// ヘッダコメントブロックを生成する
    fn comment_section(&self) -> String {
        let border = "#".repeat(60);
        let profile_note = match self.profile() {
            Some(profile) => format!(", generated for profile {}", profile),
            None => String::new(),
        };
        format!(
            "{border}\n\
             # \n\
             # docker-compose file for {name}{profile_note}\n\
             # \n\
             # generated on {timestamp} using stackdock.\n\
             # \n\
             {border}\n\n",
            border = border,
            name = self.document_name,
            profile_note = profile_note,
            timestamp = self.generated_at.format("%d/%m/%Y @ %H:%M:%S"),
        )
    }

    /// 共有定義ブロックを生成する
    ///
    /// ブロック全体のアンカーに加え、環境変数サブブロックを独立した
    /// アンカーにする。サービス側が自分の `environment:` キーを宣言すると
    /// ブロック全体のマージでは環境変数が丸ごと上書きされてしまうため、
    /// 環境変数はサブブロック単位で個別にマージ参照できる必要があります。
    fn common_block(&self, common_name: &str, environment_name: &str) -> String {
        let mut block = String::new();
        block.push_str(&format!("x-{}:\n", common_name));
        block.push_str(&format!("    &{}\n", common_name));

        if !self.common_environment.is_empty() {
            block.push_str("    environment:\n");
            block.push_str(&format!("      &{}\n", environment_name));
            let mut entries: Vec<(&String, &String)> = self.common_environment.iter().collect();
            entries.sort_by_key(|(key, _)| *key);
            for (key, value) in entries {
                block.push_str(&format!(
                    "      {}: {}\n",
                    key,
                    value_entry(false, key, value, None)
                ));
            }
        }

        if !self.common_volumes.is_empty() {
            block.push_str("    volumes:\n");
            block.push_str(&format!("      &{}-volumes\n", self.document_name));
            for volume in &self.common_volumes {
                block.push_str(&format!("      - {}\n", volume));
            }
        }

        block
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| ComposeError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
