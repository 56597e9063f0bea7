//! サービス定義

use super::volume::VolumeMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// デプロイ可能なモジュールひとつ分のサービス定義
///
/// ビルドプロファイルごとにモジュール単位で構築され、統合処理
/// （共通環境変数・共通ボリュームの抽出）を経てレンダラーに渡されます。
/// 統合処理は値を書き換えず、残余フィールドを持つ新しい値を返します。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceDescriptor {
    /// サービス名。ドキュメントのキーおよび `${SVC_KEY}` プレースホルダの
    /// プレフィックスとして使用
    pub name: String,
    /// イメージ参照のプレフィックス（例: registry.example.com/team/）
    pub image_prefix: String,
    /// イメージのバージョンタグ
    pub version: String,
    /// 環境変数。キーは正規化済み（大文字、`.`/`-`/`[`/`]` → `_`）である前提
    #[serde(default)]
    pub environment: HashMap<String, String>,
    /// JDBC関連の設定（データベース用composeファイルの生成に使用）
    #[serde(default)]
    pub jdbc_configs: HashMap<String, String>,
    /// 公開ポート番号（文字列、ホスト側＝コンテナ側）
    #[serde(default)]
    pub ports: Vec<String>,
    /// ボリュームマッピング（統合後は残余分のみ）
    #[serde(default)]
    pub volumes: Vec<VolumeMapping>,
    /// trueの場合、値の代わりに `${<SERVICE>_<KEY>}` プレースホルダを出力
    #[serde(default)]
    pub use_env_file: bool,
}

impl ServiceDescriptor {
    /// イメージ参照（プレフィックス + 名前 + バージョン）
    pub fn image(&self) -> String {
        format!("{}{}:{}", self.image_prefix, self.name, self.version)
    }
}
