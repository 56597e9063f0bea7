//! generateコマンド
//!
//! プロファイルごとに「モジュール発見 → スキャン → 統合 → 書き込み」の
//! パスを実行します。各パスは独立しており、1つのパスが失敗しても
//! 残りのプロファイルの処理は続行します。

use chrono::Local;
use clap::Args;
use colored::Colorize;
use stackdock_config::{
    ModuleScanner, build_service, is_runnable_module, modules, parse_volume_specs,
};
use stackdock_core::{
    ComposeDocument, VolumeMapping, consolidate_environment, consolidate_volumes,
    write_database_compose, write_env_file,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// プロジェクトのベースディレクトリ
    #[arg(long, default_value = ".")]
    pub basedir: PathBuf,

    /// 出力ディレクトリ（省略時は <basedir>/docker）
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// ドキュメント名（省略時はベースディレクトリ名）
    #[arg(long)]
    pub name: Option<String>,

    /// イメージ参照のプレフィックス（例: registry.example.com/team/）
    #[arg(long, env = "STACKDOCK_IMAGE_PREFIX", default_value = "")]
    pub image_prefix: String,

    /// イメージのバージョンタグ
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// JDBC設定のキープレフィックス
    #[arg(long, default_value = "spring.datasource.")]
    pub jdbc_prefix: String,

    /// 設定ディレクトリ（モジュールからの相対パス、複数指定可）
    #[arg(long = "properties-dir", default_value = "src/main/resources")]
    pub properties_dirs: Vec<String>,

    /// アクティブなプロファイル（複数指定可、省略時はデフォルト設定のみ）
    #[arg(short, long = "profile")]
    pub profiles: Vec<String>,

    /// スキップするモジュール名（複数指定可）
    #[arg(long = "skip-module")]
    pub skip_modules: Vec<String>,

    /// ボリューム指定（ext:int形式、複数指定可）
    #[arg(long = "volume")]
    pub volumes: Vec<String>,

    /// .envファイルを生成する（デフォルトで有効。生成時はcompose側が
    /// プレースホルダ参照になる）
    #[arg(long, overrides_with = "no_create_env")]
    pub create_env: bool,

    /// .envファイルを生成しない
    #[arg(long, overrides_with = "create_env")]
    pub no_create_env: bool,
}

impl GenerateArgs {
    /// `--create-env` / `--no-create-env` の実効値（デフォルトは生成する）
    fn create_env(&self) -> bool {
        self.create_env || !self.no_create_env
    }
}

pub fn handle(args: GenerateArgs) -> anyhow::Result<()> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.basedir.join("docker"));
    std::fs::create_dir_all(&output_dir)?;

    let document_name = args.name.clone().unwrap_or_else(|| {
        args.basedir
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "project".to_string())
    });

    println!("{}", "stackdock".bold());
    println!("  プロジェクト: {}", document_name.cyan());
    println!("  出力先: {}", output_dir.display().to_string().cyan());

    let volumes = parse_volume_specs(&args.volumes);

    // プロファイル未指定の場合は空のデフォルトプロファイルを1つ処理する
    let mut profiles = args.profiles.clone();
    if profiles.is_empty() {
        profiles.push(String::new());
        info!("No profiles specified, using default configuration");
    }

    let mut failed = 0usize;
    for profile in &profiles {
        let label = if profile.is_empty() { "default" } else { profile };
        println!("  プロファイル: {}", label.cyan());

        // 1つのプロファイルの失敗は他のプロファイルに波及させない
        if let Err(e) = generate_for_profile(&args, &output_dir, &document_name, &volumes, profile)
        {
            failed += 1;
            error!(profile = %label, error = %e, "Profile pass failed");
            eprintln!("  {} プロファイル {} の生成に失敗: {}", "✗".red(), label, e);
        }
    }

    if failed > 0 {
        anyhow::bail!("{}個のプロファイルで生成に失敗しました", failed);
    }
    println!("  {} 生成完了", "✓".green());
    Ok(())
}

/// プロファイル1つ分の生成パス
fn generate_for_profile(
    args: &GenerateArgs,
    output_dir: &Path,
    document_name: &str,
    volumes: &[VolumeMapping],
    profile: &str,
) -> anyhow::Result<()> {
    let pass_profiles: Vec<String> = if profile.is_empty() {
        Vec::new()
    } else {
        vec![profile.to_string()]
    };
    let scanner = ModuleScanner {
        properties_dirs: args.properties_dirs.clone(),
        profiles: pass_profiles.clone(),
        jdbc_prefix: args.jdbc_prefix.clone(),
    };

    let module_dirs = modules(&args.basedir)?;
    let multi_module = !module_dirs.is_empty();

    let mut services = Vec::new();
    let mut jdbc_configs: HashMap<String, String> = HashMap::new();

    if multi_module {
        info!(module_count = module_dirs.len(), "Multi-module project detected");
        for module_dir in &module_dirs {
            let module_name = module_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if args.skip_modules.contains(&module_name) {
                info!(module = %module_name, "Skipping module");
                continue;
            }
            if !is_runnable_module(module_dir) {
                info!(module = %module_name, "Skipping non-runnable module");
                continue;
            }
            let scan = scanner.scan_module(module_dir)?;
            let service = build_service(
                &module_name,
                scan,
                volumes.to_vec(),
                &args.image_prefix,
                &args.version,
                args.create_env(),
                &pass_profiles,
            );
            jdbc_configs.extend(service.jdbc_configs.clone());
            services.push(service);
        }
    } else {
        info!("Single module project detected");
        let scan = scanner.scan_module(&args.basedir)?;
        let service = build_service(
            document_name,
            scan,
            volumes.to_vec(),
            &args.image_prefix,
            &args.version,
            args.create_env(),
            &pass_profiles,
        );
        jdbc_configs.extend(service.jdbc_configs.clone());
        services.push(service);
    }

    if services.is_empty() {
        warn!("No runnable modules found; compose file will not be generated");
        println!("  {} 実行可能なモジュールが見つかりません", "!".yellow());
        return Ok(());
    }

    // 統合: 共通環境変数 → 共通ボリュームの順に抽出する
    let env = consolidate_environment(services);
    let vol = consolidate_volumes(env.services);

    let document = ComposeDocument {
        services: vol.services,
        common_environment: env.common,
        common_volumes: vol.common,
        document_name: document_name.to_string(),
        active_profile: (!profile.is_empty()).then(|| profile.to_string()),
        generated_at: Local::now().naive_local(),
    };

    let path = document.write_to(output_dir)?;
    println!("    {} {}", "✓".green(), path.display());

    // マルチモジュールの場合はモジュール別ファイルも生成する
    if multi_module {
        for service in &document.services {
            let module_path = document.write_module_file(output_dir, &service.name)?;
            println!("    {} {}", "✓".green(), module_path.display());
        }
    }

    if !jdbc_configs.is_empty() {
        let db_path = write_database_compose(output_dir, &jdbc_configs, &args.jdbc_prefix)?;
        println!("    {} {}", "✓".green(), db_path.display());
    }

    if args.create_env() {
        let env_path = write_env_file(output_dir, &document.common_environment, &document.services)?;
        println!("    {} {}", "✓".green(), env_path.display());
    }

    Ok(())
}
