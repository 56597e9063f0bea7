//! モジュール自動発見機能
//!
//! マルチモジュールプロジェクトのモジュール列挙と、デプロイ可能
//! （実行可能）なモジュールの判定を行います。

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 親pom.xmlの `<modules>` セクションからモジュールを列挙する
///
/// 列挙されたモジュール名のうち、実際に `pom.xml` を含むディレクトリ
/// だけを返します。親pom.xmlが存在しない場合はエラーです。
#[tracing::instrument]
pub fn modules(basedir: &Path) -> Result<Vec<PathBuf>> {
    let parent_pom = basedir.join("pom.xml");
    if !parent_pom.exists() {
        return Err(ConfigError::ParentPomNotFound(parent_pom));
    }

    let content = fs::read_to_string(&parent_pom).map_err(|e| ConfigError::Io {
        path: parent_pom.clone(),
        message: e.to_string(),
    })?;

    let mut found = Vec::new();
    let mut in_modules_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("<modules>") {
            in_modules_section = true;
            continue;
        }
        if line.starts_with("</modules>") {
            in_modules_section = false;
            continue;
        }
        if in_modules_section && line.starts_with("<module>") {
            let name = line.replace("<module>", "").replace("</module>", "");
            let module_path = basedir.join(name.trim());
            if module_path.join("pom.xml").exists() {
                debug!(module = %module_path.display(), "Found module");
                found.push(module_path);
            } else {
                warn!(module = %module_path.display(), "Listed module has no pom.xml, skipping");
            }
        }
    }

    info!(module_count = found.len(), "Discovered modules");
    Ok(found)
}

/// モジュールが「実行可能」かどうかを判定する
///
/// `src/main/java` 以下のいずれかのJavaソースが `@SpringBootApplication`
/// アノテーションか `public static void main` シグネチャを含む場合に
/// 実行可能とみなします。読み取れないファイルは無視します。
pub fn is_runnable_module(module_dir: &Path) -> bool {
    let main_java_dir = module_dir.join("src/main/java");
    if !main_java_dir.exists() {
        return false;
    }

    let pattern = format!("{}/**/*.java", main_java_dir.display());
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(module = %module_dir.display(), error = %e, "Invalid glob pattern");
            return false;
        }
    };

    for entry in entries.flatten() {
        let Ok(source) = fs::read_to_string(&entry) else {
            continue;
        };
        if source
            .lines()
            .any(|line| line.contains("@SpringBootApplication") || line.contains("public static void main"))
        {
            debug!(module = %module_dir.display(), file = %entry.display(), "Module is runnable");
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_modules_from_parent_pom() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("pom.xml"),
            "<project>\n<modules>\n  <module>svc-a</module>\n  <module>svc-b</module>\n  <module>ghost</module>\n</modules>\n</project>\n",
        );
        write(&dir.path().join("svc-a/pom.xml"), "<project/>");
        write(&dir.path().join("svc-b/pom.xml"), "<project/>");
        // ghostディレクトリにはpom.xmlがない

        let found = modules(dir.path()).unwrap();

        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("svc-a"));
        assert!(found[1].ends_with("svc-b"));
    }

    #[test]
    fn test_missing_parent_pom_is_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = modules(dir.path());

        assert!(matches!(result, Err(ConfigError::ParentPomNotFound(_))));
    }

    #[test]
    fn test_single_module_project_has_no_modules() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("pom.xml"), "<project></project>");

        let found = modules(dir.path()).unwrap();

        assert!(found.is_empty());
    }

    #[test]
    fn test_runnable_by_spring_boot_annotation() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("src/main/java/com/example/App.java"),
            "@SpringBootApplication\npublic class App {}\n",
        );

        assert!(is_runnable_module(dir.path()));
    }

    #[test]
    fn test_runnable_by_main_method() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("src/main/java/com/example/Tool.java"),
            "public class Tool {\n  public static void main(String[] args) {}\n}\n",
        );

        assert!(is_runnable_module(dir.path()));
    }

    #[test]
    fn test_library_module_is_not_runnable() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("src/main/java/com/example/Util.java"),
            "public class Util {}\n",
        );

        assert!(!is_runnable_module(dir.path()));
    }

    #[test]
    fn test_module_without_sources_is_not_runnable() {
        let dir = tempfile::tempdir().unwrap();

        assert!(!is_runnable_module(dir.path()));
    }
}
