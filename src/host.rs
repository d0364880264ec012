//! 构建宿主 - 包装 DiagramSession
//!
//! 逐个提交组件单元，通知构建结束，写出渲染结果。
//! 所有调用都经过 `&mut self`，天然串行。

use crate::config::DiagramConfig;
use anyhow::Context;
use arch::{DiagramSession, MermaidGenerator};
use sfc::{PatternAnalyzer, SourceUnit, UnitAnalyzer};
use std::path::{Path, PathBuf};

/// 扫描时跳过的目录
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    ".nuxt",
    ".output",
    "coverage",
    ".cache",
];

/// 收集 `dir` 下的组件文件 (同目录内按文件名排序)
pub fn discover_units(dir: &Path, extension: &str) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // 根目录本身不过滤
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && SKIP_DIRS.iter().any(|d| *d == name))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.to_string_lossy().ends_with(extension))
        .collect()
}

pub struct DiagramPlugin {
    config: DiagramConfig,
    session: DiagramSession<PatternAnalyzer>,
    generator: MermaidGenerator,
}

impl DiagramPlugin {
    pub fn new(config: DiagramConfig) -> Self {
        let analyzer = PatternAnalyzer::new()
            .with_composables(config.include_composables)
            .with_extension(config.extension.clone());
        let generator = MermaidGenerator::new()
            .with_title(config.title.clone())
            .with_legend(config.legend);

        Self {
            config,
            session: DiagramSession::new(analyzer),
            generator,
        }
    }

    /// 分析单个模块，非组件后缀的 id 直接忽略
    pub fn transform(&mut self, code: &str, id: &str) -> anyhow::Result<bool> {
        if !self.session.analyzer().accepts(id) {
            return Ok(false);
        }
        let unit = SourceUnit::from_path(Path::new(id), &self.config.root, code);
        Ok(self.session.submit(&unit)?)
    }

    pub fn build_end(&mut self) -> anyhow::Result<()> {
        self.session.end_of_analysis()?;
        Ok(())
    }

    /// 最终关系解析 + 渲染
    pub fn finish(&mut self) -> anyhow::Result<String> {
        self.session.finalize()?;
        Ok(self.session.render(&self.generator)?)
    }

    /// 渲染并写出文件 (覆盖旧文件)
    pub async fn close_bundle(&mut self) -> anyhow::Result<PathBuf> {
        let markdown = self.finish()?;
        let output = self.config.output_file();

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&output, markdown)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;

        tracing::info!("Component diagram generated at {}", output.display());
        Ok(output)
    }

    pub fn session(&self) -> &DiagramSession<PatternAnalyzer> {
        &self.session
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }
}

/// 扫描并提交 `dir` 下所有组件，返回成功分析的数量
pub async fn analyze_project(plugin: &mut DiagramPlugin, dir: &Path) -> anyhow::Result<usize> {
    let paths = discover_units(dir, &plugin.config().extension);
    tracing::info!("Found {} component files under {}", paths.len(), dir.display());

    let mut analyzed = 0;
    for path in paths {
        let code = match tokio::fs::read_to_string(&path).await {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        if plugin.transform(&code, &path.to_string_lossy())? {
            analyzed += 1;
        }
    }

    plugin.build_end()?;
    Ok(analyzed)
}
