//! 运行配置

use sfc::DEFAULT_EXTENSION;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "component-diagram.md";
pub const DEFAULT_TITLE: &str = "Vue Component Diagram";

/// 组件图配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramConfig {
    /// 输出文件路径 (相对路径基于 `root`)
    pub output_path: PathBuf,
    pub include_composables: bool,
    /// 项目根目录，用于计算相对路径
    pub root: PathBuf,
    /// 组件文件后缀
    pub extension: String,
    pub title: String,
    pub legend: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            include_composables: true,
            root: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            title: DEFAULT_TITLE.to_string(),
            legend: true,
        }
    }
}

impl DiagramConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("VUEGRAPH_OUTPUT") {
            config.output_path = PathBuf::from(v);
        }

        if let Some(v) = lookup("VUEGRAPH_COMPOSABLES") {
            match parse_bool(&v) {
                Some(b) => config.include_composables = b,
                None => tracing::warn!("Ignoring VUEGRAPH_COMPOSABLES={}", v),
            }
        }

        if let Some(v) = lookup("VUEGRAPH_ROOT") {
            config.root = PathBuf::from(v);
        }

        if let Some(v) = lookup("VUEGRAPH_EXTENSION") {
            config.extension = if v.starts_with('.') { v } else { format!(".{}", v) };
        }

        if let Some(v) = lookup("VUEGRAPH_TITLE") {
            config.title = v;
        }

        config
    }

    /// 实际输出位置
    pub fn output_file(&self) -> PathBuf {
        self.root.join(&self.output_path)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
