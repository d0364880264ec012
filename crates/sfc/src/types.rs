use crate::naming::{component_name, relative_path};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 组件单元标识
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitIdentity {
    /// 由文件名得到的 PascalCase 组件名
    pub name: String,
    /// 宿主传入的路径
    pub absolute_path: PathBuf,
    /// 相对项目根目录的路径，`/` 分隔
    pub relative_path: String,
}

impl UnitIdentity {
    pub fn new(path: &Path, project_root: &Path) -> Self {
        Self {
            name: component_name(path),
            absolute_path: path.to_path_buf(),
            relative_path: relative_path(path, project_root),
        }
    }
}

/// 组件单元: 标识 + 源码
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub identity: UnitIdentity,
    pub text: String,
}

impl SourceUnit {
    pub fn new(identity: UnitIdentity, text: impl Into<String>) -> Self {
        Self {
            identity,
            text: text.into(),
        }
    }

    /// 从路径和项目根目录直接构造
    pub fn from_path(path: &Path, project_root: &Path, text: impl Into<String>) -> Self {
        Self::new(UnitIdentity::new(path, project_root), text)
    }
}

/// 条件渲染指令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Directive {
    If,
    ElseIf,
}

impl Directive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::If => "v-if",
            Directive::ElseIf => "v-else-if",
        }
    }

    /// 解析 `v-` 之后的部分 (不区分大小写)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "if" => Some(Directive::If),
            "else-if" => Some(Directive::ElseIf),
            _ => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 渲染条件 (原文保存，不求值)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub directive: Directive,
    pub expression: String,
}

impl Condition {
    pub fn new(directive: Directive, expression: impl Into<String>) -> Self {
        Self {
            directive,
            expression: expression.into(),
        }
    }

    /// 连线标签形式: `v-if: showSidebar`
    pub fn label(&self) -> String {
        format!("{}: {}", self.directive, self.expression)
    }

    /// 属性形式: `v-if="showSidebar"`
    pub fn attribute(&self) -> String {
        format!("{}=\"{}\"", self.directive, self.expression)
    }
}

/// 模板标签上的条件，解析阶段再挂到 `(parent, child)` 边上
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCondition {
    pub parent: String,
    /// 规范化 (PascalCase) 子组件名
    pub child: String,
    /// 模板中的原始标签写法
    pub raw_tag: String,
    pub condition: Condition,
}

/// 单个组件的分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitFacts {
    pub identity: UnitIdentity,
    /// 首次出现顺序，去重
    pub children: Vec<String>,
    /// 每次出现都保留
    pub auxiliary_usages: Vec<String>,
    pub conditions: Vec<PendingCondition>,
}

impl UnitFacts {
    pub fn new(identity: UnitIdentity) -> Self {
        Self {
            identity,
            children: Vec::new(),
            auxiliary_usages: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// 追加子组件 (已存在则忽略)，返回是否新增
    pub fn add_child(&mut self, name: &str) -> bool {
        if name.is_empty() || self.children.iter().any(|c| c == name) {
            return false;
        }
        self.children.push(name.to_string());
        true
    }
}
