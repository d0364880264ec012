mod pattern;

pub use pattern::{PatternAnalyzer, DEFAULT_EXTENSION};

use crate::descriptor::Result;
use crate::types::{SourceUnit, UnitFacts};

/// 组件分析器 trait
///
/// 存储、解析、渲染只依赖 `UnitFacts`，可以换成基于语法树的实现
pub trait UnitAnalyzer {
    /// 提取单个组件的结构信息
    fn analyze(&self, unit: &SourceUnit) -> Result<UnitFacts>;

    /// 组件文件后缀，如 `.vue`
    fn file_extension(&self) -> &str;

    /// 该路径是否需要分析
    fn accepts(&self, path: &str) -> bool {
        path.ends_with(self.file_extension())
    }
}
