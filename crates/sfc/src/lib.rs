//! sfc - 单文件组件分析
//!
//! 拆分组件的 template / script 区块，提取子组件、composable、条件渲染等信息

mod analyzers;
mod descriptor;
mod naming;
mod types;

pub use analyzers::{PatternAnalyzer, UnitAnalyzer, DEFAULT_EXTENSION};
pub use descriptor::{Block, Result, SfcDescriptor, SfcError, MAX_UNIT_SIZE};
pub use naming::{component_name, is_builtin_tag, normalize_tag, relative_path, to_pascal_case};
pub use types::{Condition, Directive, PendingCondition, SourceUnit, UnitFacts, UnitIdentity};
