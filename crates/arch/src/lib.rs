//! arch - 组件架构图
//!
//! 组件关系存储、关系解析、Mermaid 图生成

mod mermaid;
mod resolver;
mod session;
mod store;
mod tree;

pub use mermaid::MermaidGenerator;
pub use resolver::{resolve, ResolveStats};
pub use session::{ArchError, DiagramSession, Phase, Result, SkippedUnit};
pub use store::{ComponentRecord, GraphStore};
pub use tree::{TreeDirection, TreeNode};
