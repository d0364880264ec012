use crate::store::GraphStore;
use serde::Serialize;
use sfc::Condition;
use std::collections::HashSet;

/// 遍历方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDirection {
    /// 使用者 (父组件)
    Incoming,
    /// 子组件
    Outgoing,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub source_path: String,
    pub depth: usize,
    /// 到达该节点的边上的条件 (仅 Outgoing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl GraphStore {
    /// 获取组件树 (深度优先，每个组件只访问一次)
    pub fn component_tree(
        &self,
        entry: &str,
        direction: TreeDirection,
        max_depth: usize,
    ) -> Vec<TreeNode> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();

        if let Some(start) = self.find(entry) {
            self.build_tree(&start.name, None, direction, 0, max_depth, &mut visited, &mut result);
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn build_tree(
        &self,
        name: &str,
        condition: Option<&Condition>,
        direction: TreeDirection,
        depth: usize,
        max_depth: usize,
        visited: &mut HashSet<String>,
        result: &mut Vec<TreeNode>,
    ) {
        if depth > max_depth || visited.contains(name) {
            return;
        }
        let Some(record) = self.get(name) else {
            return;
        };
        visited.insert(name.to_string());

        result.push(TreeNode {
            name: record.name.clone(),
            source_path: record.source_path.clone(),
            depth,
            condition: condition.cloned(),
        });

        match direction {
            TreeDirection::Outgoing => {
                for child in &record.children {
                    let cond = record.condition_for(child);
                    self.build_tree(child, cond, direction, depth + 1, max_depth, visited, result);
                }
            }
            TreeDirection::Incoming => {
                for parent in &record.used_by {
                    self.build_tree(parent, None, direction, depth + 1, max_depth, visited, result);
                }
            }
        }
    }
}
