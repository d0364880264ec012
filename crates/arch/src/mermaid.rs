use crate::store::{ComponentRecord, GraphStore};

const DEFAULT_TITLE: &str = "Vue Component Diagram";

const STYLE_CHILD_LINK: &str = "stroke:#2196F3,stroke-width:2px;";
const STYLE_CONDITIONAL_LINK: &str = "stroke:#FF5722,stroke-width:2px,stroke-dasharray:3;";

const CLASS_DEFS: &[&str] = &[
    "  classDef composable fill:#f9f,stroke:#333,stroke-width:1px;",
    "  classDef component fill:#e6f7ff,stroke:#1890ff,stroke-width:1px;",
    "  classDef rootComponent fill:#d4ffea,stroke:#389e0d,stroke-width:2px;",
    "  classDef condition fill:#fff0e6,stroke:#FF5722,stroke-width:1px,stroke-dasharray:3;",
];

const LEGEND: &[&str] = &[
    "  %% Legend",
    "  subgraph Legend",
    "    legendParent[\"Parent Component\"]:::component",
    "    legendChild[\"Child Component\"]:::component",
    "    legendParent --> legendChild",
    "    legendNote[\"Note: Arrows point from parent to child components\"]",
    "  end",
];

/// Mermaid 组件图生成器 (Markdown 输出)
pub struct MermaidGenerator {
    title: String,
    legend: bool,
}

impl MermaidGenerator {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            legend: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// 完整文档: 标题、mermaid 代码块、组件详情
    pub fn render(&self, store: &GraphStore) -> String {
        let mut lines = vec![format!("# {}", self.title), String::new()];
        lines.push("```mermaid".to_string());
        lines.extend(self.generate_graph(store));
        lines.push("```".to_string());
        lines.push(String::new());
        lines.extend(self.generate_details(store));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// 生成 mermaid 代码块内容
    pub fn generate_graph(&self, store: &GraphStore) -> Vec<String> {
        let mut lines = vec![
            "graph TD;".to_string(),
            "  %% Configure graph layout for better flow".to_string(),
            "  direction TB".to_string(),
        ];

        let roots = store.roots();
        if !roots.is_empty() {
            lines.push("  %% Root components at the top".to_string());
            for root in &roots {
                lines.push(format!(
                    "  {}[\"{}\"]:::rootComponent",
                    Self::node_id(&root.name),
                    root.name
                ));
            }
        }

        for record in store.records().filter(|r| !r.is_root()) {
            lines.push(format!("  {}[\"{}\"]", Self::node_id(&record.name), record.name));
        }

        // mermaid 按声明顺序给每条连线编号
        let mut link_count = 0usize;
        for record in store.records() {
            let id = Self::node_id(&record.name);

            for child in record.children.iter().filter(|c| store.contains(c)) {
                let child_id = Self::node_id(child);
                match record.condition_for(child) {
                    Some(condition) => {
                        lines.push(format!(
                            "  {} -. \"{}\" .-> {}",
                            id,
                            condition.label(),
                            child_id
                        ));
                        lines.push(format!("  linkStyle {} {}", link_count, STYLE_CONDITIONAL_LINK));
                        lines.push(format!("  class {} condition;", child_id));
                    }
                    None => {
                        lines.push(format!("  {} --> {}", id, child_id));
                        lines.push(format!("  linkStyle {} {}", link_count, STYLE_CHILD_LINK));
                    }
                }
                link_count += 1;
            }

            for (node, usage) in Self::composable_ids(record) {
                lines.push(format!("  {}(\"{}\"):::composable", node, usage));
                lines.push(format!("  {} -.-> {}", id, node));
                link_count += 1;
            }
        }

        lines.push("  %% Style definitions".to_string());
        lines.extend(CLASS_DEFS.iter().map(|s| s.to_string()));
        if !store.is_empty() {
            let ids: Vec<_> = store.names().map(Self::node_id).collect();
            lines.push(format!("  class {} component;", ids.join(",")));
        }

        if self.legend {
            lines.extend(LEGEND.iter().map(|s| s.to_string()));
        }

        lines
    }

    /// 生成 `## Component Details` 部分
    pub fn generate_details(&self, store: &GraphStore) -> Vec<String> {
        let mut lines = vec!["## Component Details".to_string(), String::new()];

        for record in store.records() {
            lines.push(format!("### {}", record.name));
            lines.push(String::new());
            lines.push(format!("- **File Path:** `{}`", record.source_path));

            if record.used_by.is_empty() {
                lines.push("- **Used in Components:** None (Root Component)".to_string());
            } else {
                lines.push("- **Used in Components:**".to_string());
                for parent in &record.used_by {
                    lines.push(format!("  - {}", parent));
                }
            }

            lines.push("- **Child Components:**".to_string());
            if record.children.is_empty() {
                lines.push("  - None".to_string());
            }
            for child in &record.children {
                match record.condition_for(child) {
                    Some(condition) => lines.push(format!(
                        "  - {} *(conditional: {})*",
                        child,
                        condition.attribute()
                    )),
                    None => lines.push(format!("  - {}", child)),
                }
            }

            if !record.auxiliary_usages.is_empty() {
                lines.push("- **Composables:**".to_string());
                for usage in &record.auxiliary_usages {
                    lines.push(format!("  - {}", usage));
                }
            }

            lines.push(String::new());
        }

        lines
    }

    /// 每次 composable 调用对应 `(节点 id, 名称)`。id = 名称 + 所属组件，
    /// 同一组件内重复调用追加数字后缀
    fn composable_ids(record: &ComponentRecord) -> Vec<(String, &str)> {
        let owner = Self::node_id(&record.name);
        let mut seen: Vec<&str> = Vec::new();

        record
            .auxiliary_usages
            .iter()
            .map(|usage| {
                let count = seen.iter().filter(|s| **s == usage.as_str()).count();
                seen.push(usage);
                let base = format!("{}_{}", Self::node_id(usage), owner);
                let id = if count == 0 {
                    base
                } else {
                    format!("{}_{}", base, count + 1)
                };
                (id, usage.as_str())
            })
            .collect()
    }

    #[doc(hidden)]
    pub fn node_id(name: &str) -> String {
        name.replace("::", "_")
            .replace(['/', '.', '-', ' '], "_")
    }
}

impl Default for MermaidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
