//! 基于正则的组件分析器
//!
//! 用正则识别 import、`components: { ... }` 注册、composable 调用和模板中的
//! 自定义标签。不做完整语法解析，少见写法可能漏识别或误识别。

use super::UnitAnalyzer;
use crate::descriptor::{Result, SfcDescriptor};
use crate::naming::{is_builtin_tag, normalize_tag};
use crate::types::{Condition, Directive, PendingCondition, SourceUnit, UnitFacts};
use regex::Regex;
use std::sync::OnceLock;

/// 默认组件文件后缀
pub const DEFAULT_EXTENSION: &str = ".vue";

/// 正则分析器
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    include_composables: bool,
    extension: String,
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self {
            include_composables: true,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_composables(mut self, include: bool) -> Self {
        self.include_composables = include;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn includes_composables(&self) -> bool {
        self.include_composables
    }

    /// `import X from './X.vue'` and `import { A, B } from './ab.vue'`
    fn collect_imports(&self, logic: &str, facts: &mut UnitFacts) {
        for caps in regex_import().captures_iter(logic) {
            let names = caps[1].trim();
            let path = &caps[2];
            if !path.ends_with(&self.extension) {
                continue;
            }

            if names.contains('{') {
                // 具名导入原样保留 (包括 as 别名)
                let list = names.replacen('{', "", 1).replacen('}', "", 1);
                for name in list.split(',') {
                    facts.add_child(name.trim());
                }
            } else {
                let name = names.split(" as ").next().unwrap_or(names);
                facts.add_child(name.trim());
            }
        }
    }

    /// 第一个 `components: { ... }` 对象中的简写项
    fn collect_registrations(&self, logic: &str, facts: &mut UnitFacts) {
        let Some(caps) = regex_components().captures(logic) else {
            return;
        };
        for entry in caps[1].split(',') {
            let entry = entry.trim();
            if !entry.contains(':') {
                facts.add_child(entry);
            }
        }
    }

    fn collect_composables(&self, logic: &str, facts: &mut UnitFacts) {
        facts.auxiliary_usages.extend(
            regex_composable()
                .find_iter(logic)
                .map(|m| m.as_str().to_string()),
        );
    }

    fn collect_template_tags(&self, template: &str, facts: &mut UnitFacts) {
        for caps in regex_component_tag().captures_iter(template) {
            let tag = &caps[1];
            if is_builtin_tag(tag) {
                continue;
            }
            let attributes = caps.get(2).map_or("", |m| m.as_str());
            let name = normalize_tag(tag);
            facts.add_child(&name);

            if let Some(condition) = parse_condition(attributes) {
                tracing::debug!(
                    "Found conditional component: {} with condition: {}",
                    name,
                    condition.expression
                );
                facts.conditions.push(PendingCondition {
                    parent: facts.identity.name.clone(),
                    child: name,
                    raw_tag: tag.to_string(),
                    condition,
                });
            }
        }
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitAnalyzer for PatternAnalyzer {
    fn analyze(&self, unit: &SourceUnit) -> Result<UnitFacts> {
        let descriptor = SfcDescriptor::parse(&unit.text)?;
        let mut facts = UnitFacts::new(unit.identity.clone());

        if descriptor.has_logic() {
            let logic = descriptor.logic();
            self.collect_imports(&logic, &mut facts);
            self.collect_registrations(&logic, &mut facts);
            if self.include_composables {
                self.collect_composables(&logic, &mut facts);
            }
        }

        if let Some(template) = descriptor.template_content() {
            self.collect_template_tags(template, &mut facts);
        }

        Ok(facts)
    }

    fn file_extension(&self) -> &str {
        &self.extension
    }
}

/// 属性中第一个 `v-if` / `v-else-if` 的值
fn parse_condition(attributes: &str) -> Option<Condition> {
    let caps = regex_condition().captures(attributes)?;
    let directive = Directive::from_suffix(&caps[1])?;
    Some(Condition::new(directive, caps[2].trim()))
}

fn regex_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"import\s+([\w{}\s,]+)\s+from\s+['"](.*?)['"];?"#).unwrap())
}

fn regex_components() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"components\s*:\s*\{([^}]*)\}"#).unwrap())
}

fn regex_composable() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\buse[A-Z]\w+"#).unwrap())
}

fn regex_component_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<([A-Z][\w-]*|[a-z][\w-]*-[\w-]*)\b([^>]*?)(?:/>|>)"#).unwrap()
    })
}

fn regex_condition() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)\bv-(if|else-if)\s*=\s*["']([^"']*)["']"#).unwrap())
}
