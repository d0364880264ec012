use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use sfc::{Condition, PendingCondition, UnitFacts};

/// 组件记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentRecord {
    pub name: String,
    /// 占位记录未被回填时为空
    pub source_path: String,
    /// 引用的子组件 (首次出现顺序)
    pub children: Vec<String>,
    /// composable 调用，每次出现一条
    pub auxiliary_usages: Vec<String>,
    /// 只由 resolver 填充
    pub used_by: IndexSet<String>,
    /// 子组件名 (规范名和原始标签名) -> 渲染条件
    pub conditional_children: IndexMap<String, Condition>,
}

impl ComponentRecord {
    /// 只有名字的占位记录
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn from_facts(facts: &UnitFacts) -> Self {
        Self {
            name: facts.identity.name.clone(),
            source_path: facts.identity.relative_path.clone(),
            children: facts.children.clone(),
            auxiliary_usages: facts.auxiliary_usages.clone(),
            used_by: IndexSet::new(),
            conditional_children: IndexMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.used_by.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.source_path.is_empty()
    }

    pub fn condition_for(&self, child: &str) -> Option<&Condition> {
        self.conditional_children.get(child)
    }
}

/// 组件名 -> 记录，保持首次插入顺序
#[derive(Debug, Default)]
pub struct GraphStore {
    records: IndexMap<String, ComponentRecord>,
    pending_conditions: Vec<PendingCondition>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并单个组件的分析结果
    pub fn ingest(&mut self, facts: UnitFacts) {
        let name = facts.identity.name.clone();

        // 同一组件以最新一次分析为准
        self.pending_conditions.retain(|p| p.parent != name);

        for pending in &facts.conditions {
            self.ensure_placeholder(&pending.child);
        }
        self.pending_conditions.extend(facts.conditions.iter().cloned());

        self.insert(ComponentRecord::from_facts(&facts));
    }

    /// 插入或覆盖记录，保留已有的 `used_by`
    pub fn insert(&mut self, record: ComponentRecord) {
        match self.records.get_mut(&record.name) {
            Some(existing) => {
                if !existing.is_placeholder()
                    && !record.is_placeholder()
                    && existing.source_path != record.source_path
                {
                    tracing::warn!(
                        "Component {} defined twice: {} replaces {}",
                        record.name,
                        record.source_path,
                        existing.source_path
                    );
                }
                existing.source_path = record.source_path;
                existing.children = record.children;
                existing.auxiliary_usages = record.auxiliary_usages;
                existing.conditional_children = record.conditional_children;
            }
            None => {
                self.records.insert(record.name.clone(), record);
            }
        }
    }

    /// 为前向引用创建占位记录，返回是否新建
    pub fn ensure_placeholder(&mut self, name: &str) -> bool {
        if self.records.contains_key(name) {
            return false;
        }
        self.records
            .insert(name.to_string(), ComponentRecord::placeholder(name));
        true
    }

    pub fn get(&self, name: &str) -> Option<&ComponentRecord> {
        self.records.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ComponentRecord> {
        self.records.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按插入顺序遍历
    pub fn records(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.records.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn pending_conditions(&self) -> &[PendingCondition] {
        &self.pending_conditions
    }

    /// 根组件 (没有被其他组件使用)
    pub fn roots(&self) -> Vec<&ComponentRecord> {
        self.records().filter(|r| r.is_root()).collect()
    }

    /// 子组件不存在的 `(parent, child)` 引用
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        self.records()
            .flat_map(|r| {
                r.children
                    .iter()
                    .filter(|c| !self.contains(c))
                    .map(move |c| (r.name.as_str(), c.as_str()))
            })
            .collect()
    }

    /// 先精确匹配，再忽略大小写匹配
    pub fn find(&self, name: &str) -> Option<&ComponentRecord> {
        self.get(name).or_else(|| {
            self.records()
                .find(|r| r.name.eq_ignore_ascii_case(name))
        })
    }
}
