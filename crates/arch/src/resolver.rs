//! 关系解析: 反向引用 + 边条件
//!
//! 所有写入都是「不存在才添加」或「不同才覆盖」，重复执行无变化，
//! 结果也与遍历顺序无关。

use crate::store::{ComponentRecord, GraphStore};
use indexmap::IndexMap;
use sfc::Condition;

/// 单次解析的变更统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub links_added: usize,
    pub conditions_merged: usize,
}

impl ResolveStats {
    pub fn is_noop(&self) -> bool {
        self.links_added == 0 && self.conditions_merged == 0
    }
}

/// 回填 `used_by`，并把待处理条件合并到父组件
pub fn resolve(store: &mut GraphStore) -> ResolveStats {
    let mut stats = ResolveStats::default();

    let edges: Vec<(String, String)> = store
        .records()
        .flat_map(|p| p.children.iter().map(move |c| (p.name.clone(), c.clone())))
        .collect();

    for (parent, child) in edges {
        // 自引用不算使用者
        if parent == child {
            continue;
        }
        if let Some(record) = store.get_mut(&child) {
            if record.used_by.insert(parent.clone()) {
                tracing::debug!("Added {} as parent of {}", parent, child);
                stats.links_added += 1;
            }
        }
    }

    for ((parent, key), condition) in latest_conditions(store) {
        let Some(record) = store.get_mut(&parent) else {
            continue;
        };
        if merge_condition(record, &key, condition) {
            tracing::debug!("Attached condition for {} to parent {}", key, parent);
            stats.conditions_merged += 1;
        }
    }

    stats
}

/// 每个 `(parent, key)` 的最终条件，后出现的覆盖先出现的。
/// 父组件不存在或已不再声明该子组件时丢弃。
fn latest_conditions(store: &GraphStore) -> IndexMap<(String, String), Condition> {
    let mut latest = IndexMap::new();

    for pending in store.pending_conditions() {
        let declared = store
            .get(&pending.parent)
            .is_some_and(|p| p.children.contains(&pending.child));
        if !declared {
            continue;
        }

        latest.insert(
            (pending.parent.clone(), pending.child.clone()),
            pending.condition.clone(),
        );
        if pending.raw_tag != pending.child {
            latest.insert(
                (pending.parent.clone(), pending.raw_tag.clone()),
                pending.condition.clone(),
            );
        }
    }

    latest
}

fn merge_condition(record: &mut ComponentRecord, key: &str, condition: Condition) -> bool {
    if record.conditional_children.get(key) == Some(&condition) {
        return false;
    }
    record.conditional_children.insert(key.to_string(), condition);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfc::{Directive, PendingCondition, UnitFacts, UnitIdentity};
    use std::path::Path;

    fn facts(name: &str, children: &[&str]) -> UnitFacts {
        let mut facts = UnitFacts::new(UnitIdentity::new(
            Path::new(&format!("/p/{}.vue", name)),
            Path::new("/p"),
        ));
        for child in children {
            facts.add_child(child);
        }
        facts
    }

    fn with_condition(mut facts: UnitFacts, child: &str, raw: &str, expr: &str) -> UnitFacts {
        facts.conditions.push(PendingCondition {
            parent: facts.identity.name.clone(),
            child: child.to_string(),
            raw_tag: raw.to_string(),
            condition: Condition::new(Directive::If, expr),
        });
        facts
    }

    #[test]
    fn test_backfills_used_by() {
        let mut store = GraphStore::new();
        store.ingest(facts("App", &["Header", "Footer"]));
        store.ingest(facts("Header", &[]));
        store.ingest(facts("Footer", &[]));
        store.ingest(facts("Page", &["Header"]));

        let stats = resolve(&mut store);
        assert_eq!(stats.links_added, 3);

        let header = store.get("Header").unwrap();
        assert_eq!(header.used_by.iter().collect::<Vec<_>>(), vec!["App", "Page"]);
        assert!(store.get("App").unwrap().is_root());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut store = GraphStore::new();
        store.ingest(with_condition(facts("Main", &["Side"]), "Side", "Side", "open"));
        store.ingest(facts("Side", &[]));

        let first = resolve(&mut store);
        assert_eq!(first, ResolveStats { links_added: 1, conditions_merged: 1 });

        let snapshot: Vec<ComponentRecord> = store.records().cloned().collect();
        let second = resolve(&mut store);
        assert!(second.is_noop());
        assert_eq!(store.records().cloned().collect::<Vec<_>>(), snapshot);
    }

    #[test]
    fn test_condition_lands_on_parent_with_both_spellings() {
        let mut store = GraphStore::new();
        store.ingest(with_condition(
            facts("Foo", &["MyWidget"]),
            "MyWidget",
            "my-widget",
            "visible",
        ));
        resolve(&mut store);

        let foo = store.get("Foo").unwrap();
        assert_eq!(foo.condition_for("MyWidget").unwrap().expression, "visible");
        assert_eq!(foo.condition_for("my-widget").unwrap().expression, "visible");
        // the placeholder carries no condition of its own
        assert!(store.get("MyWidget").unwrap().conditional_children.is_empty());
        assert!(store.get("MyWidget").unwrap().used_by.contains("Foo"));
    }

    #[test]
    fn test_later_condition_for_same_edge_wins() {
        let mut store = GraphStore::new();
        let f = with_condition(facts("Main", &["Side"]), "Side", "Side", "a");
        let f = with_condition(f, "Side", "Side", "b");
        store.ingest(f);

        let first = resolve(&mut store);
        assert_eq!(first.conditions_merged, 1);
        assert_eq!(store.get("Main").unwrap().condition_for("Side").unwrap().expression, "b");
        assert!(resolve(&mut store).is_noop());
    }

    #[test]
    fn test_condition_for_unanalyzed_child_is_kept_on_parent() {
        let mut store = GraphStore::new();
        store.ingest(with_condition(facts("Main", &["Ghost"]), "Ghost", "Ghost", "x"));
        resolve(&mut store);

        assert!(store.get("Ghost").unwrap().is_placeholder());
        assert!(store.get("Main").unwrap().condition_for("Ghost").is_some());
    }

    #[test]
    fn test_self_reference_is_not_a_parent() {
        let mut store = GraphStore::new();
        store.ingest(with_condition(facts("TreeItem", &["TreeItem"]), "TreeItem", "tree-item", "open"));
        resolve(&mut store);

        let item = store.get("TreeItem").unwrap();
        assert!(item.used_by.is_empty());
        assert!(item.is_root());
        assert_eq!(item.condition_for("TreeItem").unwrap().expression, "open");
    }

    #[test]
    fn test_missing_children_are_skipped() {
        let mut store = GraphStore::new();
        store.ingest(facts("App", &["Nowhere"]));
        let stats = resolve(&mut store);
        assert_eq!(stats.links_added, 0);
        assert!(!store.contains("Nowhere"));
    }
}
