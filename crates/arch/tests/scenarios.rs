//! End-to-end runs over small in-memory projects
//!
//! Run: `cargo test -p arch --test scenarios`

use arch::{ComponentRecord, DiagramSession, GraphStore, MermaidGenerator, Phase};
use sfc::SourceUnit;
use std::path::Path;

const APP: &str = r#"<template>
  <div id="app">
    <Header />
    <MainContent />
    <Footer />
  </div>
</template>

<script>
import Header from './components/Header.vue';
import MainContent from './components/MainContent.vue';
import Footer from './components/Footer.vue';

export default {
  name: 'App',
  components: {
    Header,
    MainContent,
    Footer
  }
};
</script>
"#;

const MAIN_CONTENT: &str = r#"<template>
  <main>
    <Sidebar v-if="showSidebar" />
    <ContentArea />
  </main>
</template>

<script setup>
import Sidebar from './Sidebar.vue'
import ContentArea from './ContentArea.vue'
import { ref } from 'vue'

const showSidebar = ref(true)
</script>
"#;

const FOO: &str = r#"<template>
  <section>
    <my-widget />
    <my-widget v-if="visible"></my-widget>
    <span>text</span>
  </section>
</template>
"#;

const THEMED: &str = r#"<script setup>
const { theme } = useTheme()
const { width } = useWindowSize()
</script>

<template>
  <div :class="theme">{{ width }}</div>
</template>
"#;

fn unit(rel: &str, text: &str) -> SourceUnit {
    let root = Path::new("/project");
    SourceUnit::from_path(&root.join(rel), root, text)
}

fn leaf(rel: &str) -> SourceUnit {
    unit(rel, "<template><div /></template>")
}

fn project() -> Vec<SourceUnit> {
    vec![
        unit("src/App.vue", APP),
        leaf("src/components/Header.vue"),
        unit("src/components/MainContent.vue", MAIN_CONTENT),
        leaf("src/components/Sidebar.vue"),
        leaf("src/components/ContentArea.vue"),
        leaf("src/components/Footer.vue"),
    ]
}

fn run(units: &[SourceUnit]) -> DiagramSession {
    let mut session = DiagramSession::default();
    for unit in units {
        session.submit(unit).unwrap();
    }
    session.end_of_analysis().unwrap();
    session.finalize().unwrap();
    session
}

fn sorted_records(store: &GraphStore) -> Vec<ComponentRecord> {
    let mut records: Vec<_> = store.records().cloned().collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

#[test]
fn test_scenario_a_default_imports() {
    let session = run(&project());
    let store = session.store();

    let app = store.get("App").unwrap();
    assert_eq!(app.children, vec!["Header", "MainContent", "Footer"]);
    assert!(app.used_by.is_empty());
    assert!(app.is_root());

    for child in ["Header", "MainContent", "Footer"] {
        let record = store.get(child).unwrap();
        assert_eq!(record.used_by.iter().collect::<Vec<_>>(), vec!["App"]);
    }
}

#[test]
fn test_scenario_b_conditional_child() {
    let session = run(&project());
    let store = session.store();

    let main = store.get("MainContent").unwrap();
    assert!(main.children.contains(&"Sidebar".to_string()));
    assert_eq!(main.condition_for("Sidebar").unwrap().expression, "showSidebar");

    let out = session.render(&MermaidGenerator::new()).unwrap();
    assert!(out.contains("  MainContent -. \"v-if: showSidebar\" .-> Sidebar\n"));
    assert!(out.contains("stroke:#FF5722,stroke-width:2px,stroke-dasharray:3;"));
    assert!(out.contains("  class Sidebar condition;\n"));
    assert!(out.contains("  - Sidebar *(conditional: v-if=\"showSidebar\")*\n"));
}

#[test]
fn test_scenario_c_hyphenated_tag_once() {
    let session = run(&[unit("src/Foo.vue", FOO)]);
    let foo = session.store().get("Foo").unwrap();

    assert_eq!(foo.children, vec!["MyWidget"]);
    assert_eq!(foo.condition_for("MyWidget").unwrap().expression, "visible");
    assert_eq!(foo.condition_for("my-widget").unwrap().expression, "visible");
}

#[test]
fn test_scenario_d_composables() {
    let session = run(&[unit("src/components/Themed.vue", THEMED)]);
    let themed = session.store().get("Themed").unwrap();
    assert_eq!(
        themed.auxiliary_usages,
        vec!["useTheme", "useWindowSize"]
    );

    let out = session.render(&MermaidGenerator::new()).unwrap();
    assert!(out.contains("  useTheme_Themed(\"useTheme\"):::composable\n"));
    assert!(out.contains("  Themed -.-> useTheme_Themed\n"));
    assert!(out.contains("  useWindowSize_Themed(\"useWindowSize\"):::composable\n"));
    assert!(out.contains("  Themed -.-> useWindowSize_Themed\n"));
}

#[test]
fn test_scenario_e_orphan() {
    let mut units = project();
    units.push(leaf("src/components/Orphan.vue"));
    let session = run(&units);

    let orphan = session.store().get("Orphan").unwrap();
    assert!(orphan.children.is_empty());
    assert!(orphan.is_root());

    let out = session.render(&MermaidGenerator::new()).unwrap();
    assert!(out.contains("  Orphan[\"Orphan\"]:::rootComponent\n"));
    assert!(out.contains(
        "### Orphan\n\n- **File Path:** `src/components/Orphan.vue`\n\
         - **Used in Components:** None (Root Component)\n\
         - **Child Components:**\n  - None\n"
    ));
}

#[test]
fn test_resolution_is_idempotent() {
    let mut session = DiagramSession::default();
    for unit in project() {
        session.submit(&unit).unwrap();
    }
    let first = session.end_of_analysis().unwrap();
    assert!(!first.is_noop());
    let snapshot = sorted_records(session.store());

    let second = session.finalize().unwrap();
    assert!(second.is_noop());
    assert_eq!(sorted_records(session.store()), snapshot);
}

#[test]
fn test_order_independence() {
    let forward = project();
    let mut backward = project();
    backward.reverse();
    // conditional parent first, its child last
    let mut shuffled = project();
    shuffled.rotate_left(2);

    let expected = sorted_records(run(&forward).store());
    assert_eq!(sorted_records(run(&backward).store()), expected);
    assert_eq!(sorted_records(run(&shuffled).store()), expected);
}

#[test]
fn test_root_detection() {
    let mut units = project();
    units.push(unit(
        "src/TreeItem.vue",
        "<template><li><tree-item v-if=\"open\" /></li></template>",
    ));
    let session = run(&units);
    let store = session.store();

    for record in store.records() {
        let referenced = store
            .records()
            .any(|other| other.name != record.name && other.children.contains(&record.name));
        assert_eq!(record.is_root(), !referenced, "root mismatch for {}", record.name);
    }

    let roots: Vec<_> = store.roots().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(roots, vec!["App", "TreeItem"]);
}

#[test]
fn test_dangling_edges_are_omitted() {
    let session = run(&[unit(
        "src/Shell.vue",
        "<template><Known /><Missing /></template>\n<script>\nimport Missing from './Missing.vue'\n</script>",
    ), leaf("src/Known.vue")]);

    assert_eq!(session.store().dangling_references(), vec![("Shell", "Missing")]);

    let out = session.render(&MermaidGenerator::new()).unwrap();
    assert!(out.contains("  Shell --> Known\n"));
    assert!(!out.contains("--> Missing"));
    assert!(!out.contains("Missing[\""));
    assert!(out.contains("  - Missing\n"));
}

#[test]
fn test_broken_unit_does_not_abort_run() {
    let mut units = project();
    units.insert(1, unit("src/Broken.vue", "<template><Header />"));
    let session = run(&units);

    assert_eq!(session.phase(), Phase::Finalized);
    assert_eq!(session.skipped().len(), 1);
    assert!(!session.store().contains("Broken"));
    assert_eq!(session.store().get("Header").unwrap().used_by.len(), 1);
}

#[test]
fn test_render_is_deterministic() {
    let a = run(&project()).render(&MermaidGenerator::new()).unwrap();
    let b = run(&project()).render(&MermaidGenerator::new()).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with("# Vue Component Diagram\n\n```mermaid\ngraph TD;\n"));
    assert!(a.contains("  App[\"App\"]:::rootComponent\n"));
}

#[test]
fn test_commented_template_in_template_keeps_unit() {
    let shell = unit(
        "src/Shell.vue",
        "<template>\n  <div>\n    <!-- <template v-if=\"old\"> -->\n    <Card />\n  </div>\n</template>\n<script>import Card from './Card.vue'</script>",
    );
    let session = run(&[shell, leaf("src/Card.vue")]);

    assert!(session.skipped().is_empty());
    assert_eq!(session.store().get("Shell").unwrap().children, vec!["Card"]);
    let card = session.store().get("Card").unwrap();
    assert!(!card.is_root());
    assert!(card.used_by.contains("Shell"));
}
