//! diagram 子命令 - 组件关系分析

use crate::config::DiagramConfig;
use crate::host::{analyze_project, DiagramPlugin};
use arch::{ComponentRecord, TreeDirection};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum DiagramCommands {
    /// Generate the Mermaid component diagram
    Diagram {
        /// Project path
        path: String,
        /// Output file (relative to the project root)
        #[arg(short, long)]
        output: Option<String>,
        /// Skip composable usages
        #[arg(long)]
        no_composables: bool,
        /// Project root for relative paths (default: project path)
        #[arg(long)]
        root: Option<String>,
        /// Document title
        #[arg(long)]
        title: Option<String>,
        /// Omit the legend subgraph
        #[arg(long)]
        no_legend: bool,
        /// Print instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Print the resolved component graph
    Graph {
        /// Project path
        path: String,
        /// JSON output
        #[arg(long)]
        json: bool,
        /// Project root for relative paths (default: project path)
        #[arg(long)]
        root: Option<String>,
    },
    /// Print the component tree below (or above) a component
    Tree {
        /// Project path
        path: String,
        /// Entry component name
        entry: String,
        /// Max depth
        #[arg(short, long, default_value = "5")]
        depth: usize,
        /// Show parents (default: children)
        #[arg(short, long)]
        incoming: bool,
        /// JSON output
        #[arg(long)]
        json: bool,
        /// Project root for relative paths (default: project path)
        #[arg(long)]
        root: Option<String>,
    },
}

pub async fn run(cmd: DiagramCommands) -> anyhow::Result<()> {
    match cmd {
        DiagramCommands::Diagram { path, output, no_composables, root, title, no_legend, stdout } => {
            let mut config = DiagramConfig::from_env();
            if let Some(output) = output {
                config.output_path = PathBuf::from(output);
            }
            if no_composables {
                config.include_composables = false;
            }
            if let Some(title) = title {
                config.title = title;
            }
            if no_legend {
                config.legend = false;
            }
            cmd_diagram(&path, root.as_deref(), config, stdout).await
        }
        DiagramCommands::Graph { path, json, root } => cmd_graph(&path, root.as_deref(), json).await,
        DiagramCommands::Tree { path, entry, depth, incoming, json, root } => {
            cmd_tree(&path, root.as_deref(), &entry, depth, incoming, json).await
        }
    }
}

/// 规范化项目路径，并确定计算相对路径用的根目录
fn resolve_paths(path: &str, root: Option<&str>, config: &mut DiagramConfig) -> anyhow::Result<PathBuf> {
    let project_path = PathBuf::from(path).canonicalize()?;
    if !project_path.is_dir() {
        anyhow::bail!("Not a directory: {}", project_path.display());
    }

    config.root = match root {
        Some(root) => PathBuf::from(root).canonicalize()?,
        None if std::env::var_os("VUEGRAPH_ROOT").is_some() => config.root.canonicalize()?,
        None => project_path.clone(),
    };
    Ok(project_path)
}

async fn load(project_path: &Path, config: DiagramConfig) -> anyhow::Result<DiagramPlugin> {
    eprintln!("Analyzing: {}", project_path.display());

    let mut plugin = DiagramPlugin::new(config);
    let analyzed = analyze_project(&mut plugin, project_path).await?;
    eprintln!("Analyzed {} components", analyzed);

    for skipped in plugin.session().skipped() {
        eprintln!("  skipped {}: {}", skipped.path, skipped.reason);
    }
    Ok(plugin)
}

async fn cmd_diagram(path: &str, root: Option<&str>, mut config: DiagramConfig, stdout: bool) -> anyhow::Result<()> {
    let project_path = resolve_paths(path, root, &mut config)?;
    let mut plugin = load(&project_path, config).await?;

    if stdout {
        print!("{}", plugin.finish()?);
    } else {
        let file = plugin.close_bundle().await?;
        eprintln!("Saved to: {}", file.display());
    }

    Ok(())
}

async fn cmd_graph(path: &str, root: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut config = DiagramConfig::from_env();
    let project_path = resolve_paths(path, root, &mut config)?;
    let mut plugin = load(&project_path, config).await?;
    plugin.finish()?;

    let session = plugin.session();
    let store = session.store();

    if json {
        #[derive(Serialize)]
        struct Dangling<'a> {
            parent: &'a str,
            child: &'a str,
        }

        #[derive(Serialize)]
        struct Skipped<'a> {
            path: &'a str,
            reason: String,
        }

        #[derive(Serialize)]
        struct GraphReport<'a> {
            components: Vec<&'a ComponentRecord>,
            roots: Vec<&'a str>,
            dangling: Vec<Dangling<'a>>,
            skipped: Vec<Skipped<'a>>,
        }

        let report = GraphReport {
            components: store.records().collect(),
            roots: store.roots().iter().map(|r| r.name.as_str()).collect(),
            dangling: store
                .dangling_references()
                .into_iter()
                .map(|(parent, child)| Dangling { parent, child })
                .collect(),
            skipped: session
                .skipped()
                .iter()
                .map(|s| Skipped { path: &s.path, reason: s.reason.to_string() })
                .collect(),
        };

        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{} components\n", store.len());
        for record in store.records() {
            let location = if record.is_placeholder() { "(not analyzed)" } else { record.source_path.as_str() };
            println!("  {}  {}", record.name, location);
            for child in &record.children {
                match record.condition_for(child) {
                    Some(condition) => println!("    -> {} [{}]", child, condition.label()),
                    None => println!("    -> {}", child),
                }
            }
        }

        let roots: Vec<_> = store.roots().iter().map(|r| r.name.as_str()).collect();
        println!("\nRoots: {}", roots.join(", "));

        let dangling = store.dangling_references();
        if !dangling.is_empty() {
            println!("\nUnresolved references:");
            for (parent, child) in dangling {
                println!("  {} -> {}", parent, child);
            }
        }
    }

    Ok(())
}

async fn cmd_tree(
    path: &str,
    root: Option<&str>,
    entry: &str,
    depth: usize,
    incoming: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = DiagramConfig::from_env();
    let project_path = resolve_paths(path, root, &mut config)?;
    eprintln!("Entry: {}", entry);
    eprintln!("Direction: {}", if incoming { "parents" } else { "children" });

    let mut plugin = load(&project_path, config).await?;
    plugin.finish()?;

    let direction = if incoming { TreeDirection::Incoming } else { TreeDirection::Outgoing };
    let tree = plugin.session().store().component_tree(entry, direction, depth);

    if tree.is_empty() {
        println!("\nComponent not found: {}", entry);
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        println!("\nComponent tree ({}):\n", entry);
        for node in &tree {
            let indent = "  ".repeat(node.depth);
            match &node.condition {
                Some(condition) => println!("{}- {} [{}]", indent, node.name, condition.label()),
                None => println!("{}- {}", indent, node.name),
            }
        }
    }

    Ok(())
}
