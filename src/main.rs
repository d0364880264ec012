//! vuegraph - Vue 组件关系图生成工具

mod config;
mod diagram_cli;
mod host;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vuegraph")]
#[command(about = "Static component graph and Mermaid diagrams for Vue projects", version)]
struct Cli {
    #[command(subcommand)]
    command: diagram_cli::DiagramCommands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout 输出图，日志走 stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    diagram_cli::run(cli.command).await?;

    Ok(())
}
