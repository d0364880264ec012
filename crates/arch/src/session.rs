use crate::mermaid::MermaidGenerator;
use crate::resolver::{resolve, ResolveStats};
use crate::store::GraphStore;
use sfc::{PatternAnalyzer, SfcError, SourceUnit, UnitAnalyzer};
use std::fmt;
use thiserror::Error;

/// 会话所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 接收组件单元
    Collecting,
    /// 第一遍解析完成
    Analyzed,
    /// 第二遍完成，可渲染
    Finalized,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Collecting => "collecting",
            Phase::Analyzed => "analyzed",
            Phase::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ArchError {
    #[error("lifecycle violation: expected {expected} phase, session is {actual}")]
    Lifecycle { expected: Phase, actual: Phase },
}

pub type Result<T> = std::result::Result<T, ArchError>;

/// 解析失败被跳过的单元
#[derive(Debug, Clone)]
pub struct SkippedUnit {
    pub path: String,
    pub reason: SfcError,
}

/// 一次完整分析: submit -> end_of_analysis -> finalize -> render
pub struct DiagramSession<A: UnitAnalyzer = PatternAnalyzer> {
    analyzer: A,
    store: GraphStore,
    phase: Phase,
    skipped: Vec<SkippedUnit>,
}

impl<A: UnitAnalyzer> DiagramSession<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            store: GraphStore::new(),
            phase: Phase::Collecting,
            skipped: Vec::new(),
        }
    }

    /// 分析单个组件并写入存储
    ///
    /// 解析失败只记录日志并跳过，返回 `Ok(false)`
    pub fn submit(&mut self, unit: &SourceUnit) -> Result<bool> {
        self.expect_phase(Phase::Collecting)?;
        let path = &unit.identity.relative_path;

        match self.analyzer.analyze(unit) {
            Ok(facts) => {
                tracing::info!(
                    "Analyzed component: {}, children: {}",
                    facts.name(),
                    facts.children.join(", ")
                );
                self.store.ingest(facts);
                Ok(true)
            }
            Err(reason) => {
                tracing::warn!("Error analyzing component {}: {}", path, reason);
                self.skipped.push(SkippedUnit {
                    path: path.clone(),
                    reason,
                });
                Ok(false)
            }
        }
    }

    /// 所有单元提交完毕，执行第一遍解析
    pub fn end_of_analysis(&mut self) -> Result<ResolveStats> {
        self.expect_phase(Phase::Collecting)?;
        tracing::info!("Processing component relationships...");
        let stats = resolve(&mut self.store);
        tracing::info!(
            "Resolved {} links, {} conditional edges",
            stats.links_added,
            stats.conditions_merged
        );
        self.phase = Phase::Analyzed;
        Ok(stats)
    }

    /// 第二遍解析 (正常情况下无变化)
    pub fn finalize(&mut self) -> Result<ResolveStats> {
        self.expect_phase(Phase::Analyzed)?;
        let stats = resolve(&mut self.store);
        if !stats.is_noop() {
            tracing::debug!("Final pass added {:?}", stats);
        }
        self.phase = Phase::Finalized;
        Ok(stats)
    }

    pub fn render(&self, generator: &MermaidGenerator) -> Result<String> {
        self.expect_phase(Phase::Finalized)?;
        Ok(generator.render(&self.store))
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn skipped(&self) -> &[SkippedUnit] {
        &self.skipped
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase != expected {
            return Err(ArchError::Lifecycle {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}

impl Default for DiagramSession<PatternAnalyzer> {
    fn default() -> Self {
        Self::new(PatternAnalyzer::new())
    }
}
