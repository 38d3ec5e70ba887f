//! Pipeline wiring
//!
//! Each stage takes the graph from the previous one:
//! scan and build, then reconcile with the previous report, infer categories
//! and sides, and finally render.

use crate::canonical::Canonicalizer;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::extractor::{merge_scans, Extractor, ProgressCallback};
use crate::graph::ModGraph;
use crate::ignore::IgnoreList;
use crate::inference::{infer_categories, infer_sides, InferenceSummary};
use crate::metadata::MetadataIndex;
use crate::reconcile::{parse_report, reconcile, ReconcileSummary};
use crate::report::{render, ReportContext};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one report run produces
#[derive(Debug)]
pub struct Analysis {
    pub graph: ModGraph,
    pub diagnostics: Diagnostics,
    pub reconcile: ReconcileSummary,
    pub inference: InferenceSummary,
    /// Present top-level packages with no side after inference
    pub missing_sides: usize,
}

/// Scan the mods directory and build the graph
pub fn scan(config: &Config, progress: Option<ProgressCallback>) -> Result<(ModGraph, Diagnostics)> {
    let canon = Canonicalizer::new(&config.dependencies.extra_equivalents);
    let metadata = MetadataIndex::load(config.index_dir())?;
    let ignore = IgnoreList::load(config.ignore_list_path())?;
    tracing::debug!(
        sidecars = metadata.len(),
        ignored = ignore.len(),
        "loaded pack metadata"
    );

    let (records, mut diagnostics) = {
        let extractor = Extractor::new(&canon, &config.dependencies.ignored, &metadata)?;
        merge_scans(extractor.scan_dir(config.mods_dir(), progress)?)
    };

    let (graph, build_diagnostics) = ModGraph::build(records, canon, &ignore);
    diagnostics.extend(build_diagnostics);
    Ok((graph, diagnostics))
}

/// Scan, then recover curated data from the previous report and infer the rest
pub fn analyze(config: &Config, progress: Option<ProgressCallback>) -> Result<Analysis> {
    let (mut graph, mut diagnostics) = scan(config, progress)?;

    let report_path = config.report_path();
    let summary = if report_path.exists() {
        let previous = read_previous_report(&report_path)?;
        let (rows, row_diagnostics) = parse_report(&previous);
        diagnostics.extend(row_diagnostics);
        reconcile(&mut graph, rows)
    } else {
        tracing::debug!(path = %report_path.display(), "no previous report");
        ReconcileSummary::default()
    };

    let inference = infer_categories(&mut graph, &config.heuristics);
    let missing_sides = infer_sides(&mut graph);

    Ok(Analysis {
        graph,
        diagnostics,
        reconcile: summary,
        inference,
        missing_sides,
    })
}

fn read_previous_report(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidReport(format!("{}: {}", path.display(), e)))
}

/// Render the graph and overwrite the configured report file
pub fn write_report(config: &Config, analysis: &Analysis) -> Result<PathBuf> {
    let ctx = ReportContext::new(&config.title, analysis.inference.inferred);
    let text = render(&analysis.graph, &ctx);

    let path = config.report_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&path, text)?;
    tracing::info!(path = %path.display(), nodes = analysis.graph.len(), "wrote report");
    Ok(path)
}
