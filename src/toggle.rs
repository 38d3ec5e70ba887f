//! Cascading enable/disable
//!
//! Enabling a package enables every mandatory dependency it transitively
//! needs; disabling one disables every package that transitively requires
//! it. Optional edges never cascade. The engine only decides which archives
//! change state; the rename itself goes through an [`ArchiveRenamer`].
//!
//! Packages extracted from the same archive share one flag: renaming the
//! archive flips all of them, and each is cascaded in turn.
//!
//! # Examples
//!
//! ```no_run
//! use modgraph::{analysis, set_active, Config, FsRenamer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(".")?;
//! let (mut graph, _) = analysis::scan(&config, None)?;
//! let mut renamer = FsRenamer::new(config.mods_dir());
//!
//! let outcome = set_active(&mut graph, &mut renamer, "create", false)?;
//! for id in &outcome.changed {
//!     println!("disabled {}", id);
//! }
//! # Ok(())
//! # }
//! ```

use crate::diagnostics::{Diagnostic, Diagnostics, NoOpReason};
use crate::extractor::DISABLED_SUFFIX;
use crate::graph::{EdgeKind, ModGraph};
use crate::Result;
use std::fs;
use std::path::PathBuf;

/// Applies the on-disk side of a toggle
pub trait ArchiveRenamer {
    /// Mark `archive` enabled or disabled and return its new file name
    fn set_enabled(&mut self, archive: &str, enabled: bool) -> Result<String>;
}

/// File name an archive takes in the requested state
pub fn toggled_file_name(archive: &str, enabled: bool) -> String {
    match (enabled, archive.strip_suffix(DISABLED_SUFFIX)) {
        (true, Some(base)) => base.to_string(),
        (true, None) => archive.to_string(),
        (false, Some(_)) => archive.to_string(),
        (false, None) => format!("{}{}", archive, DISABLED_SUFFIX),
    }
}

/// Renames archives inside the mods directory
#[derive(Debug, Clone)]
pub struct FsRenamer {
    dir: PathBuf,
}

impl FsRenamer {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArchiveRenamer for FsRenamer {
    fn set_enabled(&mut self, archive: &str, enabled: bool) -> Result<String> {
        let target = toggled_file_name(archive, enabled);
        if target != archive {
            fs::rename(self.dir.join(archive), self.dir.join(&target))?;
            tracing::debug!(from = archive, to = %target, "renamed archive");
        }
        Ok(target)
    }
}

/// Records renames without touching the filesystem
#[derive(Debug, Clone, Default)]
pub struct DryRunRenamer {
    pub renames: Vec<(String, String)>,
}

impl ArchiveRenamer for DryRunRenamer {
    fn set_enabled(&mut self, archive: &str, enabled: bool) -> Result<String> {
        let target = toggled_file_name(archive, enabled);
        if target != archive {
            self.renames.push((archive.to_string(), target.clone()));
        }
        Ok(target)
    }
}

/// Result of one top-level toggle request
#[derive(Debug, Default)]
pub struct ToggleOutcome {
    /// Identifiers whose flag changed, in the order they changed
    pub changed: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl ToggleOutcome {
    fn no_op(id: &str, reason: NoOpReason) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::ToggleNoOp {
            id: id.to_string(),
            reason,
        });
        Self {
            changed: Vec::new(),
            diagnostics,
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Enable or disable a package and cascade along mandatory edges.
///
/// Requests for unknown, gone or bundled packages, and for packages already
/// in the requested state, change nothing and report a `ToggleNoOp`.
/// A rename failure aborts the cascade; packages already renamed keep their
/// new state.
pub fn set_active<R: ArchiveRenamer>(
    graph: &mut ModGraph,
    renamer: &mut R,
    id: &str,
    enabled: bool,
) -> Result<ToggleOutcome> {
    let Some(index) = graph.position(id) else {
        return Ok(ToggleOutcome::no_op(id, NoOpReason::NotFound));
    };

    let node = graph.node_at(index);
    if node.is_gone() {
        return Ok(ToggleOutcome::no_op(&node.id, NoOpReason::Gone));
    }
    if let Some(parent) = &node.parent {
        let reason = NoOpReason::Bundled {
            parent: parent.clone(),
        };
        return Ok(ToggleOutcome::no_op(&node.id, reason));
    }
    if node.active == enabled {
        return Ok(ToggleOutcome::no_op(&node.id, NoOpReason::AlreadyInState));
    }

    let mut cascade = Cascade {
        graph,
        renamer,
        enabled,
        stack: Vec::new(),
        outcome: ToggleOutcome::default(),
    };
    cascade.visit(index)?;

    tracing::info!(
        id,
        enabled,
        changed = cascade.outcome.changed.len(),
        "toggle complete"
    );
    Ok(cascade.outcome)
}

/// State of one top-level toggle. The whole cascade holds the graph
/// exclusively.
struct Cascade<'g, 'r, R: ArchiveRenamer> {
    graph: &'g mut ModGraph,
    renamer: &'r mut R,
    enabled: bool,
    /// Nodes whose cascade is in progress
    stack: Vec<usize>,
    outcome: ToggleOutcome,
}

impl<R: ArchiveRenamer> Cascade<'_, '_, R> {
    fn visit(&mut self, index: usize) -> Result<()> {
        if self.stack.contains(&index) {
            let mut path: Vec<String> = self
                .stack
                .iter()
                .map(|&i| self.graph.node_at(i).id.clone())
                .collect();
            path.push(self.graph.node_at(index).id.clone());
            self.outcome
                .diagnostics
                .push(Diagnostic::CycleDetected { path });
            return Ok(());
        }

        let node = self.graph.node_at(index);
        if node.is_gone() || node.active == self.enabled {
            return Ok(());
        }

        self.stack.push(index);
        let flipped = self.flip(index)?;
        for next in self.neighbours(&flipped) {
            self.visit(next)?;
        }
        self.stack.pop();
        Ok(())
    }

    /// Rename the node's archive and set the flag on every node it holds.
    /// Returns the flipped positions, the requested node first.
    fn flip(&mut self, index: usize) -> Result<Vec<usize>> {
        let archive = self.graph.node_at(index).archive.clone();

        let mut flipped = vec![index];
        if let Some(archive) = &archive {
            flipped.extend(
                self.graph
                    .nodes()
                    .iter()
                    .enumerate()
                    .filter(|(i, n)| {
                        *i != index
                            && n.is_present()
                            && n.active != self.enabled
                            && n.archive.as_ref() == Some(archive)
                    })
                    .map(|(i, _)| i),
            );
        }

        let renamed = match &archive {
            Some(archive) => Some(self.renamer.set_enabled(archive, self.enabled)?),
            None => None,
        };

        for &i in &flipped {
            let node = self.graph.node_at_mut(i);
            node.active = self.enabled;
            if renamed.is_some() {
                node.archive = renamed.clone();
            }
            tracing::debug!(id = %node.id, active = self.enabled, "flipped");
            self.outcome.changed.push(node.id.clone());
        }

        Ok(flipped)
    }

    /// Next nodes to cascade into: mandatory dependencies when enabling,
    /// mandatory dependents when disabling
    ///
    /// Edges between nodes of the same archive are skipped: those nodes were
    /// settled together by the rename.
    fn neighbours(&mut self, flipped: &[usize]) -> Vec<usize> {
        let mut next = Vec::new();

        for &i in flipped {
            let node = self.graph.node_at(i);
            if self.enabled {
                next.extend(
                    node.mandatory_dependencies()
                        .filter_map(|edge| self.graph.resolve(&edge.target))
                        .filter(|target| !flipped.contains(target)),
                );
                continue;
            }

            for dependent in &node.dependents {
                let Some(target) = self.graph.resolve(&dependent.id) else {
                    continue;
                };
                if flipped.contains(&target) {
                    continue;
                }
                match dependent.kind {
                    EdgeKind::Mandatory => next.push(target),
                    EdgeKind::Optional => {
                        if self.graph.node_at(target).active {
                            self.outcome.diagnostics.push(Diagnostic::OptionalDependentKept {
                                node: node.id.clone(),
                                dependent: dependent.id.clone(),
                            });
                        }
                    }
                }
            }
        }

        next
    }
}
