//! Exact shortest Hamiltonian circle by branch and bound.
//!
//! The search fixes vertex 0 as start and end and walks the permutation tree
//! depth first with an explicit stack. Candidates at every slot are tried
//! nearest first. A branch is discarded when its partial cost exceeds the best
//! circuit, or when it sits before the midpoint and already costs more than
//! half of it. Every circuit is met once per direction, so one of the two
//! traversals of an improving circuit always survives the half bound.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use log::{debug, info, trace, warn};

use super::{
    progress::{ProgressObserver, ProgressTracker, factorial},
    state::SearchState,
};
use crate::graph::{Cost, WeightedGraph};

/// Closed tour starting and ending at vertex 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    vertices: Vec<usize>,
    cost: Cost,
}

impl Circuit {
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Number of distinct vertices visited.
    pub fn len(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, vertex) in self.vertices.iter().enumerate() {
            if idx > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{vertex}")?;
        }
        Ok(())
    }
}

/// Counters collected during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub steps: u64,
    /// Hamiltonian paths that reached the last slot.
    pub completed: u64,
    pub improvements: u64,
    pub pruned: u64,
    /// Leaves skipped through pruned branches, saturating.
    pub discarded_leaves: u128,
    pub backtracks: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "steps={} completed={} improvements={} pruned={} discarded_leaves={} backtracks={}",
            self.steps,
            self.completed,
            self.improvements,
            self.pruned,
            self.discarded_leaves,
            self.backtracks
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Fewer than two vertices; nothing was searched.
    Degenerate,
    /// Every rooted circuit was enumerated or pruned.
    Exhausted,
    /// The cancel flag was raised; any circuit is the best seen so far.
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct SolveReport {
    pub circuit: Option<Circuit>,
    pub stats: SearchStats,
    pub termination: Termination,
}

impl SolveReport {
    /// A circuit was found and the search proved it optimal.
    pub fn is_optimal(&self) -> bool {
        self.termination == Termination::Exhausted && self.circuit.is_some()
    }
}

/// Branch and bound search over a borrowed [`WeightedGraph`].
///
/// The graph is expected to be complete. On graphs with missing edges the
/// search still returns the best circuit over existing edges, or `None`.
#[derive(Clone, Debug)]
pub struct CircleSolver<'g> {
    graph: &'g WeightedGraph,
    emit_progress: bool,
    half_bound: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'g> CircleSolver<'g> {
    pub fn new(graph: &'g WeightedGraph) -> Self {
        Self {
            graph,
            emit_progress: false,
            half_bound: true,
            cancel: None,
        }
    }

    /// Log completion percentages at info level while searching.
    pub fn with_progress(mut self, emit_progress: bool) -> Self {
        self.emit_progress = emit_progress;
        self
    }

    /// Toggle the half-cost bound applied before the midpoint slot.
    pub fn with_half_bound(mut self, half_bound: bool) -> Self {
        self.half_bound = half_bound;
        self
    }

    /// Stop as soon as `flag` is set; checked once per search step.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run(&self) -> SolveReport {
        self.search(None)
    }

    pub fn run_with_observer(&self, observer: &mut dyn ProgressObserver) -> SolveReport {
        self.search(Some(observer))
    }

    fn search(&self, mut observer: Option<&mut dyn ProgressObserver>) -> SolveReport {
        let n = self.graph.vertex_count();
        let mut stats = SearchStats::default();

        if n < 2 {
            debug!("solver: skipping degenerate graph n={n}");
            return SolveReport {
                circuit: None,
                stats,
                termination: Termination::Degenerate,
            };
        }

        let now = Instant::now();
        debug!(
            "solver: start n={n} half_bound={} progress={}",
            self.half_bound, self.emit_progress
        );

        let mut tracker =
            (self.emit_progress || observer.is_some()).then(|| ProgressTracker::new(n));
        let mut state = SearchState::new(n);
        state.seed(self.graph);

        let mut termination = Termination::Exhausted;
        while state.depth() > 0 {
            if self.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }
            stats.steps += 1;
            if let Some(tracker) = tracker.as_mut() {
                self.report_progress(tracker, &mut observer);
            }

            if state.is_leaf() {
                stats.completed += 1;
                if let Some(tracker) = tracker.as_mut() {
                    tracker.credit(1);
                }
                if let Some(cost) = state.close_circuit(self.graph) {
                    stats.improvements += 1;
                    trace!("solver: improved cost={cost} step={}", stats.steps);
                }
                state.retract(self.graph);
                continue;
            }

            let Some(vertex) = state.next_candidate() else {
                stats.backtracks += 1;
                state.retract(self.graph);
                continue;
            };

            let tail = state.tail();
            let tentative = state.running_cost() + self.graph.cost(tail, vertex);
            if !self.graph.has_edge(tail, vertex)
                || state.is_bounded_out(tentative, self.half_bound)
            {
                let skipped = factorial(n - state.depth() - 1);
                stats.pruned += 1;
                stats.discarded_leaves = stats.discarded_leaves.saturating_add(skipped);
                if let Some(tracker) = tracker.as_mut() {
                    tracker.credit(skipped);
                }
                continue;
            }

            state.advance(vertex, tentative, self.graph);
        }

        if let Some(tracker) = tracker.as_mut() {
            self.report_progress(tracker, &mut observer);
        }

        let circuit = state
            .into_best()
            .map(|(vertices, cost)| Circuit { vertices, cost });

        match termination {
            Termination::Cancelled => warn!(
                "solver: cancelled after {:.2}s best={:?} {stats}",
                now.elapsed().as_secs_f32(),
                circuit.as_ref().map(Circuit::cost)
            ),
            _ => debug!(
                "solver: done in {:.2}s best={:?} {stats}",
                now.elapsed().as_secs_f32(),
                circuit.as_ref().map(Circuit::cost)
            ),
        }

        SolveReport {
            circuit,
            stats,
            termination,
        }
    }

    fn report_progress(
        &self,
        tracker: &mut ProgressTracker,
        observer: &mut Option<&mut dyn ProgressObserver>,
    ) {
        let Some(percent) = tracker.poll() else {
            return;
        };
        if self.emit_progress {
            info!("progress: {percent}%");
        }
        if let Some(observer) = observer.as_mut() {
            observer.on_progress(percent);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Shortest Hamiltonian circle through all vertices of `graph`, starting and
/// ending at vertex 0. `None` when the graph has fewer than two vertices or
/// no circuit exists.
pub fn solve(graph: &WeightedGraph, emit_progress: bool) -> Option<Circuit> {
    CircleSolver::new(graph)
        .with_progress(emit_progress)
        .run()
        .circuit
}
