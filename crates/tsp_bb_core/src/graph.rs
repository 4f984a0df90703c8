//! Validated, immutable cost matrix for an undirected graph.

use crate::{Error, Result};

/// Edge weight and accumulated path length.
pub type Cost = u64;

/// Marks a path slot that has not been filled yet.
pub const UNSET: usize = usize::MAX;

/// Symmetric `n x n` cost matrix with optional per-vertex labels.
///
/// An off-diagonal cost of `0` means the two vertices are not connected.
/// Diagonal entries are never read by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedGraph {
    size: usize,
    costs: Vec<Cost>,
    labels: Option<Vec<String>>,
}

impl WeightedGraph {
    /// Builds a graph without labels; [`alias`](Self::alias) returns `None`.
    pub fn new(matrix: Vec<Vec<Cost>>) -> Result<Self> {
        Self::build(matrix, None)
    }

    /// Builds a graph with one label per vertex.
    pub fn with_labels<I, S>(matrix: Vec<Vec<Cost>>, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != matrix.len() {
            return Err(Error::invalid_argument(format!(
                "expected {} vertex labels but got {}",
                matrix.len(),
                labels.len()
            )));
        }
        Self::build(matrix, Some(labels))
    }

    fn build(matrix: Vec<Vec<Cost>>, labels: Option<Vec<String>>) -> Result<Self> {
        let size = matrix.len();
        let mut costs = Vec::with_capacity(size * size);

        for (i, row) in matrix.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::invalid_argument(format!(
                    "matrix must be square: row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            costs.extend(row);
        }

        for i in 0..size {
            for j in (i + 1)..size {
                let (a, b) = (costs[i * size + j], costs[j * size + i]);
                if a != b {
                    return Err(Error::invalid_argument(format!(
                        "matrix must be symmetric: cost[{i}][{j}]={a} but cost[{j}][{i}]={b}"
                    )));
                }
            }
        }

        // A circuit sums `size` edges, so every partial and closing sum of
        // the search is at most `size * max_cost`.
        let max_cost = costs
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx % (size + 1) != 0)
            .map(|(_, &cost)| cost)
            .max()
            .unwrap_or(0);
        if max_cost.checked_mul(size as Cost).is_none() {
            return Err(Error::invalid_argument(format!(
                "costs too large: {size} edges of cost {max_cost} overflow a circuit length"
            )));
        }

        Ok(Self {
            size,
            costs,
            labels,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.size
    }

    pub fn edge_cost(&self, i: usize, j: usize) -> Result<Cost> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.cost(i, j))
    }

    /// Whether two distinct vertices are joined by an edge.
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        i != j && i < self.size && j < self.size && self.cost(i, j) != 0
    }

    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    pub fn alias(&self, vertex: usize) -> Result<Option<&str>> {
        self.check_index(vertex)?;
        Ok(self
            .labels
            .as_ref()
            .map(|labels| labels[vertex].as_str()))
    }

    /// Labels for every vertex of `path`, or `None` for an unlabeled graph.
    pub fn aliases(&self, path: &[usize]) -> Result<Option<Vec<&str>>> {
        let Some(labels) = &self.labels else {
            return Ok(None);
        };
        path.iter()
            .map(|&v| {
                self.check_index(v)?;
                Ok(labels[v].as_str())
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Sums the edges between consecutive vertices of `path`, stopping at
    /// the first [`UNSET`] slot.
    pub fn path_cost(&self, path: &[usize]) -> Result<Cost> {
        let filled = path.iter().take_while(|&&v| v != UNSET).count();
        let path = &path[..filled];
        if path.len() < 2 {
            return Ok(0);
        }

        path.windows(2).try_fold(0, |total: Cost, pair| {
            let edge = self.edge_cost(pair[0], pair[1])?;
            total.checked_add(edge).ok_or_else(|| {
                Error::invalid_argument(format!("path cost overflows {}", Cost::MAX))
            })
        })
    }

    /// Unchecked lookup for the search loop; callers keep indices in range.
    #[inline]
    pub(crate) fn cost(&self, i: usize, j: usize) -> Cost {
        self.costs[i * self.size + j]
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.size {
            Ok(())
        } else {
            Err(Error::index_out_of_range(index, self.size))
        }
    }
}
