use crate::graph::{Cost, UNSET, WeightedGraph};

/// One candidate queue per path slot, carved out of a single buffer that is
/// refilled in place every time the search enters a slot.
#[derive(Debug)]
pub(crate) struct CandidateArena {
    width: usize,
    slots: Vec<usize>,
    head: Vec<usize>,
    len: Vec<usize>,
}

impl CandidateArena {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            width,
            slots: vec![UNSET; width * width],
            head: vec![0; width],
            len: vec![0; width],
        }
    }

    /// Queues every unvisited vertex for `level`, nearest to `tail` first.
    /// Equal costs keep ascending vertex order.
    pub(crate) fn refill(
        &mut self,
        level: usize,
        tail: usize,
        visited: &[bool],
        graph: &WeightedGraph,
    ) -> usize {
        let start = level * self.width;
        let mut count = 0;
        for (vertex, _) in visited.iter().enumerate().filter(|(_, seen)| !**seen) {
            self.slots[start + count] = vertex;
            count += 1;
        }
        self.slots[start..start + count].sort_unstable_by_key(|&v| (graph.cost(tail, v), v));
        self.head[level] = 0;
        self.len[level] = count;
        count
    }

    pub(crate) fn pop(&mut self, level: usize) -> Option<usize> {
        let head = self.head[level];
        if head >= self.len[level] {
            return None;
        }
        self.head[level] = head + 1;
        Some(self.slots[level * self.width + head])
    }
}

/// Mutable state of a single depth-first run rooted at vertex 0.
///
/// `path[..depth]` is the partial circuit, `visited` mirrors it and
/// `running_cost` is the sum of its edges.
#[derive(Debug)]
pub(crate) struct SearchState {
    n: usize,
    path: Vec<usize>,
    depth: usize,
    visited: Vec<bool>,
    running_cost: Cost,
    best_path: Vec<usize>,
    best_cost: Option<Cost>,
    candidates: CandidateArena,
}

impl SearchState {
    pub(crate) fn new(n: usize) -> Self {
        let mut path = vec![UNSET; n + 1];
        let mut visited = vec![false; n];
        path[0] = 0;
        visited[0] = true;

        Self {
            n,
            path,
            depth: 1,
            visited,
            running_cost: 0,
            best_path: vec![UNSET; n + 1],
            best_cost: None,
            candidates: CandidateArena::new(n),
        }
    }

    /// Queues the first level from the fixed start vertex.
    pub(crate) fn seed(&mut self, graph: &WeightedGraph) {
        self.refill_level(graph);
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.depth == self.n
    }

    pub(crate) fn tail(&self) -> usize {
        self.path[self.depth - 1]
    }

    pub(crate) fn running_cost(&self) -> Cost {
        self.running_cost
    }

    pub(crate) fn best_cost(&self) -> Option<Cost> {
        self.best_cost
    }

    pub(crate) fn next_candidate(&mut self) -> Option<usize> {
        self.candidates.pop(self.depth)
    }

    /// Whether extending the path to `tentative` cost can no longer beat the
    /// best circuit.
    ///
    /// The half bound relies on every circuit being enumerated in both
    /// directions; it is only valid on undirected graphs.
    pub(crate) fn is_bounded_out(&self, tentative: Cost, half_bound: bool) -> bool {
        let Some(best) = self.best_cost else {
            return false;
        };
        if tentative > best {
            return true;
        }
        half_bound && self.depth < self.n / 2 && tentative > best / 2
    }

    /// Commits `vertex` at the current slot and queues the next level.
    pub(crate) fn advance(&mut self, vertex: usize, tentative: Cost, graph: &WeightedGraph) {
        self.path[self.depth] = vertex;
        self.visited[vertex] = true;
        self.running_cost = tentative;
        self.depth += 1;
        if self.depth < self.n {
            self.refill_level(graph);
        }
    }

    /// Drops the vertex in the slot below `depth`, or finishes the search
    /// once the start vertex is reached.
    pub(crate) fn retract(&mut self, graph: &WeightedGraph) {
        self.depth -= 1;
        if self.depth == 0 {
            return;
        }
        let vertex = self.path[self.depth];
        let prev = self.path[self.depth - 1];
        self.running_cost -= graph.cost(prev, vertex);
        self.visited[vertex] = false;
        self.path[self.depth] = UNSET;
    }

    /// Closes a complete Hamiltonian path back to vertex 0. Returns the
    /// circuit cost when it strictly improves on the best one.
    pub(crate) fn close_circuit(&mut self, graph: &WeightedGraph) -> Option<Cost> {
        let tail = self.tail();
        if !graph.has_edge(tail, 0) {
            return None;
        }
        let closed = self.running_cost + graph.cost(tail, 0);
        if self.best_cost.is_some_and(|best| closed >= best) {
            return None;
        }
        self.best_cost = Some(closed);
        self.best_path[..self.n].copy_from_slice(&self.path[..self.n]);
        self.best_path[self.n] = 0;
        Some(closed)
    }

    pub(crate) fn into_best(self) -> Option<(Vec<usize>, Cost)> {
        self.best_cost.map(|cost| (self.best_path, cost))
    }

    fn refill_level(&mut self, graph: &WeightedGraph) {
        let tail = self.tail();
        let queued = self
            .candidates
            .refill(self.depth, tail, &self.visited, graph);
        let expected = self.n - self.depth;
        assert!(
            queued == expected,
            "candidate invariant violated: slot {} queued {queued} vertices, expected {expected}",
            self.depth
        );
    }
}
