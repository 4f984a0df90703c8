use std::fmt;

use crate::{Circuit, Result, WeightedGraph, graph::Cost, utils::format_meters};

/// A solved circuit rendered with vertex labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub stops: Vec<String>,
    pub cost: Cost,
}

impl Route {
    /// Uses the graph's labels, or vertex indices when it has none.
    pub fn from_circuit(graph: &WeightedGraph, circuit: &Circuit) -> Result<Self> {
        let stops = match graph.aliases(circuit.vertices())? {
            Some(names) => names.into_iter().map(str::to_owned).collect(),
            None => circuit.vertices().iter().map(usize::to_string).collect(),
        };
        Ok(Self {
            stops,
            cost: circuit.cost(),
        })
    }

    pub fn length_label(&self) -> String {
        format!("{} meters", format_meters(self.cost))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stops.join(" --> "))
    }
}

#[cfg(test)]
mod tests {
    use super::Route;
    use crate::{WeightedGraph, solve};

    fn matrix() -> Vec<Vec<u64>> {
        vec![
            vec![0, 1_200, 2_500],
            vec![1_200, 0, 1_800],
            vec![2_500, 1_800, 0],
        ]
    }

    #[test]
    fn from_circuit_uses_labels() {
        let graph =
            WeightedGraph::with_labels(matrix(), ["Depot", "Mill", "Harbor"]).expect("valid graph");
        let circuit = solve(&graph, false).expect("triangle has a circuit");
        let route = Route::from_circuit(&graph, &circuit).expect("labels resolve");

        assert_eq!(route.to_string(), "Depot --> Mill --> Harbor --> Depot");
        assert_eq!(route.cost, 5_500);
        assert_eq!(route.length_label(), "5.500 meters");
    }

    #[test]
    fn from_circuit_falls_back_to_indices() {
        let graph = WeightedGraph::new(matrix()).expect("valid graph");
        let circuit = solve(&graph, false).expect("triangle has a circuit");
        let route = Route::from_circuit(&graph, &circuit).expect("indices resolve");

        assert_eq!(route.stops, vec!["0", "1", "2", "0"]);
    }
}
