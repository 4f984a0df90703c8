use std::{
    fs,
    io::Write,
    path::Path,
    sync::{Arc, atomic::AtomicBool},
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::{
    CircleSolver, Error, Result, Route, SearchStats, SolverOptions, Termination, WeightedGraph,
    input::read_locations, matrix::distance_matrix,
};

/// Outcome of one CLI run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub locations: usize,
    pub route: Option<Route>,
    pub stats: SearchStats,
    pub termination: Termination,
    pub elapsed: Duration,
}

impl RunReport {
    /// Human-readable summary printed by the binary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match (&self.route, self.termination) {
            (Some(route), Termination::Cancelled) => {
                out.push_str("Search cancelled; best circle found so far:\n");
                push_route(&mut out, route);
            }
            (Some(route), _) => {
                out.push_str("Shortest Hamilton circle has been found and is:\n");
                push_route(&mut out, route);
            }
            (None, Termination::Cancelled) => {
                out.push_str("Search cancelled before any circle was found.\n");
            }
            (None, Termination::Degenerate) => {
                out.push_str("At least two locations are needed to form a circle.\n");
            }
            (None, Termination::Exhausted) => {
                out.push_str(
                    "The graph is not hamiltonian, therefore no hamiltonian circle could be found.\n",
                );
            }
        }
        out
    }
}

fn push_route(out: &mut String, route: &Route) {
    out.push_str(&route.to_string());
    out.push('\n');
    out.push_str("With Length: ");
    out.push_str(&route.length_label());
    out.push('\n');
}

/// Reads locations, builds the distance graph and solves it exactly.
pub fn run(options: &SolverOptions, cancel: Arc<AtomicBool>) -> Result<RunReport> {
    let locations = read_locations(options.input_path(), options.delimiter)?;
    let n = locations.len();
    info!("input: locations={n}");
    for location in &locations {
        debug!("input: {location} address={:?}", location.address());
    }
    if n > options.warn_above {
        warn!("input: {n} locations; exact search explores up to ({n}-1)! circles and may take very long");
    }

    let matrix = distance_matrix(&locations)?;
    let graph = WeightedGraph::with_labels(matrix, locations.iter().map(|loc| loc.name.clone()))?;

    let now = Instant::now();
    let report = CircleSolver::new(&graph)
        .with_progress(options.progress)
        .with_half_bound(options.half_bound)
        .with_cancel_flag(cancel)
        .run();
    let elapsed = now.elapsed();

    let route = report
        .circuit
        .as_ref()
        .map(|circuit| Route::from_circuit(&graph, circuit))
        .transpose()?;

    info!(
        "output: n={n} cost={:?} time={:.2}s {}",
        route.as_ref().map(|r| r.cost),
        elapsed.as_secs_f32(),
        report.stats
    );

    Ok(RunReport {
        locations: n,
        route,
        stats: report.stats,
        termination: report.termination,
        elapsed,
    })
}

/// Writes `text` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text).map_err(|e| {
            Error::other(format!(
                "failed to write output file {}: {e}",
                path.display()
            ))
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use super::{RunReport, run, write_output};
    use crate::{Route, SearchStats, SolverOptions, Termination};

    const LOCATIONS: &str = "\
ID,Name,Street,No,PLZ,City,Lat,Lng
1,Berlin,Unter den Linden,1,10117,Berlin,52.5170,13.3889
2,Hamburg,Rathausmarkt,1,20095,Hamburg,53.5503,9.9920
3,Munich,Marienplatz,8,80331,Muenchen,48.1374,11.5755
4,Cologne,Domkloster,4,50667,Koeln,50.9413,6.9583
5,Frankfurt,Roemerberg,27,60311,Frankfurt,50.1106,8.6820
";

    fn options_for(file: &tempfile::NamedTempFile) -> SolverOptions {
        SolverOptions {
            input: file.path().display().to_string(),
            progress: false,
            ..SolverOptions::default()
        }
    }

    fn location_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(LOCATIONS.as_bytes()).expect("write locations");
        file
    }

    #[test]
    fn run_solves_location_file() {
        let file = location_file();
        let report = run(&options_for(&file), Arc::new(AtomicBool::new(false))).expect("run");

        assert_eq!(report.locations, 5);
        assert_eq!(report.termination, Termination::Exhausted);
        let route = report.route.as_ref().expect("complete graph has a circle");
        assert_eq!(route.stops.len(), 6);
        assert_eq!(route.stops.first(), Some(&"Berlin".to_string()));
        assert_eq!(route.stops.last(), Some(&"Berlin".to_string()));
        assert!(report.render().contains("With Length: "));
    }

    #[test]
    fn half_bound_toggle_keeps_route_length() {
        let file = location_file();
        let with = run(&options_for(&file), Arc::new(AtomicBool::new(false))).expect("run");
        let options = SolverOptions {
            half_bound: false,
            ..options_for(&file)
        };
        let without = run(&options, Arc::new(AtomicBool::new(false))).expect("run");

        assert_eq!(
            with.route.map(|r| r.cost),
            without.route.map(|r| r.cost)
        );
    }

    #[test]
    fn run_honours_cancel_flag() {
        let file = location_file();
        let cancel = Arc::new(AtomicBool::new(false));
        cancel.store(true, Ordering::Relaxed);
        let report = run(&options_for(&file), cancel).expect("run");

        assert_eq!(report.termination, Termination::Cancelled);
        assert!(report.route.is_none());
        assert!(report.render().contains("Search cancelled"));
    }

    #[test]
    fn run_reports_missing_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let options = SolverOptions {
            input: dir.path().join("nope.csv").display().to_string(),
            ..SolverOptions::default()
        };
        let err = run(&options, Arc::new(AtomicBool::new(false))).expect_err("missing file");
        assert!(err.to_string().contains("failed to read location file"));
    }

    #[test]
    fn render_explains_missing_circle() {
        let report = RunReport {
            locations: 1,
            route: None,
            stats: SearchStats::default(),
            termination: Termination::Degenerate,
            elapsed: Duration::ZERO,
        };
        assert!(report.render().contains("At least two locations"));

        let report = RunReport {
            termination: Termination::Exhausted,
            ..report
        };
        assert!(report.render().contains("not hamiltonian"));
    }

    #[test]
    fn render_prints_route_and_grouped_length() {
        let report = RunReport {
            locations: 2,
            route: Some(Route {
                stops: vec!["A".into(), "B".into(), "A".into()],
                cost: 1_234_567,
            }),
            stats: SearchStats::default(),
            termination: Termination::Exhausted,
            elapsed: Duration::ZERO,
        };
        assert_eq!(
            report.render(),
            "Shortest Hamilton circle has been found and is:\nA --> B --> A\nWith Length: 1.234.567 meters\n"
        );
    }

    #[test]
    fn write_output_writes_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("route.txt");
        write_output(Some(&path), "A --> A\n").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "A --> A\n");
    }
}
