//! Exact minimum-cost Hamiltonian circles by depth-first branch and bound.
//! Geographic locations are turned into a whole-meter distance graph and
//! searched exhaustively with nearest-first ordering and two cost bounds.

mod algo;
mod error;
mod geo;
mod graph;
mod io;
mod location;
pub mod logging;
mod route;
mod runner;
pub mod utils;

pub(crate) use geo::matrix;
pub(crate) use io::{input, options};

pub use algo::circle::{CircleSolver, Circuit, SearchStats, SolveReport, Termination, solve};
pub use algo::progress::ProgressObserver;
pub use error::{Error, Result};
pub use geo::matrix::distance_matrix;
pub use graph::{Cost, UNSET, WeightedGraph};
pub use io::input::{parse_locations, read_locations};
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use location::Location;
pub use route::Route;
pub use runner::{RunReport, run, write_output};
