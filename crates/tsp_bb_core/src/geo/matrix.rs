use log::{debug, warn};
use rayon::prelude::*;

use crate::{Error, Location, Result, graph::Cost};

/// Whole-meter haversine distances between every pair of locations.
///
/// Only the upper triangle is computed; it is mirrored so the result is
/// exactly symmetric. Distinct locations that round down to 0 m are stored
/// as 1 m, since a zero cost means "no edge" to the solver.
pub fn distance_matrix(locations: &[Location]) -> Result<Vec<Vec<Cost>>> {
    if let Some(bad) = locations.iter().find(|loc| !loc.is_valid()) {
        return Err(Error::invalid_data(format!(
            "location {} has invalid coordinates lat={} lng={}",
            bad.id, bad.lat, bad.lng
        )));
    }

    let n = locations.len();
    let upper = (0..n)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| meters(&locations[i], &locations[j]))
                .collect::<Result<Vec<Cost>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = vec![vec![0; n]; n];
    for (i, row) in upper.into_iter().enumerate() {
        for (offset, cost) in row.into_iter().enumerate() {
            let j = i + 1 + offset;
            rows[i][j] = cost;
            rows[j][i] = cost;
        }
    }

    debug!("matrix: built n={n} entries={}", n * n);
    Ok(rows)
}

fn meters(a: &Location, b: &Location) -> Result<Cost> {
    let distance = a.dist(b);
    if !distance.is_finite() {
        return Err(Error::invalid_data(format!(
            "distance between locations {} and {} is not a real number",
            a.id, b.id
        )));
    }

    let whole = distance as Cost;
    if whole == 0 {
        warn!(
            "matrix: locations {} and {} are less than 1 m apart; using 1 m",
            a.id, b.id
        );
        return Ok(1);
    }
    Ok(whole)
}
