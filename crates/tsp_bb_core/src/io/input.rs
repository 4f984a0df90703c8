use std::{fs, io::Read, path::Path};

use log::debug;

use crate::{Error, Location, Result};

/// Fields per record: id, name, street, house number, postal code, city,
/// latitude, longitude.
const RECORD_FIELDS: usize = 8;

/// Reads locations from `path`, or from stdin when no path is given.
pub fn read_locations(path: Option<&Path>, delimiter: char) -> Result<Vec<Location>> {
    let input = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::invalid_input(format!(
                "failed to read location file {}: {e}",
                path.display()
            ))
        })?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    parse_locations(&input, delimiter)
}

/// Parses delimited location records.
///
/// Only lines starting with an ASCII digit are records; headers, comments and
/// blank lines are skipped.
pub fn parse_locations(input: &str, delimiter: char) -> Result<Vec<Location>> {
    let mut locations = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        if fields.len() < RECORD_FIELDS {
            return Err(Error::invalid_input(format!(
                "Line {line_no}: expected {RECORD_FIELDS} fields separated by '{delimiter}' but got {}",
                fields.len()
            )));
        }

        let id: u32 = fields[0].parse().map_err(|_| {
            Error::invalid_input(format!("Line {line_no}: invalid id: {}", fields[0]))
        })?;
        let lat: f64 = fields[6].parse().map_err(|_| {
            Error::invalid_input(format!("Line {line_no}: invalid latitude: {}", fields[6]))
        })?;
        let lng: f64 = fields[7].parse().map_err(|_| {
            Error::invalid_input(format!("Line {line_no}: invalid longitude: {}", fields[7]))
        })?;

        let location = Location {
            id,
            name: fields[1].to_string(),
            street: fields[2].to_string(),
            house_number: fields[3].to_string(),
            postal_code: fields[4].to_string(),
            city: fields[5].to_string(),
            lat,
            lng,
        };
        if !location.is_valid() {
            return Err(Error::invalid_input(format!(
                "Line {line_no}: coordinates out of range: {lat},{lng}"
            )));
        }
        locations.push(location);
    }

    if locations.is_empty() {
        return Err(Error::invalid_input("No location records found."));
    }

    debug!("input: parsed {} locations", locations.len());
    Ok(locations)
}
