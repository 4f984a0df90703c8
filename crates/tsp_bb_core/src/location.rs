use std::fmt;

/// Mean earth radius in meters used for great-circle distances.
const R: f64 = 6_371_000.785;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A site read from the location file. Coordinates are degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(id: u32, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            street: String::new(),
            house_number: String::new(),
            postal_code: String::new(),
            city: String::new(),
            lat,
            lng,
        }
    }

    /// Haversine distance in meters.
    pub fn dist(&self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), rhs.lat.to_radians());
        let dlat = (rhs.lat - self.lat).to_radians();
        let dlng = (rhs.lng - self.lng).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlng / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * R * h.sqrt().asin()
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lng)
    }

    /// Street, house number, postal code and city, skipping empty parts.
    pub fn address(&self) -> String {
        let street = [self.street.as_str(), self.house_number.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        let town = [self.postal_code.as_str(), self.city.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        [street, town]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(
            f,
            "{} {} ({},{})",
            self.id,
            self.name,
            b1.format(self.lat),
            b2.format(self.lng)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn valid_bounds_are_accepted() {
        assert!(Location::new(1, "a", -90.0, -180.0).is_valid());
        assert!(Location::new(2, "b", 90.0, 180.0).is_valid());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(!Location::new(1, "a", 91.0, 0.0).is_valid());
        assert!(!Location::new(1, "a", 0.0, 181.0).is_valid());
        assert!(!Location::new(1, "a", f64::NAN, 0.0).is_valid());
        assert!(!Location::new(1, "a", 0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn dist_is_symmetric_and_zero_for_same_point() {
        let a = Location::new(1, "Berlin", 52.5200, 13.4050);
        let b = Location::new(2, "Hamburg", 53.5511, 9.9937);

        let dab = a.dist(&b);
        let dba = b.dist(&a);

        assert!((dab - dba).abs() < 1e-6);
        assert!(a.dist(&a).abs() < 1e-12);
        // Berlin to Hamburg is roughly 255 km.
        assert!((250_000.0..260_000.0).contains(&dab));
    }

    #[test]
    fn address_skips_empty_parts() {
        let mut loc = Location::new(7, "Depot", 1.0, 2.0);
        assert_eq!(loc.address(), "");

        loc.street = "Main Street".into();
        loc.house_number = "5".into();
        loc.city = "Springfield".into();
        assert_eq!(loc.address(), "Main Street 5, Springfield");
    }

    #[test]
    fn display_shows_id_name_and_coordinates() {
        let loc = Location::new(3, "Depot", 1.5, -2.25);
        assert_eq!(loc.to_string(), "3 Depot (1.5,-2.25)");
    }
}
