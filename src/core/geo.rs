use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// The `[lng, lat]` pair order used by the renderer
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Both corners are valid coordinates and south-west lies below and left of north-east
    pub fn is_valid(&self) -> bool {
        self.south_west.is_valid()
            && self.north_east.is_valid()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }

    /// `[[west, south], [east, north]]`, the form accepted by the renderer's `bounds` option
    pub fn to_lng_lat_pairs(&self) -> [[f64; 2]; 2] {
        [self.south_west.to_lng_lat(), self.north_east.to_lng_lat()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_validity() {
        assert!(LatLng::new(45.0, -100.0).is_valid());
        assert!(!LatLng::new(95.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_renderer_pair_order() {
        let bounds = LatLngBounds::from_coords(15.0, -170.0, 75.0, -40.0);
        assert!(bounds.is_valid());
        assert_eq!(bounds.to_lng_lat_pairs(), [[-170.0, 15.0], [-40.0, 75.0]]);
    }

    #[test]
    fn test_inverted_bounds_invalid() {
        let bounds = LatLngBounds::from_coords(75.0, -40.0, 15.0, -170.0);
        assert!(!bounds.is_valid());
    }
}
