use crate::core::constants::CODE_LENGTH;

/// Error type for digipin-rs operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DigipinError {
    /// The coordinate lies outside the supported region.
    OutOfBounds { latitude: f64, longitude: f64 },
    /// The normalised code does not have the expected number of symbols.
    InvalidFormat { length: usize },
    /// A character in the normalised code is not part of the alphabet.
    InvalidSymbol { symbol: char, position: usize },
    /// Bounding box values are non-finite or inverted.
    InvalidBounds(String),
    /// The coordinate is inside the supported region but outside the geofence.
    OutsideRegion { latitude: f64, longitude: f64 },
    /// File I/O or serialization error.
    IoError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
}

impl std::fmt::Display for DigipinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigipinError::OutOfBounds {
                latitude,
                longitude,
            } => write!(
                f,
                "Coordinate ({}, {}) is outside the supported region",
                latitude, longitude
            ),
            DigipinError::InvalidFormat { length } => write!(
                f,
                "Invalid DIGIPIN: expected {} symbols, found {}",
                CODE_LENGTH, length
            ),
            DigipinError::InvalidSymbol { symbol, position } => write!(
                f,
                "Invalid character '{}' in DIGIPIN at position {}",
                symbol, position
            ),
            DigipinError::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
            DigipinError::OutsideRegion {
                latitude,
                longitude,
            } => write!(
                f,
                "Coordinate ({}, {}) is outside the service region",
                latitude, longitude
            ),
            DigipinError::IoError(msg) => write!(f, "IO error: {}", msg),
            DigipinError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            DigipinError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
        }
    }
}

impl std::error::Error for DigipinError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DigipinError::InvalidSymbol {
            symbol: 'A',
            position: 4,
        };
        assert_eq!(
            err.to_string(),
            "Invalid character 'A' in DIGIPIN at position 4"
        );

        let err = DigipinError::InvalidFormat { length: 2 };
        assert!(err.to_string().contains("found 2"));
    }
}
