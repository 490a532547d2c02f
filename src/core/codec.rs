use crate::core::alphabet::{lookup, symbol_at};
use crate::core::bounds::{BoundingBox, REGION};
use crate::core::constants::CODE_LENGTH;
use crate::util::code::Digipin;
use crate::util::coord::LatLng;
use crate::util::error::DigipinError;

/// Encodes a coordinate into a DIGIPIN.
///
/// Fails with [`DigipinError::OutOfBounds`] if the coordinate (or either
/// value being NaN) falls outside the supported region. The region's edges
/// are included.
///
/// # Example
/// ```
/// use digipin_rs::encode;
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let code = encode(28.622788, 77.213033)?;
/// assert_eq!(code.to_string(), "39J-49L-L8T4");
/// # Ok(())
/// # }
/// ```
pub fn encode(latitude: f64, longitude: f64) -> Result<Digipin, DigipinError> {
    if !REGION.contains(latitude, longitude) {
        return Err(DigipinError::OutOfBounds {
            latitude,
            longitude,
        });
    }

    let mut bbox = REGION;
    let mut symbols = String::with_capacity(CODE_LENGTH);

    for _ in 0..CODE_LENGTH {
        let (row, col) = bbox.locate_child(latitude, longitude);
        symbols.push(symbol_at(row, col));
        bbox = bbox.child_box(row, col);
    }

    Ok(Digipin::from_symbols(symbols))
}

/// Decodes a DIGIPIN into the center of its cell.
///
/// Separators and whitespace are ignored. Fails with
/// [`DigipinError::InvalidFormat`] if the remaining code is not exactly
/// [`CODE_LENGTH`] characters, or [`DigipinError::InvalidSymbol`] for the
/// first character outside the alphabet.
///
/// # Example
/// ```
/// use digipin_rs::decode;
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let ll = decode("39J-49L-L8T4")?;
/// assert!((ll.latitude - 28.622788).abs() < 1e-4);
/// assert!((ll.longitude - 77.213033).abs() < 1e-4);
/// # Ok(())
/// # }
/// ```
pub fn decode(code: &str) -> Result<LatLng, DigipinError> {
    let bbox = decode_bounds(code)?;
    Ok(LatLng::from(bbox.center()))
}

/// Decodes a DIGIPIN into the bounds of its cell.
///
/// The half-extents of the returned box are the largest possible error of
/// [`decode`] relative to any coordinate that encodes to this code.
pub fn decode_bounds(code: &str) -> Result<BoundingBox, DigipinError> {
    let digipin: Digipin = code.parse()?;
    Ok(cell_bounds(&digipin))
}

/// Replays the subdivisions of an already validated code.
pub(crate) fn cell_bounds(digipin: &Digipin) -> BoundingBox {
    digipin
        .symbols()
        .filter_map(lookup)
        .fold(REGION, |bbox, (row, col)| bbox.child_box(row, col))
}
