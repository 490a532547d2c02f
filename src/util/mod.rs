pub mod code;
pub mod coord;
pub mod error;

pub use code::{Digipin, EncodeResponse, format_code, normalize};
pub use coord::{Coordinate, LatLng};
pub use error::DigipinError;
