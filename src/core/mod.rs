pub mod alphabet;
pub mod bounds;
pub mod codec;
pub mod constants;

pub use alphabet::{is_symbol, locate, symbol_at, symbols};
pub use bounds::{BoundingBox, REGION};
pub use codec::{decode, decode_bounds, encode};
pub use constants::{CODE_LENGTH, DIGIPIN_GRID, GRID_SIZE, REGION_EXTENTS, SEPARATOR};
