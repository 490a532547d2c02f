use crate::core::constants::{DIGIPIN_GRID, GRID_SIZE};
use crate::util::error::DigipinError;

/// Reverse of [`DIGIPIN_GRID`], indexed by ASCII code point.
const SYMBOL_LOOKUP: [Option<(u8, u8)>; 128] = build_lookup();

const fn build_lookup() -> [Option<(u8, u8)>; 128] {
    let mut table = [None; 128];
    let mut row = 0;
    while row < GRID_SIZE {
        let mut col = 0;
        while col < GRID_SIZE {
            table[DIGIPIN_GRID[row][col] as usize] = Some((row as u8, col as u8));
            col += 1;
        }
        row += 1;
    }
    table
}

/// Returns the symbol labelling grid cell `(row, col)`.
///
/// # Panics
///
/// Panics if `row` or `col` is not in `0..4`.
pub fn symbol_at(row: usize, col: usize) -> char {
    DIGIPIN_GRID[row][col]
}

/// Returns the `(row, col)` of `symbol`, or `None` if it is not in the alphabet.
pub fn lookup(symbol: char) -> Option<(usize, usize)> {
    if !symbol.is_ascii() {
        return None;
    }
    SYMBOL_LOOKUP[symbol as usize].map(|(row, col)| (row as usize, col as usize))
}

/// Returns the `(row, col)` of `symbol` in the grid.
///
/// # Errors
///
/// Returns [`DigipinError::InvalidSymbol`] (at position 0) if `symbol` is not in the alphabet.
pub fn locate(symbol: char) -> Result<(usize, usize), DigipinError> {
    lookup(symbol).ok_or(DigipinError::InvalidSymbol {
        symbol,
        position: 0,
    })
}

/// Returns true if `symbol` labels one of the 16 grid cells.
pub fn is_symbol(symbol: char) -> bool {
    lookup(symbol).is_some()
}

/// Iterates over the alphabet in row-major grid order.
pub fn symbols() -> impl Iterator<Item = char> {
    DIGIPIN_GRID.into_iter().flatten()
}
