/// Symbol grid, row 0 is the northernmost band and column 0 the westernmost.
pub const DIGIPIN_GRID: [[char; 4]; 4] = [
    ['F', 'C', '9', '8'],
    ['J', '3', '2', '7'],
    ['K', '4', '5', '6'],
    ['L', 'M', 'P', 'T'],
];

/// Number of rows and columns the grid splits a box into at each level.
pub const GRID_SIZE: usize = 4;

/// Supported region [south, north, west, east] in degrees.
pub const REGION_EXTENTS: [f64; 4] = [2.5, 38.5, 63.5, 99.5];

/// Number of symbols in a code, i.e. the number of subdivision levels.
pub const CODE_LENGTH: usize = 10;

/// Cosmetic separator used in the display form.
pub const SEPARATOR: char = '-';

/// Number of symbols after which a separator is inserted in the display form.
pub const SEPARATOR_POSITIONS: [usize; 2] = [3, 6];
