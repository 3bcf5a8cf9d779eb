//! Integer tile grids stored as comma-separated rows

use std::path::Path;

use crate::error::AssetError;

/// A rectangular grid of tile ids. Row 0 is the top row.
///
/// The column count is taken from the first row; shorter rows read as 0 past
/// their end and longer rows are truncated on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tilemap {
    rows: Vec<Vec<i32>>,
    cols: usize,
}

impl Tilemap {
    /// Parse CSV text. Blank lines are skipped; cells that do not start with
    /// an integer read as 0.
    pub fn parse(text: &str) -> Self {
        let rows: Vec<Vec<i32>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(',').map(parse_cell).collect())
            .collect();
        let cols = rows.first().map_or(0, Vec::len);
        Self { rows, cols }
    }

    /// Read and parse a CSV file. A missing or empty file is an error.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
        if text.trim().is_empty() {
            return Err(AssetError::Empty(path.to_path_buf()));
        }
        Ok(Self::parse(&text))
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile at (row, col); anything out of range reads as 0.
    pub fn get(&self, row: i32, col: i32) -> i32 {
        if row < 0 || col < 0 || col as usize >= self.cols {
            return 0;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Every non-zero cell as `(row, col, tile)`, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .take(self.cols)
                .enumerate()
                .filter(|(_, &tile)| tile != 0)
                .map(move |(c, &tile)| (r, c, tile))
        })
    }
}

/// Leading optional sign and digits; everything after is ignored.
fn parse_cell(cell: &str) -> i32 {
    let cell = cell.trim();
    let (negative, digits) = match cell.as_bytes().first() {
        Some(b'-') => (true, &cell[1..]),
        Some(b'+') => (false, &cell[1..]),
        _ => (false, cell),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i32>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grid() {
        let map = Tilemap::parse("0,1,0\n\n2, 3 ,4\n");
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cols(), 3);
        assert_eq!(map.get(0, 1), 1);
        assert_eq!(map.get(1, 1), 3);
    }

    #[test]
    fn out_of_range_reads_zero() {
        let map = Tilemap::parse("5,6\n7");
        assert_eq!(map.get(-1, 0), 0);
        assert_eq!(map.get(0, 2), 0);
        assert_eq!(map.get(2, 0), 0);
        assert_eq!(map.get(1, 1), 0);
        assert_eq!(map.get(1, 0), 7);
    }

    #[test]
    fn lenient_cells() {
        let map = Tilemap::parse("x,12abc,-3,+4,");
        assert_eq!(
            (0..5).map(|c| map.get(0, c)).collect::<Vec<_>>(),
            vec![0, 12, -3, 4, 0]
        );
    }

    #[test]
    fn occupied_cells() {
        let map = Tilemap::parse("0,1\n2,0");
        let cells: Vec<_> = map.occupied().collect();
        assert_eq!(cells, vec![(0, 1, 1), (1, 0, 2)]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Tilemap::load(Path::new("/nonexistent/level.csv")).is_err());
    }
}
