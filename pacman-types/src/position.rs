use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A cell on the board. Row 0 is the top row, column 0 the left-most column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    #[allow(missing_docs)]
    pub row: i32,
    #[allow(missing_docs)]
    pub col: i32,
}

impl Position {
    #[allow(missing_docs)]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Grid distance to `other`, moving only along rows and columns
    pub fn dist_from(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// The position one step away in the direction of `action`
    pub fn add_vec(&self, action: Action) -> Position {
        let (d_row, d_col) = action.to_vector();

        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Manhattan distance between two positions.
///
/// Movement is 4-connected, so this is a lower bound on the length of any path
/// between the two cells.
pub fn manhattan_distance(a: &Position, b: &Position) -> f64 {
    a.dist_from(b) as f64
}

/// Something an agent can do on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[allow(missing_docs)]
    North,
    #[allow(missing_docs)]
    East,
    #[allow(missing_docs)]
    South,
    #[allow(missing_docs)]
    West,
    /// Stay in place
    Stop,
}

impl Action {
    /// The four moving actions, in the order neighbors are generated
    pub const fn all_moves() -> [Action; 4] {
        [Action::North, Action::East, Action::South, Action::West]
    }

    /// `(row, col)` offset of this action
    pub const fn to_vector(self) -> (i32, i32) {
        match self {
            Action::North => (-1, 0),
            Action::East => (0, 1),
            Action::South => (1, 0),
            Action::West => (0, -1),
            Action::Stop => (0, 0),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::North => "north",
            Action::East => "east",
            Action::South => "south",
            Action::West => "west",
            Action::Stop => "stop",
        };

        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist_from() {
        assert_eq!(Position::new(1, 1).dist_from(&Position::new(2, 2)), 2);
        assert_eq!(Position::new(4, 1).dist_from(&Position::new(1, 5)), 7);
    }

    #[test]
    fn test_manhattan_distance_is_symmetric() {
        let a = Position::new(3, 9);
        let b = Position::new(7, 2);

        assert_eq!(manhattan_distance(&a, &b), 11.0);
        assert_eq!(manhattan_distance(&a, &b), manhattan_distance(&b, &a));
    }

    #[test]
    fn test_add_vec() {
        let p = Position::new(2, 2);

        assert_eq!(p.add_vec(Action::North), Position::new(1, 2));
        assert_eq!(p.add_vec(Action::East), Position::new(2, 3));
        assert_eq!(p.add_vec(Action::South), Position::new(3, 2));
        assert_eq!(p.add_vec(Action::West), Position::new(2, 1));
        assert_eq!(p.add_vec(Action::Stop), p);
    }
}
