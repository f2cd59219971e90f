use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Action, Position};

/// Static things that can sit on a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Marker {
    #[allow(missing_docs)]
    Wall,
    /// Food, eaten by pacman for points
    Pellet,
    /// Power capsule, scares every ghost when eaten
    Capsule,
}

/// The maze: its size and where the walls, pellets and capsules are.
///
/// Anything outside the board counts as a wall.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    height: i32,
    width: i32,
    walls: BTreeSet<Position>,
    pellets: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
}

impl Board {
    /// An empty board of the given size
    pub fn new(height: i32, width: i32) -> Self {
        Self {
            height,
            width,
            walls: BTreeSet::new(),
            pellets: BTreeSet::new(),
            capsules: BTreeSet::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn in_bounds(&self, position: &Position) -> bool {
        position.row >= 0
            && position.row < self.height
            && position.col >= 0
            && position.col < self.width
    }

    #[allow(missing_docs)]
    pub fn is_wall(&self, position: &Position) -> bool {
        !self.in_bounds(position) || self.walls.contains(position)
    }

    #[allow(missing_docs)]
    pub fn add_marker(&mut self, position: Position, marker: Marker) {
        self.markers_mut(marker).insert(position);
    }

    /// Returns whether the marker was present
    pub fn remove_marker(&mut self, position: &Position, marker: Marker) -> bool {
        self.markers_mut(marker).remove(position)
    }

    /// All the markers at the given position
    pub fn get(&self, position: &Position) -> BTreeSet<Marker> {
        [Marker::Wall, Marker::Pellet, Marker::Capsule]
            .into_iter()
            .filter(|marker| self.get_marker_positions(*marker).contains(position))
            .collect()
    }

    /// Every position holding the given marker
    pub fn get_marker_positions(&self, marker: Marker) -> &BTreeSet<Position> {
        match marker {
            Marker::Wall => &self.walls,
            Marker::Pellet => &self.pellets,
            Marker::Capsule => &self.capsules,
        }
    }

    /// The passable cells next to `position`, with the action that reaches each one
    pub fn get_neighbors(&self, position: &Position) -> Vec<(Action, Position)> {
        Action::all_moves()
            .into_iter()
            .map(|action| (action, position.add_vec(action)))
            .filter(|(_, neighbor)| !self.is_wall(neighbor))
            .collect()
    }

    /// The four corners of the board pulled `offset` cells inwards, ordered
    /// north-west, north-east, south-west, south-east.
    ///
    /// Boards are surrounded by walls, so `get_corners(1)` gives the playable corners.
    pub fn get_corners(&self, offset: i32) -> [Position; 4] {
        let top = offset;
        let bottom = self.height - 1 - offset;
        let left = offset;
        let right = self.width - 1 - offset;

        [
            Position::new(top, left),
            Position::new(top, right),
            Position::new(bottom, left),
            Position::new(bottom, right),
        ]
    }

    fn markers_mut(&mut self, marker: Marker) -> &mut BTreeSet<Position> {
        match marker {
            Marker::Wall => &mut self.walls,
            Marker::Pellet => &mut self.pellets,
            Marker::Capsule => &mut self.capsules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walled_board(height: i32, width: i32) -> Board {
        let mut board = Board::new(height, width);
        for row in 0..height {
            for col in 0..width {
                if row == 0 || col == 0 || row == height - 1 || col == width - 1 {
                    board.add_marker(Position::new(row, col), Marker::Wall);
                }
            }
        }

        board
    }

    #[test]
    fn test_corners_for_walled_board() {
        let board = walled_board(10, 10);

        assert_eq!(
            board.get_corners(1),
            [
                Position::new(1, 1),
                Position::new(1, 8),
                Position::new(8, 1),
                Position::new(8, 8),
            ]
        );
    }

    #[test]
    fn test_neighbors_skip_walls() {
        let mut board = walled_board(5, 5);
        board.add_marker(Position::new(2, 3), Marker::Wall);

        let neighbors = board.get_neighbors(&Position::new(2, 2));

        assert_eq!(
            neighbors,
            vec![
                (Action::North, Position::new(1, 2)),
                (Action::South, Position::new(3, 2)),
                (Action::West, Position::new(2, 1)),
            ]
        );
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let board = Board::new(3, 3);

        assert!(board.is_wall(&Position::new(-1, 0)));
        assert!(board.is_wall(&Position::new(0, 3)));
        assert!(!board.is_wall(&Position::new(1, 1)));
    }

    #[test]
    fn test_get_markers_at_position() {
        let mut board = walled_board(5, 5);
        let p = Position::new(2, 2);
        board.add_marker(p, Marker::Pellet);
        board.add_marker(p, Marker::Capsule);

        assert_eq!(
            board.get(&p),
            [Marker::Pellet, Marker::Capsule].into_iter().collect()
        );
        assert!(board.remove_marker(&p, Marker::Pellet));
        assert!(!board.remove_marker(&p, Marker::Pellet));
        assert_eq!(board.get(&p), [Marker::Capsule].into_iter().collect());
    }
}
