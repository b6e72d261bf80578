//! Population layouts and the toroidal neighbourhood.

use serde::{Deserialize, Serialize};

use crate::config::{PopulationConfig, TopologyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// How organisms are arranged.
///
/// Grid cells are stored with `x` as the outer index, matching the scan order
/// used by stepping and by the oldest-member search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    Flat { size: usize },
    Grid { width: usize, height: usize },
}

impl From<&PopulationConfig> for Topology {
    fn from(c: &PopulationConfig) -> Self {
        match c.topology {
            TopologyKind::Flat => Topology::Flat { size: c.size },
            TopologyKind::Grid => Topology::Grid {
                width: c.width,
                height: c.height,
            },
        }
    }
}

impl Topology {
    #[must_use]
    pub fn len(&self) -> usize {
        match *self {
            Topology::Flat { size } => size,
            Topology::Grid { width, height } => width * height,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<GridPos> {
        match *self {
            Topology::Flat { .. } => None,
            Topology::Grid { height, .. } if index < self.len() => {
                Some(GridPos::new(index / height, index % height))
            }
            Topology::Grid { .. } => None,
        }
    }

    #[must_use]
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        match *self {
            Topology::Grid { width, height } if pos.x < width && pos.y < height => {
                Some(pos.x * height + pos.y)
            }
            _ => None,
        }
    }

    /// Moore neighbourhood of `index` with wraparound, excluding the cell itself.
    ///
    /// Up to eight distinct indices; fewer on grids narrower than three cells
    /// where wrapped offsets coincide. Always empty for the flat layout.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let (width, height) = match *self {
            Topology::Grid { width, height } => (width, height),
            Topology::Flat { .. } => return Vec::new(),
        };
        let Some(origin) = self.position(index) else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(8);
        for dx in [width - 1, 0, 1] {
            for dy in [height - 1, 0, 1] {
                let pos = GridPos::new((origin.x + dx) % width, (origin.y + dy) % height);
                if pos == origin {
                    continue;
                }
                if let Some(i) = self.index_of(pos) {
                    if !out.contains(&i) {
                        out.push(i);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_roundtrip() {
        let t = Topology::Grid {
            width: 10,
            height: 3,
        };
        for i in 0..t.len() {
            let pos = t.position(i).unwrap();
            assert_eq!(t.index_of(pos), Some(i));
        }
        assert_eq!(t.position(30), None);
        assert_eq!(t.position(4), Some(GridPos::new(1, 1)));
    }

    #[test]
    fn test_interior_has_eight_neighbors() {
        let t = Topology::Grid {
            width: 5,
            height: 5,
        };
        let centre = t.index_of(GridPos::new(2, 2)).unwrap();
        let n = t.neighbors(centre);
        assert_eq!(n.len(), 8);
        assert!(!n.contains(&centre));
    }

    #[test]
    fn test_corner_wraps_around() {
        let t = Topology::Grid {
            width: 4,
            height: 4,
        };
        let n = t.neighbors(t.index_of(GridPos::new(0, 0)).unwrap());
        assert_eq!(n.len(), 8);
        for pos in [
            GridPos::new(3, 3),
            GridPos::new(3, 0),
            GridPos::new(0, 3),
            GridPos::new(1, 1),
        ] {
            assert!(n.contains(&t.index_of(pos).unwrap()), "missing {pos:?}");
        }
    }

    #[test]
    fn test_thin_grid_deduplicates() {
        let t = Topology::Grid {
            width: 10,
            height: 2,
        };
        let n = t.neighbors(t.index_of(GridPos::new(5, 0)).unwrap());
        // two rows: the column above and below coincide
        assert_eq!(n.len(), 5);

        let single = Topology::Grid {
            width: 1,
            height: 1,
        };
        assert!(single.neighbors(0).is_empty());
    }

    #[test]
    fn test_flat_has_no_neighbors() {
        let t = Topology::Flat { size: 4 };
        assert!(t.neighbors(1).is_empty());
        assert_eq!(t.position(1), None);
    }
}
