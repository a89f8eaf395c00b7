//! Integer 2D coordinates and exact quarter-turn rotation.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

impl Coord {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Quarter turn clockwise about the origin (y axis points down).
    pub const fn rotated_cw(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Quarter turn counter-clockwise; inverse of [`Coord::rotated_cw`].
    pub const fn rotated_ccw(self) -> Self {
        Self {
            x: self.y,
            y: -self.x,
        }
    }

    pub const fn translated(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
