//! Axis-aligned grid geometry
//!
//! Every simulated object is a rectangle in cell units:
//! - position: bottom-left corner (x grows rightward, y grows away from the start row)
//! - dimension: width/height, strictly positive
//!
//! Ranges are half-open (`[x, x + width)`), so two cells that only share an
//! edge never overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Width and height of an entity, both strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDimension")]
pub struct Dimension {
    width: f32,
    height: f32,
}

#[derive(Deserialize)]
struct RawDimension {
    width: f32,
    height: f32,
}

impl TryFrom<RawDimension> for Dimension {
    type Error = SimError;

    fn try_from(raw: RawDimension) -> Result<Self> {
        Dimension::new(raw.width, raw.height)
    }
}

impl Dimension {
    /// One grid cell
    pub const CELL: Dimension = Dimension {
        width: 1.0,
        height: 1.0,
    };

    pub fn new(width: f32, height: f32) -> Result<Self> {
        let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !valid {
            return Err(SimError::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A positioned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub dim: Dimension,
}

impl Rect {
    pub fn new(pos: Vec2, dim: Dimension) -> Self {
        Self { pos, dim }
    }

    /// One-cell rectangle at `pos`
    pub fn cell(pos: Vec2) -> Self {
        Self::new(pos, Dimension::CELL)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.dim.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.dim.height
    }

    /// Both half-open intervals intersect
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// Closed on the low edges, open on the high edges
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.bottom()
            && point.y < self.top()
    }

    /// `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }
}
