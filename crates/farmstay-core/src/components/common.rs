//! Common components shared across actor types.

use serde::{Deserialize, Serialize};

/// Displacements below this don't change facing.
const FACING_EPSILON: f32 = 0.001;

/// 2D world-space position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*other - *self).length()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Horizontal facing of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Default for Facing {
    fn default() -> Self {
        Facing::Right
    }
}

impl Facing {
    /// Facing from a horizontal displacement. A ~0 displacement keeps the
    /// previous facing.
    pub fn from_dx(dx: f32, previous: Facing) -> Facing {
        if dx > FACING_EPSILON {
            Facing::Right
        } else if dx < -FACING_EPSILON {
            Facing::Left
        } else {
            previous
        }
    }
}

/// Name component for actors that have names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name {
    pub given: String,
    pub family: String,
}

impl Name {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 8.0);

        let diff = b - a;
        assert_eq!(diff.x, 3.0);
        assert_eq!(diff.y, 4.0);
        assert!((diff.length() - 5.0).abs() < 0.001);

        let scaled = a * 2.0;
        assert_eq!(scaled.x, 2.0);
        assert_eq!(scaled.y, 4.0);
    }

    #[test]
    fn test_facing_from_dx() {
        assert_eq!(Facing::from_dx(1.0, Facing::Left), Facing::Right);
        assert_eq!(Facing::from_dx(-1.0, Facing::Right), Facing::Left);
        // A ~0 displacement keeps whatever was there.
        assert_eq!(Facing::from_dx(0.0, Facing::Left), Facing::Left);
        assert_eq!(Facing::from_dx(0.0005, Facing::Left), Facing::Left);
    }

    #[test]
    fn test_name() {
        let name = Name::new("Mara", "Quill");
        assert_eq!(name.full_name(), "Mara Quill");
    }
}
