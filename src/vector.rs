//! 2D vector for pointer math and layout offsets. Components are kept
//! finite: writes of NaN or infinite values are ignored, the same policy
//! the color setters follow.

use std::ops::{Add, Sub};

use crate::math::wrap_in_range;

/// Screen-space quadrant of a vector, y pointing down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction4 {
    Up,
    Right,
    Down,
    Left,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    x: f32,
    y: f32,
}

#[allow(clippy::float_cmp)]
impl Vector2 {
    /// Non-finite components fall back to 0.
    pub fn new(x: f32, y: f32) -> Self {
        let mut vector = Vector2::default();
        vector.set_x(x);
        vector.set_y(y);
        vector
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, value: f32) {
        if value.is_finite() {
            self.x = value;
        }
    }

    pub fn set_y(&mut self, value: f32) {
        if value.is_finite() {
            self.y = value;
        }
    }

    pub fn vec(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn set_vec(&mut self, value: [f32; 2]) {
        self.set_x(value[0]);
        self.set_y(value[1]);
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Scale to the given length, keeping the heading.
    pub fn set_length(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        let radians = self.radians();
        self.x = value * radians.cos();
        self.y = value * radians.sin();
    }

    pub fn radians(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotate to the given heading, wrapped into `[0, 2π)`, keeping the
    /// length.
    pub fn set_radians(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        let value = wrap_in_range(value, 0.0, 2.0 * std::f32::consts::PI);
        let length = self.length();
        self.x = length * value.cos();
        self.y = length * value.sin();
    }

    pub fn angle(&self) -> f32 {
        self.radians().to_degrees()
    }

    /// Degree variant of [`set_radians`](Self::set_radians). The zero
    /// vector has no heading, so this is a no-op there.
    pub fn set_angle(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        if self.length() == 0.0 {
            return;
        }
        self.set_radians(value.to_radians());
    }

    pub fn normalize(&mut self) {
        self.set_length(1.0);
    }

    pub fn direction(&self) -> Option<Direction4> {
        if self.length() == 0.0 {
            return None;
        }
        let deg = self.angle();
        Some(if (-45.0..45.0).contains(&deg) {
            Direction4::Right
        } else if (45.0..135.0).contains(&deg) {
            Direction4::Down
        } else if deg >= 135.0 || deg < -135.0 {
            Direction4::Left
        } else {
            Direction4::Up
        })
    }

    pub fn dot(a: Vector2, b: Vector2) -> f32 {
        a.x * b.x + a.y * b.y
    }

    pub fn distance(a: Vector2, b: Vector2) -> f32 {
        (a - b).length()
    }
}

impl From<[f32; 2]> for Vector2 {
    fn from(value: [f32; 2]) -> Self {
        Vector2::new(value[0], value[1])
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}
