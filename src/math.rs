use bevy::math::{IVec2, Vec2};

pub type Real = f32;

pub type Vector = Vec2;
pub type Point = Vec2;
pub type CellCoord = IVec2;

#[inline(always)]
pub fn zero_vector() -> Vector {
    Vec2::ZERO
}

/// Unit vector along `v`, or `None` when `v` is shorter than `min_length`.
#[inline(always)]
pub fn direction_or_none(v: Vector, min_length: Real) -> Option<(Vector, Real)> {
    let length = v.length();
    if length <= 0.0 || length < min_length || !length.is_finite() {
        None
    } else {
        Some((v / length, length))
    }
}
