//! Clamp

use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// * `x` - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_values_inside_interval() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-1, 0, 10), 0);
        assert_eq!(clamp(11, 0, 10), 10);
        assert_eq!(clamp(0.5_f32, 0.0, 1.0), 0.5);
    }
}
