//! This module implements some domain-specific momentum handling logic.

use crate::numeric::Float;
use nalgebra::Vector2;

/// Transverse momentum vector (x, y components, in MeV)
pub type TransverseMomentum = Vector2<Float>;

/// Magnitude of a transverse momentum given its components
///
/// Applied to the component sums of a track pair, this gives the vector PT
/// sum of the pair, as opposed to the scalar SUMPT that the matcher uses.
///
pub fn transverse_momentum(px: Float, py: Float) -> Float {
    TransverseMomentum::new(px, py).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pt_is_euclidean_norm() {
        assert!((transverse_momentum(3., 4.) - 5.).abs() < 1e-12);
        assert!((transverse_momentum(-3., 4.) - 5.).abs() < 1e-12);
        assert_eq!(transverse_momentum(0., 0.), 0.);
    }

    #[test]
    fn back_to_back_pair_cancels() {
        // Vector sum of two opposite tracks vanishes while the scalar sum
        // does not
        assert_eq!(transverse_momentum(500. - 500., 490. - 490.), 0.);
    }
}
