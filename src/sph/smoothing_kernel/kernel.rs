use crate::units::{Real, Vector};

/// SPH smoothing kernel
///
/// Only radially symmetric kernels are supported.
/// Support is limited to the support radius h, i.e. for |r|>=h both value and gradient are zero.
/// Kernels are captured by value in parallel particle loops, hence `Copy + Send + Sync`.
pub trait Kernel: Copy + Send + Sync {
    /// Below this distance the gradient direction is undefined and the gradient is reported as zero.
    const DIVISION_EPSILON: Real = 1.0e-10;

    /// Radius beyond which the kernel is zero, typically expressed as 'h'.
    fn support_radius(&self) -> Real;

    /// Evaluates the kernel function for a given distance.
    /// `r_sq`:     Squared length of rj_to_ri
    /// `r`:        Length of rj_to_ri
    fn evaluate(&self, r_sq: Real, r: Real) -> Real;

    /// Evaluates the gradient of the kernel with respect to the position of particle i.
    /// `rj_to_ri`: Vector from a position j to a position i, so ri - rj. Not normalized!
    /// `r_sq`:     Squared length of rj_to_ri
    /// `r`:        Length of rj_to_ri
    ///
    /// Antisymmetric: gradient(-v) == -gradient(v). Points from i towards j within the support.
    fn gradient(&self, rj_to_ri: Vector, r_sq: Real, r: Real) -> Vector;
}
