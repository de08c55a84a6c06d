use super::kernel::Kernel;
use crate::units::{Real, Vector};
use cgmath::Zero;

// https://github.com/InteractiveComputerGraphics/SPlisHSPlasH/blob/d5172c9/SPlisHSPlasH/SPHKernels.h#L545
#[derive(Copy, Clone, Debug)]
pub struct WendlandQuinticC2 {
    h: Real,
    h_inv: Real,
    normalizer: Real,
    normalizer_grad: Real,
}

impl WendlandQuinticC2 {
    pub fn new(smoothing_length: Real) -> Self {
        WendlandQuinticC2 {
            h: smoothing_length,
            h_inv: 1.0 / smoothing_length,
            normalizer: 7.0 / (std::f64::consts::PI as Real * smoothing_length.powi(2)),
            normalizer_grad: -140.0 / (std::f64::consts::PI as Real * smoothing_length.powi(2)),
        }
    }
}

impl Kernel for WendlandQuinticC2 {
    #[inline]
    fn support_radius(&self) -> Real {
        self.h
    }

    #[inline]
    fn evaluate(&self, _r_sq: Real, r: Real) -> Real {
        let q = (self.h_inv * r).min(1.0);
        let one_minus_q = 1.0 - q;
        let one_minus_q_sq = one_minus_q * one_minus_q;
        self.normalizer * one_minus_q_sq * one_minus_q_sq * (4.0 * q + 1.0)
    }

    #[inline]
    fn gradient(&self, rj_to_ri: Vector, _r_sq: Real, r: Real) -> Vector {
        if r < Self::DIVISION_EPSILON {
            return Vector::zero();
        }
        let q = (r * self.h_inv).min(1.0);
        let gradq = rj_to_ri * (self.h_inv / r);
        (self.normalizer_grad * q * (1.0 - q).powi(3)) * gradq
    }
}

generate_kernel_tests!(WendlandQuinticC2);
