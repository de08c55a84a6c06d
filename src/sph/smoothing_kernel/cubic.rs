use super::kernel::Kernel;
use crate::units::{Real, Vector};
use cgmath::Zero;

/// Cubic Spline smoothing kernel.
///
/// Classic cubic spline cernel from "J. Monaghan, Smoothed Particle Hydrodynamics, “Annual Review of Astronomy and Astrophysics”, 30 (1992), pp. 543-574."
/// Normalization factors from https://pysph.readthedocs.io/en/latest/reference/kernels.html#monaghan1992 via https://github.com/rustsim/salva/blob/master/src/kernel/cubic_spline_kernel.rs
///
/// `smoothing_length` is the full support radius here, not half of it as in Monaghan's paper.
#[derive(Copy, Clone, Debug)]
pub struct CubicSpline {
    h: Real,
    h_inv: Real,
    normalizer: Real,
}

impl CubicSpline {
    pub fn new(smoothing_length: Real) -> CubicSpline {
        CubicSpline {
            h: smoothing_length,
            h_inv: 1.0 / smoothing_length,
            normalizer: 40.0 / (7.0 * std::f64::consts::PI as Real * smoothing_length * smoothing_length),
        }
    }
}

impl Kernel for CubicSpline {
    #[inline]
    fn support_radius(&self) -> Real {
        self.h
    }

    #[inline]
    fn evaluate(&self, _r_sq: Real, r: Real) -> Real {
        let q = r * self.h_inv;
        if q <= 0.5 {
            self.normalizer * (1.0 + (q * q * q - q * q) * 6.0)
        } else if q <= 1.0 {
            self.normalizer * (1.0 - q).powi(3) * 2.0
        } else {
            0.0
        }
    }

    #[inline]
    fn gradient(&self, rj_to_ri: Vector, _r_sq: Real, r: Real) -> Vector {
        if r < Self::DIVISION_EPSILON {
            return Vector::zero();
        }
        // dW/dq * dq/dr, projected onto the unit separation
        let q = r * self.h_inv;
        let dw_dq = if q <= 0.5 {
            self.normalizer * (q * q * 3.0 - q * 2.0) * 6.0
        } else if q <= 1.0 {
            -self.normalizer * (1.0 - q).powi(2) * 6.0
        } else {
            return Vector::zero();
        };
        (dw_dq * self.h_inv / r) * rj_to_ri
    }
}

generate_kernel_tests!(CubicSpline);
