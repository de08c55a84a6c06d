/// Smoothing Kernels.
pub use self::cubic::CubicSpline;
pub use self::kernel::Kernel;
pub use self::wendland_quintic_c2::WendlandQuinticC2;

// Shared property checks every kernel has to pass.
macro_rules! generate_kernel_tests {
    ($kernel_type:ident) => {
    };
}

mod cubic;
mod kernel;
mod wendland_quintic_c2;
