//! Normalization scale factors.
//!
//! VkFFT transforms are unnormalized; the caller multiplies the raw output
//! by [`forward_scale`] after a forward transform and by [`inverse_scale`]
//! after an inverse one to obtain the configured [`NormMode`].
//!
//! DCT types 1 to 3 cannot be made exactly norm-preserving with a single
//! scalar, so an approximation is used and a warning is logged. See
//! <https://en.wikipedia.org/wiki/Discrete_cosine_transform#DCT-II>.
//!
//! no_std + alloc compatible

use core::f64::consts::SQRT_2;

use half::f16;

use crate::config::{DctType, NormMode, PlanConfig, Precision, TransformKind};

/// Scale factor stored at the plan's native floating-point width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Half(f16),
    Single(f32),
    Double(f64),
}

impl Scale {
    fn new(precision: Precision, value: f64) -> Self {
        match precision {
            Precision::Half => Scale::Half(f16::from_f64(value)),
            Precision::Single => Scale::Single(value as f32),
            Precision::Double => Scale::Double(value),
        }
    }

    pub fn precision(self) -> Precision {
        match self {
            Scale::Half(_) => Precision::Half,
            Scale::Single(_) => Precision::Single,
            Scale::Double(_) => Precision::Double,
        }
    }

    /// Widen to `f64`.
    pub fn to_f64(self) -> f64 {
        match self {
            Scale::Half(v) => v.to_f64(),
            Scale::Single(v) => v as f64,
            Scale::Double(v) => v,
        }
    }
}

/// Whether the DCT scale for `config` is only an approximation.
pub fn is_dct_norm_approximate(config: &PlanConfig) -> bool {
    matches!(config.kind().dct(), Some(t) if t != DctType::Dct4)
}

fn warn_dct_approximation(config: &PlanConfig) {
    if is_dct_norm_approximate(config) {
        log::warn!(
            "{} cannot be strictly normalised, using an approximate scale factor",
            config.kind().tag()
        );
    }
}

/// `sqrt(N)` over the transformed axes, with the in-place R2C padding
/// removed from the fastest axis. Also returns the transformed axis count.
fn base_scale(config: &PlanConfig) -> (f64, usize) {
    let (n, k) = config
        .layout()
        .transformed_extents()
        .fold((1.0f64, 0), |(n, k), extent| (n * extent as f64, k + 1));
    let mut s = libm::sqrt(n);
    if config.kind() == TransformKind::R2C && config.in_place() {
        let nx = config.shape()[0] as f64;
        s *= libm::sqrt((nx - 2.0) / nx);
    }
    (s, k)
}

/// Forward scale for the configured norm.
pub fn forward_scale(config: &PlanConfig) -> Scale {
    forward_scale_for(config, config.norm())
}

/// Forward scale for `norm`, ignoring the configured one.
pub fn forward_scale_for(config: &PlanConfig, norm: NormMode) -> Scale {
    let (mut s, k) = base_scale(config);
    if config.kind().dct().is_some() {
        s *= libm::pow(2.0, 0.5 * k as f64);
        warn_dct_approximation(config);
    }
    let value = match norm {
        NormMode::Unnormalized | NormMode::Backward => 1.0 / s,
        // Applied by the engine itself.
        NormMode::Orthonormal => 1.0,
    };
    Scale::new(config.precision(), value)
}

/// Inverse scale for the configured norm.
pub fn inverse_scale(config: &PlanConfig) -> Scale {
    inverse_scale_for(config, config.norm())
}

/// Inverse scale for `norm`, ignoring the configured one.
///
/// For backward norm the per-axis `sqrt(2)` DCT factor is raised to the
/// power 1, 2 and 3 for DCT types 2, 3 and 4. These exponents match scipy's
/// `idctn` output and are not derived from a closed form.
pub fn inverse_scale_for(config: &PlanConfig, norm: NormMode) -> Scale {
    let (s, k) = base_scale(config);
    let dct = config.kind().dct();
    let mut s_dct = 1.0;
    if dct.is_some() {
        for _ in 0..k {
            s_dct *= SQRT_2;
        }
        warn_dct_approximation(config);
    }
    let value = match norm {
        NormMode::Unnormalized => 1.0 / (s * s_dct),
        NormMode::Backward => {
            let s_dct = match dct {
                Some(DctType::Dct3) => libm::pow(s_dct, 2.0),
                Some(DctType::Dct4) => libm::pow(s_dct, 3.0),
                _ => s_dct,
            };
            s * s_dct
        }
        NormMode::Orthonormal => 1.0,
    };
    Scale::new(config.precision(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ElementType, PlanParams};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * b.abs().max(1.0)
    }

    #[test]
    fn c2c_backward_pair() {
        let cfg = PlanParams::new().build(&[8, 16], ElementType::C128).unwrap();
        let f = forward_scale(&cfg).to_f64();
        let i = inverse_scale(&cfg).to_f64();
        assert!(close(f, 1.0 / libm::sqrt(128.0)));
        assert!(close(i, libm::sqrt(128.0)));
        assert!(close(f * i, 1.0));
    }

    #[test]
    fn unnormalized_inverse() {
        let cfg = PlanParams::new()
            .norm(NormMode::Unnormalized)
            .build(&[8, 16], ElementType::C128)
            .unwrap();
        assert!(close(inverse_scale(&cfg).to_f64(), 1.0 / libm::sqrt(128.0)));
    }

    #[test]
    fn skipped_axes_do_not_count() {
        let cfg = PlanParams::new()
            .axes(&[0])
            .build(&[4, 5, 6], ElementType::C128)
            .unwrap();
        assert!(close(forward_scale(&cfg).to_f64(), 0.5));
    }

    #[test]
    fn native_width() {
        let cfg = PlanParams::new().build(&[16], ElementType::C64).unwrap();
        assert_eq!(forward_scale(&cfg), Scale::Single(0.25));
        let cfg = PlanParams::new().build(&[16], ElementType::C32).unwrap();
        assert_eq!(forward_scale(&cfg), Scale::Half(f16::from_f32(0.25)));
        assert_eq!(forward_scale(&cfg).precision(), Precision::Half);
    }

    #[test]
    fn dct_forward_factor() {
        let cfg = PlanParams::new()
            .dct(4u32)
            .build(&[8, 8], ElementType::F64)
            .unwrap();
        // sqrt(64) * 2^(0.5 * 2)
        assert!(close(forward_scale(&cfg).to_f64(), 1.0 / 16.0));
        assert!(!is_dct_norm_approximate(&cfg));
    }

    #[test]
    fn dct_backward_inverse_exponents() {
        let base = 8.0;
        let s_dct = 2.0; // sqrt(2)^2 for two axes
        for (t, expected) in [
            (1u32, base * s_dct),
            (2, base * s_dct),
            (3, base * s_dct * s_dct),
            (4, base * s_dct * s_dct * s_dct),
        ] {
            let cfg = PlanParams::new()
                .dct(t)
                .build(&[8, 8], ElementType::F64)
                .unwrap();
            assert!(
                close(inverse_scale(&cfg).to_f64(), expected),
                "DCT{} inverse scale",
                t
            );
        }
    }

    #[test]
    fn ortho_is_identity() {
        let cfg = PlanParams::new()
            .dct(2u32)
            .norm(NormMode::Orthonormal)
            .build(&[6, 8], ElementType::F32)
            .unwrap();
        assert_eq!(forward_scale(&cfg), Scale::Single(1.0));
        assert_eq!(inverse_scale(&cfg), Scale::Single(1.0));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn large_transform_scale() {
        // 2^40 elements: the product is accumulated without integer overflow.
        let cfg = PlanParams::new()
            .build(&[1 << 20, 1 << 20], ElementType::C128)
            .unwrap();
        assert!(close(forward_scale(&cfg).to_f64(), 1.0 / (1u64 << 20) as f64));
        assert!(close(inverse_scale(&cfg).to_f64(), (1u64 << 20) as f64));
    }

    #[test]
    fn explicit_norm_override() {
        let cfg = PlanParams::new().build(&[16], ElementType::C128).unwrap();
        assert_eq!(
            forward_scale_for(&cfg, NormMode::Orthonormal),
            Scale::Double(1.0)
        );
        assert!(close(
            inverse_scale_for(&cfg, NormMode::Unnormalized).to_f64(),
            0.25
        ));
    }
}
