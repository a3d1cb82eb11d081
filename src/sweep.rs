//! Systematic accuracy sweeps.
//!
//! A [`SweepConfig`] describes a family of transforms (one kind, one rank,
//! a range of lengths) to be checked against a reference FFT. It is an
//! explicit value handed to every worker, never shared mutable state.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::config::{
    DctSelect, DctType, ElementType, NormMode, PlanConfig, PlanParams, Precision, TransformKind,
    TuningOptions,
};
use crate::error::PlanError;
use crate::primes::{is_bluestein_size, is_radix_size, RADICES};

/// Which lengths of the range are exercised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeFilter {
    /// Every length.
    All,
    /// Lengths whose prime factors are all in the list (all native radices when empty).
    Radix(Vec<usize>),
    /// Lengths with a prime factor above the largest native radix.
    Bluestein,
}

/// One transform of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCase {
    pub n: usize,
    /// Array shape, slowest axis first, including any in-place R2C padding.
    pub shape: Vec<usize>,
    pub config: PlanConfig,
    /// Relative tolerance against the reference transform.
    pub rtol: f64,
}

/// Description of an accuracy sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub kind: TransformKind,
    pub ndim: usize,
    /// Explicit axes; overrides `ndim` when set.
    pub axes: Option<Vec<isize>>,
    /// Inclusive range of lengths along each transformed axis.
    pub range: (usize, usize),
    pub sizes: SizeFilter,
    pub precision: Precision,
    pub in_place: bool,
    pub norm: NormMode,
    /// Force the engine's lookup table instead of native sincos. When unset
    /// the engine decides per device.
    pub lut: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            kind: TransformKind::C2C,
            ndim: 1,
            axes: None,
            range: (2, 128),
            sizes: SizeFilter::All,
            precision: Precision::Single,
            in_place: false,
            norm: NormMode::Backward,
            lut: false,
        }
    }
}

fn truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_list<T: core::str::FromStr>(v: &str, err: &'static str) -> Result<Vec<T>, PlanError> {
    v.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| PlanError::InvalidSweep(err)))
        .collect()
}

fn parse_kind(v: &str) -> Result<TransformKind, PlanError> {
    const ERR: &str = "VKPLAN_SWEEP_TRANSFORM must be c2c, r2c, dct or dct1..dct4";
    match v.trim().to_ascii_lowercase().as_str() {
        "c2c" => Ok(TransformKind::C2C),
        "r2c" => Ok(TransformKind::R2C),
        "dct" => Ok(TransformKind::Dct(DctType::Dct2)),
        other => {
            let n = other
                .strip_prefix("dct")
                .and_then(|t| t.parse::<u32>().ok())
                .ok_or(PlanError::InvalidSweep(ERR))?;
            DctType::from_number(n)
                .map(TransformKind::Dct)
                .map_err(|_| PlanError::InvalidSweep(ERR))
        }
    }
}

impl SweepConfig {
    /// Build a sweep from `VKPLAN_SWEEP_*` environment variables.
    #[cfg(feature = "std")]
    pub fn from_env() -> Result<Self, PlanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a sweep from `VKPLAN_SWEEP_*` variables provided by `lookup`.
    ///
    /// | variable | value |
    /// |----------|-------|
    /// | `VKPLAN_SWEEP_TRANSFORM` | `c2c`, `r2c`, `dct`, `dct1`..`dct4` |
    /// | `VKPLAN_SWEEP_NDIM` | 1, 2 or 3 |
    /// | `VKPLAN_SWEEP_AXES` | signed axis list, e.g. `-1 -2` |
    /// | `VKPLAN_SWEEP_RANGE` | `min max` |
    /// | `VKPLAN_SWEEP_RADIX` | radix list, empty for all radices |
    /// | `VKPLAN_SWEEP_BLUESTEIN` | boolean |
    /// | `VKPLAN_SWEEP_DOUBLE` | boolean |
    /// | `VKPLAN_SWEEP_INPLACE` | boolean |
    /// | `VKPLAN_SWEEP_NORM` | `0`, `1`, `backward`, `ortho` |
    /// | `VKPLAN_SWEEP_LUT` | boolean |
    ///
    /// Unset variables keep their [`Default`] value. The result is validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlanError> {
        let mut cfg = Self::default();
        if let Some(v) = lookup("VKPLAN_SWEEP_TRANSFORM") {
            cfg.kind = parse_kind(&v)?;
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_NDIM") {
            cfg.ndim = v
                .trim()
                .parse()
                .map_err(|_| PlanError::InvalidSweep("VKPLAN_SWEEP_NDIM must be an integer"))?;
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_AXES") {
            cfg.axes = Some(parse_list(&v, "VKPLAN_SWEEP_AXES must list integers")?);
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_RANGE") {
            const ERR: &str = "VKPLAN_SWEEP_RANGE must be two integers";
            match parse_list::<usize>(&v, ERR)?.as_slice() {
                [lo, hi] => cfg.range = (*lo, *hi),
                _ => return Err(PlanError::InvalidSweep(ERR)),
            }
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_RADIX") {
            cfg.sizes = SizeFilter::Radix(parse_list(&v, "VKPLAN_SWEEP_RADIX must list integers")?);
        }
        if lookup("VKPLAN_SWEEP_BLUESTEIN").is_some_and(|v| truthy(&v)) {
            if cfg.sizes != SizeFilter::All {
                return Err(PlanError::InvalidSweep(
                    "radix and Bluestein filters are exclusive",
                ));
            }
            cfg.sizes = SizeFilter::Bluestein;
        }
        if lookup("VKPLAN_SWEEP_DOUBLE").is_some_and(|v| truthy(&v)) {
            cfg.precision = Precision::Double;
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_INPLACE") {
            cfg.in_place = truthy(&v);
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_NORM") {
            cfg.norm = v.parse()?;
        }
        if let Some(v) = lookup("VKPLAN_SWEEP_LUT") {
            cfg.lut = truthy(&v);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject combinations the reference test-suite never runs.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(1..=3).contains(&self.ndim) {
            return Err(PlanError::InvalidSweep("ndim must be 1, 2 or 3"));
        }
        let (lo, hi) = self.range;
        if lo == 0 || lo > hi {
            return Err(PlanError::InvalidSweep(
                "range must satisfy 1 <= min <= max",
            ));
        }
        if let SizeFilter::Radix(radices) = &self.sizes {
            if radices.iter().any(|r| !RADICES.contains(r)) {
                return Err(PlanError::InvalidSweep(
                    "radix must be one of 2, 3, 5, 7, 11, 13",
                ));
            }
        }
        if self.kind.dct().is_some() && self.norm != NormMode::Backward {
            return Err(PlanError::InvalidSweep("DCT sweeps require norm=1"));
        }
        if self.precision == Precision::Half {
            return Err(PlanError::InvalidSweep(
                "sweeps run in single or double precision",
            ));
        }
        if self.kind == TransformKind::R2C && self.axes.is_some() {
            return Err(PlanError::InvalidSweep("axes cannot be used with R2C"));
        }
        if matches!(&self.axes, Some(axes) if axes.is_empty()) {
            return Err(PlanError::InvalidSweep("axes must not be empty"));
        }
        Ok(())
    }

    /// `C2C`, `R2C` or `DCT{n}`.
    pub fn label(&self) -> String {
        self.kind.tag()
    }

    /// Lengths of the range selected by the size filter. In-place R2C only
    /// keeps even lengths.
    pub fn sizes(&self) -> Vec<usize> {
        let (lo, hi) = self.range;
        (lo..=hi)
            .filter(|&n| match &self.sizes {
                SizeFilter::All => true,
                SizeFilter::Radix(radices) => is_radix_size(n, radices),
                SizeFilter::Bluestein => is_bluestein_size(n),
            })
            .filter(|&n| !(self.kind == TransformKind::R2C && self.in_place && n % 2 == 1))
            .collect()
    }

    fn array_rank(&self) -> usize {
        match &self.axes {
            Some(axes) => axes
                .iter()
                .map(|&a| if a < 0 { a.unsigned_abs() } else { a as usize + 1 })
                .max()
                .unwrap_or(1),
            None => self.ndim,
        }
    }

    /// Array shape for length `n`, slowest axis first.
    pub fn array_shape(&self, n: usize) -> Vec<usize> {
        let mut shape = vec![n; self.array_rank()];
        if self.kind == TransformKind::R2C && self.in_place {
            if let Some(nx) = shape.last_mut() {
                *nx += 2;
            }
        }
        shape
    }

    fn params(&self) -> PlanParams {
        PlanParams {
            ndim: if self.axes.is_some() {
                None
            } else {
                Some(self.ndim)
            },
            axes: self.axes.clone(),
            in_place: self.in_place,
            norm: self.norm,
            r2c: self.kind == TransformKind::R2C,
            dct: self.kind.dct().map_or(DctSelect::Off, DctSelect::from),
            tuning: TuningOptions {
                use_lut: self.lut.then_some(true),
                ..TuningOptions::default()
            },
        }
    }

    /// Plan for length `n`.
    pub fn plan(&self, n: usize) -> Result<PlanConfig, PlanError> {
        let element = ElementType::with_precision(self.precision, self.kind.requires_real_input());
        self.params().build(&self.array_shape(n), element)
    }

    /// Relative tolerance used to accept a transform of length `n`.
    pub fn tolerance(&self, n: usize) -> f64 {
        let double = self.precision == Precision::Double;
        let bluestein = is_bluestein_size(n);
        match self.kind {
            TransformKind::Dct(t) => {
                let rtol = if double { 1e-8 } else { 1e-4 };
                if bluestein || t != DctType::Dct2 {
                    rtol * 8.0
                } else {
                    rtol
                }
            }
            kind => {
                let mut rtol = if double { 1e-12 } else { 1e-6 };
                if bluestein {
                    rtol *= 4.0;
                    if kind == TransformKind::C2C && double && n > 100 {
                        rtol *= 10.0;
                    }
                }
                rtol
            }
        }
    }

    fn case(&self, n: usize) -> Result<SweepCase, PlanError> {
        Ok(SweepCase {
            n,
            shape: self.array_shape(n),
            config: self.plan(n)?,
            rtol: self.tolerance(n),
        })
    }

    /// Every case of the sweep, in increasing length.
    pub fn cases(&self) -> Result<Vec<SweepCase>, PlanError> {
        self.validate()?;
        let sizes = self.sizes();
        #[cfg(feature = "verbose-logging")]
        log::debug!("{} sweep: {} lengths", self.label(), sizes.len());
        sizes.into_iter().map(|n| self.case(n)).collect()
    }

    /// [`Self::cases`] computed on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn cases_par(&self) -> Result<Vec<SweepCase>, PlanError> {
        use rayon::prelude::*;

        self.validate()?;
        self.sizes()
            .into_par_iter()
            .map(|n| self.case(n))
            .collect()
    }
}
