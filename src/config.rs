//! Plan configuration: validate user-facing transform parameters and
//! assemble the immutable [`PlanConfig`] consumed by the scale and
//! diagnostic stages.
//!
//! no_std + alloc compatible

use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::axes::{plan_axes, AxisLayout};
use crate::error::PlanError;

/// Floating-point precision of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Half,
    Single,
    Double,
}

impl Precision {
    /// Map the byte width of one real component to a precision.
    ///
    /// | bytes | precision |
    /// |-------|-----------|
    /// | 2     | half      |
    /// | 4     | single    |
    /// | 8     | double    |
    pub fn from_byte_width(width: usize) -> Result<Self, PlanError> {
        match width {
            2 => Ok(Precision::Half),
            4 => Ok(Precision::Single),
            8 => Ok(Precision::Double),
            w => Err(PlanError::UnsupportedPrecision(w)),
        }
    }

    pub fn byte_width(self) -> usize {
        match self {
            Precision::Half => 2,
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }
}

/// Element type of the source array, described by the byte width of one
/// real component and whether elements are real or complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementType {
    pub byte_width: usize,
    pub real: bool,
}

impl ElementType {
    pub const F16: Self = Self::real(2);
    pub const F32: Self = Self::real(4);
    pub const F64: Self = Self::real(8);
    /// Complex with half-precision components.
    pub const C32: Self = Self::complex(2);
    pub const C64: Self = Self::complex(4);
    pub const C128: Self = Self::complex(8);

    pub const fn real(byte_width: usize) -> Self {
        Self {
            byte_width,
            real: true,
        }
    }

    pub const fn complex(byte_width: usize) -> Self {
        Self {
            byte_width,
            real: false,
        }
    }

    /// Element type for `precision`.
    pub fn with_precision(precision: Precision, real: bool) -> Self {
        Self {
            byte_width: precision.byte_width(),
            real,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.real {
            write!(f, "float{}", self.byte_width * 8)
        } else {
            write!(f, "complex{}", self.byte_width * 16)
        }
    }
}

/// DCT variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DctType {
    Dct1,
    Dct2,
    Dct3,
    Dct4,
}

impl DctType {
    pub fn from_number(n: u32) -> Result<Self, PlanError> {
        match n {
            1 => Ok(DctType::Dct1),
            2 => Ok(DctType::Dct2),
            3 => Ok(DctType::Dct3),
            4 => Ok(DctType::Dct4),
            other => Err(PlanError::InvalidDctType(other)),
        }
    }

    pub fn number(self) -> u32 {
        match self {
            DctType::Dct1 => 1,
            DctType::Dct2 => 2,
            DctType::Dct3 => 3,
            DctType::Dct4 => 4,
        }
    }
}

/// How a DCT was requested: not at all, "enabled" (type 2), or by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DctSelect {
    #[default]
    Off,
    Default,
    Type(u32),
}

impl DctSelect {
    pub fn is_requested(self) -> bool {
        self != DctSelect::Off
    }

    fn resolve(self) -> Result<Option<DctType>, PlanError> {
        match self {
            DctSelect::Off => Ok(None),
            DctSelect::Default => Ok(Some(DctType::Dct2)),
            DctSelect::Type(n) => DctType::from_number(n).map(Some),
        }
    }
}

impl From<bool> for DctSelect {
    fn from(enabled: bool) -> Self {
        if enabled {
            DctSelect::Default
        } else {
            DctSelect::Off
        }
    }
}

impl From<u32> for DctSelect {
    fn from(n: u32) -> Self {
        if n == 0 {
            DctSelect::Off
        } else {
            DctSelect::Type(n)
        }
    }
}

impl From<DctType> for DctSelect {
    fn from(t: DctType) -> Self {
        DctSelect::Type(t.number())
    }
}

/// Kind of transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    C2C,
    R2C,
    Dct(DctType),
}

impl TransformKind {
    /// Short tag used in diagnostics: `C2C`, `R2C` or `DCT{n}`.
    pub fn tag(self) -> alloc::string::String {
        match self {
            TransformKind::C2C => "C2C".to_string(),
            TransformKind::R2C => "R2C".to_string(),
            TransformKind::Dct(t) => alloc::format!("DCT{}", t.number()),
        }
    }

    pub fn dct(self) -> Option<DctType> {
        match self {
            TransformKind::Dct(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the source array must hold real elements.
    pub fn requires_real_input(self) -> bool {
        !matches!(self, TransformKind::C2C)
    }
}

/// L2 normalization convention of a forward/inverse pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormMode {
    /// `0`: each transform multiplies the L2 norm by the array size.
    Unnormalized,
    /// `1` or `"backward"`: the inverse divides by the size, FFT+iFFT keeps the norm.
    #[default]
    Backward,
    /// `"ortho"`: each transform keeps the L2 norm.
    Orthonormal,
}

impl NormMode {
    /// Numeric code for the two integer conventions.
    pub fn code(self) -> Option<i64> {
        match self {
            NormMode::Unnormalized => Some(0),
            NormMode::Backward => Some(1),
            NormMode::Orthonormal => None,
        }
    }
}

impl TryFrom<i64> for NormMode {
    type Error = PlanError;

    fn try_from(v: i64) -> Result<Self, PlanError> {
        match v {
            0 => Ok(NormMode::Unnormalized),
            1 => Ok(NormMode::Backward),
            other => Err(PlanError::UnknownNorm(other.to_string())),
        }
    }
}

impl FromStr for NormMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, PlanError> {
        match s.trim() {
            "0" => Ok(NormMode::Unnormalized),
            "1" | "backward" => Ok(NormMode::Backward),
            "ortho" | "orthonormal" => Ok(NormMode::Orthonormal),
            other => Err(PlanError::UnknownNorm(other.to_string())),
        }
    }
}

impl fmt::Display for NormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormMode::Unnormalized => write!(f, "0"),
            NormMode::Backward => write!(f, "1"),
            NormMode::Orthonormal => write!(f, "ortho"),
        }
    }
}

/// Experimental engine tuning switches. `None` leaves the choice to the
/// engine, which is also what it does with `-1` on the C side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TuningOptions {
    pub disable_reorder_four_step: Option<bool>,
    pub register_boost: Option<u8>,
    /// Lookup table instead of native sincos, for GPUs with poor sincos accuracy.
    pub use_lut: Option<bool>,
    /// Keep (and print) the generated shader code.
    pub keep_shader_code: Option<bool>,
}

impl TuningOptions {
    /// Values handed to the engine, in the order `disableReorderFourStep`,
    /// `registerBoost`, `useLUT`, `keepShaderCode`.
    pub fn engine_flags(&self) -> [i32; 4] {
        fn flag(v: Option<bool>) -> i32 {
            v.map_or(-1, i32::from)
        }
        [
            flag(self.disable_reorder_four_step),
            self.register_boost.map_or(-1, i32::from),
            flag(self.use_lut),
            flag(self.keep_shader_code),
        ]
    }
}

/// User-facing transform parameters.
///
/// Defaults: all axes (or the last `ndim`), in-place, backward norm, C2C.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanParams {
    pub ndim: Option<usize>,
    pub axes: Option<Vec<isize>>,
    pub in_place: bool,
    pub norm: NormMode,
    pub r2c: bool,
    pub dct: DctSelect,
    pub tuning: TuningOptions,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            ndim: None,
            axes: None,
            in_place: true,
            norm: NormMode::Backward,
            r2c: false,
            dct: DctSelect::Off,
            tuning: TuningOptions::default(),
        }
    }
}

impl PlanParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ndim(mut self, ndim: usize) -> Self {
        self.ndim = Some(ndim);
        self
    }

    pub fn axes(mut self, axes: &[isize]) -> Self {
        self.axes = Some(axes.to_vec());
        self
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn norm(mut self, norm: NormMode) -> Self {
        self.norm = norm;
        self
    }

    pub fn r2c(mut self, r2c: bool) -> Self {
        self.r2c = r2c;
        self
    }

    pub fn dct(mut self, dct: impl Into<DctSelect>) -> Self {
        self.dct = dct.into();
        self
    }

    pub fn tuning(mut self, tuning: TuningOptions) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn use_lut(mut self, use_lut: bool) -> Self {
        self.tuning.use_lut = Some(use_lut);
        self
    }

    /// Validate the parameters against `shape` and `element`, then plan axes.
    ///
    /// # Errors
    ///
    /// Config errors are checked in this order: DCT together with R2C,
    /// non-real input for R2C/DCT, explicit axes with R2C, DCT type, element
    /// precision. Axis planning errors follow, and finally an in-place R2C
    /// fastest axis too short to hold its 2 padding elements.
    pub fn build(&self, shape: &[usize], element: ElementType) -> Result<PlanConfig, PlanError> {
        if self.r2c && self.dct.is_requested() {
            return Err(PlanError::DctWithR2c);
        }
        if (self.r2c || self.dct.is_requested()) && !element.real {
            return Err(PlanError::NonRealInput);
        }
        if self.r2c && self.axes.is_some() {
            return Err(PlanError::AxesWithR2c);
        }
        let kind = match self.dct.resolve()? {
            Some(t) => TransformKind::Dct(t),
            None if self.r2c => TransformKind::R2C,
            None => TransformKind::C2C,
        };
        let precision = Precision::from_byte_width(element.byte_width)?;

        let layout = plan_axes(shape, self.axes.as_deref(), self.ndim)?;
        if kind == TransformKind::R2C && self.in_place && layout.shape[0] <= 2 {
            return Err(PlanError::R2cPaddingTooSmall {
                nx: layout.shape[0],
            });
        }

        let config = PlanConfig {
            layout,
            kind,
            precision,
            norm: self.norm,
            in_place: self.in_place,
            element,
            source_shape: shape.to_vec(),
            axes: self.axes.clone(),
            tuning: self.tuning,
        };
        #[cfg(feature = "verbose-logging")]
        log::debug!("plan config: {:?}", config);
        Ok(config)
    }
}

/// Immutable, validated transform plan configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanConfig {
    layout: AxisLayout,
    kind: TransformKind,
    precision: Precision,
    norm: NormMode,
    in_place: bool,
    element: ElementType,
    source_shape: Vec<usize>,
    axes: Option<Vec<isize>>,
    tuning: TuningOptions,
}

impl PlanConfig {
    /// Shorthand for [`PlanParams::build`].
    pub fn build(
        shape: &[usize],
        element: ElementType,
        params: &PlanParams,
    ) -> Result<Self, PlanError> {
        params.build(shape, element)
    }

    pub fn layout(&self) -> &AxisLayout {
        &self.layout
    }

    /// Canonical `(nx, ny, nz, nbatch)` shape.
    pub fn shape(&self) -> [usize; 4] {
        self.layout.shape
    }

    pub fn skip(&self) -> [bool; 3] {
        self.layout.skip
    }

    /// Effective transform rank.
    pub fn ndim(&self) -> usize {
        self.layout.ndim
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn norm(&self) -> NormMode {
        self.norm
    }

    pub fn in_place(&self) -> bool {
        self.in_place
    }

    pub fn element(&self) -> ElementType {
        self.element
    }

    /// Shape as supplied by the caller, slowest axis first.
    pub fn source_shape(&self) -> &[usize] {
        &self.source_shape
    }

    /// Explicit axes as supplied by the caller.
    pub fn axes(&self) -> Option<&[isize]> {
        self.axes.as_deref()
    }

    pub fn tuning(&self) -> TuningOptions {
        self.tuning
    }
}
