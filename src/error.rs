//! Error taxonomy shared by every stage of plan preparation.
//! no_std + alloc compatible

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::result::EngineError;

/// Broad category of a [`PlanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or contradictory caller parameters.
    Config,
    /// The shape/axis request cannot be expressed as 3 axes plus a batch.
    UnsupportedTransform,
    /// Non-zero status returned by the transform engine.
    Engine,
}

/// Errors raised while building, scaling or checking a transform plan.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The array shape has no dimensions.
    EmptyShape,
    /// A dimension of the array shape is zero.
    ZeroExtent { axis: usize },
    /// Collapsing untransformed axes overflowed `usize`.
    ShapeOverflow,
    /// Axis resolution selected no axis to transform.
    NoTransformAxes,
    /// `axes` and `ndim` were both given but disagree.
    AxisRankMismatch { axes: usize, ndim: usize },
    /// An axis index does not exist in the array shape.
    AxisOutOfRange { axis: isize, rank: usize },
    /// R2C and DCT were both requested.
    DctWithR2c,
    /// R2C or DCT was requested on complex input.
    NonRealInput,
    /// Explicit axes were given for an R2C transform.
    AxesWithR2c,
    /// DCT type outside 1..=4.
    InvalidDctType(u32),
    /// Normalization value not understood.
    UnknownNorm(String),
    /// Element byte width with no matching precision.
    UnsupportedPrecision(usize),
    /// In-place R2C fastest axis leaves no room for the 2 padding elements.
    R2cPaddingTooSmall { nx: usize },
    /// Sweep configuration rejected by [`crate::sweep::SweepConfig::validate`].
    InvalidSweep(&'static str),
    /// More than 3 leading axes would be needed after collapsing.
    UnsupportedTransform {
        shape: Vec<usize>,
        axes: Vec<isize>,
        collapsed: Vec<usize>,
        skip: Vec<bool>,
    },
    /// Decoded engine failure.
    Engine(EngineError),
}

impl PlanError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::UnsupportedTransform { .. } => ErrorKind::UnsupportedTransform,
            PlanError::Engine(_) => ErrorKind::Engine,
            _ => ErrorKind::Config,
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::EmptyShape => write!(f, "array shape must have at least one dimension"),
            PlanError::ZeroExtent { axis } => write!(f, "axis {axis} has zero extent"),
            PlanError::ShapeOverflow => write!(f, "collapsed batch size overflows usize"),
            PlanError::NoTransformAxes => write!(f, "no transform axis selected"),
            PlanError::AxisRankMismatch { axes, ndim } => write!(
                f,
                "axis/rank mismatch: {axes} transform axes given but ndim={ndim}"
            ),
            PlanError::AxisOutOfRange { axis, rank } => {
                write!(f, "axis {axis} is out of range for an array of rank {rank}")
            }
            PlanError::DctWithR2c => write!(f, "R2C and DCT cannot both be selected"),
            PlanError::NonRealInput => {
                write!(f, "R2C or DCT selected but input type is not real")
            }
            PlanError::AxesWithR2c => write!(f, "explicit axes are not allowed for R2C transforms"),
            PlanError::InvalidDctType(t) => {
                write!(f, "DCT type {t} requested, only types 1, 2, 3 and 4 are allowed")
            }
            PlanError::UnknownNorm(n) => write!(f, "unknown norm: {n:?}"),
            PlanError::UnsupportedPrecision(w) => {
                write!(f, "unsupported precision: {w}-byte elements")
            }
            PlanError::R2cPaddingTooSmall { nx } => write!(
                f,
                "in-place R2C fastest axis must exceed 2 padding elements, got {nx}"
            ),
            PlanError::InvalidSweep(reason) => write!(f, "invalid sweep configuration: {reason}"),
            PlanError::UnsupportedTransform {
                shape,
                axes,
                collapsed,
                skip,
            } => write!(
                f,
                "unsupported transform: shape={shape:?} axes={axes:?} collapses to {collapsed:?} \
                 with skip={skip:?}, only the first 3 axes can be transformed"
            ),
            PlanError::Engine(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for PlanError {
    fn from(e: EngineError) -> Self {
        PlanError::Engine(e)
    }
}
