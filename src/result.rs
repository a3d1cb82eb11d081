//! VkFFT result codes and diagnostics.
//!
//! Every status returned by the transform engine goes through [`decode`]:
//! `0` is success, anything else becomes an [`EngineError`] whose message
//! names the code (when known) and the plan it came from.
//!
//! no_std + alloc compatible

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::config::{ElementType, NormMode, PlanConfig, TransformKind};
use crate::error::PlanError;

macro_rules! vkfft_results {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        /// Result codes from `vkFFT.h`, with a fallback for codes not listed.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum VkFftResult {
            $($variant,)+
            /// Code missing from the catalogue.
            Unknown(i32),
        }

        impl VkFftResult {
            pub fn from_code(code: i32) -> Self {
                match code {
                    $($code => VkFftResult::$variant,)+
                    other => VkFftResult::Unknown(other),
                }
            }

            pub fn code(self) -> i32 {
                match self {
                    $(VkFftResult::$variant => $code,)+
                    VkFftResult::Unknown(code) => code,
                }
            }

            /// Name as spelled in `vkFFT.h`, `None` for unknown codes.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(VkFftResult::$variant => Some($name),)+
                    VkFftResult::Unknown(_) => None,
                }
            }
        }
    };
}

vkfft_results! {
    Success = 0 => "VKFFT_SUCCESS",
    MallocFailed = 1 => "VKFFT_ERROR_MALLOC_FAILED",
    InsufficientCodeBuffer = 2 => "VKFFT_ERROR_INSUFFICIENT_CODE_BUFFER",
    InsufficientTempBuffer = 3 => "VKFFT_ERROR_INSUFFICIENT_TEMP_BUFFER",
    PlanNotInitialized = 4 => "VKFFT_ERROR_PLAN_NOT_INITIALIZED",
    NullTempPassed = 5 => "VKFFT_ERROR_NULL_TEMP_PASSED",
    InvalidPhysicalDevice = 1001 => "VKFFT_ERROR_INVALID_PHYSICAL_DEVICE",
    InvalidDevice = 1002 => "VKFFT_ERROR_INVALID_DEVICE",
    InvalidQueue = 1003 => "VKFFT_ERROR_INVALID_QUEUE",
    InvalidCommandPool = 1004 => "VKFFT_ERROR_INVALID_COMMAND_POOL",
    InvalidFence = 1005 => "VKFFT_ERROR_INVALID_FENCE",
    OnlyForwardFftInitialized = 1006 => "VKFFT_ERROR_ONLY_FORWARD_FFT_INITIALIZED",
    OnlyInverseFftInitialized = 1007 => "VKFFT_ERROR_ONLY_INVERSE_FFT_INITIALIZED",
    InvalidContext = 1008 => "VKFFT_ERROR_INVALID_CONTEXT",
    InvalidPlatform = 1009 => "VKFFT_ERROR_INVALID_PLATFORM",
    EmptyFftDim = 2001 => "VKFFT_ERROR_EMPTY_FFTdim",
    EmptySize = 2002 => "VKFFT_ERROR_EMPTY_size",
    EmptyBufferSize = 2003 => "VKFFT_ERROR_EMPTY_bufferSize",
    EmptyBuffer = 2004 => "VKFFT_ERROR_EMPTY_buffer",
    EmptyTempBufferSize = 2005 => "VKFFT_ERROR_EMPTY_tempBufferSize",
    EmptyTempBuffer = 2006 => "VKFFT_ERROR_EMPTY_tempBuffer",
    EmptyInputBufferSize = 2007 => "VKFFT_ERROR_EMPTY_inputBufferSize",
    EmptyInputBuffer = 2008 => "VKFFT_ERROR_EMPTY_inputBuffer",
    EmptyOutputBufferSize = 2009 => "VKFFT_ERROR_EMPTY_outputBufferSize",
    EmptyOutputBuffer = 2010 => "VKFFT_ERROR_EMPTY_outputBuffer",
    EmptyKernelSize = 2011 => "VKFFT_ERROR_EMPTY_kernelSize",
    EmptyKernel = 2012 => "VKFFT_ERROR_EMPTY_kernel",
    UnsupportedRadix = 3001 => "VKFFT_ERROR_UNSUPPORTED_RADIX",
    UnsupportedFftLength = 3002 => "VKFFT_ERROR_UNSUPPORTED_FFT_LENGTH",
    UnsupportedFftLengthR2c = 3003 => "VKFFT_ERROR_UNSUPPORTED_FFT_LENGTH_R2C",
    UnsupportedFftLengthDct = 3004 => "VKFFT_ERROR_UNSUPPORTED_FFT_LENGTH_DCT",
    UnsupportedFftOmit = 3005 => "VKFFT_ERROR_UNSUPPORTED_FFT_OMIT",
    FailedToAllocate = 4001 => "VKFFT_ERROR_FAILED_TO_ALLOCATE",
    FailedToMapMemory = 4002 => "VKFFT_ERROR_FAILED_TO_MAP_MEMORY",
    FailedToAllocateCommandBuffers = 4003 => "VKFFT_ERROR_FAILED_TO_ALLOCATE_COMMAND_BUFFERS",
    FailedToBeginCommandBuffer = 4004 => "VKFFT_ERROR_FAILED_TO_BEGIN_COMMAND_BUFFER",
    FailedToEndCommandBuffer = 4005 => "VKFFT_ERROR_FAILED_TO_END_COMMAND_BUFFER",
    FailedToSubmitQueue = 4006 => "VKFFT_ERROR_FAILED_TO_SUBMIT_QUEUE",
    FailedToWaitForFences = 4007 => "VKFFT_ERROR_FAILED_TO_WAIT_FOR_FENCES",
    FailedToResetFences = 4008 => "VKFFT_ERROR_FAILED_TO_RESET_FENCES",
    FailedToCreateDescriptorPool = 4009 => "VKFFT_ERROR_FAILED_TO_CREATE_DESCRIPTOR_POOL",
    FailedToCreateDescriptorSetLayout = 4010 => "VKFFT_ERROR_FAILED_TO_CREATE_DESCRIPTOR_SET_LAYOUT",
    FailedToAllocateDescriptorSets = 4011 => "VKFFT_ERROR_FAILED_TO_ALLOCATE_DESCRIPTOR_SETS",
    FailedToCreatePipelineLayout = 4012 => "VKFFT_ERROR_FAILED_TO_CREATE_PIPELINE_LAYOUT",
    FailedShaderPreprocess = 4013 => "VKFFT_ERROR_FAILED_SHADER_PREPROCESS",
    FailedShaderParse = 4014 => "VKFFT_ERROR_FAILED_SHADER_PARSE",
    FailedShaderLink = 4015 => "VKFFT_ERROR_FAILED_SHADER_LINK",
    FailedSpirvGenerate = 4016 => "VKFFT_ERROR_FAILED_SPIRV_GENERATE",
    FailedToCreateShaderModule = 4017 => "VKFFT_ERROR_FAILED_TO_CREATE_SHADER_MODULE",
    FailedToCreateInstance = 4018 => "VKFFT_ERROR_FAILED_TO_CREATE_INSTANCE",
    FailedToSetupDebugMessenger = 4019 => "VKFFT_ERROR_FAILED_TO_SETUP_DEBUG_MESSENGER",
    FailedToFindPhysicalDevice = 4020 => "VKFFT_ERROR_FAILED_TO_FIND_PHYSICAL_DEVICE",
    FailedToCreateDevice = 4021 => "VKFFT_ERROR_FAILED_TO_CREATE_DEVICE",
    FailedToCreateFence = 4022 => "VKFFT_ERROR_FAILED_TO_CREATE_FENCE",
    FailedToCreateCommandPool = 4023 => "VKFFT_ERROR_FAILED_TO_CREATE_COMMAND_POOL",
    FailedToCreateBuffer = 4024 => "VKFFT_ERROR_FAILED_TO_CREATE_BUFFER",
    FailedToAllocateMemory = 4025 => "VKFFT_ERROR_FAILED_TO_ALLOCATE_MEMORY",
    FailedToBindBufferMemory = 4026 => "VKFFT_ERROR_FAILED_TO_BIND_BUFFER_MEMORY",
    FailedToFindMemory = 4027 => "VKFFT_ERROR_FAILED_TO_FIND_MEMORY",
    FailedToSynchronize = 4028 => "VKFFT_ERROR_FAILED_TO_SYNCHRONIZE",
    FailedToCopy = 4029 => "VKFFT_ERROR_FAILED_TO_COPY",
    FailedToCreateProgram = 4030 => "VKFFT_ERROR_FAILED_TO_CREATE_PROGRAM",
    FailedToCompileProgram = 4031 => "VKFFT_ERROR_FAILED_TO_COMPILE_PROGRAM",
    FailedToGetCodeSize = 4032 => "VKFFT_ERROR_FAILED_TO_GET_CODE_SIZE",
    FailedToGetCode = 4033 => "VKFFT_ERROR_FAILED_TO_GET_CODE",
    FailedToDestroyProgram = 4034 => "VKFFT_ERROR_FAILED_TO_DESTROY_PROGRAM",
    FailedToLoadModule = 4035 => "VKFFT_ERROR_FAILED_TO_LOAD_MODULE",
    FailedToGetFunction = 4036 => "VKFFT_ERROR_FAILED_TO_GET_FUNCTION",
    FailedToSetDynamicSharedMemory = 4037 => "VKFFT_ERROR_FAILED_TO_SET_DYNAMIC_SHARED_MEMORY",
    FailedToModuleGetGlobal = 4038 => "VKFFT_ERROR_FAILED_TO_MODULE_GET_GLOBAL",
    FailedToLaunchKernel = 4039 => "VKFFT_ERROR_FAILED_TO_LAUNCH_KERNEL",
    FailedToEventRecord = 4040 => "VKFFT_ERROR_FAILED_TO_EVENT_RECORD",
    FailedToAddNameExpression = 4041 => "VKFFT_ERROR_FAILED_TO_ADD_NAME_EXPRESSION",
    FailedToInitialize = 4042 => "VKFFT_ERROR_FAILED_TO_INITIALIZE",
    FailedToSetDeviceId = 4043 => "VKFFT_ERROR_FAILED_TO_SET_DEVICE_ID",
    FailedToGetDevice = 4044 => "VKFFT_ERROR_FAILED_TO_GET_DEVICE",
    FailedToCreateContext = 4045 => "VKFFT_ERROR_FAILED_TO_CREATE_CONTEXT",
    FailedToCreatePipeline = 4046 => "VKFFT_ERROR_FAILED_TO_CREATE_PIPELINE",
    FailedToSetKernelArg = 4047 => "VKFFT_ERROR_FAILED_TO_SET_KERNEL_ARG",
    FailedToCreateCommandQueue = 4048 => "VKFFT_ERROR_FAILED_TO_CREATE_COMMAND_QUEUE",
    FailedToReleaseCommandQueue = 4049 => "VKFFT_ERROR_FAILED_TO_RELEASE_COMMAND_QUEUE",
    FailedToEnumerateDevices = 4050 => "VKFFT_ERROR_FAILED_TO_ENUMERATE_DEVICES",
    FailedToGetAttribute = 4051 => "VKFFT_ERROR_FAILED_TO_GET_ATTRIBUTE",
    FailedToCreateEvent = 4052 => "VKFFT_ERROR_FAILED_TO_CREATE_EVENT",
}

/// Coarse grouping of result codes, following the numbering in `vkFFT.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCategory {
    Success,
    /// Host allocation and plan/temporary buffer state (1..=5).
    Plan,
    /// Device, queue, context or platform handles (1001..=1009).
    Device,
    /// Missing sizes or buffers in the request (2001..=2012).
    EmptyInput,
    /// Radix or length the engine cannot generate code for (3001..=3005).
    Unsupported,
    /// Backend API failures: memory, shader build, kernel launch (4001..).
    Backend,
    Unknown,
}

impl VkFftResult {
    pub fn category(self) -> ResultCategory {
        match self {
            VkFftResult::Success => ResultCategory::Success,
            VkFftResult::Unknown(_) => ResultCategory::Unknown,
            known => match known.code() {
                1..=5 => ResultCategory::Plan,
                1001..=1009 => ResultCategory::Device,
                2001..=2012 => ResultCategory::EmptyInput,
                3001..=3005 => ResultCategory::Unsupported,
                _ => ResultCategory::Backend,
            },
        }
    }

    pub fn is_success(self) -> bool {
        self == VkFftResult::Success
    }
}

impl fmt::Display for VkFftResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "unknown VkFFT result code {}", self.code()),
        }
    }
}

/// Plan details attached to an engine failure. Every field is optional and
/// only printed when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub kind: Option<TransformKind>,
    /// Source array shape, slowest axis first.
    pub shape: Option<Vec<usize>>,
    pub dtype: Option<String>,
    pub axes: Option<Vec<isize>>,
    pub ndim: Option<usize>,
    pub in_place: Option<bool>,
    pub norm: Option<NormMode>,
    pub backend: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context describing `config`. The backend is left unset.
    pub fn from_config(config: &PlanConfig) -> Self {
        Self {
            kind: Some(config.kind()),
            shape: Some(config.source_shape().to_vec()),
            dtype: Some(config.element().to_string()),
            axes: config.axes().map(<[isize]>::to_vec),
            ndim: Some(config.ndim()),
            in_place: Some(config.in_place()),
            norm: Some(config.norm()),
            backend: None,
        }
    }

    pub fn kind(mut self, kind: TransformKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn shape(mut self, shape: &[usize]) -> Self {
        self.shape = Some(shape.to_vec());
        self
    }

    pub fn dtype(mut self, element: ElementType) -> Self {
        self.dtype = Some(element.to_string());
        self
    }

    pub fn axes(mut self, axes: &[isize]) -> Self {
        self.axes = Some(axes.to_vec());
        self
    }

    pub fn ndim(mut self, ndim: usize) -> Self {
        self.ndim = Some(ndim);
        self
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = Some(in_place);
        self
    }

    pub fn norm(mut self, norm: NormMode) -> Self {
        self.norm = Some(norm);
        self
    }

    pub fn backend(mut self, backend: &str) -> Self {
        self.backend = Some(backend.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Logical shape: an in-place R2C array carries 2 padding elements on
    /// its fastest axis, which are removed here.
    fn display_shape(&self) -> Option<Vec<usize>> {
        let mut shape = self.shape.clone()?;
        if self.kind == Some(TransformKind::R2C) && self.in_place == Some(true) {
            if let Some(nx) = shape.last_mut() {
                *nx = nx.saturating_sub(2);
            }
        }
        Some(shape)
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        let mut field = |f: &mut fmt::Formatter<'_>, args: fmt::Arguments<'_>| {
            let r = write!(f, "{sep}{args}");
            sep = ", ";
            r
        };
        if let Some(kind) = self.kind {
            field(f, format_args!("{}", kind.tag()))?;
        }
        if let Some(shape) = self.display_shape() {
            field(f, format_args!("shape={shape:?}"))?;
        }
        if let Some(dtype) = &self.dtype {
            field(f, format_args!("dtype={dtype}"))?;
        }
        if let Some(axes) = &self.axes {
            field(f, format_args!("axes={axes:?}"))?;
        }
        if let Some(ndim) = self.ndim {
            field(f, format_args!("ndim={ndim}"))?;
        }
        if let Some(in_place) = self.in_place {
            field(f, format_args!("inplace={in_place}"))?;
        }
        if let Some(norm) = self.norm {
            field(f, format_args!("norm={norm}"))?;
        }
        if let Some(backend) = &self.backend {
            field(f, format_args!("backend={backend}"))?;
        }
        Ok(())
    }
}

/// Non-zero status returned by the transform engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub result: VkFftResult,
    pub context: ErrorContext,
}

impl EngineError {
    pub fn new(result: VkFftResult, context: ErrorContext) -> Self {
        Self { result, context }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.result.code();
        match self.result.name() {
            Some(name) => write!(f, "VkFFT error {code}: {name}")?,
            None => write!(f, "VkFFT error {code} (unknown)")?,
        }
        if !self.context.is_empty() {
            write!(f, " [{}]", self.context)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}

/// Check an engine status, attaching `context` on failure.
///
/// No retry is attempted: every non-zero code is returned to the caller.
pub fn decode(code: i32, context: &ErrorContext) -> Result<(), PlanError> {
    match VkFftResult::from_code(code) {
        VkFftResult::Success => Ok(()),
        result => Err(PlanError::Engine(EngineError::new(result, context.clone()))),
    }
}

/// [`decode`] without context.
pub fn check(code: i32) -> Result<(), PlanError> {
    decode(code, &ErrorContext::default())
}
