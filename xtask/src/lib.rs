use anyhow::{bail, Result};
use std::env;
use std::process::Command;

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let nproc = detect_nproc();
    let extra = env::var("VKPLAN_FEATURES").unwrap_or_default();
    compute_config(nproc, &extra)
}

fn detect_nproc() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    if nproc > 1 {
        features.push("parallel".into());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig { features }
}

fn cargo(subcommand: &str, cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args([subcommand, "-p", "vkplan"]);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    cargo("build", cfg)
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    cargo("test", cfg)
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

/// One cell of the feature matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    pub name: &'static str,
    pub default_features: bool,
    pub features: &'static [&'static str],
    /// `no_std` builds only compile the library; tests need `std`.
    pub run_tests: bool,
}

/// Feature combinations checked by `cargo xtask matrix`.
pub const FEATURE_MATRIX: &[FeatureSet] = &[
    FeatureSet {
        name: "no_std",
        default_features: false,
        features: &[],
        run_tests: false,
    },
    FeatureSet {
        name: "no_std+verbose-logging",
        default_features: false,
        features: &["verbose-logging"],
        run_tests: false,
    },
    FeatureSet {
        name: "default",
        default_features: true,
        features: &[],
        run_tests: true,
    },
    FeatureSet {
        name: "parallel",
        default_features: true,
        features: &["parallel"],
        run_tests: true,
    },
    FeatureSet {
        name: "all",
        default_features: true,
        features: &["parallel", "verbose-logging"],
        run_tests: true,
    },
];

pub fn matrix_command(set: &FeatureSet) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(if set.run_tests { "test" } else { "build" });
    cmd.args(["-p", "vkplan"]);
    if !set.default_features {
        cmd.arg("--no-default-features");
    }
    if !set.features.is_empty() {
        cmd.arg("--features").arg(set.features.join(" "));
    }
    cmd
}

/// Run every cell of [`FEATURE_MATRIX`], stopping at the first failure.
pub fn run_matrix() -> Result<()> {
    for set in FEATURE_MATRIX {
        println!("==> {}", set.name);
        let status = matrix_command(set).status()?;
        if !status.success() {
            bail!("feature set `{}` failed with {status}", set.name);
        }
    }
    Ok(())
}

/// Sweep parameters forwarded as `VKPLAN_SWEEP_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepArgs {
    pub transform: Option<String>,
    pub ndim: Option<usize>,
    /// Transform axes counted from the fastest: x is 1, y is 2, z is 3.
    pub axes: Option<Vec<usize>>,
    pub range: Option<(usize, usize)>,
    pub radix: Option<Vec<usize>>,
    pub bluestein: bool,
    pub double: bool,
    pub inplace: bool,
    pub norm: Option<String>,
    pub lut: bool,
}

impl SweepArgs {
    pub fn envs(&self) -> Vec<(&'static str, String)> {
        let mut envs = Vec::new();
        if let Some(t) = &self.transform {
            envs.push(("VKPLAN_SWEEP_TRANSFORM", t.clone()));
        }
        if let Some(n) = self.ndim {
            envs.push(("VKPLAN_SWEEP_NDIM", n.to_string()));
        }
        if let Some(axes) = &self.axes {
            let list: Vec<String> = axes.iter().map(|a| format!("-{a}")).collect();
            envs.push(("VKPLAN_SWEEP_AXES", list.join(" ")));
        }
        if let Some((lo, hi)) = self.range {
            envs.push(("VKPLAN_SWEEP_RANGE", format!("{lo} {hi}")));
        }
        if let Some(radix) = &self.radix {
            let list: Vec<String> = radix.iter().map(|r| r.to_string()).collect();
            envs.push(("VKPLAN_SWEEP_RADIX", list.join(" ")));
        }
        if let Some(norm) = &self.norm {
            envs.push(("VKPLAN_SWEEP_NORM", norm.clone()));
        }
        for (key, on) in [
            ("VKPLAN_SWEEP_BLUESTEIN", self.bluestein),
            ("VKPLAN_SWEEP_DOUBLE", self.double),
            ("VKPLAN_SWEEP_INPLACE", self.inplace),
            ("VKPLAN_SWEEP_LUT", self.lut),
        ] {
            if on {
                envs.push((key, "1".to_string()));
            }
        }
        envs
    }
}

/// Run the sweep integration tests with the given parameters.
pub fn sweep_command(cfg: &BuildConfig, args: &SweepArgs) -> Command {
    let mut cmd = cargo("test", cfg);
    cmd.args(["--test", "sweep"]);
    cmd.envs(args.envs());
    cmd
}
