use clap::{Args, Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for vkplan")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt,
    Analyze,
    /// Build or test every feature combination
    Matrix,
    /// Run the accuracy sweep tests
    Sweep(SweepOpts),
}

#[derive(Args, Debug, Default)]
struct SweepOpts {
    /// c2c, r2c, dct or dct1..dct4
    #[arg(long)]
    transform: Option<String>,
    #[arg(long)]
    ndim: Option<usize>,
    /// Transform axes, x (fastest) is 1, y is 2, z is 3. Overrides --ndim
    #[arg(long, num_args = 1..=3, value_parser = clap::value_parser!(u8).range(1..=3))]
    axes: Option<Vec<u8>>,
    /// Inclusive length range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    range: Option<Vec<usize>>,
    /// Only lengths made of these radices (all native radices when empty)
    #[arg(long, num_args = 0.., conflicts_with = "bluestein")]
    radix: Option<Vec<usize>>,
    /// Only lengths that need Bluestein's algorithm
    #[arg(long)]
    bluestein: bool,
    #[arg(long)]
    double: bool,
    #[arg(long)]
    inplace: bool,
    /// 0, 1 or ortho
    #[arg(long)]
    norm: Option<String>,
    #[arg(long)]
    lut: bool,
}

#[cfg(not(test))]
impl From<SweepOpts> for SweepArgs {
    fn from(o: SweepOpts) -> Self {
        SweepArgs {
            transform: o.transform,
            ndim: o.ndim,
            axes: o
                .axes
                .map(|axes| axes.into_iter().map(usize::from).collect()),
            range: o.range.and_then(|r| match r.as_slice() {
                [lo, hi] => Some((*lo, *hi)),
                _ => None,
            }),
            radix: o.radix,
            bluestein: o.bluestein,
            double: o.double,
            inplace: o.inplace,
            norm: o.norm,
            lut: o.lut,
        }
    }
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    let status = match cli.command {
        Commands::Build => build_command(&cfg).status(),
        Commands::Test => test_command(&cfg).status(),
        Commands::Clippy => clippy_command().status(),
        Commands::Fmt => fmt_command().status(),
        Commands::Analyze => {
            let fmt = fmt_command().status()?;
            if !fmt.success() {
                Ok(fmt)
            } else {
                clippy_command().status()
            }
        }
        Commands::Matrix => return run_matrix(),
        Commands::Sweep(opts) => sweep_command(&cfg, &opts.into()).status(),
    }?;

    std::process::exit(status.code().unwrap_or(1));
}
