use std::path::PathBuf;

use clap::Parser;

/// Long flags that are also accepted with a single dash, as in `wlpv -offline`.
const SINGLE_DASH_LONG: &[&str] = &["help", "version", "add", "offline", "no-system", "catalog"];

#[derive(Parser, Debug)]
#[command(name = "wlpv")]
#[command(about = "Browse Wayland protocol documentation in the terminal", long_about = None)]
#[command(override_usage = "wlpv [options] [protocol name]")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print the version number and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Additional protocol file, directory or glob (repeatable)
    #[arg(short = 'a', long = "add", value_name = "PATH")]
    pub add: Vec<String>,

    /// Read protocols from /usr/share instead of fetching them
    #[arg(long)]
    pub offline: bool,

    /// Skip the built-in sources and show only --add documents
    #[arg(long)]
    pub no_system: bool,

    /// Load the source list from a TOML file
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Protocol to open directly
    #[arg(value_name = "PROTOCOL")]
    pub protocol: Option<String>,
}

impl Cli {
    /// Parse after rewriting `-flag` spellings to `--flag`.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize(std::env::args()))
    }
}

/// Rewrite single-dash long flags (`-add`, `-offline=…`) to their double-dash form.
/// Everything after a bare `--` is left alone.
pub fn normalize<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') && is_long_flag(rest) => format!("-{arg}"),
                _ => arg,
            }
        })
        .collect()
}

fn is_long_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    SINGLE_DASH_LONG.contains(&name)
}
