//! deb-ostree-builder CLI
//!
//! Entry point for the `deb-ostree-builder` command-line tool. Resolves
//! the effective build configuration from the builtin defaults, the
//! sysconf config files, and the command line, collapses fragment
//! options, and prepares the build directory.

use clap::Parser;
use deb_ostree_builder::config::defaults::{DEFAULT_SECTION, LOCK_TIMEOUT, SYSCONFDIR};
use deb_ostree_builder::config::{fragment_prefixes, Config, ConfigError};
use deb_ostree_builder::error::BuildError;
use deb_ostree_builder::fsutil;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "deb-ostree-builder")]
#[command(about = "Debian ostree image builder", version)]
struct Cli {
    /// Product to build
    #[arg(short = 'p', long, default_value = "debian")]
    product: String,

    /// Architecture to build
    #[arg(short = 'a', long)]
    arch: Option<String>,

    /// Platform to build
    #[arg(short = 'P', long)]
    platform: Option<String>,

    /// Show configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Output configuration in JSON format
    #[arg(long)]
    json: bool,

    /// Run build even when no new assets found
    #[arg(short = 'f', long)]
    force: bool,

    /// Don't publish images
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Use current builder branch
    #[arg(long)]
    no_checkout: bool,

    /// Time in seconds to acquire lock before exiting
    #[arg(long, default_value_t = LOCK_TIMEOUT)]
    lock_timeout: u64,

    /// Branch to build
    #[arg(default_value = "unstable")]
    branch: String,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BuildError> {
    let mut config = load_config(cli)?;
    apply_cli_settings(&mut config, cli)?;
    merge_fragment_options(&mut config)?;

    if cli.show_config {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&config.to_json()?).unwrap());
        } else {
            print!("{}", config.to_ini_string()?);
        }
        return Ok(());
    }

    let product = config.get(DEFAULT_SECTION, "product")?;
    let branch = config.get(DEFAULT_SECTION, "branch")?;
    println!("Resolved configuration for product {}, branch {}", product, branch);

    if cli.dry_run {
        return Ok(());
    }
    let builddir = config.get(DEFAULT_SECTION, "builddir")?;
    let scratch = Path::new(&builddir).join(format!("{}-{}", product, branch));
    fsutil::recreate_dir(&scratch).map_err(|err| {
        BuildError::new([
            "failed to prepare build directory".to_string(),
            scratch.display().to_string(),
            err.to_string(),
        ])
    })?;
    println!("Prepared build directory {}", scratch.display());
    Ok(())
}

/// Builtin defaults plus the sysconf config files for the selected
/// product, arch, platform, and branch. Missing files are skipped.
fn load_config(cli: &Cli) -> Result<Config, BuildError> {
    let mut config = Config::with_defaults();
    let sysconfdir = PathBuf::from(SYSCONFDIR);
    let mut paths = vec![
        sysconfdir.join("defaults.ini"),
        sysconfdir.join(format!("product-{}.ini", cli.product)),
    ];
    if let Some(arch) = &cli.arch {
        paths.push(sysconfdir.join(format!("arch-{}.ini", arch)));
    }
    if let Some(platform) = &cli.platform {
        paths.push(sysconfdir.join(format!("platform-{}.ini", platform)));
    }
    paths.push(sysconfdir.join(format!("branch-{}.ini", cli.branch)));
    config.read_files(&paths)?;
    Ok(config)
}

/// Write the command-line selection into the default section so config
/// files and downstream consumers can reference it
fn apply_cli_settings(config: &mut Config, cli: &Cli) -> Result<(), ConfigError> {
    config.set(DEFAULT_SECTION, "product", &cli.product)?;
    config.set(DEFAULT_SECTION, "branch", &cli.branch)?;
    if let Some(arch) = &cli.arch {
        config.set(DEFAULT_SECTION, "arch", arch)?;
    }
    if let Some(platform) = &cli.platform {
        config.set(DEFAULT_SECTION, "platform", platform)?;
    }
    config.set(DEFAULT_SECTION, "lock_timeout", &cli.lock_timeout.to_string())?;
    config.set_boolean(DEFAULT_SECTION, "force", cli.force)?;
    config.set_boolean(DEFAULT_SECTION, "dry_run", cli.dry_run)?;
    config.set_boolean(DEFAULT_SECTION, "no_checkout", cli.no_checkout)?;
    Ok(())
}

/// Collapse every fragment prefix in every section
fn merge_fragment_options(config: &mut Config) -> Result<(), ConfigError> {
    let mut names = vec![DEFAULT_SECTION.to_string()];
    names.extend(config.section_names().map(str::to_string));
    for name in names {
        let prefixes = match config.section(&name) {
            Some(section) => fragment_prefixes(section),
            None => continue,
        };
        for prefix in prefixes {
            config.merge_option_prefix(&name, &prefix)?;
        }
    }
    Ok(())
}
