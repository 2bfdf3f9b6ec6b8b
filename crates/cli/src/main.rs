use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use cypress_configuration_core::{
    determine_cypress_era, resolve_post10_configuration, resolve_post10_test_files,
    resolve_pre10_configuration, resolve_pre10_test_files, CypressEra, ResolveOptions, TestingType,
};

/// Inspect the configuration Cypress would resolve for a project
#[derive(Parser)]
#[command(name = "cypress-configuration")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration as JSON
    Config {
        /// Testing type to resolve (modern-era projects only)
        #[arg(short = 't', long = "testing-type", default_value = "e2e")]
        testing_type: TestingTypeArg,

        /// Cypress-style arguments, e.g. --config specPattern=foo/bar
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the resolved test files, one per line
    Specs {
        /// Testing type to resolve (modern-era projects only)
        #[arg(short = 't', long = "testing-type", default_value = "e2e")]
        testing_type: TestingTypeArg,

        /// Cypress-style arguments, e.g. --config specPattern=foo/bar
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the detected configuration era
    Era {
        /// Cypress-style arguments, e.g. --project foo
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TestingTypeArg {
    #[value(name = "e2e")]
    E2e,
    #[value(name = "component")]
    Component,
}

impl From<TestingTypeArg> for TestingType {
    fn from(value: TestingTypeArg) -> Self {
        match value {
            TestingTypeArg::E2e => TestingType::E2e,
            TestingTypeArg::Component => TestingType::Component,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let env: HashMap<String, String> = std::env::vars().collect();
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    match cli.command {
        Commands::Config { testing_type, args } => {
            config_command(&args, &env, &cwd, testing_type.into())
        }
        Commands::Specs { testing_type, args } => {
            specs_command(&args, &env, &cwd, testing_type.into())
        }
        Commands::Era { args } => era_command(&args, &cwd),
    }
}

fn config_command(
    args: &[String],
    env: &HashMap<String, String>,
    cwd: &Path,
    testing_type: TestingType,
) -> Result<()> {
    debug!("resolving configuration in {}", cwd.display());

    let options = ResolveOptions {
        argv: args,
        env,
        cwd,
        loader: None,
    };

    let json = match determine_cypress_era(args, cwd)? {
        CypressEra::PostV10 => {
            let configuration = resolve_post10_configuration(&options, testing_type)?;
            serde_json::to_string_pretty(&configuration)?
        }
        CypressEra::PreV10 => {
            let configuration = resolve_pre10_configuration(&options)?;
            serde_json::to_string_pretty(&configuration)?
        }
    };

    println!("{json}");

    Ok(())
}

fn specs_command(
    args: &[String],
    env: &HashMap<String, String>,
    cwd: &Path,
    testing_type: TestingType,
) -> Result<()> {
    debug!("resolving test files in {}", cwd.display());

    let options = ResolveOptions {
        argv: args,
        env,
        cwd,
        loader: None,
    };

    let files = match determine_cypress_era(args, cwd)? {
        CypressEra::PostV10 => {
            let configuration = resolve_post10_configuration(&options, testing_type)?;
            resolve_post10_test_files(&configuration)?
        }
        CypressEra::PreV10 => {
            let configuration = resolve_pre10_configuration(&options)?;
            resolve_pre10_test_files(&configuration)?
        }
    };

    for file in files {
        println!("{}", file.display());
    }

    Ok(())
}

fn era_command(args: &[String], cwd: &Path) -> Result<()> {
    let era = match determine_cypress_era(args, cwd)? {
        CypressEra::PostV10 => "post-v10",
        CypressEra::PreV10 => "pre-v10",
    };

    println!("{era}");

    Ok(())
}
