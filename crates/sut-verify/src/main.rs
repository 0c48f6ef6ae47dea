//! sut-verify CLI
//!
//! Verifies one device before a test job is sent to it. Exits 0 when the
//! device is ready, 1 when it is not or the command line is wrong. The
//! reason for a failure is left in the device's flag file.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sut_core::config::VerifyConfig;
use sut_core::flag::FlagFile;
use sut_core::DeviceId;
use sut_verify::output::{format_report, print_error, print_info, print_success, print_warning};
use sut_verify::{Collaborators, DeviceContext, Verifier};

#[derive(Parser)]
#[command(name = "sut-verify")]
#[command(author, version, about = "Pre-flight health check for remote test devices")]
struct Cli {
    /// Device to verify (its network host name)
    device: String,

    /// Also check the display resolution and repair it if wrong
    #[arg(long, env = "SUT_VERIFY_CHECK_SCREEN")]
    check_screen: bool,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    init_logging(cli.quiet, cli.verbose);

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn run(cli: &Cli) -> Result<bool> {
    let device = parse_device(&cli.device)?;

    let mut config = VerifyConfig::default();
    config.screen.enabled = cli.check_screen;

    let flag = FlagFile::new(&config.flag_root, &device);
    let flag_path = flag.path().to_path_buf();
    let ctx = DeviceContext::new(device, Box::new(flag));

    if !cli.quiet {
        print_info(&format!("Verifying {}", ctx.device()));
        if cli.check_screen {
            print_warning("Screen check enabled, a wrong resolution reboots the device");
        }
    }

    let collaborators = Collaborators::standard(&config);
    let report = Verifier::new(config, collaborators).run(&ctx).await;

    if !cli.quiet {
        println!("{}", format_report(&report));
    }

    if report.passed() {
        if !cli.quiet {
            print_success(&format!("{} is ready", report.device()));
        }
    } else {
        print_error(&format!(
            "{} failed verification, see {}",
            report.device(),
            flag_path.display()
        ));
    }

    Ok(report.passed())
}

/// Validate a device name before it is used as a host and a directory name
fn parse_device(name: &str) -> Result<DeviceId> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Device name must not be empty");
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!("Invalid device name '{}'", name);
    }
    Ok(DeviceId::from(name))
}
