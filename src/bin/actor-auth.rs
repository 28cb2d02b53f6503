//! actor-auth — sign a request on behalf of the invoking user
//!
//! Usage:
//!   actor-auth [-d|--debug] < request
//!
//! Installed setuid to the admin account. Prints the hex HMAC of the request
//! on stdout when the request's actor is the invoking user.

use std::io;
use std::process::ExitCode;

use actor_auth::error::EXIT_USAGE;
use actor_auth::{AuthError, Config, SystemAuthenticator};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let mut debug = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-d" | "--debug" => debug = true,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "--version" | "-V" => {
                println!("actor-auth {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("error: unknown option '{}'", other);
                print_usage();
                return ExitCode::from(EXIT_USAGE);
            }
        }
    }

    init_tracing(debug);

    match run(&Config::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(config: &Config) -> Result<(), AuthError> {
    tracing::debug!(
        key_path = %config.key_path().display(),
        admin = %config.admin_account,
        algorithm = %config.algorithm,
        "starting"
    );
    let auth = SystemAuthenticator::from_config(config)?;
    auth.respond(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

/// Diagnostics go to stderr only; stdout carries nothing but the digest.
/// The filter comes from the flag, not `RUST_LOG`: the environment belongs to
/// the caller.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::new(if debug { "debug" } else { "warn" });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn print_usage() {
    eprintln!(
        r#"actor-auth — sign a request on behalf of the invoking user

USAGE:
    actor-auth [OPTIONS] < REQUEST

Reads a request beginning with <Request action="..." actor="..."> on stdin.
If actor names the invoking user, prints the HMAC of the request as hex.

OPTIONS:
    -d, --debug      Print diagnostics to stderr
    -h, --help       Print help
    -V, --version    Print version

EXIT STATUS:
    0  success
    1  usage error
    2  actor is not the invoking user
    3  malformed request
    4  cannot assume the admin account
    5  key file unavailable
    6  digest computation failed
    7  invoking user cannot be resolved
    8  i/o error
    9  invalid configuration
"#
    );
}
