//! Compare the nighttime-light output of cities against their capitals and countries.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use nightglow_lib::{Host, load_env_file, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Default host that talks to the real terminal.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    let mut host = RealHost;

    // Loaded before argument parsing, since PROJECT_ID may live in a local .env file
    load_env_file(&mut host, None);

    run(&mut host, std::env::args()).await
}
