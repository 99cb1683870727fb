use clap::{Parser, Subcommand};

use super::commands::real_path::RealPathArgs;
use super::commands::verify::VerifyArgs;

#[derive(Parser)]
#[command(
    name = "lti",
    version,
    about = "Verify OAuth 1.0a signed LTI 1.x launch requests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify a form-encoded launch body and print the result as JSON
    Verify(VerifyArgs),
    /// Rebase a URL onto another scheme, host and port
    RealPath(RealPathArgs),
    Version,
}
