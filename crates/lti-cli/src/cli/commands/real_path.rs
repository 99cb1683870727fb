//! `lti real-path` - Rebase a URL onto a public host.

use anyhow::{Context, Result};
use clap::Args;

use crate::exit_codes::SUCCESS;

#[derive(Args, Debug)]
pub struct RealPathArgs {
    /// URL as seen by the tool, e.g. `http://localhost:8080/launch`
    pub url: String,

    /// Base whose scheme, host and port replace the URL's
    pub new_base: String,
}

pub fn cmd_real_path(args: RealPathArgs) -> Result<i32> {
    let real = lti_launch::get_real_path(&args.url, &args.new_base)
        .with_context(|| format!("failed to rebase {} onto {}", args.url, args.new_base))?;
    println!("{}", real);
    Ok(SUCCESS)
}
