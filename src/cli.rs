//! Command-line schema

use crate::resolver::LogoSource;
use crate::Result;
use clap::Parser;
use std::path::PathBuf;

/// Create QR codes with logos.
///
/// If no logo is provided, try to fetch the favicon from the provided URL.
/// A logo may also be added with --logo. Use --no-logo to create a regular
/// QR code without a logo.
#[derive(Debug, Clone, Parser)]
#[command(name = "qrlogo", version, about, long_about)]
pub struct Cli {
    /// URL to encode into the QR code
    #[arg(long)]
    pub url: String,

    /// Path to the logo file
    #[arg(long = "logo", value_name = "PATH")]
    pub logo_path: Option<PathBuf>,

    /// No logo on QR code
    #[arg(long)]
    pub no_logo: bool,

    /// Output filename; the image format follows the extension
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,
}

impl Cli {
    /// Validate the logo options and turn them into a [`LogoSource`].
    pub fn logo_source(&self) -> Result<LogoSource> {
        LogoSource::from_options(self.logo_path.as_deref(), self.no_logo)
    }
}
