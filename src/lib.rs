//! qrlogo
//!
//! Create QR codes with a logo in the middle. The logo is either a file the
//! user points at, or the favicon of the site the QR code links to.
//!
//! # Pipeline
//!
//! 1. **Resolve** the logo ([`resolver`]): explicit file, suppressed, or
//!    favicon discovery ([`favicon`]) with a fallback to the site root.
//! 2. **Encode** the URL ([`encode`]) at error-correction level High.
//! 3. **Composite** ([`compose`]) the logo centered on the code, scaled to a
//!    quarter of its size and blended with the logo's alpha channel.
//! 4. **Save** the result; the format follows the output file extension.
//!
//! # Example
//!
//! ```no_run
//! use qrlogo::{Config, HttpFetcher, LogoSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let fetcher = HttpFetcher::new(&config)?;
//! let generated = qrlogo::generate("https://www.rust-lang.org", &LogoSource::AutoDiscover, &fetcher, &config)?;
//! qrlogo::save(&generated.image, "rust.png")?;
//! # Ok(())
//! # }
//! ```

use image::{ImageFormat, RgbaImage};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

pub mod cli;
pub mod compose;
pub mod encode;
pub mod error;
pub mod favicon;
pub mod fetch;
pub mod resolver;

pub use cli::Cli;
pub use encode::QrStyle;
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use resolver::{LogoSource, ResolvedLogo};

/// Printed when favicon discovery comes back empty twice.
pub const FAVICON_NOT_FOUND_WARNING: &str =
    "Warning: Favicon not found for the provided URL. Outputting a regular QR code without logo.";

/// Configuration for QR generation
///
/// # Examples
///
/// ```
/// let cfg = qrlogo::Config::default();
/// assert_eq!(cfg.style.module_size, 10);
/// assert_eq!(cfg.logo_scale_divisor, 4);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// User agent string sent with favicon requests
    pub user_agent: String,
    /// Timeout for each HTTP request in milliseconds
    pub timeout_ms: u64,
    /// QR rendering parameters
    pub style: QrStyle,
    /// The logo is fitted into a box of `1/logo_scale_divisor` of the QR size
    pub logo_scale_divisor: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: concat!("qrlogo/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 30000,
            style: QrStyle::default(),
            logo_scale_divisor: compose::DEFAULT_SCALE_DIVISOR,
        }
    }
}

/// A finished QR code together with how its logo was resolved
#[derive(Debug)]
pub struct Generated {
    /// QR bitmap with the logo, if any, composited on top
    pub image: RgbaImage,
    /// How the logo was resolved; carries the logo image when one was used
    pub logo: ResolvedLogo,
}

/// Resolve the logo, encode `url` and composite the two.
pub fn generate<F: Fetcher + ?Sized>(
    url: &str,
    source: &LogoSource,
    fetcher: &F,
    config: &Config,
) -> Result<Generated> {
    let logo = resolver::resolve_logo(source, url, fetcher)?;
    let qr = encode::encode(url, &config.style)?;
    let image = compose::composite(qr, logo.image(), config.logo_scale_divisor);
    Ok(Generated { image, logo })
}

/// Write `image` to `path`, picking the format from the extension.
///
/// The image is encoded in memory first, so an unsupported format or colour
/// type leaves nothing behind at `path`.
pub fn save<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();
    let output_error = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(output_error)?;
    let mut encoded = Cursor::new(Vec::new());
    image.write_to(&mut encoded, format).map_err(output_error)?;
    fs::write(path, encoded.into_inner())
        .map_err(|e| output_error(image::ImageError::IoError(e)))?;
    log::info!("Wrote {}x{} QR code to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// Run one command-line invocation.
///
/// Option conflicts are reported before any network or file access. The
/// favicon warning, if any, is written to `out`.
pub fn run<F: Fetcher + ?Sized, W: Write + ?Sized>(
    cli: &Cli,
    fetcher: &F,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let source = cli.logo_source()?;
    let generated = generate(&cli.url, &source, fetcher, config)?;
    if generated.logo.is_not_found() {
        writeln!(out, "{}", FAVICON_NOT_FOUND_WARNING)?;
    }
    save(&generated.image, &cli.output)?;
    Ok(())
}
