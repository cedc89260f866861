//! Logo resolution: explicit file, suppressed, or discovered favicon.

use crate::favicon;
use crate::fetch::Fetcher;
use crate::{Error, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Where the logo comes from. Exactly one mode applies per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    /// Load the logo from this file
    Explicit(PathBuf),
    /// Do not put a logo on the code
    Suppressed,
    /// Use the target site's favicon if one can be found
    AutoDiscover,
}

impl LogoSource {
    /// Build the source from the two user-facing options.
    ///
    /// Asking for a logo file and for no logo at the same time is
    /// [`Error::ConflictingOptions`].
    pub fn from_options(logo_path: Option<&Path>, no_logo: bool) -> Result<Self> {
        match (logo_path, no_logo) {
            (Some(_), true) => Err(Error::ConflictingOptions),
            (Some(path), false) => Ok(LogoSource::Explicit(path.to_path_buf())),
            (None, true) => Ok(LogoSource::Suppressed),
            (None, false) => Ok(LogoSource::AutoDiscover),
        }
    }
}

/// Outcome of logo resolution
#[derive(Debug)]
pub enum ResolvedLogo {
    /// Loaded from the user's file
    Explicit(DynamicImage),
    /// Found by favicon discovery at `source_url`
    Discovered { image: DynamicImage, source_url: String },
    /// The user asked for no logo
    Suppressed,
    /// Discovery came back empty for the URL and its site root
    NotFound,
}

impl ResolvedLogo {
    pub fn image(&self) -> Option<&DynamicImage> {
        match self {
            ResolvedLogo::Explicit(image) | ResolvedLogo::Discovered { image, .. } => Some(image),
            ResolvedLogo::Suppressed | ResolvedLogo::NotFound => None,
        }
    }

    /// Whether the user should be told that no favicon was found
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolvedLogo::NotFound)
    }
}

/// Load an explicit logo file. Any failure is fatal.
pub fn load_logo(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| Error::LogoLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Try the URL itself, then its site root.
pub fn discover<F: Fetcher + ?Sized>(fetcher: &F, url: &str) -> ResolvedLogo {
    if let Some((image, from)) = favicon::fetch_icon(fetcher, url) {
        return ResolvedLogo::Discovered { image, source_url: from.into() };
    }

    let Some(root) = favicon::site_root(url) else {
        log::info!("No site root to fall back to for {}", url);
        return ResolvedLogo::NotFound;
    };
    log::info!("No favicon on {}, trying site root {}", url, root);

    match favicon::fetch_icon(fetcher, root.as_str()) {
        Some((image, from)) => ResolvedLogo::Discovered { image, source_url: from.into() },
        None => ResolvedLogo::NotFound,
    }
}

/// Resolve the logo for `url` according to `source`.
pub fn resolve_logo<F: Fetcher + ?Sized>(source: &LogoSource, url: &str, fetcher: &F) -> Result<ResolvedLogo> {
    let resolved = match source {
        LogoSource::Explicit(path) => ResolvedLogo::Explicit(load_logo(path)?),
        LogoSource::Suppressed => ResolvedLogo::Suppressed,
        LogoSource::AutoDiscover => discover(fetcher, url),
    };

    match &resolved {
        ResolvedLogo::Explicit(img) => log::info!("Using logo file ({}x{})", img.width(), img.height()),
        ResolvedLogo::Discovered { image, source_url } => {
            log::info!("Using favicon {} ({}x{})", source_url, image.width(), image.height())
        }
        ResolvedLogo::Suppressed => log::info!("Logo suppressed"),
        ResolvedLogo::NotFound => log::info!("No favicon found for {}", url),
    }
    Ok(resolved)
}
