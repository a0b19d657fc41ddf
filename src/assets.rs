//! Sources for the prebuilt visualization bundle.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const SHELL_FILE: &str = "index.html";
pub const STYLESHEET_FILE: &str = "global.css";
pub const BUNDLE_FILE: &str = "novagraph.js";

/// Capability to fetch the three bundle assets.
pub trait AssetProvider {
    /// Self-contained HTML document used by placeholder injection.
    fn html_shell(&self) -> Result<Cow<'_, str>>;

    /// Stylesheet inlined into the event-injection document.
    fn stylesheet(&self) -> Result<Cow<'_, str>>;

    /// Compiled renderer script.
    fn script_bundle(&self) -> Result<Cow<'_, str>>;
}

impl<T: AssetProvider + ?Sized> AssetProvider for &T {
    fn html_shell(&self) -> Result<Cow<'_, str>> {
        (**self).html_shell()
    }

    fn stylesheet(&self) -> Result<Cow<'_, str>> {
        (**self).stylesheet()
    }

    fn script_bundle(&self) -> Result<Cow<'_, str>> {
        (**self).script_bundle()
    }
}

impl<T: AssetProvider + ?Sized> AssetProvider for Box<T> {
    fn html_shell(&self) -> Result<Cow<'_, str>> {
        (**self).html_shell()
    }

    fn stylesheet(&self) -> Result<Cow<'_, str>> {
        (**self).stylesheet()
    }

    fn script_bundle(&self) -> Result<Cow<'_, str>> {
        (**self).script_bundle()
    }
}

/// Assets compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledAssets;

impl BundledAssets {
    const SHELL: &'static str = include_str!("../assets/index.html");
    const STYLESHEET: &'static str = include_str!("../assets/global.css");
    const BUNDLE: &'static str = include_str!("../assets/novagraph.js");
}

impl AssetProvider for BundledAssets {
    fn html_shell(&self) -> Result<Cow<'_, str>> {
        Ok(Cow::Borrowed(Self::SHELL))
    }

    fn stylesheet(&self) -> Result<Cow<'_, str>> {
        Ok(Cow::Borrowed(Self::STYLESHEET))
    }

    fn script_bundle(&self) -> Result<Cow<'_, str>> {
        Ok(Cow::Borrowed(Self::BUNDLE))
    }
}

/// Assets read from a build output directory on every call.
///
/// Expects `index.html`, `global.css` and `novagraph.js` directly under `root`.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, asset: &'static str) -> Result<Cow<'_, str>> {
        let path = self.root.join(asset);
        tracing::debug!(path = %path.display(), "loading bundle asset");
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Cow::Owned(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(Error::ResourceNotFound { asset, path })
            }
            Err(err) => Err(Error::Io(err)),
        }
    }
}

impl AssetProvider for DirAssets {
    fn html_shell(&self) -> Result<Cow<'_, str>> {
        self.read(SHELL_FILE)
    }

    fn stylesheet(&self) -> Result<Cow<'_, str>> {
        self.read(STYLESHEET_FILE)
    }

    fn script_bundle(&self) -> Result<Cow<'_, str>> {
        self.read(BUNDLE_FILE)
    }
}
