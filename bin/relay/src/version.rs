//! Version information for btcrelay.

/// The short version information for btcrelay.
pub(crate) const SHORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The long version information for btcrelay.
pub(crate) const LONG_VERSION: &str = concat!(
    "Version: ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Description: ",
    env!("CARGO_PKG_DESCRIPTION"),
    "\n",
    "Repository: ",
    env!("CARGO_PKG_REPOSITORY")
);
