//! Source adapters, one per supported location.

pub mod kelowna;
pub mod muscat;

pub use kelowna::KelownaSource;
pub use muscat::MuscatSource;

use salah_types::SalahError;
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector, SalahError> {
    Selector::parse(css).map_err(|e| SalahError::parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Whitespace-collapsed text content of an element.
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}
