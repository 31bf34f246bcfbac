//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` and parsed once on first
//! access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// One entry of the sample channel roster.
#[derive(Debug, Deserialize)]
pub struct FallbackChannel {
  pub id: i64,
  pub number: String,
  pub name: String,
  pub logo: String,
}

/// The fixed first program of every sample channel.
#[derive(Debug, Deserialize)]
pub struct Flagship {
  pub title: String,
  pub episode: String,
  pub description: String,
  pub image: String,
  pub rating: Option<String>,
}

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub default_backend_url: String,
  pub request_timeout_secs: u64,
  pub info_message_secs: i64,

  // Viewing window
  pub window_back_hours: i64,
  pub window_span_minutes: i64,
  pub header_step_minutes: i64,
  pub min_block_width: f64,
  pub min_block_percent: f64,

  pub icon_bar: Vec<String>,

  // Fallback schedule
  pub fallback_channels: Vec<FallbackChannel>,
  pub fallback_programs_per_channel: usize,
  pub fallback_titles: Vec<String>,
  /// Image URL template; `{n}` is replaced by the 1-based program slot.
  pub fallback_image: String,
  pub flagship: Flagship,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed every test fails loudly.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.fallback_channels.len(), 7);
    assert_eq!(c.fallback_programs_per_channel, 6);
    assert!(!c.fallback_titles.is_empty());
    assert_eq!(c.window_span_minutes % c.header_step_minutes, 0);
  }
}
