use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliThumbnailMode {
  Auto,
  Blocks,
  Ascii,
  Off,
}

impl CliThumbnailMode {
  /// Parse the `thumbnails` preference; unknown values mean auto-detect.
  pub fn from_config(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "blocks" => CliThumbnailMode::Blocks,
      "ascii" => CliThumbnailMode::Ascii,
      "off" => CliThumbnailMode::Off,
      _ => CliThumbnailMode::Auto,
    }
  }
}

/// How program thumbnails are drawn in the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailMode {
  /// True-color half-block cells.
  Blocks,
  /// Grayscale character ramp.
  Ascii,
  /// No image fetching; the emoji fallback is always shown.
  Off,
}

impl ThumbnailMode {
  pub fn label(self) -> &'static str {
    match self {
      ThumbnailMode::Blocks => "blocks",
      ThumbnailMode::Ascii => "ascii",
      ThumbnailMode::Off => "off",
    }
  }

  pub fn fetches_images(self) -> bool {
    self != ThumbnailMode::Off
  }
}

/// Half-blocks need 24-bit color; everything else gets the ASCII ramp.
pub fn detect_thumbnail_mode() -> ThumbnailMode {
  let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_lowercase();
  if colorterm == "truecolor" || colorterm == "24bit" { ThumbnailMode::Blocks } else { ThumbnailMode::Ascii }
}

pub fn resolve_thumbnail_mode(cli: CliThumbnailMode) -> ThumbnailMode {
  match cli {
    CliThumbnailMode::Auto => detect_thumbnail_mode(),
    CliThumbnailMode::Blocks => ThumbnailMode::Blocks,
    CliThumbnailMode::Ascii => ThumbnailMode::Ascii,
    CliThumbnailMode::Off => ThumbnailMode::Off,
  }
}
