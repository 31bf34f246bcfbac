use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;

use crate::timeline;

pub type ChannelId = i64;

// --- Categories ---

/// Sidebar categories. Each one maps to exactly one channel fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  All,
  Recent,
  Favorites,
  Sports,
  Kids,
  Movies,
  TvShows,
}

impl Category {
  pub const ALL: [Category; 7] = [
    Category::All,
    Category::Recent,
    Category::Favorites,
    Category::Sports,
    Category::Kids,
    Category::Movies,
    Category::TvShows,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Category::All => "All",
      Category::Recent => "Recent",
      Category::Favorites => "Favorites",
      Category::Sports => "Sports",
      Category::Kids => "Kids",
      Category::Movies => "Movies",
      Category::TvShows => "TV Shows",
    }
  }

  /// Value of the `category` query parameter, or `None` for the unfiltered list.
  pub fn query_value(self) -> Option<&'static str> {
    match self {
      Category::All => None,
      other => Some(other.label()),
    }
  }
}

// --- Schedule ---

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
  pub id: String,
  pub title: String,
  pub episode: Option<String>,
  pub start: DateTime<Local>,
  pub end: DateTime<Local>,
  pub description: Option<String>,
  /// Thumbnail URL.
  pub image: Option<String>,
  pub rating: Option<String>,
}

impl Program {
  pub fn is_airing(&self, now: DateTime<Local>) -> bool {
    timeline::is_airing(self, now)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
  pub id: ChannelId,
  pub number: String,
  pub name: String,
  /// Emoji shown in place of the logo image.
  pub logo: Option<String>,
  pub logo_url: Option<String>,
  pub programs: Vec<Program>,
}

impl Channel {
  /// Logo emoji, or the first letter of the channel name.
  pub fn badge(&self) -> String {
    match self.logo.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      Some(logo) => logo.to_string(),
      None => self.name.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default(),
    }
  }
}

// --- Wire format ---

/// Accepts both `"2.1"` and `2.1` for fields the backend is loose about.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
  Text(String),
  Number(serde_json::Number),
}

impl From<Loose> for String {
  fn from(value: Loose) -> Self {
    match value {
      Loose::Text(s) => s,
      Loose::Number(n) => n.to_string(),
    }
  }
}

#[derive(Deserialize)]
struct WireChannel {
  id: ChannelId,
  number: Loose,
  name: String,
  #[serde(default)]
  logo: Option<String>,
  #[serde(default)]
  logo_url: Option<String>,
  #[serde(default)]
  programs: Vec<WireProgram>,
}

#[derive(Deserialize)]
struct WireProgram {
  id: Loose,
  title: String,
  #[serde(default)]
  episode: Option<String>,
  start_time: String,
  end_time: String,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  image: Option<String>,
  #[serde(default)]
  rating: Option<String>,
}

#[derive(Deserialize)]
struct WireFavorites {
  favorite_channels: Vec<ChannelId>,
}

#[derive(Deserialize)]
struct WireToggle {
  is_favorite: bool,
}

fn non_empty(s: Option<String>) -> Option<String> {
  s.filter(|s| !s.trim().is_empty())
}

/// Parse an ISO-8601 timestamp. Strings without an offset are taken as local time.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Local>> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Local));
  }
  let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
    .with_context(|| format!("Invalid timestamp: {:?}", raw))?;
  Local.from_local_datetime(&naive).earliest().ok_or_else(|| anyhow!("Timestamp does not exist locally: {:?}", raw))
}

impl TryFrom<WireProgram> for Program {
  type Error = anyhow::Error;

  fn try_from(w: WireProgram) -> Result<Self> {
    let start = parse_timestamp(&w.start_time).context("start_time")?;
    let end = parse_timestamp(&w.end_time).context("end_time")?;
    Ok(Program {
      id: w.id.into(),
      title: w.title,
      episode: non_empty(w.episode),
      start,
      end,
      description: non_empty(w.description),
      image: non_empty(w.image),
      rating: non_empty(w.rating),
    })
  }
}

impl TryFrom<WireChannel> for Channel {
  type Error = anyhow::Error;

  fn try_from(w: WireChannel) -> Result<Self> {
    let id = w.id;
    let programs = w
      .programs
      .into_iter()
      .map(Program::try_from)
      .collect::<Result<Vec<_>>>()
      .with_context(|| format!("Bad program in channel {}", id))?;
    Ok(Channel {
      id,
      number: w.number.into(),
      name: w.name,
      logo: non_empty(w.logo),
      logo_url: non_empty(w.logo_url),
      programs,
    })
  }
}

/// Parse the `/api/channels` response body.
pub fn parse_channels(body: &[u8]) -> Result<Vec<Channel>> {
  let wire: Vec<WireChannel> = serde_json::from_slice(body).context("Failed to parse channel list JSON")?;
  wire.into_iter().map(Channel::try_from).collect()
}

/// Parse the `/api/favorites` response body.
pub fn parse_favorites(body: &[u8]) -> Result<Vec<ChannelId>> {
  let wire: WireFavorites = serde_json::from_slice(body).context("Failed to parse favorites JSON")?;
  Ok(wire.favorite_channels)
}

/// Parse the favorite toggle response body into the server's new state.
pub fn parse_toggle(body: &[u8]) -> Result<bool> {
  let wire: WireToggle = serde_json::from_slice(body).context("Failed to parse favorite toggle JSON")?;
  Ok(wire.is_favorite)
}
