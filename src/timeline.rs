//! Viewing-window projection.
//!
//! The grid always shows one fixed window: it starts on the hour `back_hours`
//! before now and spans `span_minutes`. Headers, the now-marker and program
//! blocks are all placed against that same window.

use chrono::{DateTime, Local, TimeDelta, Timelike};

use crate::constants::constants;
use crate::model::Program;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
  pub back_hours: i64,
  pub span_minutes: i64,
  pub header_step_minutes: i64,
  /// Minimum block width in layout units (columns).
  pub min_block_width: f64,
  pub min_block_percent: f64,
}

impl Default for WindowConfig {
  fn default() -> Self {
    let c = constants();
    Self {
      back_hours: c.window_back_hours,
      span_minutes: c.window_span_minutes,
      header_step_minutes: c.header_step_minutes,
      min_block_width: c.min_block_width,
      min_block_percent: c.min_block_percent,
    }
  }
}

/// Horizontal placement of a block in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPlacement {
  pub left: f64,
  pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentSpan {
  pub start: f64,
  pub width: f64,
}

/// Truncate to the top of the hour.
pub fn floor_to_hour(t: DateTime<Local>) -> DateTime<Local> {
  t.with_minute(0).and_then(|t| t.with_second(0)).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
}

fn minutes_between(from: DateTime<Local>, to: DateTime<Local>) -> f64 {
  (to - from).num_milliseconds() as f64 / 60_000.0
}

pub fn window_start(now: DateTime<Local>, cfg: &WindowConfig) -> DateTime<Local> {
  floor_to_hour(now - TimeDelta::hours(cfg.back_hours))
}

pub fn window_end(now: DateTime<Local>, cfg: &WindowConfig) -> DateTime<Local> {
  window_start(now, cfg) + TimeDelta::minutes(cfg.span_minutes)
}

pub fn format_clock(t: DateTime<Local>) -> String {
  t.format("%-I:%M:%S %p").to_string()
}

pub fn format_hour(t: DateTime<Local>) -> String {
  t.format("%-I:%M %p").to_string()
}

/// "Today" followed by one label per header step across the window.
pub fn time_headers(now: DateTime<Local>, cfg: &WindowConfig) -> Vec<String> {
  let start = window_start(now, cfg);
  let steps = cfg.span_minutes / cfg.header_step_minutes.max(1);
  let mut headers = Vec::with_capacity(steps as usize + 1);
  headers.push("Today".to_string());
  headers.extend((0..steps).map(|i| format_hour(start + TimeDelta::minutes(i * cfg.header_step_minutes))));
  headers
}

/// Column of each time label (excluding "Today") for a grid `width` columns wide.
pub fn header_offsets(cfg: &WindowConfig, width: u16) -> Vec<u16> {
  let steps = cfg.span_minutes / cfg.header_step_minutes.max(1);
  let scale = width as f64 / cfg.span_minutes as f64;
  (0..steps).map(|i| ((i * cfg.header_step_minutes) as f64 * scale).floor() as u16).collect()
}

pub fn now_marker_percent(now: DateTime<Local>, cfg: &WindowConfig) -> f64 {
  let elapsed = minutes_between(window_start(now, cfg), now);
  (elapsed / cfg.span_minutes as f64 * 100.0).clamp(0.0, 100.0)
}

/// Place a program on the time axis. `scale` is layout units per minute.
pub fn program_position(
  program: &Program,
  window_start: DateTime<Local>,
  scale: f64,
  min_width: f64,
) -> BlockPlacement {
  let left = minutes_between(window_start, program.start).max(0.0) * scale;
  let width = (minutes_between(program.start, program.end) * scale).max(min_width);
  BlockPlacement { left, width }
}

/// Start and width of a program as percentages of the window.
pub fn program_span_percent(program: &Program, window_start: DateTime<Local>, cfg: &WindowConfig) -> PercentSpan {
  let span = cfg.span_minutes as f64;
  let start = (minutes_between(window_start, program.start) / span * 100.0).clamp(0.0, 100.0);
  let width = (minutes_between(program.start, program.end) / span * 100.0).max(cfg.min_block_percent);
  PercentSpan { start, width }
}

/// Placement clipped to the window, or `None` when the program lies outside it.
pub fn visible_block(
  program: &Program,
  window_start: DateTime<Local>,
  cfg: &WindowConfig,
  scale: f64,
) -> Option<BlockPlacement> {
  let window_end = window_start + TimeDelta::minutes(cfg.span_minutes);
  if program.end <= window_start || program.start >= window_end {
    return None;
  }
  let mut placement = program_position(program, window_start, scale, cfg.min_block_width);
  // A program that started before the window only shows its remaining part.
  if program.start < window_start {
    placement.width = (minutes_between(window_start, program.end) * scale).max(cfg.min_block_width);
  }
  let right_edge = cfg.span_minutes as f64 * scale;
  placement.width = placement.width.min((right_edge - placement.left).max(0.0));
  Some(placement)
}

/// Half-open: a program stops airing at the instant it ends.
pub fn is_airing(program: &Program, now: DateTime<Local>) -> bool {
  program.start <= now && now < program.end
}
