use ratatui::{
  Frame,
  buffer::Buffer,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, Thumbnail};
use crate::constants::constants;
use crate::display::ThumbnailMode;
use crate::focus::Section;
use crate::graphics::{ThumbnailWidget, fit_thumbnail};
use crate::model::{Category, Channel, Program};
use crate::theme::Theme;
use crate::timeline::{self, format_clock, format_hour};

/// Width of the channel info column in the grid.
const INFO_W: u16 = 20;
/// Lines per channel row.
const ROW_H: u16 = 2;

// --- Helpers ---

/// Truncate to `max_width` display columns, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.width() <= max_width {
    return s.to_string();
  }
  let mut out = String::new();
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w + 1 > max_width {
      break;
    }
    out.push(c);
    used += w;
  }
  if max_width > 0 {
    out.push('…');
  }
  out
}

/// One-line strip marking where a program sits inside the viewing window.
fn window_strip(program: &Program, app: &App, width: usize) -> String {
  let ws = timeline::window_start(app.now, &app.window);
  let span = timeline::program_span_percent(program, ws, &app.window);
  let from = (span.start / 100.0 * width as f64).floor() as usize;
  let to = (((span.start + span.width) / 100.0) * width as f64).ceil() as usize;
  let now = (timeline::now_marker_percent(app.now, &app.window) / 100.0 * width as f64) as usize;
  (0..width)
    .map(|i| {
      if i == now.min(width.saturating_sub(1)) {
        '│'
      } else if i >= from && i < to.max(from + 1) {
        '━'
      } else {
        '─'
      }
    })
    .collect()
}

fn footer_keys(app: &App) -> Vec<(&'static str, &'static str)> {
  let mut keys = match app.focus.section {
    Section::Sidebar => vec![("↑↓", "Category"), ("Enter", "Show"), ("→", "Guide")],
    Section::Grid => vec![("←↑↓→", "Move"), ("Enter", "Watch"), ("f", "Favorite"), ("Esc", "Categories")],
  };
  if app.load_error.is_some() {
    keys.push(("r", "Retry"));
    keys.push(("Esc", "Dismiss"));
  } else {
    keys.push(("r", "Reload"));
  }
  keys.push(("^t", "Theme"));
  keys.push(("q", "Quit"));
  keys
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)), frame.area());

  let banner_h = if app.load_error.is_some() { 1 } else { 0 };
  let [top_area, banner_area, body_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(banner_h),
    Constraint::Min(6),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_top_bar(frame, app, top_area);
  if banner_h > 0 {
    render_banner(frame, app, banner_area);
  }

  let [icon_area, sidebar_area, main_area] =
    Layout::horizontal([Constraint::Length(4), Constraint::Length(20), Constraint::Min(30)]).areas(body_area);
  render_icon_bar(frame, theme, icon_area);
  render_sidebar(frame, app, sidebar_area);

  let [detail_area, grid_area] = Layout::vertical([Constraint::Length(9), Constraint::Min(4)]).areas(main_area);
  render_detail(frame, app, detail_area);
  render_grid(frame, app, grid_area);
  render_footer(frame, app, footer_area);
}

fn render_top_bar(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(vec![
    Span::styled(format!(" {} ", format_clock(app.now)), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)),
    Span::styled(" R ", Style::default().fg(theme.highlight_fg).bg(theme.live).add_modifier(Modifier::BOLD)),
    Span::styled("  ▶ tvguide", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
  ]);
  frame.render_widget(left, area);

  let (text, style) = if app.loading {
    ("⏳ Loading TV guide… ".to_string(), Style::default().fg(theme.status))
  } else if let Some(msg) = &app.info_message {
    (format!("{} ", msg), Style::default().fg(theme.status))
  } else if app.using_fallback {
    ("Sample data ".to_string(), Style::default().fg(theme.muted))
  } else {
    (format!("📺 {} channels ", app.channels.len()), Style::default().fg(theme.muted))
  };
  let w = (text.width() as u16).min(area.width);
  let right_area = Rect { x: area.x + area.width - w, width: w, ..area };
  frame.render_widget(Paragraph::new(text).style(style), right_area);
}

fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let msg = app.load_error.as_deref().unwrap_or_default();
  let line = Line::from(vec![
    Span::styled(format!(" ⚠  {} · showing sample data ", msg), Style::default().fg(theme.error)),
    Span::styled(" r ", Style::default().fg(theme.key_fg).bg(theme.key_bg)),
    Span::styled(" Retry  ", Style::default().fg(theme.muted)),
    Span::styled(" Esc ", Style::default().fg(theme.key_fg).bg(theme.key_bg)),
    Span::styled(" Dismiss", Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(line, area);
}

fn render_icon_bar(frame: &mut Frame, theme: &Theme, area: Rect) {
  let lines: Vec<Line> = constants()
    .icon_bar
    .iter()
    .flat_map(|icon| [Line::from(Span::styled(format!(" {}", icon), Style::default().fg(theme.muted))), Line::from("")])
    .collect();
  let block = Block::default().borders(Borders::RIGHT).border_style(Style::default().fg(theme.border));
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let focused = app.focus.section == Section::Sidebar;
  let inner_w = area.width.saturating_sub(2) as usize;

  let mut lines = vec![Line::from("")];
  for (i, category) in Category::ALL.iter().enumerate() {
    let active = *category == app.category;
    let marker = if active { "›" } else { " " };
    let mut label = format!("{} {}", marker, category.label());
    if *category == Category::Favorites {
      label.push_str(&format!(" ♥ {}", app.favorites.len()));
    }
    let style = if focused && i == app.focus.sidebar {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else if active {
      Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.fg)
    };
    let pad = inner_w.saturating_sub(label.width());
    lines.push(Line::from(Span::styled(format!("{}{}", label, " ".repeat(pad)), style)));
  }

  let border = if focused { theme.accent } else { theme.border };
  let block = Block::bordered()
    .title(" Categories ")
    .title_style(Style::default().fg(border))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border));
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_detail(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let block = Block::bordered()
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let Some(program) = app.selected_program.clone() else {
    let text = if app.loading { "Loading…" } else { "No program selected" };
    frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.muted)), inner);
    return;
  };
  let airing = program.is_airing(app.now);
  let channel = app.detail_channel().cloned();

  let [thumb_area, _, text_area] =
    Layout::horizontal([Constraint::Length(24), Constraint::Length(2), Constraint::Min(10)]).areas(inner);
  render_thumbnail(frame, app, &program, channel.as_ref(), thumb_area);
  if airing && thumb_area.height > 0 {
    let badge = Rect { y: thumb_area.y + thumb_area.height - 1, height: 1, width: 8.min(thumb_area.width), ..thumb_area };
    frame.render_widget(
      Paragraph::new(" ● LIVE ").style(Style::default().fg(theme.highlight_fg).bg(theme.live).add_modifier(Modifier::BOLD)),
      badge,
    );
  }

  let w = text_area.width as usize;
  let mut lines = Vec::new();
  if let Some(ch) = &channel {
    lines.push(Line::from(vec![
      Span::styled(format!("{} ", ch.badge()), Style::default().fg(theme.fg)),
      Span::styled(ch.name.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)),
      Span::styled(format!("  {}", ch.number), Style::default().fg(theme.muted)),
    ]));
  }
  lines.push(Line::from(Span::styled(
    truncate_str(&program.title, w),
    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
  )));

  let mut meta = Vec::new();
  if let Some(ep) = &program.episode {
    meta.push(ep.clone());
  }
  meta.push(program.title.clone());
  meta.push(format!("{} - {}", format_hour(program.start), format_hour(program.end)));
  let mut meta_spans = vec![Span::styled(truncate_str(&meta.join(" | "), w), Style::default().fg(theme.muted))];
  if airing {
    meta_spans.push(Span::styled("  ● LIVE NOW", Style::default().fg(theme.live).add_modifier(Modifier::BOLD)));
  }
  lines.push(Line::from(meta_spans));
  lines.push(Line::from(Span::styled(window_strip(&program, app, w.min(48)), Style::default().fg(theme.border))));
  if let Some(desc) = &program.description {
    lines.push(Line::from(Span::styled(desc.clone(), Style::default().fg(theme.fg))));
  }
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);
}

/// Thumbnail, or the channel's emoji when there is no usable image.
fn render_thumbnail(frame: &mut Frame, app: &mut App, program: &Program, channel: Option<&Channel>, area: Rect) {
  let theme = app.theme();
  let mode = app.thumbnail_mode;
  let url = program.image.clone().filter(|_| mode.fetches_images());

  let cache = &mut app.thumbnails;
  let state = url.as_ref().and_then(|u| cache.images.get(u));
  if let (Some(url), Some(Thumbnail::Ready(image))) = (&url, state) {
    let stale = match &cache.fitted {
      Some((id, w, h, _)) => id != url || *w != area.width || *h != area.height,
      None => true,
    };
    if stale {
      cache.fitted = Some((url.clone(), area.width, area.height, fit_thumbnail(image, area, mode)));
    }
    if let Some((_, _, _, fitted)) = &cache.fitted {
      frame.render_widget(ThumbnailWidget { image: fitted, mode }, area);
    }
    return;
  }

  let caption = match state {
    Some(Thumbnail::Loading) => "loading…",
    _ if mode == ThumbnailMode::Off => "",
    _ => "no image",
  };
  let badge = channel.map(|c| c.badge()).unwrap_or_else(|| "📺".to_string());
  let lines = vec![
    Line::from(""),
    Line::from(""),
    Line::from(Span::styled(badge, Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(Span::styled(caption, Style::default().fg(theme.muted))),
  ];
  frame.render_widget(
    Paragraph::new(lines).alignment(Alignment::Center).style(Style::default().bg(theme.stripe_bg)),
    area,
  );
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let title = format!(
    " Guide · {} · {} – {} ",
    app.category.label(),
    format_hour(timeline::window_start(app.now, &app.window)),
    format_hour(timeline::window_end(app.now, &app.window)),
  );
  let grid_focused = app.focus.section == Section::Grid;
  let border = if grid_focused { theme.accent } else { theme.border };
  let block = Block::bordered()
    .title(title)
    .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border));
  let inner = block.inner(area);
  frame.render_widget(block, area);
  if inner.height == 0 {
    return;
  }

  if app.channels.is_empty() {
    let text = if app.loading {
      "Loading TV Guide…".to_string()
    } else {
      format!("No channels in {}", app.category.label())
    };
    let y = inner.y + inner.height / 2;
    frame.render_widget(
      Paragraph::new(text).alignment(Alignment::Center).style(Style::default().fg(theme.muted)),
      Rect { y, height: 1, ..inner },
    );
    return;
  }
  if inner.width <= INFO_W + 4 || inner.height < 1 + ROW_H {
    return;
  }

  let [header_area, rows_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(ROW_H)]).areas(inner);
  let time_x = inner.x + INFO_W;
  let time_w = inner.width - INFO_W;
  let scale = time_w as f64 / app.window.span_minutes as f64;
  let ws = timeline::window_start(app.now, &app.window);
  let now_col = time_x + ((timeline::now_marker_percent(app.now, &app.window) / 100.0) * time_w as f64) as u16;
  let now_col = now_col.min(time_x + time_w - 1);

  render_time_header(frame.buffer_mut(), app, theme, header_area, time_x, time_w, now_col);

  let visible = (rows_area.height / ROW_H).max(1) as usize;
  if app.focus.channel < app.grid_offset {
    app.grid_offset = app.focus.channel;
  } else if app.focus.channel >= app.grid_offset + visible {
    app.grid_offset = app.focus.channel + 1 - visible;
  }
  app.grid_offset = app.grid_offset.min(app.channels.len().saturating_sub(visible));

  let buf = frame.buffer_mut();
  for (row, (ci, channel)) in app.channels.iter().enumerate().skip(app.grid_offset).take(visible).enumerate() {
    let y = rows_area.y + row as u16 * ROW_H;
    let row_bg = if ci % 2 == 1 { theme.stripe_bg } else { theme.bg };
    let row_rect = Rect { x: inner.x, y, width: inner.width, height: ROW_H };
    buf.set_style(row_rect, Style::default().bg(row_bg));

    let heart = if app.is_favorite(channel.id) {
      Span::styled("♥ ", Style::default().fg(theme.favorite))
    } else {
      Span::styled("♡ ", Style::default().fg(theme.muted))
    };
    let info_w = INFO_W.saturating_sub(1);
    buf.set_line(inner.x, y, &Line::from(vec![heart, Span::styled(channel.number.clone(), Style::default().fg(theme.muted))]), info_w);
    let name = truncate_str(&format!("{} {}", channel.badge(), channel.name), info_w as usize);
    buf.set_stringn(inner.x, y + 1, name, info_w as usize, Style::default().fg(theme.fg).add_modifier(Modifier::BOLD));

    let focus_row = grid_focused && ci == app.focus.channel;
    let mut focus_drawn = false;
    for (pi, program) in channel.programs.iter().enumerate() {
      let Some(place) = timeline::visible_block(program, ws, &app.window, scale) else { continue };
      let x = time_x + place.left.round() as u16;
      let w = (place.width.round() as u16).min(time_x + time_w - x.min(time_x + time_w));
      if w == 0 || x >= time_x + time_w {
        continue;
      }
      let focused = focus_row && pi == app.focus.program;
      focus_drawn |= focused;
      let airing = program.is_airing(app.now);
      render_block(buf, theme, program, Rect { x, y, width: w, height: ROW_H }, focused, airing);
    }

    for dy in 0..ROW_H {
      if let Some(cell) = buf.cell_mut((now_col, y + dy))
        && cell.symbol() == " "
      {
        cell.set_char('│').set_fg(theme.live);
      }
    }

    if focus_row
      && !focus_drawn
      && let Some(program) = channel.programs.get(app.focus.program)
    {
      let after = program.start >= ws;
      render_edge_marker(buf, theme, program, Rect { x: time_x, y, width: time_w, height: ROW_H }, after);
    }
  }
}

/// Focused program outside the window: a highlighted tag pinned to the
/// edge it lies beyond.
fn render_edge_marker(buf: &mut Buffer, theme: &Theme, program: &Program, lane: Rect, after: bool) {
  let w = ((program.title.width() + 4) as u16).min((lane.width / 2).max(1));
  let text_w = w.saturating_sub(2) as usize;
  let title = truncate_str(&program.title, text_w.saturating_sub(2));
  let label = if after { format!("{} ▶", title) } else { format!("◀ {}", title) };
  let x = if after { lane.x + lane.width - w } else { lane.x };
  let style = Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD);
  buf.set_style(Rect { x, width: w, ..lane }, style);
  buf.set_stringn(x + 1, lane.y, label, text_w, style);
  buf.set_stringn(x + 1, lane.y + 1, format_hour(program.start), text_w, style.remove_modifier(Modifier::BOLD));
}

fn render_time_header(
  buf: &mut Buffer,
  app: &App,
  theme: &Theme,
  area: Rect,
  time_x: u16,
  time_w: u16,
  now_col: u16,
) {
  let headers = timeline::time_headers(app.now, &app.window);
  let offsets = timeline::header_offsets(&app.window, time_w);
  buf.set_stringn(area.x, area.y, &headers[0], INFO_W as usize, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

  let mut next_free = time_x;
  for (label, offset) in headers.iter().skip(1).zip(offsets) {
    let x = time_x + offset;
    let w = label.width() as u16;
    if x < next_free || x + w > time_x + time_w {
      continue;
    }
    buf.set_string(x, area.y, label, Style::default().fg(theme.muted));
    next_free = x + w + 2;
  }

  let marker = "▼NOW";
  let x = now_col.min((time_x + time_w).saturating_sub(marker.width() as u16));
  buf.set_string(x, area.y, marker, Style::default().fg(theme.live).add_modifier(Modifier::BOLD));
}

fn render_block(buf: &mut Buffer, theme: &Theme, program: &Program, area: Rect, focused: bool, airing: bool) {
  let style = if focused {
    Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
  } else if airing {
    Style::default().fg(theme.fg).bg(theme.airing_bg)
  } else {
    Style::default().fg(theme.fg).bg(theme.block_bg)
  };
  buf.set_style(area, style);
  for dy in 0..area.height {
    if let Some(cell) = buf.cell_mut((area.x, area.y + dy)) {
      cell.set_char('▏').set_fg(theme.border);
    }
  }
  if area.width < 2 {
    return;
  }
  let text_w = (area.width - 1) as usize;
  buf.set_stringn(area.x + 1, area.y, truncate_str(&program.title, text_w), text_w, style);

  let mut second = format_hour(program.start);
  if let Some(rating) = &program.rating {
    second.push_str(&format!(" [{}]", rating));
  }
  if airing {
    second.push_str(" ●");
  }
  buf.set_stringn(area.x + 1, area.y + 1, truncate_str(&second, text_w), text_w, style.remove_modifier(Modifier::BOLD));
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys = footer_keys(app);
  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw(" "));
      }
      s
    })
    .collect();
  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let w = (theme_label.width() as u16).min(area.width);
  let right_area = Rect { x: area.x + area.width - w, width: w, ..area };
  frame.render_widget(Line::from(Span::styled(theme_label, Style::default().fg(theme.muted))), right_area);
}
