use image::{DynamicImage, imageops::FilterType};
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::ThumbnailMode;

/// Darkest to brightest.
const RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Resize a thumbnail to fill `area` for the given mode.
///
/// A half-block cell carries two pixel rows, so blocks get twice the
/// vertical resolution of the ASCII ramp.
pub fn fit_thumbnail(image: &DynamicImage, area: Rect, mode: ThumbnailMode) -> DynamicImage {
  let w = (area.width as u32).max(1);
  let rows = (area.height as u32).max(1);
  let h = if mode == ThumbnailMode::Blocks { rows * 2 } else { rows };
  image.resize_to_fill(w, h, FilterType::Triangle)
}

/// Draws an already-fitted image into the buffer, centered in its area.
pub struct ThumbnailWidget<'a> {
  pub image: &'a DynamicImage,
  pub mode: ThumbnailMode,
}

impl Widget for ThumbnailWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.mode {
      ThumbnailMode::Blocks => draw_blocks(self.image, area, buf),
      ThumbnailMode::Ascii => draw_ramp(self.image, area, buf),
      ThumbnailMode::Off => {}
    }
  }
}

fn centered(area: Rect, cols: u32, rows: u32) -> (u16, u16, u16, u16) {
  let cols = cols.min(area.width as u32) as u16;
  let rows = rows.min(area.height as u32) as u16;
  let x = area.x + (area.width - cols) / 2;
  let y = area.y + (area.height - rows) / 2;
  (x, y, cols, rows)
}

fn draw_blocks(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let rgb = image.to_rgb8();
  let (x0, y0, cols, rows) = centered(area, rgb.width(), rgb.height().div_ceil(2));
  for row in 0..rows {
    for col in 0..cols {
      let (px, top_y) = (col as u32, row as u32 * 2);
      let top = rgb.get_pixel(px, top_y);
      let bottom = if top_y + 1 < rgb.height() {
        let p = rgb.get_pixel(px, top_y + 1);
        Color::Rgb(p[0], p[1], p[2])
      } else {
        Color::Reset
      };
      if let Some(cell) = buf.cell_mut((x0 + col, y0 + row)) {
        cell.set_char('▀').set_style(Style::default().fg(Color::Rgb(top[0], top[1], top[2])).bg(bottom));
      }
    }
  }
}

fn draw_ramp(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  let (x0, y0, cols, rows) = centered(area, luma.width(), luma.height());
  let top = (RAMP.len() - 1) as f32;
  for row in 0..rows {
    for col in 0..cols {
      let level = luma.get_pixel(col as u32, row as u32)[0] as f32 / 255.0;
      let glyph = RAMP[((level * top).round() as usize).min(RAMP.len() - 1)];
      if let Some(cell) = buf.cell_mut((x0 + col, y0 + row)) {
        cell.set_char(glyph);
      }
    }
  }
}
