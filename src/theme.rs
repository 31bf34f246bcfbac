use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub block_bg: Color,
  pub airing_bg: Color,
  pub live: Color,
  pub favorite: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  pub status: Color,
  pub error: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "Midnight",
    bg: Color::Rgb(14, 17, 28),
    fg: Color::Rgb(222, 226, 238),
    muted: Color::Rgb(112, 120, 145),
    accent: Color::Rgb(98, 160, 255),
    border: Color::Rgb(52, 60, 84),
    highlight_fg: Color::Rgb(14, 17, 28),
    highlight_bg: Color::Rgb(98, 160, 255),
    stripe_bg: Color::Rgb(20, 24, 38),
    block_bg: Color::Rgb(34, 40, 60),
    airing_bg: Color::Rgb(40, 64, 104),
    live: Color::Rgb(240, 72, 72),
    favorite: Color::Rgb(255, 96, 128),
    key_fg: Color::Rgb(14, 17, 28),
    key_bg: Color::Rgb(112, 120, 145),
    status: Color::Rgb(250, 204, 90),
    error: Color::Rgb(240, 72, 72),
  },
  Theme {
    name: "Daylight",
    bg: Color::Rgb(246, 245, 240),
    fg: Color::Rgb(36, 38, 44),
    muted: Color::Rgb(128, 128, 120),
    accent: Color::Rgb(20, 110, 200),
    border: Color::Rgb(200, 198, 190),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(20, 110, 200),
    stripe_bg: Color::Rgb(236, 234, 228),
    block_bg: Color::Rgb(222, 220, 212),
    airing_bg: Color::Rgb(196, 220, 246),
    live: Color::Rgb(204, 36, 36),
    favorite: Color::Rgb(214, 40, 90),
    key_fg: Color::Rgb(255, 255, 255),
    key_bg: Color::Rgb(128, 128, 120),
    status: Color::Rgb(170, 110, 0),
    error: Color::Rgb(204, 36, 36),
  },
  Theme {
    name: "Classic",
    bg: Color::Reset,
    fg: Color::White,
    muted: Color::DarkGray,
    accent: Color::Cyan,
    border: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::Cyan,
    stripe_bg: Color::Reset,
    block_bg: Color::Blue,
    airing_bg: Color::LightBlue,
    live: Color::Red,
    favorite: Color::LightRed,
    key_fg: Color::Black,
    key_bg: Color::Gray,
    status: Color::Yellow,
    error: Color::Red,
  },
];
