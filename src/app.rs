//! Application state and its single update function.
//!
//! Everything that changes the view arrives as an [`AppEvent`] and is handled
//! by [`App::update`] on the UI task. Side effects are returned as
//! [`Command`]s for the runtime to perform; their results come back later as
//! new events. `App` never touches the network or the terminal itself.

use anyhow::Result;
use chrono::{DateTime, Local, TimeDelta};
use image::DynamicImage;
use ratatui::crossterm::event::KeyEvent;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::display::ThumbnailMode;
use crate::fallback::fallback_channels;
use crate::focus::{FocusEffect, FocusState, NavKey, Section};
use crate::input;
use crate::model::{Category, Channel, ChannelId, Program};
use crate::theme::{THEMES, Theme};
use crate::timeline::WindowConfig;

/// Banner text shown when the guide could not be loaded.
pub const LOAD_ERROR: &str = "Failed to load TV guide data";

// --- Events & commands ---

pub enum AppEvent {
  /// One-second clock tick.
  Tick(DateTime<Local>),
  Key(KeyEvent),
  ChannelsLoaded { request: u64, category: Category, result: Result<Vec<Channel>> },
  FavoritesLoaded(Result<Vec<ChannelId>>),
  FavoriteToggled { channel_id: ChannelId, was_favorite: bool, request: u64, result: Result<bool> },
  ThumbnailLoaded { url: String, result: Result<DynamicImage> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  FetchChannels { request: u64, category: Category },
  FetchFavorites,
  ToggleFavorite { channel_id: ChannelId, was_favorite: bool, request: u64 },
  MarkRecent(ChannelId),
  FetchThumbnail(String),
}

// --- Thumbnails ---

pub enum Thumbnail {
  Loading,
  Ready(DynamicImage),
  Failed,
}

/// Decoded thumbnails by URL, plus the last fitted copy for the render loop.
#[derive(Default)]
pub struct ThumbnailCache {
  pub images: HashMap<String, Thumbnail>,
  pub fitted: Option<(String, u16, u16, DynamicImage)>,
}

// --- App state ---

pub struct Settings {
  pub thumbnail_mode: ThumbnailMode,
  pub theme_index: usize,
}

impl Default for Settings {
  fn default() -> Self {
    Self { thumbnail_mode: ThumbnailMode::Off, theme_index: 0 }
  }
}

pub struct App {
  pub now: DateTime<Local>,
  pub window: WindowConfig,
  /// Category whose data is (or is being) shown.
  pub category: Category,
  pub focus: FocusState,
  pub channels: Vec<Channel>,
  pub favorites: BTreeSet<ChannelId>,
  /// Program shown in the detail panel.
  pub selected_program: Option<Program>,
  pub loading: bool,
  /// Dismissible load-failure banner.
  pub load_error: Option<String>,
  pub using_fallback: bool,
  pub info_message: Option<String>,
  info_expires: Option<DateTime<Local>>,
  pub theme_index: usize,
  pub thumbnail_mode: ThumbnailMode,
  pub thumbnails: ThumbnailCache,
  /// First visible channel row; kept in sync with focus by the renderer.
  pub grid_offset: usize,
  pub should_quit: bool,
  /// Set when the theme changed and preferences need saving.
  pub prefs_dirty: bool,
  /// Number of the latest channel request; older completions are stale.
  channels_request: u64,
  /// Latest toggle number per channel; only that toggle's reply is applied.
  favorite_requests: HashMap<ChannelId, u64>,
  toggle_seq: u64,
}

impl App {
  pub fn new(settings: Settings, now: DateTime<Local>) -> Self {
    Self {
      now,
      window: WindowConfig::default(),
      category: Category::All,
      focus: FocusState::default(),
      channels: Vec::new(),
      favorites: BTreeSet::new(),
      selected_program: None,
      loading: false,
      load_error: None,
      using_fallback: false,
      info_message: None,
      info_expires: None,
      theme_index: settings.theme_index.min(THEMES.len() - 1),
      thumbnail_mode: settings.thumbnail_mode,
      thumbnails: ThumbnailCache::default(),
      grid_offset: 0,
      should_quit: false,
      prefs_dirty: false,
      channels_request: 0,
      favorite_requests: HashMap::new(),
      toggle_seq: 0,
    }
  }

  /// Initial loads: the unfiltered guide and the favorites set.
  pub fn start(&mut self) -> Vec<Command> {
    vec![self.request_channels(Category::All), Command::FetchFavorites]
  }

  pub fn theme(&self) -> &'static Theme {
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.prefs_dirty = true;
  }

  pub fn focused_channel(&self) -> Option<&Channel> {
    self.focus.focused_channel(&self.channels)
  }

  /// Channel shown in the detail header: the focused one, else the first.
  pub fn detail_channel(&self) -> Option<&Channel> {
    self.focused_channel().or(self.channels.first())
  }

  pub fn is_favorite(&self, channel_id: ChannelId) -> bool {
    self.favorites.contains(&channel_id)
  }

  pub fn set_info(&mut self, msg: String) {
    self.info_message = Some(msg);
    self.info_expires = Some(self.now + TimeDelta::seconds(constants().info_message_secs));
  }

  pub fn dismiss_error(&mut self) {
    self.load_error = None;
  }

  // --- Update ---

  pub fn update(&mut self, event: AppEvent) -> Vec<Command> {
    match event {
      AppEvent::Tick(now) => {
        self.now = now;
        if self.info_expires.is_some_and(|t| now >= t) {
          self.info_message = None;
          self.info_expires = None;
        }
        Vec::new()
      }
      AppEvent::Key(key) => input::handle_key_event(self, key),
      AppEvent::ChannelsLoaded { request, category, result } => self.on_channels_loaded(request, category, result),
      AppEvent::FavoritesLoaded(result) => {
        match result {
          Ok(ids) => {
            debug!(count = ids.len(), "favorites loaded");
            self.favorites = ids.into_iter().collect();
            if self.category == Category::Favorites && !self.loading {
              return self.filter_favorites();
            }
          }
          Err(e) => warn!(err = %format!("{:#}", e), "favorites: load failed"),
        }
        Vec::new()
      }
      AppEvent::FavoriteToggled { channel_id, was_favorite, request, result } => {
        self.on_favorite_toggled(channel_id, was_favorite, request, result)
      }
      AppEvent::ThumbnailLoaded { url, result } => {
        let entry = match result {
          Ok(image) => Thumbnail::Ready(image),
          Err(e) => {
            debug!(%url, err = %format!("{:#}", e), "thumbnail: load failed");
            Thumbnail::Failed
          }
        };
        self.thumbnails.images.insert(url, entry);
        Vec::new()
      }
    }
  }

  /// Apply a navigation key to the focus machine and carry out its effect.
  pub fn navigate(&mut self, key: NavKey) -> Vec<Command> {
    match self.focus.apply(key, &self.channels) {
      FocusEffect::None => Vec::new(),
      FocusEffect::SelectionChanged => self.sync_selection(),
      FocusEffect::ActivateCategory(category) => {
        info!(category = category.label(), "category activated");
        vec![self.request_channels(category)]
      }
      FocusEffect::ToggleFavorite(channel_id) => self.toggle_favorite(channel_id),
      FocusEffect::Tune(channel_id) => {
        if let Some(name) = self.focused_channel().map(|c| c.name.clone()) {
          self.set_info(format!("Now watching {}", name));
        }
        vec![Command::MarkRecent(channel_id)]
      }
    }
  }

  /// Re-issue the load for the active category (the banner's Retry).
  pub fn retry(&mut self) -> Vec<Command> {
    self.load_error = None;
    vec![self.request_channels(self.category)]
  }

  pub fn leave_grid(&mut self) {
    self.focus.section = Section::Sidebar;
  }

  fn request_channels(&mut self, category: Category) -> Command {
    self.channels_request += 1;
    self.category = category;
    self.loading = true;
    self.focus.reset_grid();
    // The old selection belongs to the list being replaced.
    self.selected_program = None;
    Command::FetchChannels { request: self.channels_request, category }
  }

  fn on_channels_loaded(&mut self, request: u64, category: Category, result: Result<Vec<Channel>>) -> Vec<Command> {
    if request != self.channels_request || category != self.category {
      debug!(request, latest = self.channels_request, category = category.label(), "discarding stale channel load");
      return Vec::new();
    }
    self.loading = false;
    match result {
      Ok(channels) => {
        info!(category = category.label(), channels = channels.len(), "channels loaded");
        self.channels = channels;
        self.load_error = None;
        self.using_fallback = false;
      }
      Err(e) => {
        warn!(category = category.label(), err = %format!("{:#}", e), "channels: load failed, using sample data");
        self.channels = fallback_channels(self.now);
        self.load_error = Some(LOAD_ERROR.to_string());
        self.using_fallback = true;
      }
    }
    if category == Category::Favorites {
      return self.filter_favorites();
    }
    self.grid_offset = 0;
    self.focus.clamp_to(&self.channels);
    if self.channels.is_empty() {
      self.selected_program = None;
      return Vec::new();
    }
    self.sync_selection()
  }

  /// Keep only channels in the local favorites set, for backends that
  /// ignore the category query.
  fn filter_favorites(&mut self) -> Vec<Command> {
    let favorites = &self.favorites;
    self.channels.retain(|c| favorites.contains(&c.id));
    self.grid_offset = 0;
    self.focus.clamp_to(&self.channels);
    if self.channels.is_empty() {
      self.selected_program = None;
      return Vec::new();
    }
    self.sync_selection()
  }

  /// Point the detail panel at the focused cell. A failed lookup keeps the old selection.
  fn sync_selection(&mut self) -> Vec<Command> {
    let found = self.channels.get(self.focus.channel).and_then(|c| c.programs.get(self.focus.program)).cloned();
    if let Some(program) = found {
      self.selected_program = Some(program);
    }
    self.thumbnail_commands()
  }

  fn thumbnail_commands(&mut self) -> Vec<Command> {
    if !self.thumbnail_mode.fetches_images() {
      return Vec::new();
    }
    let Some(url) = self.selected_program.as_ref().and_then(|p| p.image.clone()) else { return Vec::new() };
    if self.thumbnails.images.contains_key(&url) {
      return Vec::new();
    }
    self.thumbnails.images.insert(url.clone(), Thumbnail::Loading);
    vec![Command::FetchThumbnail(url)]
  }

  fn toggle_favorite(&mut self, channel_id: ChannelId) -> Vec<Command> {
    let was_favorite = self.favorites.contains(&channel_id);
    // Optimistic; reconciled when the server answers.
    if was_favorite {
      self.favorites.remove(&channel_id);
    } else {
      self.favorites.insert(channel_id);
    }
    self.toggle_seq += 1;
    self.favorite_requests.insert(channel_id, self.toggle_seq);
    vec![Command::ToggleFavorite { channel_id, was_favorite, request: self.toggle_seq }]
  }

  fn on_favorite_toggled(
    &mut self,
    channel_id: ChannelId,
    was_favorite: bool,
    request: u64,
    result: Result<bool>,
  ) -> Vec<Command> {
    if self.favorite_requests.get(&channel_id) != Some(&request) {
      debug!(channel_id, request, "discarding superseded favorite toggle");
      return Vec::new();
    }
    self.favorite_requests.remove(&channel_id);
    let is_favorite = match result {
      Ok(state) => state,
      Err(e) => {
        warn!(channel_id, err = %format!("{:#}", e), "favorites: toggle failed, reverting");
        was_favorite
      }
    };
    if is_favorite {
      self.favorites.insert(channel_id);
    } else {
      self.favorites.remove(&channel_id);
    }
    if self.category == Category::Favorites && was_favorite && !is_favorite {
      return vec![self.request_channels(Category::Favorites)];
    }
    Vec::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;
  use chrono::TimeZone;
  use ratatui::crossterm::event::{KeyCode, KeyModifiers};

  fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 16, 14, 20, 0).single().unwrap()
  }

  fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn program(id: &str, hour: u32) -> Program {
    let start = Local.with_ymd_and_hms(2026, 10, 16, hour, 0, 0).single().unwrap();
    Program {
      id: id.into(),
      title: format!("Show {}", id),
      episode: None,
      start,
      end: start + TimeDelta::hours(1),
      description: None,
      image: Some(format!("http://img/{}", id)),
      rating: None,
    }
  }

  /// `rows` channels with two programs each.
  fn guide(rows: usize) -> Vec<Channel> {
    (0..rows)
      .map(|i| Channel {
        id: i as i64 + 1,
        number: format!("{}.1", i + 2),
        name: format!("CH{}", i + 1),
        logo: None,
        logo_url: None,
        programs: vec![program(&format!("{}a", i), 14), program(&format!("{}b", i), 15)],
      })
      .collect()
  }

  /// App that has completed its initial load with `channels`.
  fn loaded(channels: Vec<Channel>) -> App {
    let mut app = App::new(Settings::default(), now());
    let cmds = app.start();
    let Command::FetchChannels { request, category } = cmds[0] else { panic!("expected channel fetch") };
    app.update(AppEvent::ChannelsLoaded { request, category, result: Ok(channels) });
    app
  }

  fn press(app: &mut App, codes: &[KeyCode]) -> Vec<Command> {
    codes.iter().flat_map(|&c| app.update(key(c))).collect()
  }

  #[test]
  fn start_issues_guide_and_favorites_fetch() {
    let mut app = App::new(Settings::default(), now());
    let cmds = app.start();
    assert_eq!(cmds, vec![Command::FetchChannels { request: 1, category: Category::All }, Command::FetchFavorites]);
    assert!(app.loading);
  }

  #[test]
  fn initial_load_selects_first_program() {
    let app = loaded(guide(3));
    assert!(!app.loading);
    assert_eq!(app.selected_program.as_ref().map(|p| p.id.as_str()), Some("0a"));
  }

  #[test]
  fn arrow_scenario_lands_on_last_row() {
    let mut app = loaded(guide(3));
    press(&mut app, &[KeyCode::Right, KeyCode::Down, KeyCode::Down, KeyCode::Down]);
    assert_eq!((app.focus.channel, app.focus.program), (2, 0));
    assert_eq!(app.selected_program.as_ref().map(|p| p.id.as_str()), Some("2a"));
  }

  #[test]
  fn category_switch_resets_focus_and_fetches_once() {
    let mut app = loaded(guide(3));
    press(&mut app, &[KeyCode::Right, KeyCode::Down, KeyCode::Right, KeyCode::Esc]);
    assert_eq!((app.focus.channel, app.focus.program), (1, 1));
    let cmds = press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
    assert_eq!(cmds, vec![Command::FetchChannels { request: 2, category: Category::Sports }]);
    assert_eq!((app.focus.channel, app.focus.program), (0, 0));
    assert_eq!(app.category, Category::Sports);
  }

  #[test]
  fn stale_channel_load_is_discarded() {
    let mut app = loaded(guide(1));
    press(&mut app, &[KeyCode::Down, KeyCode::Enter]); // Recent, request 2
    press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]); // Sports, request 3
    let late = app.update(AppEvent::ChannelsLoaded { request: 2, category: Category::Recent, result: Ok(guide(5)) });
    assert!(late.is_empty());
    assert_eq!(app.channels.len(), 1);
    assert!(app.loading);
    app.update(AppEvent::ChannelsLoaded { request: 3, category: Category::Sports, result: Ok(guide(4)) });
    assert_eq!(app.channels.len(), 4);
    assert!(!app.loading);
  }

  #[test]
  fn failed_load_shows_fallback_and_banner_then_retries() {
    let mut app = App::new(Settings::default(), now());
    app.start();
    app.update(AppEvent::ChannelsLoaded {
      request: 1,
      category: Category::All,
      result: Err(anyhow!("Channel request failed: HTTP 500 Internal Server Error")),
    });
    assert_eq!(app.channels.len(), 7);
    assert!(app.channels.iter().all(|c| c.programs.len() == 6));
    assert_eq!(app.load_error.as_deref(), Some(LOAD_ERROR));
    assert!(app.using_fallback);
    assert_eq!(app.selected_program.as_ref().map(|p| p.title.as_str()), Some("The Jennifer Hudson Show"));

    let cmds = press(&mut app, &[KeyCode::Char('r')]);
    assert_eq!(cmds, vec![Command::FetchChannels { request: 2, category: Category::All }]);
    assert!(app.load_error.is_none());
  }

  #[test]
  fn banner_can_be_dismissed() {
    let mut app = App::new(Settings::default(), now());
    app.start();
    app.update(AppEvent::ChannelsLoaded { request: 1, category: Category::All, result: Err(anyhow!("timeout")) });
    press(&mut app, &[KeyCode::Esc]);
    assert!(app.load_error.is_none());
    assert!(!app.should_quit);
    assert_eq!(app.channels.len(), 7);
  }

  #[test]
  fn empty_guide_keeps_selection_empty() {
    let mut app = loaded(Vec::new());
    let cmds = press(&mut app, &[KeyCode::Right, KeyCode::Down, KeyCode::Right, KeyCode::Char('f'), KeyCode::Enter]);
    assert!(cmds.is_empty());
    assert_eq!((app.focus.channel, app.focus.program), (0, 0));
    assert!(app.selected_program.is_none());
  }

  /// Backend stand-in that flips membership like the real endpoint.
  fn serve_toggle(server: &mut BTreeSet<ChannelId>, cmd: &Command) -> AppEvent {
    let Command::ToggleFavorite { channel_id, was_favorite, request } = *cmd else { panic!("expected toggle") };
    let now_fav = if server.remove(&channel_id) {
      false
    } else {
      server.insert(channel_id);
      true
    };
    AppEvent::FavoriteToggled { channel_id, was_favorite, request, result: Ok(now_fav) }
  }

  #[test]
  fn favorite_toggle_twice_restores_state() {
    let mut app = loaded(guide(3));
    app.update(AppEvent::FavoritesLoaded(Ok(vec![3])));
    let mut server = BTreeSet::from([3]);
    press(&mut app, &[KeyCode::Right, KeyCode::Down]);

    let first = press(&mut app, &[KeyCode::Char('f')]);
    assert!(app.is_favorite(2));
    app.update(serve_toggle(&mut server, &first[0]));
    assert!(app.is_favorite(2));

    let second = press(&mut app, &[KeyCode::Char('F')]);
    app.update(serve_toggle(&mut server, &second[0]));
    assert!(!app.is_favorite(2));
    assert_eq!(app.favorites, BTreeSet::from([3]));
    assert_eq!(server, BTreeSet::from([3]));
  }

  #[test]
  fn failed_toggle_reverts() {
    let mut app = loaded(guide(2));
    let cmds = press(&mut app, &[KeyCode::Right, KeyCode::Char('f')]);
    assert_eq!(cmds, vec![Command::ToggleFavorite { channel_id: 1, was_favorite: false, request: 1 }]);
    assert!(app.is_favorite(1));
    app.update(AppEvent::FavoriteToggled {
      channel_id: 1,
      was_favorite: false,
      request: 1,
      result: Err(anyhow!("offline")),
    });
    assert!(!app.is_favorite(1));
  }

  #[test]
  fn reordered_toggle_replies_follow_the_latest_request() {
    let mut app = loaded(guide(2));
    let mut server = BTreeSet::new();
    let first = press(&mut app, &[KeyCode::Right, KeyCode::Char('f')]);
    let second = press(&mut app, &[KeyCode::Char('f')]);
    assert!(!app.is_favorite(1));

    // The server applies both toggles in order; the replies arrive swapped.
    let first_reply = serve_toggle(&mut server, &first[0]);
    let second_reply = serve_toggle(&mut server, &second[0]);
    app.update(second_reply);
    app.update(first_reply);
    assert_eq!(app.is_favorite(1), server.contains(&1));
    assert!(!app.is_favorite(1));
  }

  #[test]
  fn superseded_toggle_error_does_not_revert() {
    let mut app = loaded(guide(2));
    let mut server = BTreeSet::new();
    let first = press(&mut app, &[KeyCode::Right, KeyCode::Char('f')]);
    let second = press(&mut app, &[KeyCode::Char('f'), KeyCode::Char('f')]);
    let Command::ToggleFavorite { request: stale, .. } = first[0] else { panic!("expected toggle") };
    assert!(app.is_favorite(1));

    for cmd in &second {
      let reply = serve_toggle(&mut server, cmd);
      app.update(reply);
    }
    app.update(AppEvent::FavoriteToggled {
      channel_id: 1,
      was_favorite: false,
      request: stale,
      result: Err(anyhow!("timeout")),
    });
    assert_eq!(app.is_favorite(1), server.contains(&1));
  }

  #[test]
  fn unfavoriting_in_favorites_view_refetches() {
    let mut app = loaded(guide(2));
    app.update(AppEvent::FavoritesLoaded(Ok(vec![1, 2])));
    press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
    assert_eq!(app.category, Category::Favorites);
    app.update(AppEvent::ChannelsLoaded { request: 2, category: Category::Favorites, result: Ok(guide(2)) });

    let cmds = press(&mut app, &[KeyCode::Right, KeyCode::Char('f')]);
    let follow =
      app.update(AppEvent::FavoriteToggled { channel_id: 1, was_favorite: true, request: 1, result: Ok(false) });
    assert_eq!(cmds.len(), 1);
    assert_eq!(follow, vec![Command::FetchChannels { request: 3, category: Category::Favorites }]);
  }

  #[test]
  fn favorites_view_keeps_only_local_favorites() {
    let mut app = loaded(guide(3));
    app.update(AppEvent::FavoritesLoaded(Ok(vec![2])));
    press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
    // Backend ignored the category query and sent everything.
    app.update(AppEvent::ChannelsLoaded { request: 2, category: Category::Favorites, result: Ok(guide(3)) });
    assert_eq!(app.channels.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
    assert_eq!(app.selected_program.as_ref().map(|p| p.id.as_str()), Some("1a"));
    assert_eq!(app.channels.len(), app.favorites.len());
  }

  #[test]
  fn category_switch_clears_selection_until_load() {
    let mut app = loaded(guide(3));
    press(&mut app, &[KeyCode::Right, KeyCode::Down, KeyCode::Down, KeyCode::Esc]);
    assert_eq!(app.selected_program.as_ref().map(|p| p.id.as_str()), Some("2a"));
    press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
    assert!(app.loading);
    assert!(app.selected_program.is_none());
    app.update(AppEvent::ChannelsLoaded { request: 2, category: Category::Recent, result: Ok(guide(2)) });
    assert_eq!(app.selected_program.as_ref().map(|p| p.id.as_str()), Some("0a"));
  }

  #[test]
  fn enter_on_grid_marks_recent() {
    let mut app = loaded(guide(2));
    let cmds = press(&mut app, &[KeyCode::Right, KeyCode::Down, KeyCode::Enter]);
    assert_eq!(cmds, vec![Command::MarkRecent(2)]);
    assert_eq!(app.info_message.as_deref(), Some("Now watching CH2"));
  }

  #[test]
  fn tick_updates_clock_and_expires_info() {
    let mut app = loaded(guide(1));
    app.set_info("hello".into());
    app.update(AppEvent::Tick(now() + TimeDelta::seconds(1)));
    assert!(app.info_message.is_some());
    app.update(AppEvent::Tick(now() + TimeDelta::seconds(10)));
    assert!(app.info_message.is_none());
    assert_eq!(app.now, now() + TimeDelta::seconds(10));
  }

  #[test]
  fn thumbnails_are_requested_once_per_url() {
    let mut app = App::new(Settings { thumbnail_mode: ThumbnailMode::Ascii, theme_index: 0 }, now());
    let cmds = app.start();
    let Command::FetchChannels { request, category } = cmds[0] else { panic!("expected channel fetch") };
    let cmds = app.update(AppEvent::ChannelsLoaded { request, category, result: Ok(guide(2)) });
    assert_eq!(cmds, vec![Command::FetchThumbnail("http://img/0a".into())]);

    let cmds = press(&mut app, &[KeyCode::Right, KeyCode::Right, KeyCode::Left]);
    assert_eq!(cmds, vec![Command::FetchThumbnail("http://img/0b".into())]);

    app.update(AppEvent::ThumbnailLoaded { url: "http://img/0b".into(), result: Err(anyhow!("404")) });
    assert!(matches!(app.thumbnails.images.get("http://img/0b"), Some(Thumbnail::Failed)));
  }

  #[test]
  fn favorites_load_failure_keeps_previous_set() {
    let mut app = loaded(guide(1));
    app.update(AppEvent::FavoritesLoaded(Ok(vec![4])));
    app.update(AppEvent::FavoritesLoaded(Err(anyhow!("down"))));
    assert_eq!(app.favorites, BTreeSet::from([4]));
  }
}
