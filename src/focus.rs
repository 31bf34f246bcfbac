use crate::model::{Category, Channel, ChannelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
  #[default]
  Sidebar,
  Grid,
}

/// Navigation input after key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
  Up,
  Down,
  Left,
  Right,
  Enter,
  Favorite,
}

/// What the app has to do after a focus transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEffect {
  None,
  /// The grid cell changed; the detail panel must follow it.
  SelectionChanged,
  ActivateCategory(Category),
  ToggleFavorite(ChannelId),
  /// Enter on a grid cell.
  Tune(ChannelId),
}

/// Keyboard focus: which section is active and where in it.
///
/// Grid indices always stay inside the current data; an empty channel
/// list pins them at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
  pub section: Section,
  pub sidebar: usize,
  pub channel: usize,
  pub program: usize,
}

fn last_index(len: usize) -> usize {
  len.saturating_sub(1)
}

impl FocusState {
  pub fn sidebar_len() -> usize {
    Category::ALL.len()
  }

  pub fn in_grid(&self) -> bool {
    self.section == Section::Grid
  }

  pub fn reset_grid(&mut self) {
    self.channel = 0;
    self.program = 0;
  }

  /// Pull the grid indices back inside `channels`.
  pub fn clamp_to(&mut self, channels: &[Channel]) {
    self.channel = self.channel.min(last_index(channels.len()));
    let programs = channels.get(self.channel).map_or(0, |c| c.programs.len());
    self.program = self.program.min(last_index(programs));
  }

  pub fn focused_channel<'a>(&self, channels: &'a [Channel]) -> Option<&'a Channel> {
    channels.get(self.channel)
  }

  pub fn apply(&mut self, key: NavKey, channels: &[Channel]) -> FocusEffect {
    match self.section {
      Section::Sidebar => self.apply_sidebar(key),
      Section::Grid => self.apply_grid(key, channels),
    }
  }

  fn apply_sidebar(&mut self, key: NavKey) -> FocusEffect {
    match key {
      NavKey::Up => {
        self.sidebar = self.sidebar.saturating_sub(1);
        FocusEffect::None
      }
      NavKey::Down => {
        self.sidebar = (self.sidebar + 1).min(Self::sidebar_len() - 1);
        FocusEffect::None
      }
      NavKey::Right => {
        self.section = Section::Grid;
        FocusEffect::SelectionChanged
      }
      NavKey::Enter => {
        let category = Category::ALL[self.sidebar.min(Self::sidebar_len() - 1)];
        self.reset_grid();
        FocusEffect::ActivateCategory(category)
      }
      NavKey::Left | NavKey::Favorite => FocusEffect::None,
    }
  }

  fn apply_grid(&mut self, key: NavKey, channels: &[Channel]) -> FocusEffect {
    let before = (self.channel, self.program);
    match key {
      NavKey::Up => self.channel = self.channel.saturating_sub(1),
      NavKey::Down => self.channel = (self.channel + 1).min(last_index(channels.len())),
      NavKey::Left => self.program = self.program.saturating_sub(1),
      NavKey::Right => {
        let programs = channels.get(self.channel).map_or(0, |c| c.programs.len());
        self.program = (self.program + 1).min(last_index(programs));
      }
      NavKey::Enter => {
        return self.focused_channel(channels).map_or(FocusEffect::None, |c| FocusEffect::Tune(c.id));
      }
      NavKey::Favorite => {
        return self.focused_channel(channels).map_or(FocusEffect::None, |c| FocusEffect::ToggleFavorite(c.id));
      }
    }
    self.clamp_to(channels);
    if (self.channel, self.program) != before { FocusEffect::SelectionChanged } else { FocusEffect::None }
  }
}
