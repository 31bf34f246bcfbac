use chrono::{DateTime, Local, TimeDelta};

use crate::constants::constants;
use crate::model::{Channel, Program};
use crate::timeline::floor_to_hour;

/// Sample schedule used when the backend cannot be reached.
///
/// Deterministic for a given hour: the roster, titles and flagship come from
/// the embedded constants and programs run hourly from the top of `now`'s hour.
pub fn fallback_channels(now: DateTime<Local>) -> Vec<Channel> {
  constants()
    .fallback_channels
    .iter()
    .map(|c| Channel {
      id: c.id,
      number: c.number.clone(),
      name: c.name.clone(),
      logo: Some(c.logo.clone()),
      logo_url: None,
      programs: fallback_programs(c.id, now),
    })
    .collect()
}

fn fallback_programs(channel_id: i64, now: DateTime<Local>) -> Vec<Program> {
  let c = constants();
  let base = floor_to_hour(now);
  (0..c.fallback_programs_per_channel)
    .map(|i| {
      let start = base + TimeDelta::hours(i as i64);
      let end = start + TimeDelta::hours(1);
      let id = format!("fallback-{}-{}", channel_id, i);
      if i == 0 {
        let f = &c.flagship;
        return Program {
          id,
          title: f.title.clone(),
          episode: Some(f.episode.clone()),
          start,
          end,
          description: Some(f.description.clone()),
          image: Some(f.image.clone()),
          rating: f.rating.clone(),
        };
      }
      let title = c.fallback_titles[i % c.fallback_titles.len()].clone();
      Program {
        id,
        episode: Some(format!("S1 E{}", i + 1)),
        start,
        end,
        description: Some(format!("Description for {}.", title)),
        image: Some(c.fallback_image.replace("{n}", &(i + 1).to_string())),
        rating: None,
        title,
      }
    })
    .collect()
}
