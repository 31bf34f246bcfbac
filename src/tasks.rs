use chrono::Local;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::EpgClient;
use crate::app::{AppEvent, Command};

/// Send `Tick` once a second until aborted or the receiver is gone.
pub fn spawn_clock(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
      ticker.tick().await;
      if tx.send(AppEvent::Tick(Local::now())).is_err() {
        break;
      }
    }
  })
}

/// Run a command in the background; its result comes back through `tx`.
pub fn dispatch(client: &EpgClient, command: Command, tx: &UnboundedSender<AppEvent>) {
  let client = client.clone();
  let tx = tx.clone();
  match command {
    Command::FetchChannels { request, category } => {
      tokio::spawn(async move {
        let result = client.fetch_channels(category).await;
        let _ = tx.send(AppEvent::ChannelsLoaded { request, category, result });
      });
    }
    Command::FetchFavorites => {
      tokio::spawn(async move {
        let _ = tx.send(AppEvent::FavoritesLoaded(client.fetch_favorites().await));
      });
    }
    Command::ToggleFavorite { channel_id, was_favorite, request } => {
      tokio::spawn(async move {
        let result = client.toggle_favorite(channel_id).await;
        let _ = tx.send(AppEvent::FavoriteToggled { channel_id, was_favorite, request, result });
      });
    }
    Command::MarkRecent(channel_id) => {
      tokio::spawn(async move {
        if let Err(e) = client.mark_recent(channel_id).await {
          debug!(channel_id, err = %format!("{:#}", e), "recent: mark failed");
        }
      });
    }
    Command::FetchThumbnail(url) => {
      tokio::spawn(async move {
        let result = client.fetch_thumbnail(&url).await;
        let _ = tx.send(AppEvent::ThumbnailLoaded { url, result });
      });
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Category;
  use tokio::sync::mpsc;

  #[tokio::test]
  async fn unreachable_channel_fetch_reports_back_with_request_tag() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = EpgClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(&client, Command::FetchChannels { request: 9, category: Category::Kids }, &tx);
    match rx.recv().await {
      Some(AppEvent::ChannelsLoaded { request, category, result }) => {
        assert_eq!(request, 9);
        assert_eq!(category, Category::Kids);
        assert!(result.is_err());
      }
      _ => panic!("expected ChannelsLoaded"),
    }
  }

  #[tokio::test]
  async fn clock_ticks_until_receiver_drops() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_clock(tx);
    assert!(matches!(rx.recv().await, Some(AppEvent::Tick(_))));
    assert!(matches!(rx.recv().await, Some(AppEvent::Tick(_))));
    drop(rx);
    tokio::time::timeout(Duration::from_secs(3), handle).await.unwrap().unwrap();
  }
}
