use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::debug;

use crate::model::{self, Category, Channel, ChannelId};

/// HTTP client for the guide backend.
#[derive(Debug, Clone)]
pub struct EpgClient {
  http: Client,
  base_url: String,
}

impl EpgClient {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    Url::parse(&base_url).with_context(|| format!("Invalid backend URL: {}", base_url))?;
    let http = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("tvguide/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;
    Ok(Self { http, base_url })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    let raw = format!("{}/api/{}", self.base_url, path.trim_start_matches('/'));
    Url::parse(&raw).with_context(|| format!("Invalid endpoint URL: {}", raw))
  }

  pub fn channels_url(&self, category: Category) -> Result<Url> {
    let mut url = self.endpoint("channels")?;
    if let Some(value) = category.query_value() {
      url.query_pairs_mut().append_pair("category", value);
    }
    Ok(url)
  }

  async fn read_ok(response: Response, what: &str) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
      return Err(anyhow!("{} failed: HTTP {}", what, status));
    }
    let bytes = response.bytes().await.with_context(|| format!("Failed to read {} response", what))?;
    Ok(bytes.to_vec())
  }

  pub async fn fetch_channels(&self, category: Category) -> Result<Vec<Channel>> {
    let url = self.channels_url(category)?;
    debug!(%url, "api: fetching channels");
    let response = self.http.get(url).send().await.context("Channel request failed")?;
    let body = Self::read_ok(response, "Channel request").await?;
    model::parse_channels(&body)
  }

  pub async fn fetch_favorites(&self) -> Result<Vec<ChannelId>> {
    let url = self.endpoint("favorites")?;
    let response = self.http.get(url).send().await.context("Favorites request failed")?;
    let body = Self::read_ok(response, "Favorites request").await?;
    model::parse_favorites(&body)
  }

  /// Flip a channel's favorite flag; returns the server's new state.
  pub async fn toggle_favorite(&self, channel_id: ChannelId) -> Result<bool> {
    let url = self.endpoint(&format!("channels/{}/favorite", channel_id))?;
    let response = self.http.post(url).send().await.context("Favorite toggle request failed")?;
    let body = Self::read_ok(response, "Favorite toggle").await?;
    model::parse_toggle(&body)
  }

  pub async fn mark_recent(&self, channel_id: ChannelId) -> Result<()> {
    let url = self.endpoint(&format!("channels/{}/recent", channel_id))?;
    let response = self.http.post(url).send().await.context("Recent request failed")?;
    Self::read_ok(response, "Recent request").await.map(|_| ())
  }

  pub async fn fetch_thumbnail(&self, url: &str) -> Result<DynamicImage> {
    let response = self.http.get(url).send().await.with_context(|| format!("Thumbnail request failed: {}", url))?;
    let bytes = Self::read_ok(response, "Thumbnail request").await?;
    image::load_from_memory(&bytes).with_context(|| format!("Failed to decode image from memory (URL: {})", url))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;
  use tokio::sync::oneshot;

  /// Serve exactly one HTTP response and report the request line.
  async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut request = Vec::new();
      let mut buf = [0u8; 1024];
      while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
          break;
        }
        request.extend_from_slice(&buf[..n]);
      }
      let request = String::from_utf8_lossy(&request);
      let _ = tx.send(request.lines().next().unwrap_or_default().to_string());
      let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      let _ = socket.shutdown().await;
    });
    (format!("http://{}", addr), rx)
  }

  fn client(base: &str) -> EpgClient {
    EpgClient::new(base, Duration::from_secs(5)).unwrap()
  }

  #[test]
  fn channels_url_encodes_category() {
    let c = client("http://localhost:8000/");
    assert_eq!(c.channels_url(Category::All).unwrap().as_str(), "http://localhost:8000/api/channels");
    assert_eq!(
      c.channels_url(Category::TvShows).unwrap().as_str(),
      "http://localhost:8000/api/channels?category=TV+Shows"
    );
  }

  #[test]
  fn base_path_prefix_is_kept() {
    let c = client("https://guide.example.com/epg");
    assert_eq!(c.channels_url(Category::Kids).unwrap().as_str(), "https://guide.example.com/epg/api/channels?category=Kids");
  }

  #[test]
  fn rejects_invalid_base_url() {
    assert!(EpgClient::new("not a url", Duration::from_secs(1)).is_err());
  }

  #[tokio::test]
  async fn fetch_channels_parses_body() {
    let body = r#"[{"id": 2, "number": "4.1", "name": "NBC", "programs": [
      {"id": "a", "title": "News", "start_time": "2026-10-16T10:00:00", "end_time": "2026-10-16T11:00:00"}]}]"#;
    let (base, request) = serve_once("200 OK", body).await;
    let channels = client(&base).fetch_channels(Category::Sports).await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].programs[0].title, "News");
    assert_eq!(request.await.unwrap(), "GET /api/channels?category=Sports HTTP/1.1");
  }

  #[tokio::test]
  async fn fetch_channels_fails_on_server_error() {
    let (base, _) = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#).await;
    let err = client(&base).fetch_channels(Category::All).await.unwrap_err();
    assert!(format!("{:#}", err).contains("500"));
  }

  #[tokio::test]
  async fn toggle_favorite_posts_and_reads_state() {
    let (base, request) = serve_once("200 OK", r#"{"channel_id": 7, "is_favorite": false}"#).await;
    assert!(!client(&base).toggle_favorite(7).await.unwrap());
    assert_eq!(request.await.unwrap(), "POST /api/channels/7/favorite HTTP/1.1");
  }

  #[tokio::test]
  async fn favorites_and_recent() {
    let (base, _) = serve_once("200 OK", r#"{"favorite_channels": [1, 6], "count": 2}"#).await;
    assert_eq!(client(&base).fetch_favorites().await.unwrap(), vec![1, 6]);

    let (base, request) = serve_once("200 OK", r#"{"message": "ok"}"#).await;
    client(&base).mark_recent(3).await.unwrap();
    assert_eq!(request.await.unwrap(), "POST /api/channels/3/recent HTTP/1.1");
  }

  #[tokio::test]
  async fn unreachable_backend_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    assert!(client(&format!("http://{}", addr)).fetch_favorites().await.is_err());
  }
}
