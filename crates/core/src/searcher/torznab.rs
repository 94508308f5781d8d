//! Torznab/Newznab search backend.
//!
//! Speaks the `t=search` API shared by Jackett, Prowlarr and most usenet
//! indexers, and reads the RSS feed they answer with.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::BackendConfig;

use super::{Backend, RawCandidate, SearchError};

/// A Torznab-compatible indexer.
pub struct TorznabBackend {
    client: Client,
    config: BackendConfig,
}

impl TorznabBackend {
    /// Create a backend for `config`.
    ///
    /// `timeout` bounds each HTTP request at the transport level.
    pub fn new(config: BackendConfig, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Build the search URL for `query`.
    fn build_search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/api?t=search&q={}&apikey={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(query),
            urlencoding::encode(&self.config.api_key)
        );

        if !self.config.categories.is_empty() {
            let cats: Vec<String> = self.config.categories.iter().map(u32::to_string).collect();
            url.push_str("&cat=");
            url.push_str(&cats.join(","));
        }

        url
    }
}

#[async_trait]
impl Backend for TorznabBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
        let url = self.build_search_url(query);
        debug!(backend = %self.config.name, query = query, "Searching Torznab backend");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::ApiError(format!("Failed to read response: {}", e))
            }
        })?;

        let candidates = parse_feed(&body)?;

        debug!(
            backend = %self.config.name,
            results = candidates.len(),
            "Torznab search complete"
        );

        Ok(candidates)
    }
}

/// Parse a Torznab RSS feed into raw candidates.
///
/// Items without a title or a link are skipped. An `<error>` document
/// becomes [`SearchError::ApiError`].
pub fn parse_feed(xml: &[u8]) -> Result<Vec<RawCandidate>, SearchError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut current_item: Option<ItemBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if name == "item" {
                    current_item = Some(ItemBuilder::default());
                } else if name == "error" {
                    return Err(api_error(&e));
                } else if let Some(ref mut item) = current_item {
                    item.apply_attributes(&name, &e);
                }
                current_element = name;
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if name == "error" {
                    return Err(api_error(&e));
                }
                if let Some(ref mut item) = current_item {
                    item.apply_attributes(&name, &e);
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(builder) = current_item.take() {
                        match builder.build() {
                            Some(item) => items.push(item),
                            None => debug!("Skipping feed item without title or link"),
                        }
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    item.apply_text(&current_element, text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = String::from_utf8_lossy(&e).to_string();
                    item.apply_text(&current_element, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SearchError::ParseError(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}

fn api_error(e: &BytesStart<'_>) -> SearchError {
    let code = attribute(e, "code").unwrap_or_default();
    let description = attribute(e, "description").unwrap_or_default();
    warn!(code = %code, description = %description, "Backend answered with an error document");
    SearchError::ApiError(format!("Torznab error {}: {}", code, description))
}

/// Parse an RSS `pubDate` (RFC 2822), falling back to RFC 3339.
fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_count(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    guid: Option<String>,
    link: Option<String>,
    enclosure_url: Option<String>,
    pub_date: Option<DateTime<Utc>>,
    size: Option<u64>,
    enclosure_length: Option<u64>,
    attr_size: Option<u64>,
    seeders: Option<u64>,
    peers: Option<u64>,
}

impl ItemBuilder {
    fn apply_text(&mut self, element: &str, text: String) {
        if text.is_empty() {
            return;
        }
        match element {
            "title" => self.title = Some(text),
            "guid" => self.guid = Some(text),
            "link" => self.link = Some(text),
            "pubDate" => self.pub_date = parse_pub_date(&text),
            "size" => self.size = parse_count(&text),
            _ => {}
        }
    }

    fn apply_attributes(&mut self, element: &str, e: &BytesStart<'_>) {
        match element {
            "enclosure" => {
                self.enclosure_url = attribute(e, "url");
                self.enclosure_length = attribute(e, "length").as_deref().and_then(parse_count);
            }
            "torznab:attr" | "newznab:attr" => {
                let (Some(name), Some(value)) = (attribute(e, "name"), attribute(e, "value"))
                else {
                    return;
                };
                match name.as_str() {
                    "seeders" => self.seeders = parse_count(&value),
                    "peers" => self.peers = parse_count(&value),
                    "size" => self.attr_size = parse_count(&value),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn build(self) -> Option<RawCandidate> {
        let title = self.title?;
        let link = self.link.or(self.enclosure_url)?;
        let guid = self.guid.unwrap_or_else(|| link.clone());

        Some(RawCandidate {
            title,
            guid,
            link,
            seeders: clamp_u32(self.seeders),
            peers: clamp_u32(self.peers),
            size: self.size.or(self.enclosure_length).or(self.attr_size).unwrap_or(0),
            publish_date: self.pub_date,
        })
    }
}

fn clamp_u32(value: Option<u64>) -> u32 {
    value.map(|v| u32::try_from(v).unwrap_or(u32::MAX)).unwrap_or(0)
}
