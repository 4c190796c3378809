//! Channel URL parsing and recent-upload feed parsing.

use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use trendforge_core::RecentVideo;

use crate::error::SourceError;

static CHANNEL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(/channel/|/c/|/user/|youtube\.com/@)([^/?#\s]+)")
        .expect("valid channel url regex")
});

/// How a channel URL identifies its channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Canonical `UC…` id from a `/channel/` URL.
    Id(String),
    /// `@handle` URL, stored without the `@`.
    Handle(String),
    /// Custom `/c/` or legacy `/user/` name.
    Legacy(String),
}

impl ChannelRef {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ChannelRef::Id(s) | ChannelRef::Handle(s) | ChannelRef::Legacy(s) => s,
        }
    }

    /// The canonical id, when the URL already carried one.
    #[must_use]
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            ChannelRef::Id(id) => Some(id),
            _ => None,
        }
    }
}

/// Extract the channel reference from a `YouTube` channel URL.
///
/// # Errors
///
/// Returns [`SourceError::InvalidChannelUrl`] when no channel segment is found.
pub fn parse_channel_ref(url: &str) -> Result<ChannelRef, SourceError> {
    let caps = CHANNEL_URL_RE
        .captures(url.trim())
        .ok_or_else(|| SourceError::InvalidChannelUrl(url.to_string()))?;

    let value = caps[2].to_string();
    Ok(match &caps[1] {
        "/channel/" => ChannelRef::Id(value),
        "youtube.com/@" => ChannelRef::Handle(value),
        _ => ChannelRef::Legacy(value),
    })
}

/// Description used when no `YouTube` API key is configured.
#[must_use]
pub fn simulated_description(channel: &ChannelRef) -> String {
    let name = channel.as_str();
    format!(
        "Simulated channel description for {name}. This channel focuses on amazing content about {name}'s niche."
    )
}

/// Parse a channel Atom feed into at most `limit` videos, in feed order.
pub(crate) fn parse_channel_feed(xml: &str, limit: usize) -> Result<Vec<RecentVideo>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut video_url = String::new();
    let mut views: Option<u64> = None;
    let mut videos = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = tag_name(&e);
                if name == "entry" {
                    in_entry = true;
                    title.clear();
                    video_url.clear();
                    views = None;
                } else if in_entry {
                    read_entry_attrs(&e, &name, &mut video_url, &mut views);
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                if in_entry {
                    let name = tag_name(&e);
                    read_entry_attrs(&e, &name, &mut video_url, &mut views);
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry && current_tag == "title" {
                    title = e.unescape().unwrap_or_default().trim().to_string();
                }
            }
            Ok(Event::End(e)) => {
                current_tag.clear();
                if e.name().as_ref() == b"entry" {
                    in_entry = false;
                    if !title.is_empty() && !video_url.is_empty() {
                        videos.push(RecentVideo {
                            title: title.clone(),
                            url: video_url.clone(),
                            view_count: views,
                        });
                        if videos.len() >= limit {
                            break;
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Xml(e)),
            _ => {}
        }
    }

    Ok(videos)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn read_entry_attrs(e: &BytesStart<'_>, name: &str, video_url: &mut String, views: &mut Option<u64>) {
    match name {
        "link" => {
            for attr in e.attributes().flatten() {
                if attr.key.as_ref() == b"href" {
                    let href = String::from_utf8_lossy(attr.value.as_ref()).to_string();
                    if href.contains("youtube.com/watch") {
                        *video_url = href;
                    }
                }
            }
        }
        "media:statistics" => {
            for attr in e.attributes().flatten() {
                if attr.key.as_ref() == b"views" {
                    *views = String::from_utf8_lossy(attr.value.as_ref()).parse().ok();
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_handle_urls() {
        assert_eq!(
            parse_channel_ref("https://www.youtube.com/@WoodByWright/videos").unwrap(),
            ChannelRef::Handle("WoodByWright".to_string())
        );
    }

    #[test]
    fn parses_channel_id_urls() {
        let parsed = parse_channel_ref("https://youtube.com/channel/UC123abc?si=x").unwrap();
        assert_eq!(parsed, ChannelRef::Id("UC123abc".to_string()));
        assert_eq!(parsed.channel_id(), Some("UC123abc"));
    }

    #[test]
    fn parses_custom_and_user_urls() {
        assert_eq!(
            parse_channel_ref("https://www.youtube.com/c/MiniacPainting").unwrap(),
            ChannelRef::Legacy("MiniacPainting".to_string())
        );
        assert_eq!(
            parse_channel_ref("https://www.youtube.com/user/oldschool").unwrap(),
            ChannelRef::Legacy("oldschool".to_string())
        );
    }

    #[test]
    fn rejects_urls_without_channel_segment() {
        let err = parse_channel_ref("https://www.youtube.com/watch?v=abc").unwrap_err();
        assert!(matches!(err, SourceError::InvalidChannelUrl(_)));
    }

    #[test]
    fn handles_only_match_on_youtube_hosts() {
        for url in ["https://example.com/a@b", "mailto:someone@example.com"] {
            let err = parse_channel_ref(url).unwrap_err();
            assert!(matches!(err, SourceError::InvalidChannelUrl(_)), "{url}");
        }
        assert_eq!(
            parse_channel_ref("https://m.youtube.com/@Ninjon").unwrap(),
            ChannelRef::Handle("Ninjon".to_string())
        );
    }

    #[test]
    fn simulated_description_mentions_channel() {
        let text = simulated_description(&ChannelRef::Handle("Ninjon".to_string()));
        assert!(text.starts_with("Simulated channel description for Ninjon."));
        assert!(text.contains("Ninjon's niche"));
    }

    #[test]
    fn parses_feed_entries_with_view_counts() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
  <title>Wood By Wright</title>
  <entry>
    <yt:videoId>abc123</yt:videoId>
    <title>Dovetails &amp; drawers</title>
    <link rel="alternate" href="https://www.youtube.com/watch?v=abc123"/>
    <media:group>
      <media:title>Dovetails &amp; drawers</media:title>
      <media:community>
        <media:statistics views="4521"/>
      </media:community>
    </media:group>
  </entry>
  <entry>
    <title>Shop tour</title>
    <link rel="alternate" href="https://www.youtube.com/watch?v=def456"/>
  </entry>
</feed>"#;
        let videos = parse_channel_feed(xml, 10).expect("parse");
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].title, "Dovetails & drawers");
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(videos[0].view_count, Some(4521));
        assert_eq!(videos[1].view_count, None);
    }

    #[test]
    fn feed_parsing_respects_limit() {
        let entry = |id: &str| {
            format!(
                r#"<entry><title>v{id}</title><link rel="alternate" href="https://www.youtube.com/watch?v={id}"/></entry>"#
            )
        };
        let xml = format!("<feed>{}{}{}</feed>", entry("1"), entry("2"), entry("3"));
        let videos = parse_channel_feed(&xml, 2).unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[1].title, "v2");
    }
}
