use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::FeedItem;

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub title: String,
    /// Channel link
    pub host: String,
    /// Base URL the media files are served from
    pub media_url: String,
}

impl FeedSettings {
    /// Each segment of `path` is percent-encoded; the `/` separators are kept.
    fn enclosure_url(&self, path: &str) -> String {
        let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
        format!("{}/{}", self.media_url.trim_end_matches('/'), encoded.join("/"))
    }
}

pub fn write_feed_file(
    path: &Path,
    settings: &FeedSettings,
    items: &[FeedItem],
    built_at: DateTime<Utc>,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create feed file {}", path.display()))?;
    write_feed(file, settings, items, built_at)
}

/// Renders an RSS 2.0 document with one enclosure per item.
pub fn write_feed<W: Write>(
    out: W,
    settings: &FeedSettings,
    items: &[FeedItem],
    built_at: DateTime<Utc>,
) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0")]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &settings.title)?;
    text_element(&mut writer, "link", &settings.host)?;
    text_element(&mut writer, "description", &settings.title)?;
    text_element(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;

    for item in items {
        write_item(&mut writer, settings, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;
    writer.into_inner().flush()?;
    Ok(())
}

fn write_item<W: Write>(writer: &mut Writer<W>, settings: &FeedSettings, item: &FeedItem) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    text_element(writer, "title", &item.title())?;
    text_element(writer, "description", &item.episode.overview)?;
    if let Some(aired_at) = item.episode.aired_at {
        text_element(writer, "pubDate", &aired_at.to_rfc2822())?;
    }

    let guid = item.guid();
    writer.write_event(Event::Start(
        BytesStart::new("guid").with_attributes([("isPermaLink", "false")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(&guid)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    let url = settings.enclosure_url(&item.media.path);
    let length = item.media.length.to_string();
    writer.write_event(Event::Empty(BytesStart::new("enclosure").with_attributes([
        ("url", url.as_str()),
        ("length", length.as_str()),
        ("type", item.media.mime_type.as_str()),
    ])))?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
