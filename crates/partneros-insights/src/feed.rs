//! RSS/Atom item extraction.

use std::collections::BTreeMap;

use feed_rs::model::Entry;
use partneros_core::RawSignal;
use uuid::Uuid;

use crate::error::FeedError;
use crate::text::clean_text;

/// Parse an RSS or Atom document into raw signals for `partner_id`.
///
/// Entries without a title or link are dropped. `published` falls back to
/// `updated`; the body is the entry content, else its summary.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] when the document is not a recognizable feed.
pub fn parse_feed(bytes: &[u8], partner_id: Uuid) -> Result<Vec<RawSignal>, FeedError> {
    let feed = feed_rs::parser::parse(bytes)?;
    let total = feed.entries.len();

    let items: Vec<RawSignal> = feed
        .entries
        .into_iter()
        .filter_map(|entry| entry_to_raw(entry, partner_id))
        .collect();

    if items.len() < total {
        tracing::debug!(
            %partner_id,
            total,
            kept = items.len(),
            "dropped feed entries without title or link"
        );
    }
    Ok(items)
}

fn entry_to_raw(entry: Entry, partner_id: Uuid) -> Option<RawSignal> {
    let title = entry
        .title
        .map(|t| clean_text(&t.content))
        .filter(|t| !t.is_empty())?;
    let url = entry
        .links
        .first()
        .map(|l| l.href.trim().to_owned())
        .filter(|href| !href.is_empty())?;

    let content = entry
        .content
        .and_then(|c| c.body)
        .map(|body| clean_text(&body))
        .filter(|body| !body.is_empty())
        .or_else(|| entry.summary.map(|s| clean_text(&s.content)))
        .unwrap_or_default();

    let mut facets = BTreeMap::new();
    let categories: Vec<serde_json::Value> = entry
        .categories
        .iter()
        .map(|c| c.label.clone().unwrap_or_else(|| c.term.clone()))
        .filter(|c| !c.trim().is_empty())
        .map(serde_json::Value::String)
        .collect();
    if !categories.is_empty() {
        facets.insert("categories".to_owned(), serde_json::Value::Array(categories));
    }
    if let Some(author) = entry.authors.first().filter(|a| !a.name.trim().is_empty()) {
        facets.insert(
            "author".to_owned(),
            serde_json::Value::String(author.name.trim().to_owned()),
        );
    }

    Some(RawSignal {
        partner_id,
        title,
        url,
        content,
        published_at: entry.published.or(entry.updated),
        facets: (!facets.is_empty()).then_some(facets),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Acme Blog</title>
    <link>https://acme.example</link>
    <description>News</description>
    <item>
      <title>Acme joins AWS Marketplace</title>
      <link>https://acme.example/blog/aws</link>
      <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
      <category>Partners</category>
      <description>Short teaser</description>
      <content:encoded><![CDATA[<p>Acme is <b>now</b> listed.</p>]]></content:encoded>
    </item>
    <item>
      <title>Only a snippet</title>
      <link>https://acme.example/blog/snippet</link>
      <description><![CDATA[<p>Teaser &amp; more</p>]]></description>
    </item>
    <item>
      <link>https://acme.example/blog/untitled</link>
      <description>No title here</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Acme Changelog</title>
  <id>urn:acme:changelog</id>
  <updated>2025-02-01T12:00:00Z</updated>
  <entry>
    <title>v2.3 adds webhooks</title>
    <id>urn:acme:changelog:23</id>
    <link href="https://acme.example/changelog/23"/>
    <updated>2025-02-01T12:00:00Z</updated>
    <author><name>Dana</name></author>
    <summary>Webhooks are here.</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items_and_drops_untitled() {
        let partner = Uuid::new_v4();
        let items = parse_feed(RSS.as_bytes(), partner).unwrap();

        assert_eq!(items.len(), 2);
        let first = &items[0];
        assert_eq!(first.partner_id, partner);
        assert_eq!(first.title, "Acme joins AWS Marketplace");
        assert_eq!(first.url, "https://acme.example/blog/aws");
        assert_eq!(first.content, "Acme is now listed.");
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap())
        );
        let facets = first.facets.as_ref().unwrap();
        assert_eq!(facets["categories"], serde_json::json!(["Partners"]));
    }

    #[test]
    fn falls_back_to_summary_for_body() {
        let items = parse_feed(RSS.as_bytes(), Uuid::new_v4()).unwrap();
        assert_eq!(items[1].content, "Teaser & more");
    }

    #[test]
    fn atom_uses_updated_when_published_missing() {
        let items = parse_feed(ATOM.as_bytes(), Uuid::new_v4()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "Webhooks are here.");
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(
            items[0].facets.as_ref().unwrap()["author"],
            serde_json::json!("Dana")
        );
    }

    #[test]
    fn rejects_non_feed_documents() {
        assert!(parse_feed(b"<html><body>nope</body></html>", Uuid::new_v4()).is_err());
    }
}
