use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Flattened view of an RSS 2.0 document.
///
/// Child elements are keyed by name; attributes as `element@attribute`.
#[derive(Debug, Default)]
pub struct ParsedRss {
    pub rss_version: Option<String>,
    pub channel_count: usize,
    pub channel: HashMap<String, String>,
    pub items: Vec<HashMap<String, String>>,
}

/// Parses `xml`, panicking on any well-formedness error
pub fn parse_rss(xml: &str) -> ParsedRss {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parsed = ParsedRss::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                match (path.len(), name.as_str()) {
                    (0, "rss") => parsed.rss_version = attributes(&e).remove("version"),
                    (1, "channel") => parsed.channel_count += 1,
                    (2, "item") => parsed.items.push(HashMap::new()),
                    _ => {}
                }
                if path.len() == 3 && path[2] == "item" {
                    if let Some(item) = parsed.items.last_mut() {
                        for (key, value) in attributes(&e) {
                            item.insert(format!("{}@{}", name, key), value);
                        }
                    }
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if path.len() == 3 && path[2] == "item" {
                    if let Some(item) = parsed.items.last_mut() {
                        for (key, value) in attributes(&e) {
                            item.insert(format!("{}@{}", name, key), value);
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().expect("Invalid text").to_string();
                store_text(&mut parsed, &path, text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c).to_string();
                store_text(&mut parsed, &path, text);
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!(
                "Malformed XML at position {}: {:?}",
                reader.buffer_position(),
                e
            ),
        }
    }

    assert!(path.is_empty(), "Unclosed elements: {:?}", path);
    parsed
}

fn store_text(parsed: &mut ParsedRss, path: &[String], text: String) {
    match path {
        [_, _, field] => {
            parsed.channel.entry(field.clone()).or_default().push_str(&text);
        }
        [_, _, item, field] if item == "item" => {
            if let Some(item) = parsed.items.last_mut() {
                item.entry(field.clone()).or_default().push_str(&text);
            }
        }
        _ => {}
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn attributes(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .map(|attr| {
            let attr = attr.expect("Invalid attribute");
            (
                String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                attr.unescape_value().expect("Invalid attribute value").to_string(),
            )
        })
        .collect()
}

/// Channel-level requirements every served feed must meet
pub fn assert_valid_channel(rss: &ParsedRss) {
    assert_eq!(rss.rss_version.as_deref(), Some("2.0"));
    assert_eq!(rss.channel_count, 1, "Expected exactly one channel");

    for field in ["title", "link", "description", "pubDate", "lastBuildDate", "ttl"] {
        assert!(
            rss.channel.get(field).is_some_and(|v| !v.is_empty()),
            "Missing channel field '{}'",
            field
        );
    }
    assert_eq!(rss.channel["ttl"], "60");
}
