//! RSS 2.0 serialization of a [`RenderedFeed`].

use anyhow::Result;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::model::{FeedItem, RenderedFeed};

/// RFC 822 date as expected by feed readers and torrent clients
pub const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn format_rfc822(date: &DateTime<Utc>) -> String {
    date.format(RFC822_FORMAT).to_string()
}

impl RenderedFeed {
    /// UTF-8 XML with declaration and two-space indentation
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        let channel = &self.channel;
        let build_date = format_rfc822(&channel.build_date);
        write_text_element(&mut writer, "title", &channel.title)?;
        write_text_element(&mut writer, "link", &channel.link)?;
        write_text_element(&mut writer, "description", &channel.description)?;
        write_text_element(&mut writer, "language", &channel.language)?;
        write_text_element(&mut writer, "generator", &channel.generator)?;
        write_text_element(&mut writer, "pubDate", &build_date)?;
        write_text_element(&mut writer, "lastBuildDate", &build_date)?;
        write_text_element(&mut writer, "ttl", &channel.ttl.to_string())?;

        for item in &self.items {
            write_item(&mut writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let mut xml = writer.into_inner();
        xml.push(b'\n');
        Ok(xml)
    }
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &FeedItem) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", &item.title)?;
    if let Some(link) = &item.link {
        write_text_element(writer, "link", link)?;
    }

    let mut guid = BytesStart::new("guid");
    guid.push_attribute((
        "isPermaLink",
        if item.guid.is_permalink { "true" } else { "false" },
    ));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&item.guid.value)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    write_text_element(writer, "pubDate", &format_rfc822(&item.pub_date))?;

    writer.write_event(Event::Start(BytesStart::new("description")))?;
    // "]]>" would end the section early, so split it across two sections
    let cdata = item.description.replace("]]>", "]]]]><![CDATA[>");
    writer.write_event(Event::CData(BytesCData::new(cdata.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("description")))?;

    if let Some(enclosure) = &item.enclosure {
        let length = enclosure.length.to_string();
        let mut element = BytesStart::new("enclosure");
        element.push_attribute(("url", enclosure.url.as_str()));
        element.push_attribute(("length", length.as_str()));
        element.push_attribute(("type", enclosure.mime_type.as_str()));
        writer.write_event(Event::Empty(element))?;
    }

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
