//! DIDL-Lite decoding.
//!
//! `Browse` returns its listing as an escaped DIDL-Lite document. Only the
//! parts the pipeline needs are decoded: each `<item>`'s id, its `upnp:class`
//! and its `<res>` elements.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::types::{MediaObject, Movie, Photo, Representation};

const IMAGE_CLASS_PREFIX: &str = "object.item.imageItem";
const VIDEO_CLASS_PREFIX: &str = "object.item.videoItem";

/// Kind of a DIDL item, derived from its `upnp:class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Image,
    Video,
    Other,
}

impl ItemKind {
    pub fn from_class(class: &str) -> Self {
        if class.starts_with(IMAGE_CLASS_PREFIX) {
            Self::Image
        } else if class.starts_with(VIDEO_CLASS_PREFIX) {
            Self::Video
        } else {
            Self::Other
        }
    }
}

/// A single `<item>` from a DIDL-Lite document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidlItem {
    pub id: String,
    pub class: String,
    pub resources: Vec<Representation>,
}

impl DidlItem {
    pub fn kind(&self) -> ItemKind {
        ItemKind::from_class(&self.class)
    }

    /// Converts the item into a media object, or `None` for kinds the
    /// pipeline does not handle.
    pub fn into_media_object(self) -> Option<MediaObject> {
        match self.kind() {
            ItemKind::Image => Some(MediaObject::Photo(Photo::new(self.id, self.resources))),
            ItemKind::Video => Some(MediaObject::Movie(Movie::new(self.id, self.resources))),
            ItemKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Class,
    Res,
}

/// Parses a DIDL-Lite document into its items. Containers are ignored.
pub fn parse_didl(xml: &str) -> Result<Vec<DidlItem>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<DidlItem> = None;
    let mut field = Field::None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" => current = Some(start_item(&e)?),
                b"class" if current.is_some() => field = Field::Class,
                b"res" => {
                    if let Some(item) = current.as_mut() {
                        item.resources.push(Representation {
                            uri: None,
                            size_bytes: size_attribute(&e)?,
                        });
                        field = Field::Res;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"item" => items.push(start_item(&e)?),
                b"res" => {
                    if let Some(item) = current.as_mut() {
                        item.resources.push(Representation {
                            uri: None,
                            size_bytes: size_attribute(&e)?,
                        });
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                let text = t.unescape()?;
                apply_text(current.as_mut(), field, &text);
            }
            Event::CData(c) => {
                let bytes = c.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                apply_text(current.as_mut(), field, &text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                    field = Field::None;
                }
                b"class" | b"res" => field = Field::None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Parses a DIDL-Lite document straight into the media objects it holds.
pub fn parse_media_objects(xml: &str) -> Result<Vec<MediaObject>, quick_xml::Error> {
    Ok(parse_didl(xml)?
        .into_iter()
        .filter_map(DidlItem::into_media_object)
        .collect())
}

fn start_item(e: &BytesStart<'_>) -> Result<DidlItem, quick_xml::Error> {
    Ok(DidlItem {
        id: attribute(e, b"id")?.unwrap_or_default(),
        class: String::new(),
        resources: Vec::new(),
    })
}

fn apply_text(item: Option<&mut DidlItem>, field: Field, text: &str) {
    let Some(item) = item else {
        return;
    };
    match field {
        Field::Class => item.class.push_str(text.trim()),
        Field::Res => {
            if let Some(res) = item.resources.last_mut() {
                let uri = text.trim();
                if !uri.is_empty() {
                    res.uri = Some(uri.to_string());
                }
            }
        }
        Field::None => {}
    }
}

fn size_attribute(e: &BytesStart<'_>) -> Result<Option<u64>, quick_xml::Error> {
    Ok(attribute(e, b"size")?.and_then(|s| s.trim().parse::<u64>().ok()))
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">
  <item id="1050344" parentID="0" restricted="1">
    <dc:title>P1050344</dc:title>
    <upnp:class>object.item.imageItem.photo</upnp:class>
    <res protocolInfo="http-get:*:image/jpeg:DLNA.ORG_PN=JPEG_LRG" size="9000">http://192.168.0.215:50001/DO1050344.JPG</res>
    <res protocolInfo="http-get:*:image/jpeg:DLNA.ORG_PN=JPEG_TN" size="500">http://192.168.0.215:50001/DT1050344.JPG</res>
    <res protocolInfo="http-get:*:image/jpeg:*" size="not-a-number">http://192.168.0.215:50001/DS1050344.JPG</res>
  </item>
  <item id="1050345" parentID="0" restricted="1">
    <dc:title>P1050345</dc:title>
    <upnp:class>object.item.videoItem.movie</upnp:class>
    <res protocolInfo="http-get:*:video/mp4:*" size="123456">http://192.168.0.215:50001/DO1050345.MP4</res>
    <res protocolInfo="http-get:*:image/jpeg:*"/>
  </item>
  <item id="1050346" parentID="0" restricted="1">
    <upnp:class>object.item.audioItem.musicTrack</upnp:class>
    <res>http://192.168.0.215:50001/DO1050346.WAV</res>
  </item>
  <container id="99" parentID="0" restricted="1">
    <upnp:class>object.container.storageFolder</upnp:class>
  </container>
</DIDL-Lite>"#;

    #[test]
    fn test_parse_items_and_resources() {
        let items = parse_didl(LISTING).unwrap();
        assert_eq!(items.len(), 3);

        let photo = &items[0];
        assert_eq!(photo.id, "1050344");
        assert_eq!(photo.kind(), ItemKind::Image);
        assert_eq!(photo.resources.len(), 3);
        assert_eq!(
            photo.resources[0].uri.as_deref(),
            Some("http://192.168.0.215:50001/DO1050344.JPG")
        );
        assert_eq!(photo.resources[0].size_bytes, Some(9000));
        assert_eq!(photo.resources[2].size_bytes, None);

        let movie = &items[1];
        assert_eq!(movie.kind(), ItemKind::Video);
        assert_eq!(movie.resources.len(), 2);
        assert_eq!(movie.resources[1].uri, None);

        assert_eq!(items[2].kind(), ItemKind::Other);
    }

    #[test]
    fn test_parse_media_objects_skips_unknown_kinds() {
        let objects = parse_media_objects(LISTING).unwrap();
        assert_eq!(objects.len(), 2);
        assert!(matches!(objects[0], MediaObject::Photo(_)));
        assert!(matches!(objects[1], MediaObject::Movie(_)));
        assert_eq!(objects[1].object_id(), "1050345");
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let xml = r#"<DIDL-Lite><item id="a&amp;b"><upnp:class>object.item.imageItem</upnp:class><res size="1">http://cam/DO1.JPG?a=1&amp;b=2</res></item></DIDL-Lite>"#;
        let items = parse_didl(xml).unwrap();
        assert_eq!(items[0].id, "a&b");
        assert_eq!(
            items[0].resources[0].uri.as_deref(),
            Some("http://cam/DO1.JPG?a=1&b=2")
        );
    }

    #[test]
    fn test_parse_empty_listing() {
        let items = parse_didl(r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"/>"#)
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_malformed_document_fails() {
        assert!(parse_didl("<DIDL-Lite><item id=\"1\"></DIDL-Lite>").is_err());
    }
}
