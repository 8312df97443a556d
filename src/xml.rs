//! Small helpers over `quick-xml` events shared by the feed and Aquabrowser parsers.

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText};

pub fn start_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

pub fn end_name(e: &BytesEnd) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Unescaped text content. Falls back to the raw bytes when the text holds
/// entities XML does not define (HTML `&nbsp;` and friends).
pub fn text(e: &BytesText) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

pub fn cdata(e: BytesCData) -> String {
    String::from_utf8_lossy(&e.into_inner()).into_owned()
}

pub fn attribute(e: &BytesStart, name: &str) -> Option<String> {
    let attr = e.try_get_attribute(name).ok().flatten()?;
    attr.unescape_value().ok().map(|v| v.into_owned())
}
