//! Namespace-agnostic sitemap XML extraction.
//!
//! Both `<sitemap><loc>` and `<url><loc>` shapes are always extracted, so a
//! document mixing sitemap-index and urlset entries still yields everything
//! it lists. Input that is not well-formed XML yields an empty result.

use crate::domain::model::ParsedSitemap;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug)]
struct OpenElement {
    name: Vec<u8>,
    /// A direct `loc` child already supplied this element's location.
    loc_taken: bool,
}

#[derive(Debug)]
struct Malformed;

pub fn parse_sitemap(bytes: &[u8]) -> ParsedSitemap {
    match extract(bytes) {
        Ok(parsed) => parsed,
        Err(Malformed) => {
            tracing::debug!("Sitemap document is not well-formed XML ({} bytes)", bytes.len());
            ParsedSitemap::default()
        }
    }
}

fn extract(bytes: &[u8]) -> Result<ParsedSitemap, Malformed> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut parsed = ParsedSitemap::default();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root_closed = false;
    let mut loc_text = String::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|_| Malformed)?;
        match event {
            Event::Start(e) => {
                if root_closed {
                    // junk after the document element
                    return Err(Malformed);
                }
                let name = e.local_name().as_ref().to_vec();
                if stack.is_empty() {
                    parsed.root = Some(String::from_utf8_lossy(&name).into_owned());
                }
                if name == b"loc" {
                    loc_text.clear();
                }
                stack.push(OpenElement {
                    name,
                    loc_taken: false,
                });
            }
            Event::Empty(e) => {
                if root_closed {
                    return Err(Malformed);
                }
                if stack.is_empty() {
                    parsed.root = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                    root_closed = true;
                } else if e.local_name().as_ref() == b"loc" {
                    take_location(&mut stack, "", &mut parsed);
                }
            }
            Event::Text(e) => {
                // decoded with the declared encoding; unknown entities fail anywhere
                let text = e.unescape().map_err(|_| Malformed)?;
                if stack.is_empty() && !text.trim().is_empty() {
                    // character data before or after the document element
                    return Err(Malformed);
                }
                if is_inside_loc(&stack) {
                    loc_text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if stack.is_empty() {
                    return Err(Malformed);
                }
                if is_inside_loc(&stack) {
                    let text = reader.decoder().decode(&e).map_err(|_| Malformed)?;
                    loc_text.push_str(&text);
                }
            }
            Event::End(_) => {
                let closed = stack.pop().ok_or(Malformed)?;
                if stack.is_empty() {
                    root_closed = true;
                }
                if closed.name == b"loc" {
                    take_location(&mut stack, &loc_text, &mut parsed);
                    loc_text.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() || parsed.root.is_none() {
        return Err(Malformed);
    }

    Ok(parsed)
}

fn is_inside_loc(stack: &[OpenElement]) -> bool {
    stack.last().is_some_and(|el| el.name == b"loc")
}

/// Records a finished `loc` against its parent when the parent is a
/// `sitemap` or `url` element below the document root.
fn take_location(stack: &mut [OpenElement], text: &str, parsed: &mut ParsedSitemap) {
    // the root itself is never matched, only its descendants
    if stack.len() < 2 {
        return;
    }
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if parent.loc_taken {
        return;
    }
    // only the first `loc` child counts, even when it is empty
    parent.loc_taken = true;

    let location = text.trim();
    if location.is_empty() {
        return;
    }

    match parent.name.as_slice() {
        b"sitemap" => parsed.child_sitemaps.push(location.to_string()),
        b"url" => parsed.page_urls.push(location.to_string()),
        _ => {}
    }
}
