//! Self-contained HTML5 output.
//!
//! Styling is embedded in a `<style>` element; the page references no
//! external stylesheet, script or image.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::document::{Block, ContentDocument};
use crate::error::{RenderError, Result};

const DOCTYPE: &[u8] = b"<!DOCTYPE html>\n";

const STYLE: &str = "
body { font-family: Georgia, 'Times New Roman', serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #1c1c1c; line-height: 1.5; }
header { background: #6b1c1c; color: #fdf6e3; padding: 1rem 1.25rem; border-radius: 4px; }
header h1 { margin: 0; }
header p { margin: 0.25rem 0 0; font-style: italic; }
h2 { color: #6b1c1c; border-bottom: 2px solid #c9ad6a; padding-bottom: 0.2rem; }
h3, h4 { color: #6b1c1c; margin-bottom: 0.25rem; }
p.field strong, p.entry strong { color: #3a3a3a; }
";

type Html = Writer<Vec<u8>>;

/// Render a laid-out record as a standalone HTML page.
pub fn render(document: &ContentDocument) -> Result<Vec<u8>> {
    let mut xml = Writer::new_with_indent(DOCTYPE.to_vec(), b' ', 2);
    write_page(&mut xml, document).map_err(|error| RenderError::write("html", error))?;
    let mut out = xml.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_page(xml: &mut Html, document: &ContentDocument) -> std::io::Result<()> {
    let mut html = BytesStart::new("html");
    html.push_attribute(("lang", "en"));
    xml.write_event(Event::Start(html))?;

    xml.write_event(Event::Start(BytesStart::new("head")))?;
    let mut charset = BytesStart::new("meta");
    charset.push_attribute(("charset", "utf-8"));
    xml.write_event(Event::Empty(charset))?;
    write_text_element(xml, "title", &document.title)?;
    xml.write_event(Event::Start(BytesStart::new("style")))?;
    xml.write_event(Event::Text(BytesText::from_escaped(STYLE)))?;
    xml.write_event(Event::End(BytesEnd::new("style")))?;
    xml.write_event(Event::End(BytesEnd::new("head")))?;

    xml.write_event(Event::Start(BytesStart::new("body")))?;
    xml.write_event(Event::Start(BytesStart::new("header")))?;
    write_text_element(xml, "h1", &document.title)?;
    write_text_element(xml, "p", &document.subtitle)?;
    xml.write_event(Event::End(BytesEnd::new("header")))?;

    if let Some(description) = &document.description {
        write_classed_text(xml, "p", "description", description)?;
    }
    for section in &document.sections {
        xml.write_event(Event::Start(BytesStart::new("section")))?;
        write_text_element(xml, "h2", &section.heading)?;
        write_blocks(xml, &section.blocks, 3)?;
        xml.write_event(Event::End(BytesEnd::new("section")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("body")))?;
    xml.write_event(Event::End(BytesEnd::new("html")))?;
    Ok(())
}

fn write_blocks(xml: &mut Html, blocks: &[Block], depth: usize) -> std::io::Result<()> {
    for block in blocks {
        match block {
            Block::Field { label, value } => {
                write_labelled(xml, "field", &format!("{label}:"), value)?;
            }
            Block::Text(text) => write_text_element(xml, "p", text)?,
            Block::List(items) => {
                xml.write_event(Event::Start(BytesStart::new("ul")))?;
                for item in items {
                    write_text_element(xml, "li", item)?;
                }
                xml.write_event(Event::End(BytesEnd::new("ul")))?;
            }
            Block::Entry { name, description } => {
                write_labelled(xml, "entry", &format!("{name}."), description.trim())?;
            }
            Block::Subsection { heading, blocks } => {
                let tag = format!("h{}", depth.min(6));
                write_text_element(xml, &tag, heading)?;
                write_blocks(xml, blocks, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn write_text_element(xml: &mut Html, name: &str, text: &str) -> std::io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_classed_text(xml: &mut Html, name: &str, class: &str, text: &str) -> std::io::Result<()> {
    let mut start = BytesStart::new(name);
    start.push_attribute(("class", class));
    xml.write_event(Event::Start(start))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// `<p class="..."><strong>label</strong> text</p>`
fn write_labelled(xml: &mut Html, class: &str, label: &str, text: &str) -> std::io::Result<()> {
    let mut start = BytesStart::new("p");
    start.push_attribute(("class", class));
    xml.write_event(Event::Start(start))?;
    write_text_element(xml, "strong", label)?;
    if !text.is_empty() {
        xml.write_event(Event::Text(BytesText::new(&format!(" {text}"))))?;
    }
    xml.write_event(Event::End(BytesEnd::new("p")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use forge_model::{ContentKind, ContentRecord, Feature};

    use super::*;
    use crate::document::RenderOptions;

    fn render_record(record: &ContentRecord) -> String {
        let document = ContentDocument::from_record(record, &RenderOptions::default()).unwrap();
        String::from_utf8(render(&document).unwrap()).unwrap()
    }

    #[test]
    fn page_is_self_contained() {
        let record = ContentRecord::new(ContentKind::Background).with_name("Sage");
        let html = render_record(&record);
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(html.contains("<h1>Sage</h1>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut record = ContentRecord::new(ContentKind::Race).with_name("Imp <Lesser> & Co");
        record
            .as_race_mut()
            .unwrap()
            .traits
            .push(Feature::new("Sly", "Uses <script> tricks"));
        let html = render_record(&record);
        assert!(html.contains("<h1>Imp &lt;Lesser&gt; &amp; Co</h1>"));
        assert!(html.contains("Uses &lt;script&gt; tricks"));
        assert!(!html.contains("<script"));
    }
}
