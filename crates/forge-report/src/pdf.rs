//! Paginated PDF output.
//!
//! Layout runs in two passes: blocks are flowed onto pages first, then every
//! page is written with its `"<name> - Page X of Y"` footer once the page
//! count is known. Content streams are left uncompressed and no `/Info`
//! dictionary is written, so identical input gives identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::document::{Block, ContentDocument};
use crate::error::{RenderError, Result};

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

const MARGIN: f32 = 56.0;
const CONTENT_TOP: f32 = PAGE_HEIGHT - MARGIN;
const CONTENT_BOTTOM: f32 = MARGIN + 24.0;
const FOOTER_Y: f32 = MARGIN / 2.0;

/// Extra room a heading needs below it, so it never ends a page alone.
pub const BREAK_THRESHOLD: f32 = 72.0;

const TITLE_BAND_HEIGHT: f32 = 64.0;
const BAND_PADDING: f32 = 14.0;
const TITLE_SIZE: f32 = 22.0;
const TITLE_MIN_SIZE: f32 = 14.0;
const SUBTITLE_SIZE: f32 = 11.0;
const SECTION_SIZE: f32 = 15.0;
const SUBSECTION_SIZE: f32 = 12.5;
const BODY_SIZE: f32 = 10.5;
const FOOTER_SIZE: f32 = 8.5;
const LEADING: f32 = 1.35;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
const INDENT: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(f32, f32, f32);

const ACCENT: Rgb = Rgb(0.42, 0.11, 0.11);
const ACCENT_TEXT: Rgb = Rgb(0.99, 0.96, 0.89);
const BODY_TEXT: Rgb = Rgb(0.11, 0.11, 0.11);
const MUTED_TEXT: Rgb = Rgb(0.4, 0.4, 0.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    text: String,
    font: Font,
    size: f32,
    color: Rgb,
    indent: f32,
}

impl Line {
    fn height(&self) -> f32 {
        self.size * LEADING
    }
}

/// Lines that move to the next page together.
#[derive(Debug, Clone)]
struct Chunk {
    lines: Vec<Line>,
    space_before: f32,
    heading: bool,
}

impl Chunk {
    fn height(&self) -> f32 {
        self.space_before + self.lines.iter().map(Line::height).sum::<f32>()
    }
}

#[derive(Debug, Clone)]
struct Placed {
    line: Line,
    baseline: f32,
}

/// Title lines drawn inside the accent band on the first page.
#[derive(Debug, Clone)]
struct TitleBand {
    lines: Vec<String>,
    size: f32,
    height: f32,
}

impl TitleBand {
    /// Shrink the title toward `TITLE_MIN_SIZE` to keep it on one line, then
    /// wrap whatever still does not fit and grow the band to hold it.
    fn fit(title: &str) -> Self {
        let width = PAGE_WIDTH - 2.0 * MARGIN - 2.0 * BAND_PADDING;
        let glyphs = title.chars().count().max(1) as f32;
        let size = (width / (glyphs * GLYPH_WIDTH)).clamp(TITLE_MIN_SIZE, TITLE_SIZE);
        let max = if size > TITLE_MIN_SIZE {
            usize::MAX
        } else {
            max_chars(width, size)
        };
        let lines = wrap(title, max);
        let extra = lines.len().saturating_sub(1) as f32 * size * LEADING;
        let height = (BAND_PADDING + size + extra + 4.0 + SUBTITLE_SIZE + 12.0)
            .max(TITLE_BAND_HEIGHT);
        Self {
            lines,
            size,
            height,
        }
    }
}

#[derive(Debug, Default)]
struct Page {
    lines: Vec<Placed>,
    title_band: Option<TitleBand>,
}

struct Layout {
    pages: Vec<Page>,
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: CONTENT_TOP,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = CONTENT_TOP;
        tracing::debug!(page = self.pages.len(), "pdf page break");
    }

    fn remaining(&self) -> f32 {
        self.cursor - CONTENT_BOTTOM
    }

    fn place(&mut self, line: Line) {
        if line.height() > self.remaining() {
            self.new_page();
        }
        self.cursor -= line.height();
        let baseline = self.cursor + (line.height() - line.size);
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(Placed { line, baseline });
        }
    }

    fn push(&mut self, chunk: Chunk) {
        let needed = chunk.height() + if chunk.heading { BREAK_THRESHOLD } else { 0.0 };
        let fits_on_empty_page = chunk.height() <= CONTENT_TOP - CONTENT_BOTTOM;
        if needed > self.remaining() && self.cursor < CONTENT_TOP && fits_on_empty_page {
            self.new_page();
        }
        if self.cursor < CONTENT_TOP {
            self.cursor -= chunk.space_before;
        }
        for line in chunk.lines {
            self.place(line);
        }
    }
}

/// Render a laid-out record as a PDF document.
pub fn render(document: &ContentDocument) -> Result<Vec<u8>> {
    let pages = paginate(document);
    write_document(document, &pages)
}

fn paginate(document: &ContentDocument) -> Vec<Page> {
    let mut layout = Layout::new();
    let band = TitleBand::fit(&document.title);
    layout.cursor = CONTENT_TOP - band.height - 12.0;
    if let Some(first) = layout.pages.first_mut() {
        first.title_band = Some(band);
    }

    if let Some(description) = &document.description {
        layout.push(paragraph(
            description,
            Font::Regular,
            BODY_SIZE,
            BODY_TEXT,
            0.0,
            0.0,
        ));
    }
    for section in &document.sections {
        let mut heading =
            paragraph(&section.heading, Font::Bold, SECTION_SIZE, ACCENT, 0.0, 14.0);
        heading.heading = true;
        layout.push(heading);
        push_blocks(&mut layout, &section.blocks, 0.0);
    }
    layout.pages
}

fn push_blocks(layout: &mut Layout, blocks: &[Block], indent: f32) {
    for block in blocks {
        match block {
            Block::Field { label, value } => {
                layout.push(paragraph(
                    &format!("{label}: {value}"),
                    Font::Regular,
                    BODY_SIZE,
                    BODY_TEXT,
                    indent,
                    3.0,
                ));
            }
            Block::Text(text) => {
                layout.push(paragraph(text, Font::Regular, BODY_SIZE, BODY_TEXT, indent, 3.0));
            }
            Block::List(items) => {
                for item in items {
                    layout.push(paragraph(
                        &format!("- {item}"),
                        Font::Regular,
                        BODY_SIZE,
                        BODY_TEXT,
                        indent + INDENT / 2.0,
                        1.0,
                    ));
                }
            }
            Block::Entry { name, description } => {
                let mut chunk = paragraph(name, Font::Bold, BODY_SIZE, BODY_TEXT, indent, 6.0);
                if !description.trim().is_empty() {
                    let body =
                        paragraph(description.trim(), Font::Regular, BODY_SIZE, BODY_TEXT, indent, 0.0);
                    chunk.lines.extend(body.lines);
                }
                layout.push(chunk);
            }
            Block::Subsection { heading, blocks } => {
                let mut chunk =
                    paragraph(heading, Font::Bold, SUBSECTION_SIZE, ACCENT, indent, 8.0);
                chunk.heading = true;
                layout.push(chunk);
                push_blocks(layout, blocks, indent + INDENT);
            }
        }
    }
}

fn paragraph(
    text: &str,
    font: Font,
    size: f32,
    color: Rgb,
    indent: f32,
    space_before: f32,
) -> Chunk {
    let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
    let lines = wrap(text, max_chars(width, size))
        .into_iter()
        .map(|text| Line {
            text,
            font,
            size,
            color,
            indent,
        })
        .collect();
    Chunk {
        lines,
        space_before,
        heading: false,
    }
}

fn max_chars(width: f32, size: f32) -> usize {
    ((width / (size * GLYPH_WIDTH)).floor() as usize).max(1)
}

/// Greedy word wrap on a character budget. Overlong words are split.
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..max).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let length = current.chars().count();
        if length > 0 && length + 1 + word.chars().count() > max {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Map text onto the single-byte WinAnsi encoding used by the base fonts.
/// Fails with the first character that encoding has no slot for.
fn encode_text(text: &str) -> std::result::Result<Vec<u8>, char> {
    text.chars()
        .map(|ch| {
            let byte = match ch {
                '\u{20AC}' => 0x80,
                '\u{201A}' => 0x82,
                '\u{0192}' => 0x83,
                '\u{201E}' => 0x84,
                '\u{2026}' => 0x85,
                '\u{2020}' => 0x86,
                '\u{2021}' => 0x87,
                '\u{02C6}' => 0x88,
                '\u{2030}' => 0x89,
                '\u{0160}' => 0x8A,
                '\u{2039}' => 0x8B,
                '\u{0152}' => 0x8C,
                '\u{017D}' => 0x8E,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '\u{2022}' => 0x95,
                '\u{2013}' => 0x96,
                '\u{2014}' => 0x97,
                '\u{02DC}' => 0x98,
                '\u{2122}' => 0x99,
                '\u{0161}' => 0x9A,
                '\u{203A}' => 0x9B,
                '\u{0153}' => 0x9C,
                '\u{017E}' => 0x9E,
                '\u{0178}' => 0x9F,
                ' '..='~' | '\u{A0}'..='\u{FF}' => u32::from(ch) as u8,
                _ => return Err(ch),
            };
            Ok(byte)
        })
        .collect()
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn fill_color(color: Rgb) -> Operation {
    Operation::new("rg", vec![real(color.0), real(color.1), real(color.2)])
}

fn show_text(
    operations: &mut Vec<Operation>,
    text: &str,
    font: Font,
    size: f32,
    color: Rgb,
    x: f32,
    y: f32,
) -> Result<()> {
    let encoded = encode_text(text).map_err(|ch| RenderError::Unencodable {
        format: "pdf",
        ch,
        text: text.to_string(),
    })?;
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![Object::Name(font.resource().as_bytes().to_vec()), real(size)],
    ));
    operations.push(fill_color(color));
    operations.push(Operation::new("Td", vec![real(x), real(y)]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encoded)],
    ));
    operations.push(Operation::new("ET", vec![]));
    Ok(())
}

fn page_operations(
    document: &ContentDocument,
    page: &Page,
    number: usize,
    total: usize,
) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    if let Some(band) = &page.title_band {
        let band_top = PAGE_HEIGHT - MARGIN;
        let band_bottom = band_top - band.height;
        operations.push(fill_color(ACCENT));
        operations.push(Operation::new(
            "re",
            vec![
                real(MARGIN),
                real(band_bottom),
                real(PAGE_WIDTH - 2.0 * MARGIN),
                real(band.height),
            ],
        ));
        operations.push(Operation::new("f", vec![]));
        let mut baseline = band_top - BAND_PADDING - band.size;
        for line in &band.lines {
            show_text(
                &mut operations,
                line,
                Font::Bold,
                band.size,
                ACCENT_TEXT,
                MARGIN + BAND_PADDING,
                baseline,
            )?;
            baseline -= band.size * LEADING;
        }
        show_text(
            &mut operations,
            &document.subtitle,
            Font::Regular,
            SUBTITLE_SIZE,
            ACCENT_TEXT,
            MARGIN + BAND_PADDING,
            band_bottom + 12.0,
        )?;
    }

    for placed in &page.lines {
        let line = &placed.line;
        show_text(
            &mut operations,
            &line.text,
            line.font,
            line.size,
            line.color,
            MARGIN + line.indent,
            placed.baseline,
        )?;
    }

    let title = document.title.split_whitespace().collect::<Vec<_>>().join(" ");
    let footer = format!("{title} - Page {number} of {total}");
    let x = ((PAGE_WIDTH - text_width(&footer, FOOTER_SIZE)) / 2.0).max(MARGIN);
    show_text(
        &mut operations,
        &footer,
        Font::Regular,
        FOOTER_SIZE,
        MUTED_TEXT,
        x,
        FOOTER_Y,
    )?;
    Ok(operations)
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn write_document(document: &ContentDocument, pages: &[Page]) -> Result<Vec<u8>> {
    let mut pdf = Document::with_version("1.5");
    let pages_id: ObjectId = pdf.new_object_id();
    let regular = pdf.add_object(font_dictionary("Helvetica"));
    let bold = pdf.add_object(font_dictionary("Helvetica-Bold"));
    let resources = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let total = pages.len();
    let mut kids = Vec::with_capacity(total);
    for (index, page) in pages.iter().enumerate() {
        let content = Content {
            operations: page_operations(document, page, index + 1, total)?,
        };
        let encoded = content.encode().map_err(pdf_error)?;
        let content_id = pdf.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(total as i64),
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(PAGE_WIDTH),
                real(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog);

    let mut out = Vec::new();
    pdf.save_to(&mut out).map_err(pdf_error)?;
    Ok(out)
}

fn pdf_error(error: impl std::fmt::Display) -> RenderError {
    RenderError::write("pdf", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_budget_and_keeps_words() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|line| line.chars().count() <= 10));
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 4), vec![String::new()]);
    }

    #[test]
    fn encodes_typographic_punctuation() {
        assert_eq!(encode_text("a\u{2014}b"), Ok(vec![b'a', 0x97, b'b']));
        assert_eq!(encode_text("caf\u{e9}"), Ok(b"caf\xe9".to_vec()));
        assert_eq!(encode_text("\u{152}uvre \u{20AC}5"), Ok(b"\x8cuvre \x805".to_vec()));
    }

    #[test]
    fn unencodable_characters_are_reported_not_replaced() {
        assert_eq!(encode_text("\u{14C}kami"), Err('\u{14C}'));
        assert_eq!(encode_text("Kitsunebi \u{72D0}\u{706B}"), Err('\u{72D0}'));
        assert_eq!(encode_text("\u{1F409}"), Err('\u{1F409}'));
    }

    #[test]
    fn short_titles_keep_the_standard_band() {
        let band = TitleBand::fit("Storm Sorcerer");
        assert_eq!(band.lines, vec!["Storm Sorcerer"]);
        assert_eq!(band.size, TITLE_SIZE);
        assert_eq!(band.height, TITLE_BAND_HEIGHT);
    }

    #[test]
    fn long_titles_shrink_then_wrap_inside_the_band() {
        let width = PAGE_WIDTH - 2.0 * MARGIN - 2.0 * BAND_PADDING;
        let medium = TitleBand::fit("Oath of the Crimson Lantern and the Ashen Road");
        assert!(medium.size < TITLE_SIZE);
        assert_eq!(medium.lines.len(), 1);

        let title = "The Most Exalted Order of the Seven Burning Lanterns of the Deep Ashen Road";
        let long = TitleBand::fit(title);
        assert_eq!(long.size, TITLE_MIN_SIZE);
        assert!(long.lines.len() > 1);
        assert!(long.height > TITLE_BAND_HEIGHT);
        for line in &long.lines {
            assert!(text_width(line, long.size) <= width, "{line}");
        }
        assert_eq!(long.lines.join(" "), title);
    }

    #[test]
    fn headings_move_to_the_next_page_near_the_bottom() {
        let mut layout = Layout::new();
        layout.cursor = CONTENT_BOTTOM + 40.0;
        let mut heading = paragraph("Level 5", Font::Bold, SUBSECTION_SIZE, ACCENT, 0.0, 8.0);
        heading.heading = true;
        layout.push(heading);
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.pages[1].lines[0].line.text, "Level 5");
    }
}
