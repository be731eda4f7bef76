//! Cover letter PDF: a centered contact header, the date and the letter body,
//! word-wrapped with Helvetica metrics on US Letter pages.
//!
//! Layout is computed first as positioned text runs (pure and testable), then
//! written out as a PDF with the base-14 fonts so no font files are embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, Stream, StringFormat};
use tracing::warn;

use super::metrics::Face;
use super::RenderError;
use crate::document::Document;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const NAME_SIZE: f32 = 24.0;
const NAME_LEADING: f32 = 29.0;
const NAME_SPACE_AFTER: f32 = 10.0;
const NAME_COLOR: Rgb = Rgb(0x2e, 0x3b, 0x4e);

const CONTACT_SIZE: f32 = 10.0;
const CONTACT_LEADING: f32 = 12.0;
const CONTACT_SPACE_AFTER: f32 = 20.0;
const CONTACT_COLOR: Rgb = Rgb(0x66, 0x66, 0x66);

const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 16.0;
const PARAGRAPH_SPACE_AFTER: f32 = 18.0;
const DATE_SPACE_AFTER: f32 = 24.0;
const BODY_COLOR: Rgb = Rgb(0, 0, 0);

const DEFAULT_NAME: &str = "Candidate";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Contact details printed in the letter header.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactHeader {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl Default for ContactHeader {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
        }
    }
}

impl ContactHeader {
    /// Reads `cv.name/email/phone/location`. Unparseable YAML yields the defaults.
    pub fn from_resume_yaml(yaml: &str) -> Self {
        let document = match Document::parse(yaml) {
            Ok(document) => document,
            Err(e) => {
                warn!("Could not read contact details for cover letter: {e}");
                return Self::default();
            }
        };

        let field = |name: &str| document.cv_text(name).unwrap_or_default();
        let name = field("name");
        Self {
            name: if name.trim().is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                name
            },
            email: field("email"),
            phone: field("phone"),
            location: field("location"),
        }
    }

    /// Non-empty contact parts joined with ` | `.
    pub fn contact_line(&self) -> String {
        [&self.email, &self.phone, &self.location]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// One line of text at an absolute baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub face: Face,
    pub size: f32,
    pub color: Rgb,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

struct PageCursor {
    pages: Vec<Vec<TextRun>>,
    y: f32,
}

impl PageCursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn line(&mut self, face: Face, size: f32, color: Rgb, leading: f32, centered: bool, text: String) {
        if self.y - leading < MARGIN {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= leading;

        let x = if centered {
            let width = face.metrics().width_pt(&text, size);
            MARGIN + ((CONTENT_WIDTH - width) / 2.0).max(0.0)
        } else {
            MARGIN
        };

        if let Some(page) = self.pages.last_mut() {
            page.push(TextRun {
                face,
                size,
                color,
                x,
                y: self.y,
                text,
            });
        }
    }

    fn space(&mut self, points: f32) {
        self.y -= points;
    }
}

/// Positions every line of the letter. Returns one run list per page.
pub fn layout_cover_letter(header: &ContactHeader, date: &str, body: &str) -> Vec<Vec<TextRun>> {
    let mut cursor = PageCursor::new();
    let bold = Face::HelveticaBold;
    let regular = Face::Helvetica;

    for line in bold.metrics().wrap(&header.name, NAME_SIZE, CONTENT_WIDTH) {
        cursor.line(bold, NAME_SIZE, NAME_COLOR, NAME_LEADING, true, line);
    }
    cursor.space(NAME_SPACE_AFTER);

    let contact = header.contact_line();
    if !contact.is_empty() {
        for line in regular.metrics().wrap(&contact, CONTACT_SIZE, CONTENT_WIDTH) {
            cursor.line(regular, CONTACT_SIZE, CONTACT_COLOR, CONTACT_LEADING, true, line);
        }
    }
    cursor.space(CONTACT_SPACE_AFTER);

    cursor.line(regular, BODY_SIZE, BODY_COLOR, BODY_LEADING, false, date.to_string());
    cursor.space(DATE_SPACE_AFTER);

    for paragraph in body.split("\n\n").filter(|p| !p.trim().is_empty()) {
        let joined = paragraph.replace('\n', " ");
        for line in regular.metrics().wrap(&joined, BODY_SIZE, CONTENT_WIDTH) {
            cursor.line(regular, BODY_SIZE, BODY_COLOR, BODY_LEADING, false, line);
        }
        cursor.space(PARAGRAPH_SPACE_AFTER);
    }

    cursor.pages
}

// ────────────────────────────────────────────────────────────────────────────
// PDF assembly
// ────────────────────────────────────────────────────────────────────────────

fn font_resource(face: Face) -> &'static str {
    match face {
        Face::Helvetica => "F1",
        Face::HelveticaBold => "F2",
    }
}

fn font_dictionary(face: Face) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Maps a char onto WinAnsiEncoding; unmappable characters become `?`.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn page_operations(runs: &[TextRun]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(runs.len() * 6);
    for run in runs {
        let Rgb(r, g, b) = run.color;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource(run.face).as_bytes().to_vec()),
                run.size.into(),
            ],
        ));
        operations.push(Operation::new(
            "rg",
            vec![
                (r as f32 / 255.0).into(),
                (g as f32 / 255.0).into(),
                (b as f32 / 255.0).into(),
            ],
        ));
        operations.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// Draws the letter and returns the serialized PDF.
pub fn render_cover_letter_pdf(
    header: &ContactHeader,
    date: &str,
    body: &str,
) -> Result<Vec<u8>, RenderError> {
    let pages = layout_cover_letter(header, date, body);

    let mut doc = PdfDocument::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Face::Helvetica));
    let bold_id = doc.add_object(font_dictionary(Face::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            font_resource(Face::Helvetica) => regular_id,
            font_resource(Face::HelveticaBold) => bold_id,
        },
    });

    let mut page_ids = Vec::with_capacity(pages.len());
    for runs in &pages {
        let content = Content {
            operations: page_operations(runs),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
