//! Renders optimized resume text into an ATS-friendly Word document.
//!
//! Output is a minimal WordprocessingML package: Calibri 11pt body text,
//! single column, no tables or text boxes, Letter page with 1" margins.
//! Line structure decides paragraph style:
//!
//! | line                          | style        |
//! |-------------------------------|--------------|
//! | first non-empty line          | Heading 1    |
//! | starts with `•`, `-` or `*`   | List Bullet  |
//! | section header                | Heading 2    |
//! | empty                         | empty para   |
//! | anything else                 | Normal       |

use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("DOCX generation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX generation failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Headings recognised regardless of case. Matched against the whole line.
const SECTION_HEADINGS: &[&str] = &[
    "CONTACT INFORMATION",
    "PROFESSIONAL SUMMARY",
    "SUMMARY",
    "CORE COMPETENCIES",
    "SKILLS",
    "TECHNICAL SKILLS",
    "PROFESSIONAL EXPERIENCE",
    "WORK EXPERIENCE",
    "EXPERIENCE",
    "EDUCATION",
    "CERTIFICATIONS",
    "CERTIFICATES",
    "PROJECTS",
    "KEY PROJECTS",
    "AWARDS",
    "ACHIEVEMENTS",
];

const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Empty,
    Name(&'a str),
    Heading(&'a str),
    Bullet(&'a str),
    Paragraph(&'a str),
}

pub fn classify_lines(text: &str) -> Vec<Block<'_>> {
    let mut seen_name = false;

    text.lines()
        .map(str::trim)
        .map(|line| {
            if line.is_empty() {
                Block::Empty
            } else if !seen_name {
                seen_name = true;
                Block::Name(line)
            } else if line.starts_with(BULLET_MARKERS) {
                Block::Bullet(line[line.chars().next().map_or(0, char::len_utf8)..].trim())
            } else if is_section_header(line) {
                Block::Heading(line)
            } else {
                Block::Paragraph(line)
            }
        })
        .collect()
}

/// All-caps lines longer than two characters, or a standard heading in any case.
pub fn is_section_header(line: &str) -> bool {
    let has_cased = line.chars().any(char::is_alphabetic);
    let all_caps = has_cased && !line.chars().any(char::is_lowercase);
    if all_caps && line.chars().count() > 2 {
        return true;
    }

    let normalized = line.trim_end_matches(':').trim().to_uppercase();
    SECTION_HEADINGS.contains(&normalized.as_str())
}

/// Builds the `.docx` package for `text`. `candidate_name` becomes the document title.
pub fn render_document(text: &str, candidate_name: &str) -> Result<Vec<u8>, RenderError> {
    let blocks = classify_lines(text);
    let document = document_xml(&blocks);
    let core = core_xml(candidate_name);

    let parts: [(&str, &str); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/document.xml", document.as_str()),
        ("word/styles.xml", STYLES_XML),
        ("word/numbering.xml", NUMBERING_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("docProps/core.xml", core.as_str()),
    ];

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in parts {
        zip.start_file(name, options)?;
        zip.write_all(contents.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Drops characters XML 1.0 cannot carry, then escapes markup.
fn xml_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect();
    escape(cleaned.as_str()).into_owned()
}

fn paragraph(style: Option<&str>, text: &str) -> String {
    let properties = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
        .unwrap_or_default();
    format!(
        r#"<w:p>{properties}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_text(text)
    )
}

fn document_xml(blocks: &[Block<'_>]) -> String {
    let mut body = String::new();
    for block in blocks {
        let para = match block {
            Block::Empty => "<w:p/>".to_string(),
            Block::Name(line) => paragraph(Some("Heading1"), line),
            Block::Heading(line) => paragraph(Some("Heading2"), line),
            Block::Bullet(line) => paragraph(Some("ListBullet"), line),
            Block::Paragraph(line) => paragraph(None, line),
        };
        body.push_str(&para);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

fn core_xml(title: &str) -> String {
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created></cp:coreProperties>"#,
        xml_text(title)
    )
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

// Sizes are half-points: 22 = 11pt, 24 = 12pt, 32 = 16pt.
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:color w:val="000000"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="0" w:after="120"/><w:jc w:val="left"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="000000"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="60"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="000000"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:spacing w:after="60"/><w:ind w:left="720" w:hanging="360"/></w:pPr></w:style></w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;
