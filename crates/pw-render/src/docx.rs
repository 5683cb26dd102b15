// docx.rs - Office Open XML word-processing encoder.
//
// A .docx file is a zip package of XML parts. Parts are written in a fixed
// order with a fixed entry timestamp, so the same document tree always
// encodes to the same bytes.

use std::io::{Cursor, Write};

use pw_policy::{Block, DocumentTree};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::RenderError;

pub const DOCX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOCX_EXTENSION: &str = "docx";

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Package part names, in the order they are written.
pub const PART_ORDER: [&str; 7] = [
    "[Content_Types].xml",
    "_rels/.rels",
    "docProps/core.xml",
    "docProps/app.xml",
    "word/document.xml",
    "word/styles.xml",
    "word/_rels/document.xml.rels",
];

/// Paragraph styles defined in `word/styles.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Title,
    Heading1,
    Heading2,
    Normal,
    ListBullet,
}

impl ParagraphStyle {
    pub fn id(&self) -> &'static str {
        match self {
            ParagraphStyle::Title => "Title",
            ParagraphStyle::Heading1 => "Heading1",
            ParagraphStyle::Heading2 => "Heading2",
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::ListBullet => "ListBullet",
        }
    }
}

/// Encode a document tree as .docx bytes.
pub fn encode(tree: &DocumentTree) -> Result<Vec<u8>, RenderError> {
    let parts = [
        content_types(),
        package_rels(),
        core_properties(tree),
        app_properties(tree),
        document_body(tree),
        styles(),
        document_rels(),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    for (name, body) in PART_ORDER.iter().zip(parts.iter()) {
        zip.start_file(*name, options)?;
        zip.write_all(body.as_bytes()).map_err(ZipError::from)?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Escape text for XML element content and attribute values.
///
/// Characters not allowed in XML 1.0 are dropped.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

fn paragraph(out: &mut String, style: ParagraphStyle, text: &str) {
    out.push_str("<w:p><w:pPr><w:pStyle w:val=\"");
    out.push_str(style.id());
    out.push_str("\"/></w:pPr><w:r><w:t xml:space=\"preserve\">");
    out.push_str(&escape_xml(text));
    out.push_str("</w:t></w:r></w:p>");
}

fn document_body(tree: &DocumentTree) -> String {
    let meta = &tree.metadata;
    let mut body = String::new();
    body.push_str(XML_DECL);
    body.push_str("<w:document xmlns:w=\"");
    body.push_str(W_NS);
    body.push_str("\"><w:body>");

    paragraph(&mut body, ParagraphStyle::Title, &meta.title);
    paragraph(&mut body, ParagraphStyle::Normal, &meta.organization);
    paragraph(
        &mut body,
        ParagraphStyle::Normal,
        &format!("Effective date: {}", meta.effective_date),
    );
    paragraph(&mut body, ParagraphStyle::Normal, &format!("Policy owner: {}", meta.owner));

    for section in &tree.sections {
        paragraph(
            &mut body,
            ParagraphStyle::Heading1,
            &format!("{}. {}", section.number, section.heading),
        );
        for (idx, clause) in section.clauses.iter().enumerate() {
            paragraph(
                &mut body,
                ParagraphStyle::Heading2,
                &format!("{}.{} {}", section.number, idx + 1, clause.heading),
            );
            for block in clause.blocks() {
                match block {
                    Block::Paragraph(text) => paragraph(&mut body, ParagraphStyle::Normal, &text),
                    Block::Bullet(text) => {
                        paragraph(&mut body, ParagraphStyle::ListBullet, &format!("\u{2022}\t{}", text))
                    }
                }
            }
        }
    }

    body.push_str(
        "<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
         <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
         w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
    );
    body.push_str("</w:body></w:document>");
    body
}

fn content_types() -> String {
    format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
         <Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
         <Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
         <Override PartName=\"/docProps/app.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>\
         </Types>"
    )
}

fn package_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties\" Target=\"docProps/app.xml\"/>\
         </Relationships>"
    )
}

fn document_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
         </Relationships>"
    )
}

fn core_properties(tree: &DocumentTree) -> String {
    let meta = &tree.metadata;
    format!(
        "{XML_DECL}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{title}</dc:title>\
         <dc:creator>{org}</dc:creator>\
         <cp:keywords>{policy_type} {layout}</cp:keywords>\
         <dcterms:created xsi:type=\"dcterms:W3CDTF\">{created}</dcterms:created>\
         </cp:coreProperties>",
        title = escape_xml(&meta.title),
        org = escape_xml(&meta.organization),
        policy_type = escape_xml(&meta.policy_type),
        layout = escape_xml(&meta.layout_version),
        created = meta.generated_at.format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn app_properties(tree: &DocumentTree) -> String {
    format!(
        "{XML_DECL}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
         <Application>pw-render</Application>\
         <Company>{org}</Company>\
         </Properties>",
        org = escape_xml(&tree.metadata.organization),
    )
}

fn styles() -> String {
    format!(
        "{XML_DECL}<w:styles xmlns:w=\"{W_NS}\">\
         <w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\"/>\
         <w:sz w:val=\"22\"/></w:rPr></w:rPrDefault></w:docDefaults>\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/>\
         <w:pPr><w:spacing w:after=\"160\"/></w:pPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/>\
         <w:pPr><w:jc w:val=\"center\"/><w:spacing w:after=\"240\"/></w:pPr>\
         <w:rPr><w:b/><w:sz w:val=\"48\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Heading1\"><w:name w:val=\"heading 1\"/><w:basedOn w:val=\"Normal\"/>\
         <w:pPr><w:keepNext/><w:spacing w:before=\"360\" w:after=\"120\"/><w:outlineLvl w:val=\"0\"/></w:pPr>\
         <w:rPr><w:b/><w:sz w:val=\"32\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Heading2\"><w:name w:val=\"heading 2\"/><w:basedOn w:val=\"Normal\"/>\
         <w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"80\"/><w:outlineLvl w:val=\"1\"/></w:pPr>\
         <w:rPr><w:b/><w:sz w:val=\"26\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"ListBullet\"><w:name w:val=\"List Bullet\"/><w:basedOn w:val=\"Normal\"/>\
         <w:pPr><w:spacing w:after=\"60\"/><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr></w:style>\
         </w:styles>"
    )
}
