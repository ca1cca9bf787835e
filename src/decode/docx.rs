//! DOCX decoding: WordprocessingML to a structural document tree.
//!
//! A DOCX file is a zip container; the document body lives in
//! `word/document.xml`. The decoder streams that entry through quick-xml
//! and keeps only body-level structure: paragraphs with their style and
//! numbering, runs with bold/italic flags, and tables flattened to rows of
//! plain-text cells.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::model::{DocxBlock, DocxDocument, DocxParagraph, DocxRun, DocxTable};

/// Decode a DOCX byte buffer into its structural tree.
///
/// Fails with [`Error::DocxParse`] when the container or the document XML
/// is malformed; nothing is extracted in that case.
pub fn decode_docx(data: &[u8]) -> Result<DocxDocument> {
    let xml = read_zip_entry(data, "word/document.xml")?;
    parse_document_xml(&xml)
}

/// Read one named entry from the zip container.
fn read_zip_entry(data: &[u8], name: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entry = archive
        .by_name(name)
        .map_err(|_| Error::DocxParse(format!("missing {name} entry")))?;
    let mut buffer = Vec::new();
    entry
        .read_to_end(&mut buffer)
        .map_err(|e| Error::DocxParse(e.to_string()))?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Parse the WordprocessingML body into blocks.
fn parse_document_xml(xml: &str) -> Result<DocxDocument> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut blocks: Vec<DocxBlock> = Vec::new();

    let mut in_paragraph = false;
    let mut in_run = false;
    let mut in_text = false;
    let mut in_table = false;
    let mut in_cell = false;

    let mut current_para = DocxParagraph::default();
    let mut current_run = DocxRun::default();

    let mut current_cell = String::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut table_rows: Vec<Vec<String>> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"p" => {
                        if in_cell {
                            if !current_cell.is_empty() && !current_cell.ends_with('\n') {
                                current_cell.push('\n');
                            }
                        } else {
                            in_paragraph = true;
                            current_para = DocxParagraph::default();
                        }
                    }
                    b"r" => {
                        if in_paragraph && !in_cell {
                            in_run = true;
                            current_run = DocxRun::default();
                        }
                    }
                    b"pStyle" => {
                        if in_paragraph && !in_cell {
                            if let Some(value) = attr_value(&reader, e, b"val") {
                                current_para.style = Some(value);
                            }
                        }
                    }
                    b"numPr" => {
                        if in_paragraph && !in_cell {
                            current_para.list_item = true;
                        }
                    }
                    b"b" => {
                        if in_run {
                            current_run.bold = flag_value(&reader, e);
                        }
                    }
                    b"i" => {
                        if in_run {
                            current_run.italic = flag_value(&reader, e);
                        }
                    }
                    b"t" => in_text = true,
                    b"tab" => append_text(&mut current_run, &mut current_cell, in_cell, "\t"),
                    b"br" => append_text(&mut current_run, &mut current_cell, in_cell, "\n"),
                    b"tbl" => {
                        in_table = true;
                        table_rows.clear();
                    }
                    b"tr" => {
                        if in_table {
                            current_row = Vec::new();
                        }
                    }
                    b"tc" => {
                        if in_table {
                            in_cell = true;
                            current_cell.clear();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"pStyle" => {
                        if in_paragraph && !in_cell {
                            if let Some(value) = attr_value(&reader, e, b"val") {
                                current_para.style = Some(value);
                            }
                        }
                    }
                    b"numPr" => {
                        if in_paragraph && !in_cell {
                            current_para.list_item = true;
                        }
                    }
                    b"b" => {
                        if in_run {
                            current_run.bold = flag_value(&reader, e);
                        }
                    }
                    b"i" => {
                        if in_run {
                            current_run.italic = flag_value(&reader, e);
                        }
                    }
                    b"tab" => append_text(&mut current_run, &mut current_cell, in_cell, "\t"),
                    b"br" => append_text(&mut current_run, &mut current_cell, in_cell, "\n"),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Ok(text) = e.unescape() {
                        append_text(&mut current_run, &mut current_cell, in_cell, text.as_ref());
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"t" => in_text = false,
                    b"r" => {
                        if in_run {
                            in_run = false;
                            if !current_run.text.is_empty() {
                                current_para.runs.push(std::mem::take(&mut current_run));
                            }
                        }
                    }
                    b"p" => {
                        if in_cell {
                            if !current_cell.ends_with('\n') {
                                current_cell.push('\n');
                            }
                        } else if in_paragraph {
                            in_paragraph = false;
                            if !current_para.text().is_empty() {
                                blocks.push(DocxBlock::Paragraph(std::mem::take(
                                    &mut current_para,
                                )));
                            }
                        }
                    }
                    b"tc" => {
                        if in_cell {
                            in_cell = false;
                            let text = cell_text(&current_cell);
                            current_row.push(text);
                        }
                    }
                    b"tr" => {
                        if in_table {
                            table_rows.push(std::mem::take(&mut current_row));
                        }
                    }
                    b"tbl" => {
                        if in_table {
                            in_table = false;
                            let rows = std::mem::take(&mut table_rows);
                            if !rows.is_empty() {
                                blocks.push(DocxBlock::Table(DocxTable { rows }));
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(DocxDocument { blocks })
}

fn append_text(current_run: &mut DocxRun, current_cell: &mut String, in_cell: bool, text: &str) {
    if in_cell {
        current_cell.push_str(text);
    } else {
        current_run.text.push_str(text);
    }
}

/// Flatten a cell's accumulated text to a single row-friendly line.
fn cell_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

fn attr_value<B: std::io::BufRead>(
    reader: &XmlReader<B>,
    element: &BytesStart,
    key: &[u8],
) -> Option<String> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr.ok()?;
        if local_name(attr.key.as_ref()) == key {
            if let Ok(value) = attr.decode_and_unescape_value(reader) {
                return Some(value.into_owned());
            }
        }
    }
    None
}

/// A bare toggle element (`<w:b/>`) means true; `w:val` of `0`/`false`
/// switches it off.
fn flag_value<B: std::io::BufRead>(reader: &XmlReader<B>, element: &BytesStart) -> bool {
    !matches!(
        attr_value(reader, element, b"val").as_deref(),
        Some("0") | Some("false")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocxBlock;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn body(inner: &str) -> String {
        format!(r#"<w:document {NS}><w:body>{inner}</w:body></w:document>"#)
    }

    #[test]
    fn test_simple_paragraphs() {
        let xml = body("<w:p><w:r><w:t>First</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p>");
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.plain_text(), "First\n\nSecond");
    }

    #[test]
    fn test_heading_style_recognized() {
        let xml = body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Results</w:t></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        match &doc.blocks[0] {
            DocxBlock::Paragraph(p) => assert_eq!(p.heading_level(), Some(2)),
            other => panic!("expected paragraph, got {other:?}"),
        }
        assert!(doc.to_html().contains("<h2>Results</h2>"));
    }

    #[test]
    fn test_list_paragraphs_become_items() {
        let xml = body(concat!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr>"#,
            r#"<w:r><w:t>alpha</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr>"#,
            r#"<w:r><w:t>beta</w:t></w:r></w:p>"#,
        ));
        let doc = parse_document_xml(&xml).unwrap();
        let html = doc.to_html();
        assert_eq!(html, "<ul><li>alpha</li><li>beta</li></ul>");
    }

    #[test]
    fn test_bold_and_italic_flags() {
        let xml = body(concat!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>strong</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:rPr><w:b w:val="false"/><w:i/></w:rPr><w:t>slanted</w:t></w:r></w:p>"#,
        ));
        let doc = parse_document_xml(&xml).unwrap();
        let html = doc.to_html();
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<em>slanted</em>"));
        assert!(!html.contains("<strong>slanted"));
    }

    #[test]
    fn test_table_rows_and_cells() {
        let xml = body(concat!(
            "<w:tbl>",
            "<w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr>",
            "<w:tr><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>d</w:t></w:r></w:p></w:tc></w:tr>",
            "</w:tbl>",
        ));
        let doc = parse_document_xml(&xml).unwrap();
        match &doc.blocks[0] {
            DocxBlock::Table(t) => {
                assert_eq!(t.rows, vec![vec!["a", "b"], vec!["c", "d"]]);
            }
            other => panic!("expected table, got {other:?}"),
        }
        assert_eq!(doc.plain_text(), "a\tb\nc\td");
    }

    #[test]
    fn test_explicit_break_becomes_newline() {
        let xml = body(r#"<w:p><w:r><w:t>up</w:t><w:br/><w:t>down</w:t></w:r></w:p>"#);
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.plain_text(), "up\ndown");
        assert!(doc.to_html().contains("up<br />down"));
    }

    #[test]
    fn test_not_a_zip_is_docx_parse_error() {
        let err = decode_docx(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::DocxParse(_)));
    }

    #[test]
    fn test_malformed_xml_is_docx_parse_error() {
        // Mismatched closing tag trips the reader's end-name check.
        let err = parse_document_xml("<w:body><w:p>text</w:tbl></w:body>").unwrap_err();
        assert!(matches!(err, Error::DocxParse(_)));
    }
}
