//! PPTX slide document extraction.

use deck_core::normalize::{clean_points, collapse_whitespace};
use deck_core::render::{deck_title_from_name, DeckExtractor};
use deck_core::{Error, Result, SlideDocument, SlideRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";
const CORE_PROPERTIES_PATH: &str = "docProps/core.xml";

/// Reads a `.pptx` archive into a slide document.
///
/// Each slide's title comes from its `title`/`ctrTitle` placeholder; every
/// other shape contributes its non-empty paragraphs as bullet points, in
/// reading order (top-to-bottom, then left-to-right).
#[derive(Debug, Clone, Default)]
pub struct PptxExtractor;

impl PptxExtractor {
    /// Create a new PPTX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract a document from a PPTX reader.
    pub fn extract_from<R: Read + Seek>(&self, reader: R, name: &str) -> Result<SlideDocument> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_paths = self.get_slide_order(&mut archive)?;
        log::debug!("Found {} slides in {}", slide_paths.len(), name);

        let mut slides = Vec::with_capacity(slide_paths.len());
        for slide_path in &slide_paths {
            slides.push(self.parse_slide(&mut archive, slide_path)?);
        }

        let deck_title = self
            .read_deck_title(&mut archive)
            .unwrap_or_else(|| deck_title_from_name(name));

        Ok(SlideDocument::new(deck_title, slides))
    }

    /// Get the ordered list of slide part paths.
    ///
    /// The order is the `sldIdLst` of `presentation.xml`; when that part is
    /// missing, slides are ordered by the number in their relationship id.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let relationships = parse_slide_relationships(&rels_content)?;

        let listed_ids = match self.read_file_from_archive(archive, PRESENTATION_PATH) {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                log::warn!("Falling back to relationship order: {}", e);
                Vec::new()
            }
        };

        if !listed_ids.is_empty() {
            let by_id: HashMap<&str, &str> = relationships
                .iter()
                .map(|rel| (rel.id.as_str(), rel.path.as_str()))
                .collect();
            return Ok(listed_ids
                .iter()
                .filter_map(|id| match by_id.get(id.as_str()) {
                    Some(path) => Some(path.to_string()),
                    None => {
                        log::warn!("Slide id {} has no relationship", id);
                        None
                    }
                })
                .collect());
        }

        let mut slides: Vec<(String, Option<usize>)> = relationships
            .into_iter()
            .map(|rel| {
                let order = extract_slide_number(&rel.id).or_else(|| extract_slide_number(&rel.path));
                (rel.path, order)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide part into a record.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<SlideRecord> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut shapes = extract_shapes_from_xml(&content);

        // Reading order: top-to-bottom, then left-to-right.
        shapes.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let (titles, bodies): (Vec<ShapeInfo>, Vec<ShapeInfo>) =
            shapes.into_iter().partition(|shape| shape.is_title);

        let title = titles
            .first()
            .map(|shape| collapse_whitespace(&shape.paragraphs.join(" ")))
            .unwrap_or_default();
        let content = clean_points(bodies.iter().flat_map(|shape| shape.paragraphs.iter()));

        log::debug!(
            "Parsed {}: '{}' with {} points",
            slide_path,
            title,
            content.len()
        );
        Ok(SlideRecord { title, content })
    }

    /// Read `dc:title` from the core properties, if present and non-empty.
    fn read_deck_title<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Option<String> {
        let content = self
            .read_file_from_archive(archive, CORE_PROPERTIES_PATH)
            .ok()?;

        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);
        let mut in_title = false;
        let mut title = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"title" => {
                    in_title = true;
                }
                Ok(Event::Text(ref e)) if in_title => {
                    title.push_str(&e.unescape().unwrap_or_default());
                }
                Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"title" => break,
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("Error reading core properties: {}", e);
                    return None;
                }
                _ => {}
            }
        }

        let title = collapse_whitespace(&title);
        (!title.is_empty()).then_some(title)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl DeckExtractor for PptxExtractor {
    fn extract(&self, bytes: &[u8], name: &str) -> Result<SlideDocument> {
        self.extract_from(Cursor::new(bytes), name)
    }
}

/// A slide relationship from `presentation.xml.rels`.
#[derive(Debug)]
struct SlideRelationship {
    id: String,
    /// Archive path of the slide part.
    path: String,
}

fn parse_slide_relationships(xml: &str) -> Result<Vec<SlideRelationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut slides = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                if !rel_type.ends_with("/slide") {
                    continue;
                }
                let target = attribute(e, b"Target").unwrap_or_default();
                let path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("ppt/{}", target),
                };
                slides.push(SlideRelationship {
                    id: attribute(e, b"Id").unwrap_or_default(),
                    path,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = attribute(e, b"r:id") {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Text and placement of one shape.
#[derive(Debug, Default)]
struct ShapeInfo {
    paragraphs: Vec<String>,
    is_title: bool,
    x: f64,
    y: f64,
    has_position: bool,
}

impl ShapeInfo {
    fn set_offset(&mut self, e: &BytesStart) {
        if self.has_position {
            return;
        }
        if let Some(x) = attribute(e, b"x").and_then(|v| v.parse::<f64>().ok()) {
            self.x = x;
        }
        if let Some(y) = attribute(e, b"y").and_then(|v| v.parse::<f64>().ok()) {
            self.y = y;
        }
        self.has_position = true;
    }

    fn mark_placeholder(&mut self, e: &BytesStart) {
        if let Some(kind) = attribute(e, b"type") {
            self.is_title = matches!(kind.as_str(), "title" | "ctrTitle");
        }
    }
}

/// Extract text shapes from slide XML.
///
/// Malformed XML stops the scan; shapes completed before the error are kept.
fn extract_shapes_from_xml(xml_content: &str) -> Vec<ShapeInfo> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    // Whitespace inside runs is significant, so text is not trimmed.
    reader.trim_text(false);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"graphicFrame" => {
                    current_shape = Some(ShapeInfo::default());
                }
                b"off" => {
                    if let Some(shape) = current_shape.as_mut() {
                        shape.set_offset(e);
                    }
                }
                b"ph" => {
                    if let Some(shape) = current_shape.as_mut() {
                        shape.mark_placeholder(e);
                    }
                }
                b"txBody" => {
                    in_text_body = true;
                }
                b"p" if in_text_body => {
                    in_paragraph = true;
                    if let Some(shape) = current_shape.as_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"t" if in_paragraph => {
                    in_text = true;
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => {
                    if let Some(shape) = current_shape.as_mut() {
                        shape.set_offset(e);
                    }
                }
                b"ph" => {
                    if let Some(shape) = current_shape.as_mut() {
                        shape.mark_placeholder(e);
                    }
                }
                b"br" if in_paragraph => {
                    if let Some(paragraph) = current_paragraph(&mut current_shape) {
                        paragraph.push(' ');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().unwrap_or_default();
                    if let Some(paragraph) = current_paragraph(&mut current_shape) {
                        paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"graphicFrame" => {
                    if let Some(mut shape) = current_shape.take() {
                        shape.paragraphs.retain(|p| !p.trim().is_empty());
                        if !shape.paragraphs.is_empty() {
                            shapes.push(shape);
                        }
                    }
                    in_text_body = false;
                    in_paragraph = false;
                    in_text = false;
                }
                b"txBody" => {
                    in_text_body = false;
                }
                b"p" => {
                    in_paragraph = false;
                }
                b"t" => {
                    in_text = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error (stopping slide scan): {}", e);
                break;
            }
            _ => {}
        }
    }

    shapes
}

fn current_paragraph(shape: &mut Option<ShapeInfo>) -> Option<&mut String> {
    shape.as_mut().and_then(|s| s.paragraphs.last_mut())
}

/// Value of an attribute by its (possibly prefixed) name.
fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
