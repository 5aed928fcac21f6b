//! Loaded statement document: owns the PDF and memoizes per-page content.

use std::cell::OnceCell;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::layout::{self, Line, Table, TextSpan};
use super::{IMAGE_BASED_CHARS_PER_PAGE, Result};
use crate::error::PdfError;

/// Everything derived from one page's content stream, computed on first
/// access and kept for the life of the document.
#[derive(Debug, Default)]
struct PageContent {
    spans: Vec<TextSpan>,
    lines: Vec<Line>,
    tables: Vec<Table>,
    layout_text: String,
}

/// A loaded bank-statement PDF.
///
/// Immutable after load. Pages are indexed `0..page_count()` and
/// materialized one at a time so large documents stay cheap; every
/// per-page accessor contains its own failures (a broken page yields
/// empty content and the document remains usable).
#[derive(Debug)]
pub struct StatementDocument {
    doc: Document,
    raw: Vec<u8>,
    file_stem: Option<String>,
    page_ids: Vec<ObjectId>,
    page_texts: OnceCell<Vec<String>>,
    pages: Vec<OnceCell<PageContent>>,
}

impl StatementDocument {
    /// Open a statement PDF from disk.
    ///
    /// Fails with [`PdfError::Encrypted`] for password-protected files
    /// (after attempting the empty password, which some producers use),
    /// [`PdfError::Parse`] for malformed files, and
    /// [`PdfError::NoPages`] for degenerate ones.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        let file_stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        Self::from_bytes_inner(raw, file_stem)
    }

    /// Open a statement PDF already held in memory.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_inner(data.to_vec(), None)
    }

    fn from_bytes_inner(raw: Vec<u8>, file_stem: Option<String>) -> Result<Self> {
        let mut doc = Document::load_mem(&raw).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Some producers encrypt with an empty password; those are
        // readable, truly protected files are not.
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
        }

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", page_ids.len());
        let pages = (0..page_ids.len()).map(|_| OnceCell::new()).collect();

        Ok(Self {
            doc,
            raw,
            file_stem,
            page_ids,
            page_texts: OnceCell::new(),
            pages,
        })
    }

    /// Lowercase-insensitive filename stem, when loaded from a path.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_stem.as_deref()
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Logical reading-order text for a page.
    ///
    /// Produced once for the whole document via `pdf-extract`; a page
    /// outside bounds or a failed extraction yields the empty string.
    pub fn page_text(&self, page: usize) -> &str {
        let texts = self.page_texts.get_or_init(|| {
            match pdf_extract::extract_text_from_mem_by_pages(&self.raw) {
                Ok(pages) => pages,
                Err(e) => {
                    warn!("text extraction failed for all pages: {}", e);
                    vec![String::new(); self.page_ids.len()]
                }
            }
        });
        texts.get(page).map(String::as_str).unwrap_or("")
    }

    /// Positioned spans for a page, top-left origin.
    pub fn page_spans(&self, page: usize) -> &[TextSpan] {
        &self.page_content(page).spans
    }

    /// Spans grouped into y-band lines (2pt tolerance).
    pub fn page_lines(&self, page: usize) -> &[Line] {
        &self.page_content(page).lines
    }

    /// Grids detected on a page. Often empty; that is not an error.
    pub fn page_tables(&self, page: usize) -> &[Table] {
        &self.page_content(page).tables
    }

    /// Whitespace-significant text rebuilt from span positions.
    pub fn layout_text(&self, page: usize) -> &str {
        &self.page_content(page).layout_text
    }

    /// True when the document is effectively a scan: fewer than
    /// [`IMAGE_BASED_CHARS_PER_PAGE`] extracted characters per page,
    /// averaged over the first three pages.
    pub fn is_image_based(&self) -> bool {
        let sample = self.page_count().min(3);
        if sample == 0 {
            return false;
        }
        let total: usize = (0..sample).map(|i| self.page_text(i).trim().len()).sum();
        total / sample < IMAGE_BASED_CHARS_PER_PAGE
    }

    /// Rough language hint from the first pages, for classifier use.
    pub fn language_hint(&self) -> Option<&'static str> {
        let text = self.page_text(0).to_lowercase();
        if text.contains("rekeningafschrift") || text.contains("afschrift") {
            Some("nl")
        } else if !text.is_empty() {
            Some("en")
        } else {
            None
        }
    }

    /// Page raster for the OCR path, decoded on demand and owned by the
    /// caller so it can be dropped as soon as that page is done.
    ///
    /// Scanned statements place each page in a single image XObject;
    /// this returns the largest image on the page. The `dpi` argument
    /// is accepted for API compatibility — embedded scans are already
    /// at capture resolution.
    pub fn page_raster(&self, page: usize, _dpi: u32) -> Result<DynamicImage> {
        let page_id = *self
            .page_ids
            .get(page)
            .ok_or(PdfError::InvalidPage(page))?;

        let mut images = self.page_images(page_id);
        if images.is_empty() {
            // Producers sometimes attach page scans outside the page's
            // resource dictionary; fall back to a document-wide scan.
            debug!("no XObject images on page {}, scanning all objects", page);
            images = self.all_images();
            if page < images.len() {
                let img = images.swap_remove(page);
                return Ok(img);
            }
        }

        images
            .into_iter()
            .max_by_key(|img| (img.width() as u64) * (img.height() as u64))
            .ok_or_else(|| PdfError::Parse(format!("no image found on page {page}")))
    }

    fn page_content(&self, page: usize) -> &PageContent {
        static EMPTY: std::sync::OnceLock<PageContent> = std::sync::OnceLock::new();
        let Some(cell) = self.pages.get(page) else {
            return EMPTY.get_or_init(PageContent::default);
        };

        cell.get_or_init(|| {
            let page_id = self.page_ids[page];
            let height = self.page_height(page_id);
            match layout::extract_spans(&self.doc, page_id, height) {
                Ok(spans) => {
                    let lines = layout::group_lines(&spans);
                    let tables = layout::detect_tables(&lines);
                    let layout_text = layout::layout_text(&lines);
                    trace!(
                        "page {}: {} spans, {} lines, {} tables",
                        page,
                        spans.len(),
                        lines.len(),
                        tables.len()
                    );
                    PageContent { spans, lines, tables, layout_text }
                }
                Err(e) => {
                    // Contained: this page contributes nothing, the
                    // rest of the document stays readable.
                    debug!("page {} extraction failed: {}", page, e);
                    PageContent::default()
                }
            }
        })
    }

    /// MediaBox height with Pages-tree inheritance; US Letter fallback.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut node_id = Some(page_id);
        while let Some(id) = node_id {
            let Ok(Object::Dictionary(dict)) = self.doc.get_object(id) else {
                break;
            };
            if let Ok(mb) = dict.get(b"MediaBox") {
                if let Ok((_, Object::Array(vals))) = self.doc.dereference(mb) {
                    if vals.len() == 4 {
                        let y0 = object_num(&vals[1]).unwrap_or(0.0);
                        let y1 = object_num(&vals[3]).unwrap_or(792.0);
                        return (y1 - y0).abs();
                    }
                }
            }
            node_id = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => Some(*parent),
                _ => None,
            };
        }
        792.0
    }

    fn page_images(&self, page_id: ObjectId) -> Vec<DynamicImage> {
        let mut images = Vec::new();
        if let Some(resources) = self.page_resources(page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = self.doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, obj)) = self.doc.dereference(obj_ref) {
                            if let Some(img) = decode_image_object(&self.doc, obj) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }
        images
    }

    fn all_images(&self) -> Vec<DynamicImage> {
        let mut images = Vec::new();
        for (_id, object) in self.doc.objects.iter() {
            if let Some(img) = decode_image_object(&self.doc, object) {
                images.push(img);
            }
        }
        debug!("found {} images in document", images.len());
        images
    }

    /// Resources dictionary for a page, handling Pages-tree inheritance.
    fn page_resources(&self, page_id: ObjectId) -> Option<lopdf::Dictionary> {
        let mut node_id = Some(page_id);
        while let Some(id) = node_id {
            let Ok(Object::Dictionary(dict)) = self.doc.get_object(id) else {
                return None;
            };
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res))) = self.doc.dereference(resources) {
                    return Some(res.clone());
                }
            }
            node_id = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => Some(*parent),
                _ => None,
            };
        }
        None
    }
}

fn object_num(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Decode an image XObject stream into a [`DynamicImage`].
///
/// JPEG (`DCTDecode`) is handed to the `image` crate directly; raw
/// 8-bit RGB and Gray streams are reassembled pixel by pixel. JPEG2000
/// and fax-compressed streams are skipped.
fn decode_image_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("image object: {}x{}", width, height);

    let data = match stream.decompressed_content() {
        Ok(d) => d,
        Err(_) => stream.content.clone(),
    };

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };
        match filter_name {
            Some(b"DCTDecode") => {
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("unsupported image filter, skipping");
                return None;
            }
            _ => {}
        }
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        trace!("unsupported bits per component: {}", bits);
        return None;
    }

    let expected_rgb = (width * height * 3) as usize;
    let expected_gray = (width * height) as usize;

    if (color_space == b"DeviceRGB" || color_space == b"RGB") && data.len() >= expected_rgb {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for chunk in data[..expected_rgb].chunks(3) {
            rgba.extend_from_slice(chunk);
            rgba.push(255);
        }
        return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
            .map(DynamicImage::ImageRgba8);
    }
    if (color_space == b"DeviceGray" || color_space == b"G") && data.len() >= expected_gray {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for &gray in &data[..expected_gray] {
            rgba.extend_from_slice(&[gray, gray, gray, 255]);
        }
        return ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
            .map(DynamicImage::ImageRgba8);
    }

    trace!(
        "could not decode raw image: len={}, rgb={}, gray={}",
        data.len(),
        expected_rgb,
        expected_gray
    );
    None
}
