// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open an existing PDF with `lopdf` and report what each page
// shows. Used to check freshly assembled documents before they are written,
// and by the tests to inspect converter output.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Maximum /Parent hops followed when looking up inherited page attributes.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Failures while inspecting a PDF.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("failed to load PDF: {0}")]
    Load(String),

    #[error("page {page} out of range (document has {total} pages)")]
    PageOutOfRange { page: u32, total: usize },

    #[error("malformed page structure: {0}")]
    Malformed(String),
}

/// An image XObject placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: i64,
    pub height: i64,
    /// Colour space name, e.g. `DeviceRGB` or `ICCBased`.
    pub color_space: Option<String>,
    /// Number of colour components, when it can be determined.
    pub components: Option<i64>,
    pub bits_per_component: Option<i64>,
}

impl PageImage {
    /// Three colour components (DeviceRGB or an RGB ICC profile).
    pub fn is_rgb(&self) -> bool {
        self.components == Some(3)
    }
}

/// Read-only view of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InspectError> {
        let path_ref = path.as_ref();
        info!("opening PDF");

        let document = Document::load(path_ref).map_err(|err| {
            InspectError::Load(format!("{}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, InspectError> {
        let document =
            Document::load_mem(data).map_err(|err| InspectError::Load(err.to_string()))?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Every image XObject drawn on page `page_number` (1-indexed).
    pub fn page_images(&self, page_number: u32) -> Result<Vec<PageImage>, InspectError> {
        let pages = self.document.get_pages();
        let page_id: ObjectId = *pages.get(&page_number).ok_or(InspectError::PageOutOfRange {
            page: page_number,
            total: pages.len(),
        })?;

        let Some(resources) = self.inherited_entry(page_id, b"Resources")? else {
            return Ok(Vec::new());
        };
        let resources = self.resolve_dictionary(resources)?;

        let Ok(xobjects) = resources.get(b"XObject") else {
            return Ok(Vec::new());
        };
        let xobjects = self.resolve_dictionary(xobjects)?;
        let drawn = self.drawn_xobjects(page_id);

        let mut images = Vec::new();
        for (name, value) in xobjects.iter() {
            if drawn.as_ref().is_some_and(|names| !names.contains(name.as_slice())) {
                continue;
            }
            if let Object::Stream(stream) = self.resolve(value)? {
                let dict = &stream.dict;
                if matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image") {
                    images.push(self.describe_image(dict)?);
                }
            }
        }

        Ok(images)
    }

    // -- Helpers --------------------------------------------------------------

    /// Names passed to `Do` in the page's content stream.
    ///
    /// `None` when the content cannot be decoded; callers then treat every
    /// XObject in the resources as drawn.
    fn drawn_xobjects(&self, page_id: ObjectId) -> Option<HashSet<Vec<u8>>> {
        let content = match self.document.get_and_decode_page_content(page_id) {
            Ok(content) => content,
            Err(err) => {
                debug!(?page_id, %err, "page content not decodable");
                return None;
            }
        };
        let names = content
            .operations
            .iter()
            .filter(|op| op.operator == "Do")
            .filter_map(|op| match op.operands.first() {
                Some(Object::Name(name)) => Some(name.clone()),
                _ => None,
            })
            .collect();
        Some(names)
    }

    fn describe_image(&self, dict: &Dictionary) -> Result<PageImage, InspectError> {
        let width = self.integer_entry(dict, b"Width")
            .ok_or_else(|| InspectError::Malformed("image without /Width".into()))?;
        let height = self.integer_entry(dict, b"Height")
            .ok_or_else(|| InspectError::Malformed("image without /Height".into()))?;

        let (color_space, components) = match dict.get(b"ColorSpace") {
            Ok(obj) => self.color_space(obj)?,
            Err(_) => (None, None),
        };

        Ok(PageImage {
            width,
            height,
            color_space,
            components,
            bits_per_component: self.integer_entry(dict, b"BitsPerComponent"),
        })
    }

    fn integer_entry(&self, dict: &Dictionary, key: &[u8]) -> Option<i64> {
        dict.get(key)
            .ok()
            .and_then(|obj| self.resolve(obj).ok())
            .and_then(|obj| match obj {
                Object::Integer(value) => Some(*value),
                _ => None,
            })
    }

    /// Name and component count of a /ColorSpace value.
    fn color_space(&self, object: &Object) -> Result<(Option<String>, Option<i64>), InspectError> {
        match self.resolve(object)? {
            Object::Name(name) => {
                let components = match name.as_slice() {
                    b"DeviceRGB" | b"CalRGB" => Some(3),
                    b"DeviceGray" | b"CalGray" => Some(1),
                    b"DeviceCMYK" => Some(4),
                    _ => None,
                };
                Ok((Some(String::from_utf8_lossy(name).into_owned()), components))
            }
            Object::Array(items) => {
                let family = match items.first() {
                    Some(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
                    _ => return Ok((None, None)),
                };
                let components = if family == "ICCBased" {
                    match items.get(1).map(|obj| self.resolve(obj)).transpose()? {
                        Some(Object::Stream(profile)) => match profile.dict.get(b"N") {
                            Ok(Object::Integer(n)) => Some(*n),
                            _ => None,
                        },
                        _ => None,
                    }
                } else {
                    None
                };
                Ok((Some(family), components))
            }
            _ => Ok((None, None)),
        }
    }

    /// Look up `key` on a page, walking up /Parent for inherited attributes.
    fn inherited_entry(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<&Object>, InspectError> {
        let mut current = Some(page_id);
        for _ in 0..MAX_PAGE_TREE_DEPTH {
            let Some(id) = current else { break };
            let node = self
                .document
                .get_dictionary(id)
                .map_err(|err| InspectError::Malformed(format!("page node {:?}: {}", id, err)))?;
            if let Ok(value) = node.get(key) {
                return Ok(Some(value));
            }
            current = match node.get(b"Parent") {
                Ok(Object::Reference(parent)) => Some(*parent),
                _ => None,
            };
        }
        Ok(None)
    }

    /// Follow a single indirect reference.
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object, InspectError> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).map_err(|err| {
                InspectError::Malformed(format!("dangling reference {:?}: {}", id, err))
            }),
            other => Ok(other),
        }
    }

    fn resolve_dictionary<'a>(&'a self, object: &'a Object) -> Result<&'a Dictionary, InspectError> {
        match self.resolve(object)? {
            Object::Dictionary(dict) => Ok(dict),
            _ => Err(InspectError::Malformed("expected a dictionary".into())),
        }
    }
}
