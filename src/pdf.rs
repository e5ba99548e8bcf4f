//! PDF document access: loading, page geometry, CropBox write-back, saving.
//!
//! Only page-level box entries are ever touched. Content streams, fonts and
//! images pass through byte-identical; the crop is a pure metadata write.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{CropError, Result};
use crate::geometry::RectPt;

/// How many Parent links to follow when resolving inheritable page keys.
const MAX_PARENT_DEPTH: usize = 16;

/// A loaded PDF document with its page list in document order.
pub struct PdfDocument {
    doc: Document,
    pages: Vec<(u32, ObjectId)>,
}

impl PdfDocument {
    /// Load a document from disk.
    ///
    /// Fails with [`CropError::UnreadableDocument`] for missing, corrupt or
    /// encrypted files.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path).map_err(|e| CropError::UnreadableDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if doc.is_encrypted() {
            return Err(CropError::UnreadableDocument {
                path: path.to_path_buf(),
                reason: "document is encrypted".to_string(),
            });
        }

        let pages = doc.get_pages().into_iter().collect();
        Ok(Self { doc, pages })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages as (1-based page number, object id), in document order.
    pub fn pages(&self) -> &[(u32, ObjectId)] {
        &self.pages
    }

    /// The page's current visible area in points: its CropBox if present,
    /// otherwise the MediaBox, either possibly inherited from the page tree.
    pub fn page_boundary(&self, page_id: ObjectId) -> Result<RectPt> {
        if let Some(rect) = self.inherited_rect(page_id, b"CropBox")? {
            return Ok(rect);
        }
        self.inherited_rect(page_id, b"MediaBox")?
            .ok_or_else(|| CropError::InvalidValue("page has no MediaBox".into()))
    }

    /// The page's rotation in degrees, normalized to 0/90/180/270.
    pub fn page_rotation(&self, page_id: ObjectId) -> Result<i64> {
        let rotate = self
            .inherited_value(page_id, b"Rotate")?
            .and_then(|obj| self.resolve(obj).ok())
            .and_then(|obj| obj.as_i64().ok())
            .unwrap_or(0);
        Ok(rotate.rem_euclid(360))
    }

    /// Set the page's CropBox. Pure metadata write; nothing else changes.
    pub fn set_crop_box(&mut self, page_id: ObjectId, rect: RectPt) -> Result<()> {
        let dict = self.doc.get_object_mut(page_id)?.as_dict_mut()?;
        dict.set(
            "CropBox",
            Object::Array(vec![
                Object::Real(rect.x0 as f32),
                Object::Real(rect.y0 as f32),
                Object::Real(rect.x1 as f32),
                Object::Real(rect.y1 as f32),
            ]),
        );
        Ok(())
    }

    /// Persist the document, optionally recompressing streams first.
    pub fn save(&mut self, path: &Path, compress: bool) -> Result<()> {
        if compress {
            self.doc.compress();
        }
        self.doc
            .save(path)
            .map_err(|e| CropError::UnwritableOutput {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Consume the wrapper and hand back the underlying document.
    pub fn into_inner(self) -> Document {
        self.doc
    }

    // ============================================================
    // Page-tree helpers
    // ============================================================

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.doc.get_object(*id)?),
            other => Ok(other),
        }
    }

    fn page_dict(&self, page_id: ObjectId) -> Result<&Dictionary> {
        Ok(self.doc.get_object(page_id)?.as_dict()?)
    }

    /// Look up an inheritable page key, walking Parent links when the page
    /// itself does not carry it.
    fn inherited_value(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<&Object>> {
        let mut dict = self.page_dict(page_id)?;

        for _ in 0..MAX_PARENT_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Ok(Some(value));
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => {
                    dict = self.doc.get_object(*parent_id)?.as_dict()?;
                }
                _ => return Ok(None),
            }
        }
        Ok(None)
    }

    fn inherited_rect(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<RectPt>> {
        let Some(value) = self.inherited_value(page_id, key)? else {
            return Ok(None);
        };
        let value = self.resolve(value)?;
        Ok(rect_from_object(value, |o| self.resolve(o)))
    }
}

/// Decode a PDF rectangle array, tolerating swapped corner order.
fn rect_from_object<'a, F>(obj: &'a Object, resolve: F) -> Option<RectPt>
where
    F: Fn(&'a Object) -> Result<&'a Object>,
{
    let Object::Array(items) = obj else {
        return None;
    };
    if items.len() != 4 {
        return None;
    }

    let mut coords = [0.0f64; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        let item = resolve(item).ok()?;
        *slot = match item {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => f64::from(*n),
            _ => return None,
        };
    }

    Some(RectPt::new(
        coords[0].min(coords[2]),
        coords[1].min(coords[3]),
        coords[0].max(coords[2]),
        coords[1].max(coords[3]),
    ))
}

/// Build a minimal one-level document for the test suite: a Pages node
/// carrying an inherited letter-size MediaBox plus the given page entries.
#[cfg(test)]
pub(crate) fn build_test_document(page_entries: Vec<Dictionary>) -> Document {
    use lopdf::dictionary;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kid_ids: Vec<ObjectId> = page_entries
        .into_iter()
        .map(|mut dict| {
            dict.set("Type", Object::Name(b"Page".to_vec()));
            dict.set("Parent", Object::Reference(pages_id));
            doc.add_object(dict)
        })
        .collect();

    let kids: Vec<Object> = kid_ids.iter().map(|id| Object::Reference(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => Object::Array(kids),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}
