//! Embedded AcroForm field names.
//!
//! Reads the fully-qualified names of the form fields a PDF already carries,
//! so a document produced from detected fields can be checked after the fact.

use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::BackendError;

/// Nesting limit for `/Kids` chains; also guards against reference cycles.
const MAX_FIELD_DEPTH: usize = 64;

/// Names of every terminal field in the document's `/AcroForm /Fields` tree.
///
/// Partial names (`/T`) of ancestors are joined with `.`. A field whose kids
/// are only widget annotations (no `/T`) is one terminal field. Documents
/// without an AcroForm yield an empty list.
///
/// # Errors
///
/// Returns [`BackendError::Parse`] if the bytes are not a PDF, and
/// [`BackendError::Open`] for encrypted documents.
pub fn read_field_names(bytes: &[u8]) -> Result<Vec<String>, BackendError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
    if doc.is_encrypted() {
        return Err(BackendError::Open {
            path: "<memory>".to_string(),
            message: "document is encrypted".to_string(),
        });
    }
    Ok(document_field_names(&doc))
}

/// Read a file and return its AcroForm field names.
///
/// # Errors
///
/// Returns [`BackendError::Open`] if the file cannot be read, otherwise as
/// [`read_field_names`].
pub fn read_field_names_from_path(
    path: &std::path::Path,
) -> Result<Vec<String>, BackendError> {
    let bytes = std::fs::read(path).map_err(|e| BackendError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_field_names(&bytes).map_err(|e| match e {
        BackendError::Open { message, .. } => BackendError::Open {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

pub(crate) fn document_field_names(doc: &Document) -> Vec<String> {
    let Some(fields) = doc
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|root| resolve(doc, root))
        .and_then(|catalog| catalog.as_dict().ok())
        .and_then(|catalog| catalog.get(b"AcroForm").ok())
        .and_then(|form| resolve(doc, form))
        .and_then(|form| form.as_dict().ok())
        .and_then(|form| form.get(b"Fields").ok())
        .and_then(|fields| resolve(doc, fields))
        .and_then(|fields| fields.as_array().ok())
    else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut visited = HashSet::new();
    for entry in fields {
        if let Object::Reference(id) = entry {
            walk_field(doc, *id, None, 0, &mut visited, &mut names);
        }
    }
    names
}

fn walk_field(
    doc: &Document,
    id: ObjectId,
    parent: Option<&str>,
    depth: usize,
    visited: &mut HashSet<ObjectId>,
    names: &mut Vec<String>,
) {
    if depth >= MAX_FIELD_DEPTH || !visited.insert(id) {
        return;
    }
    let Some(dict) = doc.get_object(id).ok().and_then(|o| o.as_dict().ok()) else {
        return;
    };

    let partial = partial_name(doc, dict);
    let full = match (parent, partial) {
        (Some(p), Some(t)) => format!("{p}.{t}"),
        (Some(p), None) => p.to_string(),
        (None, Some(t)) => t,
        (None, None) => String::new(),
    };

    let kids = dict
        .get(b"Kids")
        .ok()
        .and_then(|k| resolve(doc, k))
        .and_then(|k| k.as_array().ok());
    if let Some(kids) = kids {
        let child_fields: Vec<ObjectId> = kids
            .iter()
            .filter_map(|kid| match kid {
                Object::Reference(kid_id) => Some(*kid_id),
                _ => None,
            })
            .filter(|kid_id| {
                doc.get_object(*kid_id)
                    .ok()
                    .and_then(|o| o.as_dict().ok())
                    .is_some_and(|d| d.get(b"T").is_ok())
            })
            .collect();
        if !child_fields.is_empty() {
            for kid_id in child_fields {
                walk_field(doc, kid_id, Some(&full), depth + 1, visited, names);
            }
            return;
        }
    }

    if !full.is_empty() {
        names.push(full);
    }
}

fn partial_name(doc: &Document, dict: &Dictionary) -> Option<String> {
    match resolve(doc, dict.get(b"T").ok()?)? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string, handling the UTF-16 BE BOM and falling back to
/// lossy UTF-8.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
