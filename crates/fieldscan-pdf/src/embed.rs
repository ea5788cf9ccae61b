//! Writing field descriptors into a PDF as AcroForm fields.
//!
//! Each descriptor becomes a merged field/widget dictionary referenced from
//! both the page's `/Annots` and the document's `/AcroForm /Fields`. No
//! appearance streams are generated; `/NeedAppearances` asks the viewer to
//! draw them.

use std::collections::HashSet;

use fieldscan_core::{FieldAlign, FieldDescriptor, FieldType, ScanError};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use tracing::{debug, info, warn};

use crate::BackendError;
use crate::acroform::document_field_names;

/// Resource name of the text font in `/DR` and every `/DA` string.
const FONT_RESOURCE: &str = "Helv";

/// Suffix appended to a name that is already taken.
const COPY_SUFFIX: &str = " (Copy)";

/// Annotation flag bit 3: print the widget.
const ANNOT_PRINT: i64 = 4;

/// Field flag bit 2: the field must have a value on submit.
const FIELD_REQUIRED: i64 = 2;

/// Nesting limit when looking up inherited page attributes.
const MAX_PARENT_DEPTH: usize = 32;

/// A descriptor that was not written, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Name, or id when the name is empty.
    pub label: String,
    pub reason: String,
}

/// Result of [`embed_fields`].
#[derive(Debug, Clone)]
pub struct EmbedOutcome {
    /// The rewritten PDF.
    pub bytes: Vec<u8>,
    /// Final `/T` of every written field, in input order.
    pub written: Vec<String>,
    pub skipped: Vec<SkippedField>,
}

/// Add one AcroForm field per descriptor to the PDF in `bytes`.
///
/// Descriptor coordinates are in a top-left-origin space `logical_width`
/// units wide. They are scaled by the page's MediaBox width and flipped into
/// PDF user space. The name falls back to the id; a name ending in `.` gets a
/// trailing space, and a name already present in the form gets ` (Copy)`
/// appended until it is free. Descriptors pointing past the last page or
/// with an empty box are skipped, not fatal. Existing form fields are kept.
///
/// # Errors
///
/// Returns [`BackendError::Parse`] if the bytes are not a PDF or the output
/// cannot be serialized, [`BackendError::Open`] for encrypted documents, and
/// [`BackendError::Core`] for a non-positive `logical_width`.
pub fn embed_fields(
    bytes: &[u8],
    fields: &[FieldDescriptor],
    logical_width: f64,
) -> Result<EmbedOutcome, BackendError> {
    if !(logical_width.is_finite() && logical_width > 0.0) {
        return Err(ScanError::InvalidOptions(format!(
            "logical width must be positive, got {logical_width}"
        ))
        .into());
    }
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
    if doc.is_encrypted() {
        return Err(BackendError::Open {
            path: "<memory>".to_string(),
            message: "document is encrypted".to_string(),
        });
    }

    let pages = doc.get_pages();
    let mut taken: HashSet<String> = document_field_names(&doc).into_iter().collect();
    let mut written = Vec::new();
    let mut skipped = Vec::new();
    let mut new_fields = Vec::new();

    for field in fields {
        let label = if field.name.is_empty() {
            field.id.clone()
        } else {
            field.name.clone()
        };
        let mut skip = |reason: String| {
            warn!(field = %label, %reason, "skipping field");
            skipped.push(SkippedField {
                label: label.clone(),
                reason,
            });
        };

        if label.is_empty() {
            skip("field has neither a name nor an id".to_string());
            continue;
        }
        if !(field.w > 0.0 && field.h > 0.0 && field.x.is_finite() && field.y.is_finite()) {
            skip(format!("empty or invalid box {}x{}", field.w, field.h));
            continue;
        }
        let page_number = field.page.saturating_add(1);
        let Some(page_id) = u32::try_from(page_number)
            .ok()
            .and_then(|n| pages.get(&n).copied())
        else {
            skip(format!(
                "page {page_number} out of range (document has {} pages)",
                pages.len()
            ));
            continue;
        };
        let Some(media_box) = media_box(&doc, page_id) else {
            skip(format!("page {page_number} has no usable MediaBox"));
            continue;
        };

        let name = unique_name(&label, &taken);
        let scale = media_box.width() / logical_width;
        let widget = widget_dict(field, &name, page_id, &media_box, scale);
        let widget_id = doc.add_object(widget);
        append_refs(&mut doc, page_id, b"Annots", vec![Object::Reference(widget_id)])?;
        new_fields.push(Object::Reference(widget_id));
        debug!(field = %name, page = field.page, "embedded field");
        taken.insert(name.clone());
        written.push(name);
    }

    if !new_fields.is_empty() {
        let form_id = acroform_id(&mut doc)?;
        append_refs(&mut doc, form_id, b"Fields", new_fields)?;
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| BackendError::Parse(format!("failed to save PDF: {e}")))?;
    info!(
        written = written.len(),
        skipped = skipped.len(),
        "embedded form fields"
    );
    Ok(EmbedOutcome {
        bytes: out,
        written,
        skipped,
    })
}

/// Page box in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MediaBox {
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
}

impl MediaBox {
    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// The page's MediaBox, following `/Parent` for inherited values.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<MediaBox> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let obj = match obj {
                Object::Reference(id) => doc.get_object(*id).ok()?,
                other => other,
            };
            let values: Vec<f64> = obj
                .as_array()
                .ok()?
                .iter()
                .map(|v| v.as_float().map(f64::from))
                .collect::<Result<_, _>>()
                .ok()?;
            let [x0, y0, x1, y1] = values[..] else {
                return None;
            };
            let mb = MediaBox {
                left: x0.min(x1),
                bottom: y0.min(y1),
                right: x0.max(x1),
                top: y0.max(y1),
            };
            return (mb.width() > 0.0 && mb.height() > 0.0).then_some(mb);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn unique_name(label: &str, taken: &HashSet<String>) -> String {
    let mut name = label.to_string();
    if name.ends_with('.') {
        name.push(' ');
    }
    while taken.contains(&name) {
        name.push_str(COPY_SUFFIX);
    }
    name
}

fn widget_dict(
    field: &FieldDescriptor,
    name: &str,
    page_id: ObjectId,
    media_box: &MediaBox,
    scale: f64,
) -> Dictionary {
    let x = media_box.left + field.x * scale;
    let w = field.w * scale;
    let h = field.h * scale;
    let y = media_box.bottom + media_box.height() - field.y * scale - h;
    let rect: Vec<Object> = [x, y, x + w, y + h]
        .into_iter()
        .map(|v| Object::Real(v as f32))
        .collect();

    let mut dict = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "T" => pdf_text(name),
        "Rect" => rect,
        "P" => page_id,
        "F" => ANNOT_PRINT,
        "BS" => dictionary! { "W" => 0 },
        "MK" => dictionary! {
            "BG" => vec![Object::Integer(1), Object::Integer(1), Object::Integer(1)],
        },
    };
    match field.field_type {
        FieldType::Text => {
            let font_size = f64::from(field.font_size) * scale;
            dict.set("FT", "Tx");
            dict.set("V", Object::string_literal(""));
            dict.set(
                "DA",
                Object::string_literal(format!(
                    "/{FONT_RESOURCE} {} Tf 0 g",
                    pdf_number(font_size)
                )),
            );
            dict.set("Q", quadding(field.align));
        }
        FieldType::Checkbox => {
            dict.set("FT", "Btn");
            dict.set("V", "Off");
        }
    }
    if field.required {
        dict.set("Ff", FIELD_REQUIRED);
    }
    dict
}

fn quadding(align: FieldAlign) -> i64 {
    match align {
        FieldAlign::Left => 0,
        FieldAlign::Center => 1,
        FieldAlign::Right => 2,
    }
}

/// A text string: literal bytes for ASCII, UTF-16 BE with a BOM otherwise.
fn pdf_text(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// At most three decimals, trailing zeros dropped.
fn pdf_number(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Object id of the catalog's `/AcroForm`, creating or un-inlining it, with
/// `/NeedAppearances` set and a Helvetica `/DR` font for the `/DA` strings.
fn acroform_id(doc: &mut Document) -> Result<ObjectId, BackendError> {
    let current = doc
        .catalog()
        .map_err(|e| BackendError::Parse(format!("missing document catalog: {e}")))?
        .get(b"AcroForm")
        .ok()
        .cloned();
    let form_id = match current {
        Some(Object::Reference(id)) => id,
        Some(Object::Dictionary(inline)) => doc.add_object(inline),
        _ => doc.add_object(dictionary! { "Fields" => Vec::<Object>::new() }),
    };
    doc.catalog_mut()
        .map_err(|e| BackendError::Parse(format!("missing document catalog: {e}")))?
        .set("AcroForm", form_id);

    let needs_font = doc
        .get_dictionary(form_id)
        .map_err(|e| BackendError::Parse(format!("AcroForm is not a dictionary: {e}")))?
        .get(b"DR")
        .is_err();
    let font_id = needs_font.then(|| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        })
    });

    let form = doc
        .get_dictionary_mut(form_id)
        .map_err(|e| BackendError::Parse(format!("AcroForm is not a dictionary: {e}")))?;
    form.set("NeedAppearances", true);
    if !form.has(b"DA") {
        form.set(
            "DA",
            Object::string_literal(format!("/{FONT_RESOURCE} 0 Tf 0 g")),
        );
    }
    if let Some(font_id) = font_id {
        form.set(
            "DR",
            dictionary! { "Font" => dictionary! { FONT_RESOURCE => font_id } },
        );
    }
    Ok(form_id)
}

/// Append references to the array at `owner[key]`, whether that array is
/// inline, indirect or missing.
fn append_refs(
    doc: &mut Document,
    owner: ObjectId,
    key: &[u8],
    refs: Vec<Object>,
) -> Result<(), BackendError> {
    let current = doc
        .get_dictionary(owner)
        .map_err(|e| BackendError::Parse(format!("object {} {}: {e}", owner.0, owner.1)))?
        .get(key)
        .ok()
        .cloned();
    if let Some(Object::Reference(array_id)) = current {
        if let Ok(items) = doc.get_object_mut(array_id).and_then(Object::as_array_mut) {
            items.extend(refs);
            return Ok(());
        }
    }
    let mut items = match current {
        Some(Object::Array(items)) => items,
        _ => Vec::new(),
    };
    items.extend(refs);
    doc.get_dictionary_mut(owner)
        .map_err(|e| BackendError::Parse(format!("object {} {}: {e}", owner.0, owner.1)))?
        .set(key.to_vec(), items);
    Ok(())
}
