//! Form XObjects: content rendered once and placed on many pages.
//!
//! The exporter uses one for the page footer, which is identical on every page. The
//! form's bounding box is the whole page, so its content is drawn in page coordinates
//! and placed without any translation.

use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::page::PageContents;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::DocError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};

/// A reusable content container that can be placed on pages.
///
/// Fill its contents, register it with
/// [`Document::add_form_xobject`](crate::Document::add_form_xobject), then place it
/// with [`Page::add_form_xobject`](crate::Page::add_form_xobject).
#[derive(Debug)]
pub struct FormXObject {
    /// Bounding box of the form content
    pub bbox: Rect,
    pub contents: Vec<PageContents>,
}

impl FormXObject {
    pub fn new(width: Pt, height: Pt) -> Self {
        FormXObject {
            bbox: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            contents: Vec::new(),
        }
    }

    /// Write this Form XObject using its pre-generated ref
    pub(crate) fn write_with_ref(
        &self,
        refs: &ObjectReferences,
        xobj_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), DocError> {
        let xobj_ref = refs
            .get(RefType::FormXObject(xobj_index))
            .ok_or(DocError::PageMissing)?;

        let rendered = render_contents(&self.contents, fonts)?;
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            &rendered,
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );

        let mut xobj = writer.form_xobject(xobj_ref, &compressed);
        xobj.filter(pdf_writer::Filter::FlateDecode);
        xobj.bbox(self.bbox.into());

        let mut resources = xobj.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(i.index())) {
                resource_fonts.pair(Name(format!("F{}", i.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();

        let mut resource_xobjects = resources.x_objects();
        for (i, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(i.index())) {
                resource_xobjects.pair(Name(format!("I{}", i.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();
        resources.finish();

        Ok(())
    }
}

/// A Form XObject drawn on a page
#[derive(Debug, Clone, PartialEq)]
pub struct FormXObjectLayout {
    pub xobj_id: Id<FormXObject>,
}
