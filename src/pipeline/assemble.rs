//! Document assembly: ordered page canvases → one multi-page PDF.
//!
//! Each canvas becomes an image XObject drawn over the full MediaBox of its
//! own page. Page order in the file is exactly the input order. The physical
//! page size comes from the canvas pixels and the configured dpi.

use crate::config::{PageEncoding, SplitConfig};
use crate::error::SplitError;
use crate::types::{Document, NormalizedCanvas};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, ObjectId, Stream};
use tracing::{debug, info};

/// Name of the page image inside each page's resource dictionary.
const IMAGE_NAME: &str = "Im0";

#[derive(Debug, Clone, Copy)]
pub struct DocumentAssembler {
    pub dpi: u32,
    pub encoding: PageEncoding,
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::from_config(&SplitConfig::default())
    }
}

impl DocumentAssembler {
    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            dpi: config.dpi,
            encoding: config.page_encoding,
        }
    }

    /// Pixels → PDF points at the configured resolution.
    pub fn to_points(&self, px: u32) -> f32 {
        px as f32 * 72.0 / self.dpi as f32
    }

    /// Serialise `pages` as a PDF, one page per canvas, in order.
    ///
    /// # Errors
    /// * [`SplitError::EmptyDocument`] for an empty slice.
    /// * [`SplitError::Internal`] if canvases disagree on size.
    /// * [`SplitError::EncodeFailed`] if a page image or the file cannot be encoded.
    pub fn assemble(&self, pages: &[NormalizedCanvas]) -> Result<Document, SplitError> {
        let first = pages.first().ok_or(SplitError::EmptyDocument)?;
        let page_size = first.size();
        if let Some(odd) = pages.iter().find(|p| p.size() != page_size) {
            return Err(SplitError::Internal(format!(
                "page {} is {} but page 1 is {}",
                odd.rank + 1,
                odd.size(),
                page_size
            )));
        }

        let width_pt = self.to_points(page_size.width);
        let height_pt = self.to_points(page_size.height);

        let mut doc = PdfDocument::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in pages {
            let image_id = doc.add_object(self.image_stream(&page.image)?);

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::Real(width_pt),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Real(height_pt),
                            Object::Integer(0),
                            Object::Integer(0),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_bytes = content.encode().map_err(|e| SplitError::EncodeFailed {
                what: format!("page {} content stream", page.rank + 1),
                detail: e.to_string(),
            })?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width_pt),
                    Object::Real(height_pt),
                ],
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        IMAGE_NAME => image_id,
                    },
                },
                "Contents" => content_id,
            });
            kids.push(page_id.into());
            debug!("Added page {} to document", page.rank + 1);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal("pagesplit"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        // Flate-compresses every stream without a filter; JPEG streams opt out.
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| SplitError::EncodeFailed {
                what: "PDF document".into(),
                detail: e.to_string(),
            })?;

        info!(
            "Assembled {}-page PDF ({} bytes, {} at {} dpi)",
            pages.len(),
            bytes.len(),
            page_size,
            self.dpi
        );

        Ok(Document {
            bytes,
            page_count: pages.len(),
            page_size,
            dpi: self.dpi,
        })
    }

    fn image_stream(&self, img: &RgbImage) -> Result<Stream, SplitError> {
        let (width, height) = img.dimensions();
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };

        match self.encoding {
            PageEncoding::Flate => Ok(Stream::new(dict, img.as_raw().clone())),
            PageEncoding::Jpeg { quality } => {
                let mut jpeg = Vec::new();
                JpegEncoder::new_with_quality(&mut jpeg, quality)
                    .encode(img.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| SplitError::EncodeFailed {
                        what: "page image as JPEG".into(),
                        detail: e.to_string(),
                    })?;
                dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
                Ok(Stream::new(dict, jpeg).with_compression(false))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, PageSize};
    use image::Rgb;

    fn canvas(rank: usize, size: PageSize, colour: [u8; 3]) -> NormalizedCanvas {
        NormalizedCanvas {
            rank,
            source: BoundingBox::new(0, 0, size.width, size.height),
            content: BoundingBox::new(0, 0, size.width, size.height),
            image: RgbImage::from_pixel(size.width, size.height, Rgb(colour)),
        }
    }

    fn page_image_first_pixel(doc: &PdfDocument, page_id: ObjectId) -> [u8; 3] {
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let image_ref = xobjects.get(IMAGE_NAME.as_bytes()).unwrap().as_reference().unwrap();
        let stream = doc.get_object(image_ref).unwrap().as_stream().unwrap();
        let raw = stream.decompressed_content().unwrap();
        [raw[0], raw[1], raw[2]]
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = DocumentAssembler::default().assemble(&[]).unwrap_err();
        assert!(matches!(err, SplitError::EmptyDocument));
    }

    #[test]
    fn page_count_and_order_are_preserved() {
        let size = PageSize::new(24, 32);
        let pages = vec![
            canvas(0, size, [255, 0, 0]),
            canvas(1, size, [0, 255, 0]),
            canvas(2, size, [0, 0, 255]),
        ];
        let out = DocumentAssembler::default().assemble(&pages).unwrap();
        assert_eq!(out.page_count, 3);
        assert_eq!(out.page_size, size);
        assert!(out.bytes.starts_with(b"%PDF-1.5"));

        let doc = PdfDocument::load_mem(&out.bytes).unwrap();
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        assert_eq!(page_ids.len(), 3);
        assert_eq!(page_image_first_pixel(&doc, page_ids[0]), [255, 0, 0]);
        assert_eq!(page_image_first_pixel(&doc, page_ids[1]), [0, 255, 0]);
        assert_eq!(page_image_first_pixel(&doc, page_ids[2]), [0, 0, 255]);
    }

    #[test]
    fn every_page_image_has_canvas_dimensions() {
        let size = PageSize::new(31, 17);
        let pages = vec![canvas(0, size, [1, 2, 3]), canvas(1, size, [4, 5, 6])];
        let out = DocumentAssembler::default().assemble(&pages).unwrap();
        let doc = PdfDocument::load_mem(&out.bytes).unwrap();
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).unwrap();
            let xobjects = page
                .get(b"Resources")
                .and_then(Object::as_dict)
                .and_then(|r| r.get(b"XObject"))
                .and_then(Object::as_dict)
                .unwrap();
            let image = doc
                .get_object(xobjects.get(b"Im0").unwrap().as_reference().unwrap())
                .and_then(Object::as_stream)
                .unwrap();
            assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 31);
            assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 17);
        }
    }

    #[test]
    fn media_box_follows_dpi() {
        let a = DocumentAssembler {
            dpi: 150,
            encoding: PageEncoding::Flate,
        };
        assert!((a.to_points(1240) - 595.2).abs() < 0.01);
        assert!((a.to_points(1754) - 841.92).abs() < 0.01);
        let b = DocumentAssembler { dpi: 72, ..a };
        assert_eq!(b.to_points(100), 100.0);
    }

    #[test]
    fn mismatched_page_sizes_are_rejected() {
        let pages = vec![
            canvas(0, PageSize::new(10, 10), [0, 0, 0]),
            canvas(1, PageSize::new(10, 11), [0, 0, 0]),
        ];
        let err = DocumentAssembler::default().assemble(&pages).unwrap_err();
        assert!(err.to_string().contains("page 2"));
    }

    #[test]
    fn jpeg_pages_use_dct_filter() {
        let a = DocumentAssembler {
            dpi: 150,
            encoding: PageEncoding::Jpeg { quality: 80 },
        };
        let size = PageSize::new(16, 16);
        let out = a.assemble(&[canvas(0, size, [128, 128, 128])]).unwrap();
        let doc = PdfDocument::load_mem(&out.bytes).unwrap();
        let has_dct = doc.objects.values().any(|o| {
            o.as_stream()
                .ok()
                .and_then(|s| s.dict.get(b"Filter").ok())
                .and_then(|f| f.as_name().ok())
                == Some(b"DCTDecode".as_slice())
        });
        assert!(has_dct);
    }

    #[test]
    fn output_is_deterministic() {
        let size = PageSize::new(20, 20);
        let pages = vec![canvas(0, size, [9, 9, 9]), canvas(1, size, [90, 90, 90])];
        let a = DocumentAssembler::default().assemble(&pages).unwrap();
        let b = DocumentAssembler::default().assemble(&pages).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }
}
