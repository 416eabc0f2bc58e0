//! Rendered pages and serialisation of a whole document.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{DobbleError, Result, Stage};
use crate::geometry::PageGeometry;
use crate::layout::CardSlot;

const MM_PER_INCH: f64 = 25.4;
const PT_PER_INCH: f64 = 72.0;
/// One page pixel per point.
const RASTER_DPI: f32 = 72.0;
const LAYER_NAME: &str = "Cards";

/// One rendered page and the cards placed on it.
#[derive(Debug, Clone)]
pub struct Page {
    pub image: RgbImage,
    pub slots: Vec<CardSlot>,
}

/// Ordered pages; the first is the base page of the output file.
#[derive(Debug, Clone)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// SHA-256 over every page's size and pixels.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for page in &self.pages {
            hasher.update(page.image.width().to_le_bytes());
            hasher.update(page.image.height().to_le_bytes());
            hasher.update(page.image.as_raw());
        }
        let digest = hasher.finalize();
        format!("{digest:02x}")
    }
}

/// Write `document` as a multi-page PDF at `path`.
///
/// Returns `Ok(false)` without touching the filesystem when there are no
/// pages. The file is assembled next to `path` and renamed into place, so a
/// failure never leaves a partial document behind.
pub fn write_document(document: &Document, path: &Path, title: &str) -> Result<bool> {
    let Some((first, rest)) = document.pages.split_first() else {
        debug!(path = %path.display(), "document has no pages; nothing written");
        return Ok(false);
    };

    let width = pt_to_mm(document.geometry.page_width);
    let height = pt_to_mm(document.geometry.page_height);

    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    page_image(&first.image).add_to_layer(
        pdf.get_page(first_page).get_layer(first_layer),
        raster_transform(),
    );
    for page in rest {
        let (page_idx, layer_idx) = pdf.add_page(width, height, LAYER_NAME);
        page_image(&page.image).add_to_layer(
            pdf.get_page(page_idx).get_layer(layer_idx),
            raster_transform(),
        );
    }

    let dir = parent_dir(path);
    let mut staged = NamedTempFile::new_in(dir)
        .map_err(|err| DobbleError::io(Stage::WriteDocument, path, err))?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        pdf.save(&mut writer).map_err(|err| DobbleError::Pdf {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        writer
            .flush()
            .map_err(|err| DobbleError::io(Stage::WriteDocument, path, err))?;
    }
    staged
        .persist(path)
        .map_err(|err| DobbleError::io(Stage::WriteDocument, path, err.error))?;

    info!(
        path = %path.display(),
        pages = document.pages.len(),
        fingerprint = %document.fingerprint(),
        "wrote document"
    );
    Ok(true)
}

/// Export each page as `page_0001.png`, `page_0002.png`, … inside `dir`.
pub fn write_page_images(document: &Document, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|err| DobbleError::io(Stage::WritePageImage, dir, err))?;
    let mut written = Vec::with_capacity(document.pages.len());
    for (idx, page) in document.pages.iter().enumerate() {
        let target = dir.join(format!("page_{:04}.png", idx + 1));
        page.image.save(&target).map_err(|source| DobbleError::Encode {
            path: target.clone(),
            source,
        })?;
        written.push(target);
    }
    Ok(written)
}

/// Convert in f64 and narrow once, keeping the PDF MediaBox on whole points.
fn pt_to_mm(points: u32) -> Mm {
    Mm((points as f64 * MM_PER_INCH / PT_PER_INCH) as f32)
}

fn page_image(image: &RgbImage) -> Image {
    Image::from(ImageXObject {
        width: Px(image.width() as usize),
        height: Px(image.height() as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: image.as_raw().clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    })
}

fn raster_transform() -> ImageTransform {
    ImageTransform {
        dpi: Some(RASTER_DPI),
        ..Default::default()
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use lopdf::Object;

    fn resolve<'a>(pdf: &'a lopdf::Document, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => pdf.get_object(*id).unwrap(),
            other => other,
        }
    }

    fn number(object: &Object) -> f64 {
        match object {
            Object::Integer(value) => *value as f64,
            Object::Real(value) => *value as f64,
            other => panic!("expected a number, got {other:?}"),
        }
    }

    fn blank_document(pages: usize) -> Document {
        let geometry = PageGeometry::with_diameter(100, 140, 10, 40).unwrap();
        Document {
            geometry,
            pages: (0..pages)
                .map(|idx| Page {
                    image: RgbImage::from_pixel(100, 140, Rgb([idx as u8, 0, 0])),
                    slots: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("empty.pdf");
        let written = write_document(&blank_document(0), &target, "empty").unwrap();
        assert!(!written);
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("cards.pdf");
        assert!(write_document(&blank_document(3), &target, "cards").unwrap());
        let bytes = fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // Only the finished document remains; the staging file was renamed.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn pages_are_written_in_order_at_page_size() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ordered.pdf");
        assert!(write_document(&blank_document(3), &target, "ordered").unwrap());

        let pdf = lopdf::Document::load(&target).unwrap();
        let pages = pdf.get_pages();
        assert_eq!(pages.len(), 3);
        for (number_in_doc, page_id) in pages {
            let page = pdf.get_object(page_id).unwrap().as_dict().unwrap();

            let media_box: Vec<f64> = resolve(&pdf, page.get(b"MediaBox").unwrap())
                .as_array()
                .unwrap()
                .iter()
                .map(number)
                .collect();
            assert_eq!(media_box.len(), 4);
            assert!((media_box[2] - 100.0).abs() < 1e-3, "{media_box:?}");
            assert!((media_box[3] - 140.0).abs() < 1e-3, "{media_box:?}");

            // Page n was filled with red channel n - 1.
            let resources = resolve(&pdf, page.get(b"Resources").unwrap())
                .as_dict()
                .unwrap();
            let xobjects = resolve(&pdf, resources.get(b"XObject").unwrap())
                .as_dict()
                .unwrap();
            let (_, image_ref) = xobjects.iter().next().unwrap();
            let stream = resolve(&pdf, image_ref).as_stream().unwrap();
            let pixels = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            assert_eq!(pixels.len(), 100 * 140 * 3);
            assert_eq!(&pixels[..3], &[(number_in_doc - 1) as u8, 0, 0]);
        }
    }

    #[test]
    fn page_size_converts_without_drift() {
        for points in [100u32, 140, 595, 842] {
            let mm = pt_to_mm(points);
            let back = mm.0 as f64 * PT_PER_INCH / MM_PER_INCH;
            assert!((back - points as f64).abs() < 1e-4, "{points}pt -> {back}");
        }
    }

    #[test]
    fn missing_destination_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("cards.pdf");
        let err = write_document(&blank_document(1), &target, "cards").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::WriteDocument));
        assert!(err.to_string().contains("cards.pdf"));
        assert!(!target.exists());
    }

    #[test]
    fn fingerprint_tracks_pixels() {
        let a = blank_document(2);
        let mut b = blank_document(2);
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.pages[1].image.put_pixel(0, 0, Rgb([9, 9, 9]));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn page_images_are_numbered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_page_images(&blank_document(2), dir.path()).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("page_0001.png"), dir.path().join("page_0002.png")]
        );
        let second = image::open(&written[1]).unwrap().to_rgb8();
        assert_eq!(second.get_pixel(0, 0), &Rgb([1, 0, 0]));
    }
}
