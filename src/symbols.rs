//! Loading the picture symbols of one game from disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use tracing::{debug, warn};

use crate::error::{DobbleError, Result, Stage};

/// File extensions accepted as symbols, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
pub const PLACEHOLDER_SIZE: u32 = 64;

const PLACEHOLDER_FILL: Rgb<u8> = Rgb([0xc0, 0xc0, 0xc0]);
const PLACEHOLDER_MARK: Rgb<u8> = Rgb([0x40, 0x40, 0x40]);

/// One decoded picture, flattened to opaque RGB.
#[derive(Debug, Clone)]
pub struct Symbol {
    image: RgbImage,
    source: Option<PathBuf>,
    placeholder: bool,
}

impl Symbol {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            source: None,
            placeholder: false,
        }
    }

    /// Decode `path`, normalising it to opaque RGB.
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = ImageReader::open(path)
            .map_err(|err| DobbleError::io(Stage::LoadSymbols, path, err))?
            .with_guessed_format()
            .map_err(|err| DobbleError::io(Stage::LoadSymbols, path, err))?
            .decode()
            .map_err(|source| DobbleError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            image: normalize(decoded),
            source: Some(path.to_path_buf()),
            placeholder: false,
        })
    }

    /// Stand-in for a file that could not be decoded.
    pub fn placeholder_for(path: &Path) -> Self {
        Self {
            image: placeholder(),
            source: Some(path.to_path_buf()),
            placeholder: true,
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// Ordered symbols of one game. Order drives card grouping and padding.
pub type SymbolPool = Vec<Symbol>;

/// Read every supported image in `dir`, sorted by file name.
///
/// A file that fails to decode is replaced by [`placeholder`] so one bad
/// picture never sinks the whole game. A missing or unreadable directory is
/// reported as an error.
pub fn load_symbols(dir: &Path) -> Result<SymbolPool> {
    let paths = symbol_paths(dir)?;
    let mut pool = Vec::with_capacity(paths.len());
    for path in paths {
        match Symbol::open(&path) {
            Ok(symbol) => {
                debug!(
                    path = %path.display(),
                    width = symbol.width(),
                    height = symbol.height(),
                    "loaded symbol"
                );
                pool.push(symbol);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "substituting placeholder symbol");
                pool.push(Symbol::placeholder_for(&path));
            }
        }
    }
    Ok(pool)
}

/// Paths `load_symbols` would read, in the order it reads them.
pub fn symbol_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| DobbleError::io(Stage::LoadSymbols, dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| DobbleError::io(Stage::LoadSymbols, dir, err))?;
        let path = entry.path();
        if path.is_file() && has_supported_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Flatten any alpha onto white and drop to three channels.
pub fn normalize(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let over_white = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        flat.put_pixel(x, y, Rgb([over_white(r), over_white(g), over_white(b)]));
    }
    flat
}

/// Neutral grey square crossed corner to corner.
pub fn placeholder() -> RgbImage {
    let mut image = RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_FILL);
    let far = (PLACEHOLDER_SIZE - 1) as f32;
    draw_line_segment_mut(&mut image, (0.0, 0.0), (far, far), PLACEHOLDER_MARK);
    draw_line_segment_mut(&mut image, (far, 0.0), (0.0, far), PLACEHOLDER_MARK);
    image
}

/// Resize to `width`, keeping the aspect ratio.
pub fn resize_to_width(image: &RgbImage, width: u32) -> RgbImage {
    let width = width.max(1);
    let height = ((width as f64 / image.width() as f64) * image.height() as f64) as u32;
    imageops::resize(image, width, height.max(1), FilterType::Triangle)
}
