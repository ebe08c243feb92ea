//! QR code images, created once per SKU and reused.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use qrcode::{Color, QrCode};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::LabelError;

/// Edge length, in pixels, of generated QR images
pub const QR_RASTER_SIZE: u32 = 300;

/// Where an image's bytes live
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Path(PathBuf),
    Memory(Arc<Vec<u8>>),
}

/// A reference to an image that can be drawn. Handles with the same `key` refer
/// to the same image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub key: String,
    pub source: ImageSource,
}

impl ImageHandle {
    /// Decode the image
    pub fn load(&self) -> Result<DynamicImage, LabelError> {
        let image = match &self.source {
            ImageSource::Path(path) => {
                let data = fs::read(path)?;
                image::load_from_memory(&data)?
            }
            ImageSource::Memory(data) => image::load_from_memory(data)?,
        };
        Ok(image)
    }
}

#[derive(Error, Debug)]
pub enum QrError {
    #[error("could not encode QR code: {0}")]
    Encode(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Turns a payload into PNG bytes of a square QR code image
pub trait QrEncoder {
    fn encode(&self, payload: &str, size_px: u32) -> Result<Vec<u8>, QrError>;
}

/// Encodes with the [qrcode] crate, black on white with a one-module quiet zone
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeEncoder;

impl QrEncoder for QrCodeEncoder {
    fn encode(&self, payload: &str, size_px: u32) -> Result<Vec<u8>, QrError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
        let modules = code.width();
        let colors = code.to_colors();

        let span = (modules + 2) as u32;
        let size = size_px.max(span);
        let module_at = |p: u32| (p * span / size) as usize;
        let image = GrayImage::from_fn(size, size, |x, y| {
            let (mx, my) = (module_at(x), module_at(y));
            let dark = (1..=modules).contains(&mx)
                && (1..=modules).contains(&my)
                && colors[(my - 1) * modules + (mx - 1)] == Color::Dark;
            Luma([if dark { 0 } else { 255 }])
        });

        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
        Ok(bytes)
    }
}

/// Gets the QR image for a SKU, creating it on first use. Asking twice for the
/// same SKU returns an equal handle without encoding again.
pub trait QrSource {
    fn get_or_create(&self, sku: &str) -> Result<ImageHandle, LabelError>;
}

fn acquisition_error<E: ToString>(sku: &str, error: E) -> LabelError {
    LabelError::QrAcquisition {
        sku: sku.to_string(),
        reason: error.to_string(),
    }
}

/// Keeps encoded QR images in memory for the lifetime of the cache
#[derive(Debug)]
pub struct MemoryQrCache<E> {
    encoder: E,
    size_px: u32,
    entries: Mutex<HashMap<String, ImageHandle>>,
}

impl<E: QrEncoder> MemoryQrCache<E> {
    pub fn new(encoder: E) -> MemoryQrCache<E> {
        MemoryQrCache::with_size(encoder, QR_RASTER_SIZE)
    }

    pub fn with_size(encoder: E, size_px: u32) -> MemoryQrCache<E> {
        MemoryQrCache {
            encoder,
            size_px,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: QrEncoder> QrSource for MemoryQrCache<E> {
    fn get_or_create(&self, sku: &str) -> Result<ImageHandle, LabelError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = entries.get(sku) {
            log::debug!("QR cache hit for `{sku}`");
            return Ok(handle.clone());
        }

        log::debug!("encoding QR code for `{sku}`");
        let png = self
            .encoder
            .encode(sku, self.size_px)
            .map_err(|e| acquisition_error(sku, e))?;
        let handle = ImageHandle {
            key: sku.to_string(),
            source: ImageSource::Memory(Arc::new(png)),
        };
        entries.insert(sku.to_string(), handle.clone());
        Ok(handle)
    }
}

/// Keeps one PNG file per SKU in a directory, shared between runs.
///
/// New files are written to a temporary file in the same directory and renamed
/// into place, so a file at a SKU's path is always complete. Two processes
/// creating the same SKU at once both succeed; the last rename wins.
#[derive(Debug)]
pub struct DirQrCache<E> {
    dir: PathBuf,
    encoder: E,
    size_px: u32,
}

/// File name for a SKU: ASCII letters, digits, `-` and `_` are kept, every
/// other byte is written as `%XX`
fn file_name_for(sku: &str) -> String {
    let mut name = String::with_capacity(sku.len() + 4);
    for byte in sku.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => name.push(byte as char),
            _ => name.push_str(&format!("%{byte:02X}")),
        }
    }
    name.push_str(".png");
    name
}

impl<E: QrEncoder> DirQrCache<E> {
    /// Use `dir` as the cache, creating it if needed
    pub fn new<P: AsRef<Path>>(dir: P, encoder: E) -> Result<DirQrCache<E>, LabelError> {
        DirQrCache::with_size(dir, encoder, QR_RASTER_SIZE)
    }

    pub fn with_size<P: AsRef<Path>>(
        dir: P,
        encoder: E,
        size_px: u32,
    ) -> Result<DirQrCache<E>, LabelError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(DirQrCache {
            dir,
            encoder,
            size_px,
        })
    }

    /// Where the image for `sku` is stored
    pub fn path_for(&self, sku: &str) -> PathBuf {
        self.dir.join(file_name_for(sku))
    }

    fn create(&self, sku: &str, path: &Path) -> Result<(), QrError> {
        let png = self.encoder.encode(sku, self.size_px)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(&png)?;
        file.flush()?;
        log::debug!("moving QR image for `{sku}` into place at {path:?}");
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl<E: QrEncoder> QrSource for DirQrCache<E> {
    fn get_or_create(&self, sku: &str) -> Result<ImageHandle, LabelError> {
        let path = self.path_for(sku);
        if path.is_file() {
            log::debug!("found cached QR image for `{sku}`");
        } else {
            log::debug!("encoding QR code for `{sku}`");
            self.create(sku, &path)
                .map_err(|e| acquisition_error(sku, e))?;
        }
        Ok(ImageHandle {
            key: sku.to_string(),
            source: ImageSource::Path(path),
        })
    }
}
