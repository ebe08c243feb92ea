use super::refs::{ObjectReferences, RefType};
use image::DynamicImage;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf, Ref};

/// A decoded raster image, embedded once no matter how often it's drawn
pub struct Image {
    pub image: DynamicImage,
}

struct EncodeOutput {
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    pub fn new(image: DynamicImage) -> Image {
        Image { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn encode(&self) -> EncodeOutput {
        let level = CompressionLevel::DefaultLevel as u8;

        let mask = self.image.color().has_alpha().then(|| {
            let alphas: Vec<u8> = self.image.to_rgba8().pixels().map(|p| p.0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });

        let bytes = compress_to_vec_zlib(self.image.to_rgb8().as_raw(), level);

        EncodeOutput { bytes, mask }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) -> Ref {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();
        let width = self.width() as i32;
        let height = self.height() as i32;

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(width);
        image.height(height);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(width);
            s_mask.height(height);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }

        id
    }
}
