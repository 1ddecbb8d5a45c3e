use bytes::Bytes;
use image::ImageEncoder as _;
use snafu::{ResultExt, Snafu};

/// Encodes RGBA8 pixels as PNG.
///
/// # Errors
/// Returns an error if the image is empty, the pixel buffer does not match the
/// dimensions, or the encoder fails.
pub fn encode_png(width: usize, height: usize, rgba: &[u8]) -> Result<Bytes, Error> {
    let (w, h) = (u32::try_from(width).unwrap_or_default(), u32::try_from(height).unwrap_or_default());
    if rgba.is_empty() || w == 0 || h == 0 {
        return Err(Error::EmptyImage);
    }
    let expected = width.saturating_mul(height).saturating_mul(4);
    if rgba.len() != expected {
        return Err(Error::PixelBufferSize { expected, actual: rgba.len() });
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(rgba, w, h, image::ExtendedColorType::Rgba8)
        .context(ConvertImageSnafu)?;

    Ok(Bytes::from(png_bytes))
}

/// Decodes a PNG into `(width, height, rgba8)`.
///
/// # Errors
/// Returns an error if the data is not a valid PNG image.
pub fn decode_png(png: &[u8]) -> Result<(usize, usize, Bytes), Error> {
    let image = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .context(ConvertImageSnafu)?
        .into_rgba8();
    let (w, h) = image.dimensions();
    Ok((w as usize, h as usize, Bytes::from(image.into_raw())))
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("The content is not an image"))]
    NotAnImage,

    #[snafu(display("The image is empty"))]
    EmptyImage,

    #[snafu(display("Pixel buffer has {actual} bytes, expected {expected}"))]
    PixelBufferSize { expected: usize, actual: usize },

    #[snafu(display("Error occurs while converting image, error: {source}"))]
    ConvertImage { source: image::ImageError },
}
