use std::path::Path;

use syllo_core::{AssetError, AssetLoader};
use tiny_skia::{ColorU8, Pixmap};

/// Decodes stimulus files into premultiplied pixmaps ready to blit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl AssetLoader for ImageLoader {
    type Asset = Pixmap;

    fn load(&mut self, path: &Path) -> Result<Pixmap, AssetError> {
        let decoded = image::open(path)
            .map_err(|e| AssetError::new(path, e))?
            .into_rgba8();
        let (width, height) = decoded.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or_else(|| AssetError::new(path, "image has no pixels"))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(decoded.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_into_premultiplied_pixmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01_T_a.png");
        let img = image::RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([200, 100, 50, 0])
            }
        });
        img.save(&path).unwrap();

        let pm = ImageLoader.load(&path).unwrap();
        assert_eq!((pm.width(), pm.height()), (2, 1));
        let px = pm.pixels();
        assert_eq!((px[0].red(), px[0].alpha()), (255, 255));
        assert_eq!((px[1].red(), px[1].alpha()), (0, 0));
    }

    #[test]
    fn unreadable_file_is_an_asset_error() {
        let err = ImageLoader.load(Path::new("does/not/exist.png")).unwrap_err();
        assert_eq!(err.path, Path::new("does/not/exist.png"));
    }
}
