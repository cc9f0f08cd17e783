use image::RgbaImage;

/// Binary foreground mask derived from the alpha channel.
pub struct ForegroundMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl ForegroundMask {
    /// Mark every pixel with alpha strictly above `threshold` as
    /// foreground.
    pub fn from_alpha(image: &RgbaImage, threshold: u8) -> Self {
        let (width, height) = image.dimensions();
        let mut bits = vec![false; width as usize * height as usize];

        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[3] > threshold {
                bits[y as usize * width as usize + x as usize] = true;
            }
        }

        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.bits[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_threshold_is_strict() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 10]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 11]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 255]));

        let mask = ForegroundMask::from_alpha(&img, 10);

        assert!(!mask.is_foreground(0, 0));
        assert!(mask.is_foreground(1, 0));
        assert!(mask.is_foreground(2, 0));
    }

    #[test]
    fn test_all_transparent() {
        let mask = ForegroundMask::from_alpha(&RgbaImage::new(8, 8), 0);

        for y in 0..8 {
            for x in 0..8 {
                assert!(!mask.is_foreground(x, y));
            }
        }
    }
}
