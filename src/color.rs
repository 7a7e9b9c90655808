//! Conversion between RGB and the component video (Y, Pb, Pr) color space

/// RGB pixel, channels are scaled against the denominator of the image they belong to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbPixel {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl RgbPixel {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

/// Pixel in component video color space
///
/// - `y` (luma) is within `0..=1`
/// - `pb` and `pr` (chroma) are within `-0.5..=0.5`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ComponentVideo {
    pub y: f32,
    pub pb: f32,
    pub pr: f32,
}

impl ComponentVideo {
    /// Convert an RGB pixel whose channels range from 0 to `denominator`
    ///
    /// Values landing outside the valid component ranges are clamped.
    ///
    /// # Panics
    ///
    /// If `denominator` is 0
    #[inline(always)]
    pub fn from_rgb(pixel: RgbPixel, denominator: u16) -> Self {
        assert_ne!(denominator, 0, "denominator must not be zero");

        let d = f32::from(denominator);
        let r = f32::from(pixel.red);
        let g = f32::from(pixel.green);
        let b = f32::from(pixel.blue);

        let y = (0.299 * r + 0.587 * g + 0.114 * b) / d;
        let pb = (-0.168736 * r - 0.331264 * g + 0.5 * b) / d;
        let pr = (0.5 * r - 0.418688 * g - 0.081312 * b) / d;

        Self {
            y: y.clamp(0.0, 1.0),
            pb: pb.clamp(-0.5, 0.5),
            pr: pr.clamp(-0.5, 0.5),
        }
    }

    /// Convert back to an RGB pixel whose channels range from 0 to `denominator`
    ///
    /// Channels are clamped to `0..=1` before scaling and truncated afterwards.
    #[inline(always)]
    pub fn to_rgb(self, denominator: u16) -> RgbPixel {
        let Self { y, pb, pr } = self;

        let r = y + 1.402 * pr;
        let g = y - 0.344136 * pb - 0.714136 * pr;
        let b = y + 1.772 * pb;

        let scale = |v: f32| (v.clamp(0.0, 1.0) * f32::from(denominator)) as u16;

        RgbPixel {
            red: scale(r),
            green: scale(g),
            blue: scale(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: RgbPixel, b: RgbPixel, denominator: u16) {
        let close = |x: u16, y: u16| x.abs_diff(y) <= 1;

        assert!(
            close(a.red, b.red) && close(a.green, b.green) && close(a.blue, b.blue),
            "{a:?} != {b:?} (denominator {denominator})"
        );
    }

    #[test]
    fn round_trip_within_one() {
        for denominator in [1u16, 255, 65535] {
            let steps: Vec<u16> = if denominator < 32 {
                (0..=denominator).collect()
            } else {
                (0..=16).map(|i| (u32::from(denominator) * i / 16) as u16).collect()
            };

            for &r in &steps {
                for &g in &steps {
                    for &b in &steps {
                        let pixel = RgbPixel::new(r, g, b);
                        let back = ComponentVideo::from_rgb(pixel, denominator).to_rgb(denominator);

                        assert_close(pixel, back, denominator);
                    }
                }
            }
        }
    }

    #[test]
    fn gray_has_no_chroma() {
        let cv = ComponentVideo::from_rgb(RgbPixel::new(128, 128, 128), 255);

        assert!((cv.y - 128.0 / 255.0).abs() < 1e-5);
        assert!(cv.pb.abs() < 1e-5);
        assert!(cv.pr.abs() < 1e-5);
    }

    #[test]
    fn extremes_stay_in_range() {
        let blue = ComponentVideo::from_rgb(RgbPixel::new(0, 0, 255), 255);
        assert!((blue.pb - 0.5).abs() < 1e-6);

        let red = ComponentVideo::from_rgb(RgbPixel::new(255, 0, 0), 255);
        assert!((red.pr - 0.5).abs() < 1e-6);

        let white = ComponentVideo::from_rgb(RgbPixel::new(255, 255, 255), 255);
        assert!(white.y <= 1.0);
    }

    #[test]
    fn out_of_range_components_are_clamped() {
        let rgb = ComponentVideo {
            y: 1.0,
            pb: 0.5,
            pr: 0.5,
        }
        .to_rgb(255);

        assert_eq!(rgb.red, 255);
        assert_eq!(rgb.blue, 255);

        let rgb = ComponentVideo {
            y: 0.0,
            pb: -0.5,
            pr: -0.5,
        }
        .to_rgb(255);

        assert_eq!(rgb.red, 0);
        assert_eq!(rgb.blue, 0);
    }

    #[test]
    #[should_panic]
    fn zero_denominator_panics() {
        ComponentVideo::from_rgb(RgbPixel::default(), 0);
    }
}
