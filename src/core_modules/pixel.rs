// THEORY:
// The `Pixel` module is the most fundamental unit of the vision system. It is a
// "dumb" data container for a single RGB sample plus the set of single-pixel
// predicates the rest of the engine is built on. Every higher-level statistic
// (mask coverage, biological ratios, artifact ratios) is an aggregation of the
// booleans and scalars defined here, so this module is deliberately tiny and
// self-contained: a predicate may only look at this pixel's three channels,
// never at neighbors or history.
//
// Key architectural principles:
// 1.  **Single-pixel scope**: Each predicate answers one question about one
//     pixel ("does this look like leaf tissue?", "is this a pure black/white
//     sample?"). Anything needing more than one pixel belongs upstream in the
//     `feature_extractor`.
// 2.  **Tuned, not derived**: The channel margins in these predicates are
//     hand-tuned against field photographs of crop foliage. They are encoded
//     here as constants because they are properties of what a "green leaf
//     pixel" *is* to this engine, not tunable runtime configuration (contrast
//     with the gate thresholds in `thresholds.rs`, which are).
// 3.  **Brightness as Rec. 601 luma**: perceived brightness uses the classic
//     0.299/0.587/0.114 weighting, the same definition the aggregate
//     statistics use, so per-pixel and per-image brightness are comparable.

pub mod pixel {
    pub type Channel = u8;
    pub type Brightness = f64;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// Perceived brightness (Rec. 601 luma) of this pixel, in 0..255.
        pub fn brightness(&self) -> Brightness {
            0.299_f64 * self.red as f64
                + 0.587_f64 * self.green as f64
                + 0.114_f64 * self.blue as f64
        }

        /// Healthy leaf tissue: green clearly dominates both other channels
        /// and the pixel is not near-black (shadow noise).
        pub fn is_green(&self) -> bool {
            let (r, g, b) = self.widened();
            g > r + 2 && g > b + 2 && self.brightness() > 20.0
        }

        /// Necrotic leaf tissue: red dominates green and blue by a clear
        /// margin while overall brightness stays below the ceiling that would
        /// indicate skin, sand, or wood rather than a browning leaf.
        pub fn is_leaf_brown(&self) -> bool {
            let (r, g, b) = self.widened();
            r > g + 10 && r > b + 10 && self.brightness() < 160.0
        }

        /// Chlorotic (yellowing) tissue: both red and green well above blue.
        pub fn is_yellow(&self) -> bool {
            let (r, g, b) = self.widened();
            r > b + 25 && g > b + 20
        }

        /// Mildew-like tissue: bright and nearly achromatic.
        pub fn is_white(&self) -> bool {
            let (r, g, b) = self.widened();
            r > 160 && g > 160 && b > 160 && (r - g).abs() < 15 && (g - b).abs() < 15
        }

        /// Human skin tone: warm hue, red over green over blue, mid brightness.
        pub fn is_skin(&self) -> bool {
            let (r, g, b) = self.widened();
            r > g + 20 && g > b && r > 60 && r < 235 && self.brightness() < 220.0
        }

        /// Pure black or pure white sample, the signature of synthetic
        /// borders, letterboxing, and screenshot backgrounds.
        pub fn is_pure(&self) -> bool {
            let (r, g, b) = self.widened();
            (r < 2 && g < 2 && b < 2) || (r > 253 && g > 253 && b > 253)
        }

        /// Packs the three channels into a single 24-bit color key, used for
        /// exact color-cardinality counting.
        pub fn color_key(&self) -> u32 {
            ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
        }

        /// Color key after integer-dividing each channel by `step`, used for
        /// quantized color-cardinality counting.
        pub fn quantized_color_key(&self, step: u8) -> u32 {
            let s = step.max(1) as u32;
            ((self.red as u32 / s) << 16) | ((self.green as u32 / s) << 8) | (self.blue as u32 / s)
        }

        // Channel margins above are compared in i32 to avoid u8 wrap-around.
        fn widened(&self) -> (i32, i32, i32) {
            (self.red as i32, self.green as i32, self.blue as i32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::Pixel;

    #[test]
    fn green_predicate_accepts_leaf_green_and_rejects_shadow() {
        assert!(Pixel::new(40, 160, 40).is_green());
        // Green dominance but essentially black: shadow noise, not tissue.
        assert!(!Pixel::new(2, 14, 2).is_green());
        // Grey: no channel dominance.
        assert!(!Pixel::new(120, 120, 120).is_green());
    }

    #[test]
    fn brown_predicate_requires_red_dominance_and_low_brightness() {
        assert!(Pixel::new(120, 60, 40).is_leaf_brown());
        // Bright tan (sand/skin range) is excluded by the brightness ceiling.
        assert!(!Pixel::new(230, 190, 150).is_leaf_brown());
    }

    #[test]
    fn white_predicate_requires_near_achromatic_brightness() {
        assert!(Pixel::new(200, 200, 200).is_white());
        assert!(!Pixel::new(200, 180, 80).is_white());
        assert!(!Pixel::new(120, 120, 120).is_white());
    }

    #[test]
    fn pure_predicate_matches_both_extremes_only() {
        assert!(Pixel::new(0, 0, 0).is_pure());
        assert!(Pixel::new(255, 255, 255).is_pure());
        assert!(Pixel::new(254, 254, 254).is_pure());
        assert!(!Pixel::new(250, 250, 250).is_pure());
        assert!(!Pixel::new(0, 0, 255).is_pure());
    }

    #[test]
    fn yellow_pixel_is_yellow_not_white() {
        let p = Pixel::new(200, 180, 80);
        assert!(p.is_yellow());
        assert!(!p.is_white());
    }

    #[test]
    fn quantized_key_collapses_nearby_colors() {
        let a = Pixel::new(41, 162, 43);
        let b = Pixel::new(49, 168, 49);
        assert_ne!(a.color_key(), b.color_key());
        assert_eq!(a.quantized_color_key(10), b.quantized_color_key(10));
    }

    #[test]
    fn brightness_matches_rec601_weights() {
        let p = Pixel::new(255, 0, 0);
        assert!((p.brightness() - 0.299 * 255.0).abs() < 1e-9);
    }
}
