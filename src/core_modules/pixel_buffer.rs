// THEORY:
// The `PixelBuffer` is the engine's sole input type: an immutable, fixed-size
// grid of RGB samples at the analysis resolution. It exists to draw a hard
// boundary between the outside world (arbitrary images, arbitrary encodings,
// arbitrary sizes) and the core pipeline, which only ever sees this one shape
// of data.
//
// Key architectural principles:
// 1.  **Caller-owned, never mutated**: The pipeline borrows the buffer and
//     computes; it never writes back. Immutability is what makes the whole
//     pipeline a pure function, and therefore trivially parallel (see
//     `parallel_pipeline`).
// 2.  **Shape enforced at construction**: A buffer can only be built from a
//     byte slice whose length matches `width * height * 3`. The core modules
//     downstream assume a well-formed, non-empty, exactly-3-channel buffer and
//     never re-validate it.
// 3.  **Flat storage, iterator access**: Pixels are stored as a flat `Vec` in
//     row-major order. Consumers iterate; nothing in the engine needs random
//     2D access, so no indexing API is offered.

pub mod pixel_buffer {
    use crate::core_modules::pixel::pixel::Pixel;

    /// The fixed analysis resolution. Upstream decoding resizes every image
    /// to this square before the pipeline sees it.
    pub const ANALYSIS_WIDTH: u32 = 224;
    /// See [`ANALYSIS_WIDTH`].
    pub const ANALYSIS_HEIGHT: u32 = 224;

    /// An immutable, fixed-dimension grid of RGB pixels.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PixelBuffer {
        width: u32,
        height: u32,
        pixels: Vec<Pixel>,
    }

    impl PixelBuffer {
        /// Builds a buffer from tightly packed RGB bytes in row-major order.
        ///
        /// Returns `None` when the byte count does not match the requested
        /// dimensions or the dimensions are degenerate. The caller (the image
        /// loader) treats that as a bug in its own resizing step.
        pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
            let expected = width as usize * height as usize * 3;
            if width == 0 || height == 0 || bytes.len() != expected {
                return None;
            }
            let pixels = bytes
                .chunks_exact(3)
                .map(|c| Pixel::new(c[0], c[1], c[2]))
                .collect();
            Some(Self {
                width,
                height,
                pixels,
            })
        }

        /// Builds a buffer at the analysis resolution where every pixel is
        /// produced by `f(index)`. Test and demo constructor.
        pub fn from_fn(f: impl FnMut(usize) -> Pixel) -> Self {
            let total = (ANALYSIS_WIDTH * ANALYSIS_HEIGHT) as usize;
            Self {
                width: ANALYSIS_WIDTH,
                height: ANALYSIS_HEIGHT,
                pixels: (0..total).map(f).collect(),
            }
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Total pixel count; always > 0 by construction.
        pub fn len(&self) -> usize {
            self.pixels.len()
        }

        pub fn is_empty(&self) -> bool {
            self.pixels.is_empty()
        }

        pub fn pixels(&self) -> &[Pixel] {
            &self.pixels
        }

        pub fn iter(&self) -> impl Iterator<Item = &Pixel> {
            self.pixels.iter()
        }
    }
}
