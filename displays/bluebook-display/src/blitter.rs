//! 1-bpp to physical pixel conversion

use core::ops::Range;

use embedded_graphics::pixelcolor::{PixelColor, Rgb888};
use embedded_graphics::prelude::{DrawTarget, Point};
use embedded_graphics::Pixel;

use crate::bitmap::{BitmapSize, DisplayBitmap, WORD_BITS};
use crate::damage::DirtyRect;

/// Colors used when drawing the bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<C> {
    /// Set bits
    pub foreground: C,
    /// Clear bits
    pub background: C,
    /// Cursor glyph
    pub cursor: C,
}

impl<C: From<Rgb888>> Palette<C> {
    /// Build a palette from `0xRRGGBB` values
    pub fn from_rgb(foreground: u32, background: u32, cursor: u32) -> Self {
        Self {
            foreground: rgb(foreground).into(),
            background: rgb(background).into(),
            cursor: rgb(cursor).into(),
        }
    }
}

fn rgb(value: u32) -> Rgb888 {
    Rgb888::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// Word columns covering pixels `x..x + width`, widened to whole words
pub fn word_span(x: u16, width: u16) -> Range<usize> {
    if width == 0 {
        return 0..0;
    }
    let first = x as usize / WORD_BITS as usize;
    let last = (x as usize + width as usize - 1) / WORD_BITS as usize;
    first..last + 1
}

/// Copies bitmap regions to a draw target
#[derive(Debug, Clone)]
pub struct Blitter<C> {
    palette: Palette<C>,
    /// Screen position of bitmap pixel (0, 0)
    origin: Point,
}

impl<C: PixelColor> Blitter<C> {
    /// Create a blitter drawing at the screen origin
    pub fn new(palette: Palette<C>) -> Self {
        Self {
            palette,
            origin: Point::zero(),
        }
    }

    /// Palette in use
    pub fn palette(&self) -> &Palette<C> {
        &self.palette
    }

    /// Screen position of the bitmap
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Move the bitmap on the screen
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Redraw `rect` from `bitmap`
    ///
    /// The horizontal span is widened to word boundaries; one word is fetched
    /// per row and word column.
    pub fn blit<B, D>(
        &self,
        bitmap: &B,
        size: BitmapSize,
        rect: DirtyRect,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        B: DisplayBitmap + ?Sized,
        D: DrawTarget<Color = C>,
    {
        if rect.is_empty() {
            return Ok(());
        }

        let columns = word_span(rect.x, rect.width);
        let rows = rect.y..rect.y.saturating_add(rect.height).min(size.height);
        for row in rows {
            self.draw_words(bitmap, size, row, columns.clone(), target)?;
        }
        Ok(())
    }

    /// Draw whole words `columns` of `row`
    pub(crate) fn draw_words<B, D>(
        &self,
        bitmap: &B,
        size: BitmapSize,
        row: u16,
        columns: Range<usize>,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        B: DisplayBitmap + ?Sized,
        D: DrawTarget<Color = C>,
    {
        if row >= size.height {
            return Ok(());
        }
        for column in columns {
            let left = column * WORD_BITS as usize;
            if left >= size.width as usize {
                break;
            }
            let word = bitmap.word(size.word_index(row, column));
            self.draw_word(word, left, row, size, target)?;
        }
        Ok(())
    }

    fn draw_word<D>(
        &self,
        word: u16,
        left: usize,
        row: u16,
        size: BitmapSize,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let palette = &self.palette;
        let origin = self.origin;
        let pixels = (0..WORD_BITS).filter_map(move |bit| {
            let x = left + (WORD_BITS - 1 - bit) as usize;
            if x >= size.width as usize {
                return None;
            }
            let color = if word & (1 << bit) != 0 {
                palette.foreground
            } else {
                palette.background
            };
            Some(Pixel(origin + Point::new(x as i32, row as i32), color))
        });
        target.draw_iter(pixels)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate std;

    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::{OriginDimensions, Size};
    use std::cell::Cell;
    use std::vec;
    use std::vec::Vec;

    /// Screen recording every pixel write
    pub struct RecordingScreen {
        pub size: Size,
        pub pixels: Vec<Option<BinaryColor>>,
        pub writes: usize,
    }

    impl RecordingScreen {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                pixels: vec![None; (width * height) as usize],
                writes: 0,
            }
        }

        pub fn at(&self, x: i32, y: i32) -> Option<BinaryColor> {
            self.pixels[(y as u32 * self.size.width + x as u32) as usize]
        }

        pub fn written(&self) -> Vec<(i32, i32)> {
            let width = self.size.width as usize;
            self.pixels
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_some())
                .map(|(i, _)| ((i % width) as i32, (i / width) as i32))
                .collect()
        }
    }

    impl OriginDimensions for RecordingScreen {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for RecordingScreen {
        type Color = BinaryColor;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                self.writes += 1;
                if point.x >= 0
                    && point.y >= 0
                    && (point.x as u32) < self.size.width
                    && (point.y as u32) < self.size.height
                {
                    let index = (point.y as u32 * self.size.width + point.x as u32) as usize;
                    self.pixels[index] = Some(color);
                }
            }
            Ok(())
        }
    }

    /// Bitmap counting word fetches
    pub struct CountingBitmap {
        pub words: Vec<u16>,
        pub fetched: Cell<Vec<usize>>,
    }

    impl CountingBitmap {
        pub fn new(words: Vec<u16>) -> Self {
            Self {
                words,
                fetched: Cell::new(Vec::new()),
            }
        }

        pub fn fetched(&self) -> Vec<usize> {
            let fetched = self.fetched.take();
            self.fetched.set(fetched.clone());
            fetched
        }
    }

    impl DisplayBitmap for CountingBitmap {
        fn word(&self, index: usize) -> u16 {
            let mut fetched = self.fetched.take();
            fetched.push(index);
            self.fetched.set(fetched);
            self.words.as_slice().word(index)
        }
    }

    pub fn palette() -> Palette<BinaryColor> {
        Palette {
            foreground: BinaryColor::On,
            background: BinaryColor::Off,
            cursor: BinaryColor::On,
        }
    }

    #[test]
    fn test_word_span_widening() {
        assert_eq!(word_span(3, 5), 0..1);
        assert_eq!(word_span(15, 2), 0..2);
        assert_eq!(word_span(16, 16), 1..2);
        assert_eq!(word_span(17, 0), 0..0);
    }

    #[test]
    fn test_partial_word_rect_fetches_one_word() {
        let bitmap = CountingBitmap::new(vec![0xFFFF, 0xFFFF]);
        let mut screen = RecordingScreen::new(32, 1);
        let blitter = Blitter::new(palette());

        blitter
            .blit(&bitmap, BitmapSize::new(32, 1), DirtyRect::new(3, 0, 5, 1), &mut screen)
            .unwrap();

        assert_eq!(bitmap.fetched(), vec![0]);
        let written: Vec<i32> = screen.written().into_iter().map(|(x, _)| x).collect();
        assert_eq!(written, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_bit_order_msb_is_leftmost() {
        let bitmap = [0x8001u16];
        let mut screen = RecordingScreen::new(16, 1);
        Blitter::new(palette())
            .blit(&bitmap, BitmapSize::new(16, 1), DirtyRect::new(0, 0, 16, 1), &mut screen)
            .unwrap();

        assert_eq!(screen.at(0, 0), Some(BinaryColor::On));
        assert_eq!(screen.at(15, 0), Some(BinaryColor::On));
        for x in 1..15 {
            assert_eq!(screen.at(x, 0), Some(BinaryColor::Off));
        }
    }

    #[test]
    fn test_rows_use_stride() {
        // 20 pixels wide -> 2 words per row
        let bitmap = CountingBitmap::new(vec![0, 0, 0, 0, 0, 0, 0xC000, 0]);
        let mut screen = RecordingScreen::new(20, 4);
        Blitter::new(palette())
            .blit(&bitmap, BitmapSize::new(20, 4), DirtyRect::new(0, 3, 2, 1), &mut screen)
            .unwrap();

        assert_eq!(bitmap.fetched(), vec![6]);
        assert_eq!(screen.at(0, 3), Some(BinaryColor::On));
        assert_eq!(screen.at(1, 3), Some(BinaryColor::On));
        assert_eq!(screen.at(2, 3), Some(BinaryColor::Off));
    }

    #[test]
    fn test_padding_columns_skipped() {
        let bitmap = [0xFFFFu16, 0xFFFF];
        let mut screen = RecordingScreen::new(32, 1);
        Blitter::new(palette())
            .blit(&bitmap, BitmapSize::new(20, 1), DirtyRect::new(18, 0, 2, 1), &mut screen)
            .unwrap();

        let written: Vec<i32> = screen.written().into_iter().map(|(x, _)| x).collect();
        assert_eq!(written, vec![16, 17, 18, 19]);
    }

    #[test]
    fn test_origin_offset_applied() {
        let bitmap = [0x8000u16];
        let mut screen = RecordingScreen::new(40, 20);
        let mut blitter = Blitter::new(palette());
        blitter.set_origin(Point::new(10, 5));
        blitter
            .blit(&bitmap, BitmapSize::new(16, 1), DirtyRect::new(0, 0, 1, 1), &mut screen)
            .unwrap();

        assert_eq!(screen.at(10, 5), Some(BinaryColor::On));
        assert_eq!(screen.at(11, 5), Some(BinaryColor::Off));
        assert_eq!(screen.at(0, 0), None);
    }

    #[test]
    fn test_empty_rect_draws_nothing() {
        let bitmap = CountingBitmap::new(vec![0xFFFF]);
        let mut screen = RecordingScreen::new(16, 1);
        Blitter::new(palette())
            .blit(&bitmap, BitmapSize::new(16, 1), DirtyRect::EMPTY, &mut screen)
            .unwrap();
        assert!(bitmap.fetched().is_empty());
        assert_eq!(screen.writes, 0);
    }

    #[test]
    fn test_palette_from_rgb() {
        let palette: Palette<Rgb888> = Palette::from_rgb(0x000000, 0xFFFFFF, 0x123456);
        assert_eq!(palette.background, Rgb888::new(0xFF, 0xFF, 0xFF));
        assert_eq!(palette.cursor, Rgb888::new(0x12, 0x34, 0x56));
    }
}
