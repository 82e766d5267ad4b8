//! Bitmap placement on the physical screen

use embedded_graphics::prelude::{Point, Size};

use crate::bitmap::BitmapSize;

/// Screen position that centers `bitmap` on `screen`
///
/// Each axis falls back to 0 when the screen is smaller than the bitmap or
/// when the margin would exceed half the bitmap.
pub fn centered_origin(screen: Size, bitmap: BitmapSize) -> Point {
    Point::new(
        centered_axis(screen.width, bitmap.width as u32),
        centered_axis(screen.height, bitmap.height as u32),
    )
}

fn centered_axis(screen: u32, bitmap: u32) -> i32 {
    let Some(margin) = screen.checked_sub(bitmap) else {
        return 0;
    };
    let offset = margin / 2;
    if offset > bitmap / 2 {
        0
    } else {
        offset as i32
    }
}
