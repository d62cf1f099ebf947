use crate::{Image, Pixel};

/// 5x3 image with a distinct color in every pixel.
fn test_image() -> Image {
    let mut img = Image::create(5, 3).expect("Failed to create test image");
    for y in 0..3 {
        for x in 0..5 {
            let p = Pixel::new((x * 50) as u8, (y * 100) as u8, (x * 7 + y * 31) as u8);
            img.set_pixel(x, y, p).expect("Pixel out of range");
        }
    }
    img
}

mod compression;
mod files;
