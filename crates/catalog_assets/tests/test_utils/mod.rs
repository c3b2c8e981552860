//! Test doubles for the coordinator and lifecycle tests.

#![allow(dead_code)]

pub mod mock_repository;
pub mod mock_store;

#[allow(unused_imports)]
pub use mock_repository::MockRepository;
#[allow(unused_imports)]
pub use mock_store::{Event, EventLog, MockStore};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Encode a small solid-colour PNG.
pub fn png_bytes(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(colour));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode test PNG");
    out.into_inner()
}
