//! Test fixtures and constants.

use base64::Engine;

pub const RED: &str = "rgba(255,0,0,1)";
pub const TRANSPARENT: &str = "transparent";

/// Encode an RGBA image as PNG, colouring each pixel with `paint(x, y)`.
pub fn png_image(width: u32, height: u32, paint: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&paint(x, y));
        }
    }
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }
    buf.into_inner()
}

/// 32x32: left half red, right half white.
pub fn red_and_white_png() -> Vec<u8> {
    png_image(32, 32, |x, _| {
        if x < 16 {
            [255, 0, 0, 255]
        } else {
            [255, 255, 255, 255]
        }
    })
}

pub fn base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", base64(bytes))
}

/// Pixel array with a small red heart.
pub fn heart_pixels() -> Vec<String> {
    let mut pixels = vec![TRANSPARENT.to_string(); 256];
    for index in [18, 19, 23, 24, 33, 34, 35, 36, 37, 38, 39, 40, 50, 51, 52, 53, 54, 55] {
        pixels[index] = RED.to_string();
    }
    pixels
}
