// Copyright (C) 2025 Joshua Kesler
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::errors::{Error, Result};
use image::{RgbImage, imageops::{self, FilterType}};

/// Returns a clockwise-rotated copy of `image`. Angles are taken modulo 360,
/// anything that is not a quarter turn is rejected.
pub fn rotate(image: &RgbImage, degrees: i32) -> Result<RgbImage> {
    match degrees.rem_euclid(360) {
        0 => Ok(image.clone()),
        90 => Ok(imageops::rotate90(image)),
        180 => Ok(imageops::rotate180(image)),
        270 => Ok(imageops::rotate270(image)),
        _ => Err(Error::InvalidArgument(format!("rotation of {} degrees is not a multiple of 90", degrees)))
    }
}

/// Scales down to `max_width`, keeping the aspect ratio. Smaller images are returned as is.
pub fn downscale(image: &RgbImage, max_width: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if w <= max_width || w == 0 {
        return image.clone();
    }

    let height = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
    imageops::resize(image, max_width, height, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8 * 40, y as u8 * 90, (x + y) as u8]))
    }

    #[test]
    fn zero_degrees_keeps_pixels() {
        let img = sample();
        assert_eq!(rotate(&img, 0).unwrap(), img);
        assert_eq!(rotate(&img, 360).unwrap(), img);
    }

    #[test]
    fn quarter_turn_swaps_dimensions_clockwise() {
        let img = sample();
        let rotated = rotate(&img, 90).unwrap();
        assert_eq!(rotated.dimensions(), (2, 3));
        // bottom-left pixel ends up top-left after a clockwise turn
        assert_eq!(rotated.get_pixel(0, 0), img.get_pixel(0, 1));
        assert_eq!(rotated.get_pixel(1, 0), img.get_pixel(0, 0));
    }

    #[test]
    fn four_quarter_turns_round_trip() {
        let img = sample();
        let mut current = img.clone();
        for _ in 0..4 {
            current = rotate(&current, 90).unwrap();
        }
        assert_eq!(current, img);
    }

    #[test]
    fn negative_angles_wrap() {
        let img = sample();
        assert_eq!(rotate(&img, -90).unwrap(), rotate(&img, 270).unwrap());
        assert_eq!(rotate(&img, 450).unwrap(), rotate(&img, 90).unwrap());
    }

    #[test]
    fn input_is_untouched() {
        let img = sample();
        let before = img.clone();
        let _ = rotate(&img, 180).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn rejects_odd_angles() {
        let err = rotate(&sample(), 45).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn downscale_keeps_aspect() {
        let img = RgbImage::new(1920, 1080);
        let small = downscale(&img, 854);
        assert_eq!(small.dimensions(), (854, 480));
        assert_eq!(downscale(&small, 1000).dimensions(), (854, 480));
    }
}
