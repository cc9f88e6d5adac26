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

use crate::{errors::Error, imaging, session::{CameraSession, CapturedFrame}};
use image::RgbImage;
use tracing::{debug, error};

/// Takes one picture and hands the upright image to `on_success`, or the
/// cause to `on_error`. Exactly one of the two runs.
pub fn capture<S, F, E>(session: &mut S, on_success: F, on_error: E)
where
    S: CameraSession + ?Sized,
    F: FnOnce(RgbImage),
    E: FnOnce(Error)
{
    let result = session.take_picture().and_then(correct);
    match result {
        Ok(image) => on_success(image),
        Err(e) => {
            error!(error = %e, "error capturing image");
            on_error(e);
        }
    }
}

// Consumes the frame, so the sensor buffer is gone by the time the callback runs.
fn correct(frame: CapturedFrame) -> crate::errors::Result<RgbImage> {
    let CapturedFrame { image, rotation_degrees } = frame;
    debug!(rotation_degrees, width = image.width(), height = image.height(), "correcting frame orientation");
    imaging::rotate(&image, rotation_degrees)
}
