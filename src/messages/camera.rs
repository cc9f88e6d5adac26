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

use crate::{errors::Error, session::Lens};
use image::RgbImage;

/// Downscaled live frame. Sent on its own bounded channel, so frames the UI
/// has no time for are dropped instead of queued.
pub struct PreviewFrame {
    pub rgb: Vec<u8>,
    pub width: u32,
    pub height: u32
}

pub enum CameraMessage {
    Started(Lens),
    PhotoCaptured { id: u64, image: RgbImage },
    CaptureFailed { id: u64, error: Error },
    LensSwitched(Lens),
    SwitchFailed { requested: Lens, error: Error },
    Error(Error)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    TakePicture(u64),
    SwitchLens(Lens),
    Shutdown
}
