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

use crate::errors::Error;
use image::RgbImage;
use std::{path::PathBuf, sync::Arc};

pub enum GalleryCommand {
    Store { id: u64, image: Arc<RgbImage> }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryStatus {
    Saved { id: u64, path: PathBuf },
    Failed { id: u64, error: Error }
}
