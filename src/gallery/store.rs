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
use chrono::{DateTime, Local};
use image::{ImageFormat, RgbImage, codecs::jpeg::JpegEncoder};
use std::{fs::{self, File, OpenOptions}, io::{BufWriter, ErrorKind}, path::PathBuf};
use tracing::debug;

pub const JPEG_MIME: &str = "image/jpeg";
pub const PNG_MIME: &str = "image/png";

/// Shared photo storage. Returns where the picture ended up.
pub trait GalleryStore {
    fn write(&self, image: &RgbImage, display_name: &str, mime_type: &str) -> Result<PathBuf>;
}

pub fn display_name(at: DateTime<Local>) -> String {
    format!("IMG_{}", at.format("%Y%m%d_%H%M%S_%3f"))
}

pub struct DirectoryGallery {
    root: PathBuf,
    jpeg_quality: u8
}

impl DirectoryGallery {
    pub fn new(root: impl Into<PathBuf>, jpeg_quality: u8) -> Self {
        Self { root: root.into(), jpeg_quality }
    }

    /// `<pictures>/Shutter`, or `./Shutter` when the platform has no pictures folder.
    pub fn default_root() -> PathBuf {
        dirs::picture_dir().unwrap_or_else(|| PathBuf::from(".")).join("Shutter")
    }

    // create_new makes the name reservation atomic, a second writer moves on to the next suffix.
    fn reserve(&self, display_name: &str, ext: &str) -> Result<(File, PathBuf)> {
        for n in 0u32.. {
            let name = if n == 0 { format!("{}.{}", display_name, ext) } else { format!("{}_{}.{}", display_name, n, ext) };
            let path = self.root.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Error::Storage(format!("could not create {}: {}", path.display(), e)))
            }
        }
        Err(Error::Storage(format!("no free file name for {}", display_name)))
    }
}

impl GalleryStore for DirectoryGallery {
    fn write(&self, image: &RgbImage, display_name: &str, mime_type: &str) -> Result<PathBuf> {
        if display_name.trim().is_empty() {
            return Err(Error::Storage(String::from("empty display name")));
        }

        let (format, ext) = match mime_type {
            JPEG_MIME => (ImageFormat::Jpeg, "jpg"),
            PNG_MIME => (ImageFormat::Png, "png"),
            other => return Err(Error::Storage(format!("unsupported mime type {}", other)))
        };

        fs::create_dir_all(&self.root)
            .map_err(|e| Error::Storage(format!("could not create {}: {}", self.root.display(), e)))?;

        let (file, path) = self.reserve(display_name, ext)?;
        let mut writer = BufWriter::new(file);
        let encoded = match format {
            ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality).encode_image(image),
            _ => image.write_to(&mut writer, format)
        };

        if let Err(e) = encoded {
            let _ = fs::remove_file(&path);
            return Err(Error::Storage(format!("encoding {} failed: {}", path.display(), e)));
        }

        if let Err(e) = writer.into_inner().map_err(|e| e.into_error()).and_then(|f| f.sync_all()) {
            let _ = fs::remove_file(&path);
            return Err(Error::Storage(format!("writing {} failed: {}", path.display(), e)));
        }

        debug!(path = %path.display(), "photo written");
        Ok(path)
    }
}
