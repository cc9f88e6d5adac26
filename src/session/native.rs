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

use super::{CameraSession, CapturedFrame, Lens};
use crate::{config::Config, errors::{Error, Result}, imaging};
use image::RgbImage;
use nokhwa::{Camera, pixel_format::RgbFormat, utils::{CameraIndex, RequestedFormat, RequestedFormatType}};
use tracing::{debug, info, warn};

/// Session backed by the platform camera API through nokhwa.
pub struct NativeSession {
    camera: Option<Camera>,
    lens: Lens,
    back_index: u32,
    front_index: u32,
    sensor_rotation: i32
}

impl NativeSession {
    pub fn new(config: &Config) -> Self {
        Self {
            camera: None,
            lens: config.lens,
            back_index: config.back_index,
            front_index: config.front_index,
            sensor_rotation: config.sensor_rotation
        }
    }

    fn index_for(&self, lens: Lens) -> u32 {
        match lens {
            Lens::Back => self.back_index,
            Lens::Front => self.front_index
        }
    }

    fn open(index: u32) -> Result<Camera> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| Error::DeviceCapability(format!("camera {} could not be opened: {}", index, e)))?;
        camera.open_stream()
            .map_err(|e| Error::DeviceCapability(format!("camera {} refused to stream: {}", index, e)))?;

        let fmt = camera.camera_format();
        info!(index, width = fmt.resolution().width(), height = fmt.resolution().height(), fps = fmt.frame_rate(), "camera stream opened");
        Ok(camera)
    }

    fn grab(&mut self) -> Result<RgbImage> {
        let camera = self.camera.as_mut().ok_or_else(|| Error::CaptureFailed(String::from("camera is not running")))?;
        let frame = camera.frame().map_err(|e| Error::CaptureFailed(format!("frame read failed: {}", e)))?;
        frame.decode_image::<RgbFormat>().map_err(|e| Error::CaptureFailed(format!("frame decode failed: {}", e)))
    }
}

impl CameraSession for NativeSession {
    fn start_preview(&mut self) -> Result<()> {
        if self.camera.is_none() {
            self.camera = Some(Self::open(self.index_for(self.lens))?);
        }
        Ok(())
    }

    fn preview_frame(&mut self) -> Result<RgbImage> {
        let raw = self.grab()?;
        imaging::rotate(&raw, self.sensor_rotation)
    }

    fn take_picture(&mut self) -> Result<CapturedFrame> {
        let image = self.grab()?;
        debug!(width = image.width(), height = image.height(), "picture taken");
        Ok(CapturedFrame { image, rotation_degrees: self.sensor_rotation })
    }

    fn lens(&self) -> Lens {
        self.lens
    }

    fn set_lens(&mut self, lens: Lens) -> Result<()> {
        if lens == self.lens && self.camera.is_some() {
            return Ok(());
        }

        let camera = Self::open(self.index_for(lens))?;
        if let Some(mut old) = self.camera.replace(camera) {
            if let Err(e) = old.stop_stream() {
                warn!(error = %e, "previous camera did not stop cleanly");
            }
        }
        self.lens = lens;
        Ok(())
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!(error = %e, "camera did not stop cleanly");
            }
            info!(lens = %self.lens, "camera released");
        }
    }
}

impl Drop for NativeSession {
    fn drop(&mut self) {
        self.release();
    }
}
