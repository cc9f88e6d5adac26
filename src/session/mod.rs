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

pub mod native;

use crate::errors::Result;
use image::RgbImage;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Lens {
    Front,
    Back
}

impl Lens {
    pub fn toggled(self) -> Lens {
        match self {
            Lens::Front => Lens::Back,
            Lens::Back => Lens::Front
        }
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lens::Front => write!(f, "front"),
            Lens::Back => write!(f, "back")
        }
    }
}

/// A full resolution frame straight off the sensor, together with the
/// clockwise rotation needed to display it upright.
#[derive(Debug)]
pub struct CapturedFrame {
    pub image: RgbImage,
    pub rotation_degrees: i32
}

/// The slice of a live camera the rest of the app depends on.
pub trait CameraSession {
    fn start_preview(&mut self) -> Result<()>;

    /// Next frame for the on-screen preview, already upright.
    fn preview_frame(&mut self) -> Result<RgbImage>;

    fn take_picture(&mut self) -> Result<CapturedFrame>;

    fn lens(&self) -> Lens;

    /// Rebinds to another sensor. On error the session keeps streaming from the current one.
    fn set_lens(&mut self, lens: Lens) -> Result<()>;

    /// Frees the device. Any call other than `lens` fails afterwards until `start_preview`.
    fn release(&mut self);
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::errors::Error;
    use std::{collections::VecDeque, sync::{Arc, atomic::{AtomicUsize, Ordering}}};

    /// Scripted session used by the worker and coordinator tests.
    pub struct FakeSession {
        pub lens: Lens,
        pub started: bool,
        pub rotation_degrees: i32,
        pub unavailable: Vec<Lens>,
        pub pictures: VecDeque<Result<RgbImage>>,
        pub releases: Arc<AtomicUsize>
    }

    impl FakeSession {
        pub fn new(lens: Lens) -> Self {
            Self {
                lens,
                started: false,
                rotation_degrees: 0,
                unavailable: Vec::new(),
                pictures: VecDeque::new(),
                releases: Arc::new(AtomicUsize::new(0))
            }
        }

        pub fn release_count(&self) -> Arc<AtomicUsize> {
            self.releases.clone()
        }
    }

    impl CameraSession for FakeSession {
        fn start_preview(&mut self) -> Result<()> {
            self.started = true;
            Ok(())
        }

        fn preview_frame(&mut self) -> Result<RgbImage> {
            if !self.started {
                return Err(Error::CaptureFailed(String::from("preview not started")));
            }
            Ok(RgbImage::new(4, 2))
        }

        fn take_picture(&mut self) -> Result<CapturedFrame> {
            if !self.started {
                return Err(Error::CaptureFailed(String::from("session released")));
            }
            let image = self.pictures.pop_front().unwrap_or_else(|| Ok(RgbImage::new(4, 2)))?;
            Ok(CapturedFrame { image, rotation_degrees: self.rotation_degrees })
        }

        fn lens(&self) -> Lens {
            self.lens
        }

        fn set_lens(&mut self, lens: Lens) -> Result<()> {
            if self.unavailable.contains(&lens) {
                return Err(Error::DeviceCapability(format!("no {} camera", lens)));
            }
            self.lens = lens;
            Ok(())
        }

        fn release(&mut self) {
            self.started = false;
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        assert_eq!(Lens::Back.toggled(), Lens::Front);
        assert_eq!(Lens::Back.toggled().toggled(), Lens::Back);
        assert_eq!(Lens::Front.toggled().toggled(), Lens::Front);
    }
}
