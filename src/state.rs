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

use crate::{errors::Error, messages::{camera::CameraCommand, gallery::GalleryCommand}, session::Lens};
use image::RgbImage;
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Saved(PathBuf),
    Failed(Error)
}

/// Screen state. Only the UI thread touches it; worker results are fed in
/// through the `on_*` methods and the returned commands go back out.
pub struct CameraState {
    last_captured: Option<(u64, Arc<RgbImage>)>,
    is_recording: bool,
    lens: Lens,
    pending_capture: Option<u64>,
    switching: bool,
    ready: bool,
    startup_error: Option<Error>,
    next_id: u64,
    status: Status
}

impl CameraState {
    pub fn new(lens: Lens) -> Self {
        Self {
            last_captured: None,
            is_recording: false,
            lens,
            pending_capture: None,
            switching: false,
            ready: false,
            startup_error: None,
            next_id: 1,
            status: Status::Idle
        }
    }

    pub fn last_captured(&self) -> Option<&Arc<RgbImage>> {
        self.last_captured.as_ref().map(|(_, img)| img)
    }

    /// Id of the photo currently shown as thumbnail.
    pub fn last_captured_id(&self) -> Option<u64> {
        self.last_captured.as_ref().map(|(id, _)| *id)
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn lens(&self) -> Lens {
        self.lens
    }

    pub fn is_capturing(&self) -> bool {
        self.pending_capture.is_some()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// True once any camera has streamed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Latest reason no camera could be started, shown until one starts.
    pub fn startup_error(&self) -> Option<&Error> {
        self.startup_error.as_ref()
    }

    /// Only one capture may be in flight; a second request is ignored.
    pub fn capture_photo(&mut self) -> Option<CameraCommand> {
        if let Some(id) = self.pending_capture {
            debug!(id, "capture already in progress, ignoring request");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.pending_capture = Some(id);
        Some(CameraCommand::TakePicture(id))
    }

    /// Drops interest in the pending capture; its result will be discarded.
    pub fn cancel_capture(&mut self) {
        if let Some(id) = self.pending_capture.take() {
            debug!(id, "capture cancelled");
        }
    }

    pub fn switch_camera(&mut self) -> Option<CameraCommand> {
        if self.switching {
            return None;
        }
        self.switching = true;
        Some(CameraCommand::SwitchLens(self.lens.toggled()))
    }

    /// Asks for the current lens again, for when it failed to start.
    pub fn retry_camera(&mut self) -> Option<CameraCommand> {
        if self.switching {
            return None;
        }
        self.switching = true;
        Some(CameraCommand::SwitchLens(self.lens))
    }

    /// Forgets a switch that never reached the camera thread.
    pub fn cancel_switch(&mut self) {
        self.switching = false;
    }

    pub fn toggle_recording(&mut self) {
        self.is_recording = !self.is_recording;
        info!(recording = self.is_recording, "video recording is not available, toggle is visual only");
    }

    /// Replaces the thumbnail and asks for the photo to be persisted.
    pub fn on_capture_succeeded(&mut self, id: u64, image: RgbImage) -> Option<GalleryCommand> {
        if self.pending_capture != Some(id) {
            debug!(id, "discarding result of a capture nobody is waiting for");
            return None;
        }
        self.pending_capture = None;

        let image = Arc::new(image);
        self.last_captured = Some((id, image.clone()));
        Some(GalleryCommand::Store { id, image })
    }

    pub fn on_capture_failed(&mut self, id: u64, error: Error) {
        if self.pending_capture != Some(id) {
            return;
        }
        self.pending_capture = None;
        warn!(id, error = %error, "photo capture failed");
        self.status = Status::Failed(error);
    }

    /// Also used for the first start: any confirmed lens means the camera is streaming.
    pub fn on_lens_switched(&mut self, lens: Lens) {
        self.switching = false;
        self.lens = lens;
        self.ready = true;
        self.startup_error = None;
    }

    pub fn on_switch_failed(&mut self, error: Error) {
        self.switching = false;
        if !self.ready {
            self.startup_error = Some(error.clone());
        }
        self.status = Status::Failed(error);
    }

    pub fn on_saved(&mut self, path: PathBuf) {
        self.status = Status::Saved(path);
    }

    /// The thumbnail stays; only the status line reports the failure.
    pub fn on_save_failed(&mut self, error: Error) {
        self.status = Status::Failed(error);
    }

    pub fn on_camera_error(&mut self, error: Error) {
        if !self.ready {
            self.startup_error = Some(error.clone());
        }
        self.status = Status::Failed(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn take(state: &mut CameraState) -> u64 {
        match state.capture_photo() {
            Some(CameraCommand::TakePicture(id)) => id,
            _ => panic!("capture was refused")
        }
    }

    fn photo(shade: u8) -> RgbImage {
        RgbImage::from_pixel(2, 2, Rgb([shade, shade, shade]))
    }

    #[test]
    fn successful_capture_becomes_the_only_thumbnail() {
        let mut state = CameraState::new(Lens::Back);

        let first = take(&mut state);
        let cmd = state.on_capture_succeeded(first, photo(10));
        assert!(matches!(cmd, Some(GalleryCommand::Store { id, .. }) if id == first));

        let second = take(&mut state);
        state.on_capture_succeeded(second, photo(20));

        assert_eq!(state.last_captured().map(|img| &**img), Some(&photo(20)));
        assert_eq!(state.last_captured_id(), Some(second));
        assert!(!state.is_capturing());
    }

    #[test]
    fn persisted_image_is_the_displayed_one() {
        let mut state = CameraState::new(Lens::Back);
        let id = take(&mut state);
        match state.on_capture_succeeded(id, photo(42)) {
            Some(GalleryCommand::Store { image, .. }) => {
                assert!(Arc::ptr_eq(&image, state.last_captured().unwrap()));
            },
            None => panic!("nothing to persist")
        }
    }

    #[test]
    fn failed_capture_keeps_previous_thumbnail() {
        let mut state = CameraState::new(Lens::Back);
        let id = take(&mut state);
        state.on_capture_succeeded(id, photo(1));

        let id = take(&mut state);
        state.on_capture_failed(id, Error::CaptureFailed(String::from("busy")));

        assert_eq!(state.last_captured().map(|img| &**img), Some(&photo(1)));
        assert!(matches!(state.status(), Status::Failed(Error::CaptureFailed(_))));
        assert!(!state.is_capturing());
    }

    #[test]
    fn save_failure_keeps_thumbnail() {
        let mut state = CameraState::new(Lens::Back);
        let id = take(&mut state);
        state.on_capture_succeeded(id, photo(5));
        state.on_save_failed(Error::Storage(String::from("read-only")));

        assert_eq!(state.last_captured().map(|img| &**img), Some(&photo(5)));
        assert!(matches!(state.status(), Status::Failed(Error::Storage(_))));
    }

    #[test]
    fn overlapping_capture_is_refused() {
        let mut state = CameraState::new(Lens::Back);
        let id = take(&mut state);
        assert!(state.capture_photo().is_none());

        state.on_capture_succeeded(id, photo(3));
        assert!(state.capture_photo().is_some());
    }

    #[test]
    fn cancelled_capture_result_is_discarded() {
        let mut state = CameraState::new(Lens::Back);
        let id = take(&mut state);
        state.cancel_capture();

        assert!(state.on_capture_succeeded(id, photo(9)).is_none());
        assert!(state.last_captured().is_none());
        assert!(state.capture_photo().is_some());
    }

    #[test]
    fn cancelled_capture_failure_is_discarded() {
        let mut state = CameraState::new(Lens::Back);
        let first = take(&mut state);
        state.on_capture_succeeded(first, photo(4));

        let id = take(&mut state);
        state.cancel_capture();
        state.on_capture_failed(id, Error::CaptureFailed(String::from("late")));

        assert_eq!(state.status(), &Status::Idle);
        assert_eq!(state.last_captured().map(|img| &**img), Some(&photo(4)));
        assert_eq!(state.last_captured_id(), Some(first));
    }

    #[test]
    fn undelivered_switch_can_be_retried() {
        let mut state = CameraState::new(Lens::Back);
        assert!(state.switch_camera().is_some());
        state.cancel_switch();
        assert_eq!(state.switch_camera(), Some(CameraCommand::SwitchLens(Lens::Front)));
    }

    #[test]
    fn startup_failures_stay_visible_until_a_camera_starts() {
        let mut state = CameraState::new(Lens::Back);
        state.on_camera_error(Error::DeviceCapability(String::from("no back camera")));
        assert!(!state.is_ready());

        assert_eq!(state.switch_camera(), Some(CameraCommand::SwitchLens(Lens::Front)));
        state.on_switch_failed(Error::DeviceCapability(String::from("no front camera")));
        assert_eq!(state.startup_error(), Some(&Error::DeviceCapability(String::from("no front camera"))));

        assert_eq!(state.retry_camera(), Some(CameraCommand::SwitchLens(Lens::Back)));
        state.on_lens_switched(Lens::Back);
        assert!(state.is_ready());
        assert!(state.startup_error().is_none());

        state.on_switch_failed(Error::DeviceCapability(String::from("no front camera")));
        assert!(state.startup_error().is_none());
    }

    #[test]
    fn lens_changes_only_on_confirmation() {
        let mut state = CameraState::new(Lens::Back);
        assert_eq!(state.switch_camera(), Some(CameraCommand::SwitchLens(Lens::Front)));
        assert_eq!(state.lens(), Lens::Back);
        assert!(state.switch_camera().is_none());

        state.on_switch_failed(Error::DeviceCapability(String::from("no front camera")));
        assert_eq!(state.lens(), Lens::Back);

        assert_eq!(state.switch_camera(), Some(CameraCommand::SwitchLens(Lens::Front)));
        state.on_lens_switched(Lens::Front);
        assert_eq!(state.switch_camera(), Some(CameraCommand::SwitchLens(Lens::Back)));
        state.on_lens_switched(Lens::Back);
        assert_eq!(state.lens(), Lens::Back);
    }

    #[test]
    fn recording_toggle_only_flips_the_flag() {
        let mut state = CameraState::new(Lens::Front);
        state.toggle_recording();
        assert!(state.is_recording());
        state.toggle_recording();
        assert!(!state.is_recording());
        assert_eq!(state.status(), &Status::Idle);
    }
}
