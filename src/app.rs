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
use crate::messages::{camera::{CameraCommand, CameraMessage, PreviewFrame}, gallery::{GalleryCommand, GalleryStatus}};
use crate::session::Lens;
use crate::state::{CameraState, Status};
use crossbeam_channel::{Receiver, Sender};
use eframe::{egui, App, Frame};
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(PartialEq)]
enum AppState {
    Loading,
    Running
}

#[derive(Debug, PartialEq)]
enum Shortcut {
    Capture,
    Switch
}

// Tab stays with egui's focus navigation.
fn shortcuts(input: &egui::InputState) -> Vec<Shortcut> {
    let mut out = Vec::new();
    if input.key_pressed(egui::Key::Space) {
        out.push(Shortcut::Capture);
    }
    if input.key_pressed(egui::Key::S) {
        out.push(Shortcut::Switch);
    }
    out
}

pub struct ShutterApp {
    camera_rx: Receiver<CameraMessage>,
    preview_rx: Receiver<PreviewFrame>,
    camera_tx: Sender<CameraCommand>,
    gallery_tx: Sender<GalleryCommand>,
    gallery_rx: Receiver<GalleryStatus>,
    gallery_root: PathBuf,
    state: CameraState,
    preview: Option<egui::TextureHandle>,
    thumbnail: Option<(u64, egui::TextureHandle)>
}

impl ShutterApp {
    pub fn new(_cc: &eframe::CreationContext, lens: Lens, gallery_root: PathBuf, camera_rx: Receiver<CameraMessage>, preview_rx: Receiver<PreviewFrame>, camera_tx: Sender<CameraCommand>, gallery_tx: Sender<GalleryCommand>, gallery_rx: Receiver<GalleryStatus>) -> Self {
        Self {
            camera_rx,
            preview_rx,
            camera_tx,
            gallery_tx,
            gallery_rx,
            gallery_root,
            state: CameraState::new(lens),
            preview: None,
            thumbnail: None
        }
    }

    fn send_camera(&mut self, cmd: Option<CameraCommand>) {
        if let Some(cmd) = cmd {
            if self.camera_tx.send(cmd).is_err() {
                error!("camera thread is gone");
                self.state.cancel_capture();
                self.state.cancel_switch();
                self.state.on_camera_error(Error::CaptureFailed(String::from("camera thread stopped")));
            }
        }
    }

    fn capture_photo(&mut self) {
        let cmd = self.state.capture_photo();
        self.send_camera(cmd);
    }

    fn switch_camera(&mut self) {
        let cmd = self.state.switch_camera();
        self.send_camera(cmd);
    }

    fn retry_camera(&mut self) {
        let cmd = self.state.retry_camera();
        self.send_camera(cmd);
    }

    fn app_state(&self) -> AppState {
        if self.state.is_ready() { AppState::Running } else { AppState::Loading }
    }

    // Keeps only the newest frame; the camera thread drops the rest.
    fn drain_preview(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.preview_rx.try_iter().last() else { return };
        let img = egui::ColorImage::from_rgb([frame.width as usize, frame.height as usize], &frame.rgb);
        match &mut self.preview {
            Some(texture) => texture.set(img, Default::default()),
            None => self.preview = Some(ctx.load_texture("preview", img, Default::default()))
        }
    }

    fn drain_camera(&mut self) {
        while let Ok(msg) = self.camera_rx.try_recv() {
            match msg {
                CameraMessage::Started(lens) => self.state.on_lens_switched(lens),
                CameraMessage::PhotoCaptured { id, image } => {
                    if let Some(cmd) = self.state.on_capture_succeeded(id, image) {
                        if self.gallery_tx.send(cmd).is_err() {
                            self.state.on_save_failed(Error::Storage(String::from("gallery thread stopped")));
                        }
                    }
                },
                CameraMessage::CaptureFailed { id, error } => self.state.on_capture_failed(id, error),
                CameraMessage::LensSwitched(lens) => self.state.on_lens_switched(lens),
                CameraMessage::SwitchFailed { requested, error } => {
                    warn!(lens = %requested, "staying on current camera");
                    self.state.on_switch_failed(error);
                },
                CameraMessage::Error(e) => self.state.on_camera_error(e)
            }
        }
    }

    fn drain_gallery(&mut self) {
        while let Ok(status) = self.gallery_rx.try_recv() {
            match status {
                GalleryStatus::Saved { path, .. } => self.state.on_saved(path),
                GalleryStatus::Failed { error, .. } => self.state.on_save_failed(error)
            }
        }
    }

    fn refresh_thumbnail(&mut self, ctx: &egui::Context) {
        let current = self.state.last_captured_id();
        if current == self.thumbnail.as_ref().map(|(id, _)| *id) {
            return;
        }

        self.thumbnail = match (current, self.state.last_captured()) {
            (Some(id), Some(photo)) => {
                let img = egui::ColorImage::from_rgb([photo.width() as usize, photo.height() as usize], photo.as_raw());
                Some((id, ctx.load_texture("last-photo", img, Default::default())))
            },
            _ => None
        };
    }
}

impl App for ShutterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_camera();
        self.drain_preview(ctx);
        self.drain_gallery();
        self.refresh_thumbnail(ctx);

        let app_state = self.app_state();
        if app_state == AppState::Running {
            for shortcut in ctx.input(shortcuts) {
                match shortcut {
                    Shortcut::Capture => self.capture_photo(),
                    Shortcut::Switch => self.switch_camera()
                }
            }
        }

        egui::CentralPanel::default().frame(egui::Frame::NONE.fill(egui::Color32::BLACK)).show(ctx, |ui| {
            match app_state {
                AppState::Loading => self.show_loading(ui),
                AppState::Running => self.show_running(ui)
            }
        });

        ctx.request_repaint();
    }
}

impl ShutterApp {
    fn show_loading(&mut self, ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                if let Some(err) = self.state.startup_error() {
                    ui.heading(egui::RichText::new("Camera initialization failed").color(egui::Color32::RED));
                    ui.label(err.to_string());
                    ui.add_space(10.0);
                    let lens = self.state.lens();
                    if ui.button(format!("Retry {} camera", lens)).clicked() {
                        self.retry_camera();
                    }
                    if ui.button(format!("Try {} camera", lens.toggled())).clicked() {
                        self.switch_camera();
                    }
                } else {
                    ui.spinner();
                    ui.label("Starting camera...");
                }
            });
        });
    }

    fn show_running(&mut self, ui: &mut egui::Ui) {
        let camera_rect = ui.allocate_ui(ui.available_size(), |ui| {
            if let Some(texture) = &self.preview {
                let size = texture.size_vec2();
                let aspect = size.x / size.y;
                let available_w = ui.available_width();
                let available_h = ui.available_height();

                let (w, h) = if available_w / aspect <= available_h {
                    (available_w, available_w / aspect)
                } else {
                    (available_h * aspect, available_h)
                };

                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(w, h)));
                });
            }
        }).response.rect;

        let button = egui::vec2(84.0, 84.0);
        let bottom = camera_rect.bottom() - button.y - 20.0;

        let capture_label = if self.state.is_capturing() { "..." } else { "Capture" };
        let capture = egui::Button::new(egui::RichText::new(capture_label).color(egui::Color32::BLACK).strong())
            .fill(egui::Color32::WHITE)
            .min_size(button);
        let capture_rect = egui::Rect::from_min_size(egui::pos2(camera_rect.center().x - button.x / 2.0, bottom), button);
        if ui.put(capture_rect, capture).on_hover_text("Capture photo (Space)").clicked() {
            self.capture_photo();
        }

        let (record_label, record_fill, record_hint) = if self.state.is_recording() {
            ("Stop", egui::Color32::RED, "Stop recording")
        } else {
            ("Record", egui::Color32::WHITE, "Record video")
        };
        let record = egui::Button::new(egui::RichText::new(record_label).color(egui::Color32::BLACK))
            .fill(record_fill)
            .min_size(button);
        let record_rect = egui::Rect::from_min_size(egui::pos2(camera_rect.right() - button.x - 20.0, bottom), button);
        if ui.put(record_rect, record).on_hover_text(record_hint).clicked() {
            self.state.toggle_recording();
        }

        let switch_rect = egui::Rect::from_min_size(camera_rect.right_top() + egui::vec2(-120.0, 16.0), egui::vec2(104.0, 32.0));
        if ui.put(switch_rect, egui::Button::new(format!("Switch ({})", self.state.lens()))).on_hover_text("Switch camera (S)").clicked() {
            self.switch_camera();
        }

        if let Some((_, texture)) = &self.thumbnail {
            let thumb_rect = egui::Rect::from_min_size(egui::pos2(camera_rect.left() + 20.0, bottom), button);
            ui.put(thumb_rect, egui::Image::new(texture).fit_to_exact_size(button))
                .on_hover_text(format!("Last captured photo, saved to {}", self.gallery_root.display()));
        }

        let status_rect = egui::Rect::from_min_size(camera_rect.left_top() + egui::vec2(20.0, 20.0), egui::vec2(camera_rect.width() - 160.0, 30.0));
        match self.state.status() {
            Status::Idle => {},
            Status::Saved(path) => {
                ui.put(status_rect, |ui: &mut egui::Ui| ui.colored_label(egui::Color32::GREEN, format!("Saved: {}", path.display())));
            },
            Status::Failed(e) => {
                ui.put(status_rect, |ui: &mut egui::Ui| ui.colored_label(egui::Color32::RED, e.to_string()));
            }
        }
    }
}

impl Drop for ShutterApp {
    fn drop(&mut self) {
        self.state.cancel_capture();
        let _ = self.camera_tx.send(CameraCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(key: egui::Key) -> Vec<Shortcut> {
        let ctx = egui::Context::default();
        let mut raw = egui::RawInput::default();
        raw.events.push(egui::Event::Key { key, physical_key: None, pressed: true, repeat: false, modifiers: egui::Modifiers::NONE });
        let mut out = Vec::new();
        let _ = ctx.run(raw, |ctx| out = ctx.input(shortcuts));
        out
    }

    #[test]
    fn space_captures_and_s_switches() {
        assert_eq!(pressed(egui::Key::Space), vec![Shortcut::Capture]);
        assert_eq!(pressed(egui::Key::S), vec![Shortcut::Switch]);
    }

    #[test]
    fn tab_is_left_to_focus_navigation() {
        assert!(pressed(egui::Key::Tab).is_empty());
    }
}
