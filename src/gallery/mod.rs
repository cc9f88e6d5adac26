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

pub mod store;

use crate::messages::gallery::{GalleryCommand, GalleryStatus};
use chrono::Local;
use crossbeam_channel::{Receiver, Sender};
use std::thread;
use store::{GalleryStore, JPEG_MIME};
use tracing::{error, info};

pub fn start_thread<G: GalleryStore + Send + 'static>(store: G, cmd_rx: Receiver<GalleryCommand>, status_tx: Sender<GalleryStatus>) {
    thread::spawn(move || run(&store, &cmd_rx, &status_tx));
}

/// Writes photos one at a time until the command channel closes.
pub fn run<G: GalleryStore + ?Sized>(store: &G, cmd_rx: &Receiver<GalleryCommand>, status_tx: &Sender<GalleryStatus>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            GalleryCommand::Store { id, image } => {
                let name = store::display_name(Local::now());
                let status = match store.write(&image, &name, JPEG_MIME) {
                    Ok(path) => {
                        info!(id, path = %path.display(), "photo saved");
                        GalleryStatus::Saved { id, path }
                    },
                    Err(error) => {
                        error!(id, error = %error, "failed to save photo");
                        GalleryStatus::Failed { id, error }
                    }
                };

                if status_tx.send(status).is_err() {
                    return;
                }
            }
        }
    }
}
