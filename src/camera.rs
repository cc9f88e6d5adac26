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

use crate::{capture, config::Config, imaging, messages::camera::{CameraCommand, CameraMessage, PreviewFrame}, session::{CameraSession, native::NativeSession}};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::{thread, time::Duration};
use tracing::{debug, error, info, warn};

const IDLE_WAIT: Duration = Duration::from_millis(250);

pub fn start_camera_thread(config: Config, tx: Sender<CameraMessage>, preview_tx: Sender<PreviewFrame>, cmd_rx: Receiver<CameraCommand>) {
    thread::spawn(move || {
        let session = NativeSession::new(&config);
        run(session, config.preview_width, &tx, &preview_tx, &cmd_rx);
    });
}

/// Owns `session` until a `Shutdown` arrives or either channel closes, then releases it.
/// Commands are handled strictly in arrival order, between preview frames.
/// `preview_tx` should be bounded: a full preview channel drops the frame, while
/// results on `tx` are never dropped.
pub fn run<S: CameraSession>(mut session: S, preview_width: u32, tx: &Sender<CameraMessage>, preview_tx: &Sender<PreviewFrame>, cmd_rx: &Receiver<CameraCommand>) {
    match session.start_preview() {
        Ok(()) => {
            info!(lens = %session.lens(), "preview started");
            let _ = tx.send(CameraMessage::Started(session.lens()));
        },
        Err(e) => {
            error!(error = %e, "camera initialization failed");
            let _ = tx.send(CameraMessage::Error(e));
        }
    }

    loop {
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => {
                    if !dispatch(&mut session, cmd, tx) {
                        session.release();
                        return;
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("camera command channel closed");
                    session.release();
                    return;
                }
            }
        }

        match session.preview_frame() {
            Ok(frame) => {
                let preview = imaging::downscale(&frame, preview_width);
                let (width, height) = preview.dimensions();
                match preview_tx.try_send(PreviewFrame { rgb: preview.into_raw(), width, height }) {
                    Ok(()) | Err(TrySendError::Full(_)) => {},
                    Err(TrySendError::Disconnected(_)) => {
                        session.release();
                        return;
                    }
                }
            },
            Err(e) => {
                debug!(error = %e, "no preview frame");
                match cmd_rx.recv_timeout(IDLE_WAIT) {
                    Ok(cmd) => {
                        if !dispatch(&mut session, cmd, tx) {
                            session.release();
                            return;
                        }
                    },
                    Err(RecvTimeoutError::Timeout) => {},
                    Err(RecvTimeoutError::Disconnected) => {
                        session.release();
                        return;
                    }
                }
            }
        }
    }
}

// Returns false once the worker should stop.
fn dispatch<S: CameraSession>(session: &mut S, cmd: CameraCommand, tx: &Sender<CameraMessage>) -> bool {
    match cmd {
        CameraCommand::TakePicture(id) => {
            debug!(id, "capture requested");
            capture::capture(
                session,
                |image| { let _ = tx.send(CameraMessage::PhotoCaptured { id, image }); },
                |error| { let _ = tx.send(CameraMessage::CaptureFailed { id, error }); }
            );
            true
        },
        CameraCommand::SwitchLens(requested) => {
            match session.set_lens(requested) {
                Ok(()) => {
                    info!(lens = %requested, "switched camera");
                    let _ = tx.send(CameraMessage::LensSwitched(session.lens()));
                },
                Err(error) => {
                    warn!(lens = %requested, error = %error, "failed to switch camera");
                    let _ = tx.send(CameraMessage::SwitchFailed { requested, error });
                }
            }
            true
        },
        CameraCommand::Shutdown => {
            info!("camera shutting down");
            false
        }
    }
}
