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

use crate::session::Lens;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "shutter", version, about = "Camera preview, photo capture and gallery")]
pub struct Config {
    /// Camera to start with
    #[arg(long, value_enum, default_value_t = Lens::Back)]
    pub lens: Lens,

    /// Device index of the back camera
    #[arg(long, value_name = "INDEX", default_value_t = 0)]
    pub back_index: u32,

    /// Device index of the front camera
    #[arg(long, value_name = "INDEX", default_value_t = 1)]
    pub front_index: u32,

    /// Clockwise rotation that turns sensor frames upright
    #[arg(long, value_name = "DEGREES", default_value_t = 0, allow_negative_numbers = true, value_parser = parse_rotation)]
    pub sensor_rotation: i32,

    /// Where photos are saved (defaults to <pictures>/Shutter)
    #[arg(long, value_name = "DIR")]
    pub gallery_dir: Option<PathBuf>,

    /// Width the live preview is scaled down to
    #[arg(long, value_name = "PX", default_value_t = 854, value_parser = clap::value_parser!(u32).range(64..))]
    pub preview_width: u32,

    /// JPEG quality for saved photos
    #[arg(long, value_name = "1-100", default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8
}

fn parse_rotation(s: &str) -> Result<i32, String> {
    let degrees: i32 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if degrees.rem_euclid(90) != 0 {
        return Err(format!("{} is not a multiple of 90", degrees));
    }
    Ok(degrees.rem_euclid(360))
}
