#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Vector font to bitsyfont conversion.
//!
//! The conversion runs in two passes over the selected codepoints: the first
//! pass computes a baseline shared by every glyph, the second rasterizes each
//! glyph at that baseline, binarizes it and tracks the bounding box. Once both
//! passes are done every glyph is cropped to the common box and serialized.

mod error;
pub use error::*;

mod cancellation;
pub use cancellation::*;

pub mod scheduler;
pub use scheduler::{LoopController, long_running_loop};

mod font;
pub use font::*;

mod codepoints;
pub use codepoints::*;

pub mod raster;
pub use raster::{PixelBuffer, render_char};

pub mod threshold;
pub use threshold::{apply_threshold, luminance};

mod bounds;
pub use bounds::*;

mod bitsyfont;
pub use bitsyfont::*;

mod request;
pub use request::*;

mod generate;
pub use generate::*;

pub mod preview;

/// File extension used for generated fonts.
pub const BITSYFONT_EXTENSION: &str = "bitsyfont";
