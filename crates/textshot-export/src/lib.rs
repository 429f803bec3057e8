//! Export stage for textshot
//!
//! Encodes the canvas as PNG and decides where the file goes.

pub mod output;
pub mod png;

pub use output::{write_png, FixedName, NameSource, OsRngNames, OutputTarget, RANDOM_NAME_LEN};
pub use png::{encode_bitmap_to_png, PngExporter};
