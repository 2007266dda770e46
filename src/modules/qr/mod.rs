//! Pickup codes: payload shape and QR image codec

pub mod codec;
pub mod payload;

pub use codec::{decode_image, download_file_name, encode_data_url, encode_png};
pub use payload::{parse_scanned, QrPayload, ScannedLoan};
