pub mod qr_code;

pub use qr_code::{QrCodeService, validate};
