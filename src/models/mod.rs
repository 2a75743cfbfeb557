pub mod qr_code;

pub use qr_code::{EnrichedQrCode, QrCodeModel, QrCodeSubmission};
