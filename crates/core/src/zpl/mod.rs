/// Barcode symbologies and their command mnemonics.
pub mod barcode;
/// Label and batch generation.
pub mod generate;
/// Resolution and orientation helpers.
pub mod units;

pub use barcode::BarcodeFormat;
pub use generate::{
    FieldEscape, GenerateOptions, generate, generate_batch, generate_batch_at, generate_batch_par,
    generate_label,
};
pub use units::{DEFAULT_DPI, Orientation, Resolution};
