//! Barcode symbologies and their ZPL commands.

/// Symbologies the generator can emit. `QR` has its own element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    /// Code 128 (`^BC`), also the fallback for unknown names.
    #[default]
    Code128,
    /// Code 39 (`^B3`).
    Code39,
    /// Code 93 (`^BA`).
    Code93,
    /// EAN-13 (`^BE`).
    Ean13,
    /// EAN-8 (`^B8`).
    Ean8,
    /// UPC-A (`^BU`).
    UpcA,
    /// Interleaved 2 of 5 (`^B2`).
    Itf,
    /// Codabar (`^BK`).
    Codabar,
    /// Data Matrix (`^BX`).
    DataMatrix,
    /// PDF417 (`^B7`).
    Pdf417,
}

impl BarcodeFormat {
    /// Every supported format.
    pub const ALL: [BarcodeFormat; 10] = [
        Self::Code128,
        Self::Code39,
        Self::Code93,
        Self::Ean13,
        Self::Ean8,
        Self::UpcA,
        Self::Itf,
        Self::Codabar,
        Self::DataMatrix,
        Self::Pdf417,
    ];

    /// Parse a format name, ignoring case, `-`, `_` and spaces.
    /// Returns `None` for names the generator does not know.
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();
        Some(match key.as_str() {
            "CODE128" | "128" => Self::Code128,
            "CODE39" | "39" => Self::Code39,
            "CODE93" | "93" => Self::Code93,
            "EAN13" | "EAN" => Self::Ean13,
            "EAN8" => Self::Ean8,
            "UPCA" | "UPC" => Self::UpcA,
            "ITF" | "ITF14" | "INTERLEAVED2OF5" | "I2OF5" => Self::Itf,
            "CODABAR" => Self::Codabar,
            "DATAMATRIX" => Self::DataMatrix,
            "PDF417" => Self::Pdf417,
            _ => return None,
        })
    }

    /// Resolve an optional element format: missing or unknown names fall
    /// back to Code 128.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or_default()
    }

    /// The ZPL barcode command, e.g. `^BC`.
    pub fn command(self) -> &'static str {
        match self {
            Self::Code128 => "^BC",
            Self::Code39 => "^B3",
            Self::Code93 => "^BA",
            Self::Ean13 => "^BE",
            Self::Ean8 => "^B8",
            Self::UpcA => "^BU",
            Self::Itf => "^B2",
            Self::Codabar => "^BK",
            Self::DataMatrix => "^BX",
            Self::Pdf417 => "^B7",
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Code128 => "CODE128",
            Self::Code39 => "CODE39",
            Self::Code93 => "CODE93",
            Self::Ean13 => "EAN13",
            Self::Ean8 => "EAN8",
            Self::UpcA => "UPCA",
            Self::Itf => "ITF",
            Self::Codabar => "CODABAR",
            Self::DataMatrix => "DATAMATRIX",
            Self::Pdf417 => "PDF417",
        }
    }

    /// Whether this is a one-dimensional symbology with a `^BY` module
    /// width and an interpretation line.
    pub fn is_linear(self) -> bool {
        !matches!(self, Self::DataMatrix | Self::Pdf417)
    }
}
