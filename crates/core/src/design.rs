//! Label design model.
//!
//! A [`Design`] is the JSON document produced by the label editor: label
//! dimensions in millimetres plus an ordered list of positioned elements.
//! Unknown fields are ignored so newer editors can add presentation data
//! without breaking generation.

use serde::{Deserialize, Serialize};

use crate::expr::Bound;

/// Error loading a design document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DesignError {
    /// The document is not valid JSON or does not match the design schema.
    #[error("invalid design JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A label design: dimensions plus elements in z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label width in millimetres.
    pub width_mm: f64,
    /// Label height in millimetres.
    pub height_mm: f64,
    /// Elements in rendering order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Design {
    /// Empty design of the given size.
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            name: None,
            width_mm,
            height_mm,
            elements: Vec::new(),
        }
    }

    /// Builder-style element append.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Parse a design from JSON text.
    pub fn from_json(input: &str) -> Result<Self, DesignError> {
        Ok(serde_json::from_str(input)?)
    }
}

/// One positioned element. Geometry is in millimetres from the label's
/// top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Editor-assigned identifier, used in diagnostics.
    #[serde(default)]
    pub id: String,
    /// Left edge.
    #[serde(default)]
    pub x: f64,
    /// Top edge.
    #[serde(default)]
    pub y: f64,
    /// Width.
    #[serde(default)]
    pub width: f64,
    /// Height.
    #[serde(default)]
    pub height: f64,
    /// Clockwise rotation in degrees; `None` means upright.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Type-specific payload.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Element at the origin with zero size; see [`at`](Self::at) and
    /// [`sized`](Self::sized).
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: None,
            kind,
        }
    }

    /// Builder-style position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder-style size.
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style rotation.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// The `"type"` tag of this element.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Text(_) => "text",
            ElementKind::Barcode(_) => "barcode",
            ElementKind::Qr(_) => "qr",
            ElementKind::Rectangle(_) => "rectangle",
            ElementKind::Line(_) => "line",
            ElementKind::Circle(_) => "circle",
            ElementKind::Image(_) => "image",
        }
    }
}

impl Bound for Element {
    fn binding(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(t) => t.binding.as_deref(),
            ElementKind::Barcode(b) => b.binding.as_deref(),
            ElementKind::Qr(q) => q.binding.as_deref(),
            _ => None,
        }
    }

    fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(t) => t.text_content.as_deref(),
            ElementKind::Barcode(b) => b.text_content.as_deref(),
            ElementKind::Qr(q) => q.text_content.as_deref(),
            _ => None,
        }
    }
}

/// Element type with its payload, tagged by `"type"` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// Printed text.
    Text(TextElement),
    /// Linear or 2D barcode other than QR.
    Barcode(BarcodeElement),
    /// QR code.
    Qr(QrElement),
    /// Box outline or filled box.
    Rectangle(ShapeElement),
    /// Horizontal or vertical rule.
    Line(ShapeElement),
    /// Circle inscribed in the element box.
    Circle(ShapeElement),
    /// Image; printed as a placeholder box.
    Image(ImageElement),
}

/// Payload of a `text` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextElement {
    /// Column name or `{{…}}` template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
    /// Static text used when there is no usable binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Editor font family; the printer always uses its scalable font.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Editor font weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Editor colour; thermal printers print black.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Horizontal alignment within the element width.
    pub text_align: TextAlign,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Centred.
    Center,
    /// Flush right.
    Right,
    /// Justified.
    Justify,
    /// Flush left; unrecognised values also land here.
    #[default]
    #[serde(other)]
    Left,
}

/// Payload of a `barcode` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeElement {
    /// Column name or `{{…}}` template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
    /// Static value used when there is no usable binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Symbology name, e.g. `CODE128`, `ean-13`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode_format: Option<String>,
    /// Print the human-readable line under the bars (default on).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_text: Option<bool>,
}

/// Payload of a `qr` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrElement {
    /// Column name or `{{…}}` template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
    /// Static value used when there is no usable binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Error-correction level `L`, `M`, `Q` or `H`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_error_level: Option<String>,
}

/// Payload of `rectangle`, `line` and `circle` elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeElement {
    /// Stroke width in millimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Stroke colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Fill colour; anything other than empty, `none` or `transparent`
    /// prints as a solid fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl ShapeElement {
    /// Whether the shape prints filled.
    pub fn is_filled(&self) -> bool {
        self.background_color.as_deref().is_some_and(|c| {
            let c = c.trim();
            !(c.is_empty()
                || c.eq_ignore_ascii_case("none")
                || c.eq_ignore_ascii_case("transparent"))
        })
    }
}

/// Payload of an `image` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageElement {
    /// Source URL; not embedded in printer output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
