//! ZPL generator: turns a [`Design`] and a data row into a `^XA … ^XZ`
//! label block.
//!
//! Output is line-oriented: the label header, one line per element
//! (`^FO…^FS`), then the footer. Every value interpolated into `^FD` goes
//! through [`FieldEscape`] first.

use chrono::{Local, NaiveDateTime};
use labelgen_profile::Profile;
use rayon::prelude::*;

use crate::design::{
    BarcodeElement, Design, Element, ElementKind, QrElement, ShapeElement, TextAlign, TextElement,
};
use crate::expr::{EvalContext, Row, resolve_code_value, resolve_text};
use crate::hex_escape::{INDICATOR, encode_hex_escapes, has_reserved, strip_reserved};

use super::barcode::BarcodeFormat;
use super::units::{Orientation, Resolution};

/// Font size used when a text element has neither a size nor a height.
const DEFAULT_FONT_PT: f64 = 10.0;
/// Error-correction level used when a QR element does not set one.
const DEFAULT_QR_LEVEL: char = 'Q';
/// Dots per unit of QR magnification.
const QR_DOTS_PER_MAGNIFICATION: u32 = 30;

// ── Configuration ───────────────────────────────────────────────────────

/// How reserved characters in field data are neutralised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldEscape {
    /// Drop `^` and `~`.
    #[default]
    Strip,
    /// Keep them, hex-encoded under `^FH_`.
    Hex,
}

/// Generator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct GenerateOptions {
    /// Print resolution.
    pub dpi: Resolution,
    /// Copies per label (`^PQ`, emitted only when greater than 1).
    pub copies: u32,
    /// Field data escaping mode.
    pub escape: FieldEscape,
    /// Emit `^CI28` so UTF-8 field data prints correctly.
    pub utf8: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dpi: Resolution::default(),
            copies: 1,
            escape: FieldEscape::default(),
            utf8: true,
        }
    }
}

impl GenerateOptions {
    /// Options for a printer profile: its resolution, other fields default.
    pub fn from_profile(profile: &Profile) -> Self {
        Self::default().dpi(profile.dpi)
    }

    /// Set the resolution.
    pub fn dpi(mut self, dpi: impl Into<Resolution>) -> Self {
        self.dpi = dpi.into();
        self
    }

    /// Set copies per label.
    pub fn copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }

    /// Set the escaping mode.
    pub fn escape(mut self, escape: FieldEscape) -> Self {
        self.escape = escape;
        self
    }

    /// Enable or disable `^CI28`.
    pub fn utf8(mut self, utf8: bool) -> Self {
        self.utf8 = utf8;
        self
    }
}

// ── Public API ──────────────────────────────────────────────────────────

/// Generate one label for `row`, evaluated at the current local time as
/// row 0.
pub fn generate(design: &Design, row: &Row, options: &GenerateOptions) -> String {
    generate_label(design, row, &EvalContext::default(), options)
}

/// Generate one label with an explicit evaluation context.
pub fn generate_label(
    design: &Design,
    row: &Row,
    ctx: &EvalContext,
    options: &GenerateOptions,
) -> String {
    let mut out = String::new();
    write_label(&mut out, design, row, ctx, options);
    out
}

/// Generate one label per row, concatenated. Row `i` is evaluated with
/// `row_index = i`; the clock is read once for the whole batch.
pub fn generate_batch(design: &Design, rows: &[Row], options: &GenerateOptions) -> String {
    generate_batch_at(design, rows, Local::now().naive_local(), options)
}

/// [`generate_batch`] with an explicit reference time.
pub fn generate_batch_at(
    design: &Design,
    rows: &[Row],
    now: NaiveDateTime,
    options: &GenerateOptions,
) -> String {
    let base = EvalContext::new(now);
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        write_label(&mut out, design, row, &base.at_row(index), options);
    }
    out
}

/// Same output as [`generate_batch_at`], rendering rows on the rayon
/// thread pool. Each row's index is fixed before dispatch.
pub fn generate_batch_par(
    design: &Design,
    rows: &[Row],
    now: NaiveDateTime,
    options: &GenerateOptions,
) -> String {
    let base = EvalContext::new(now);
    rows.par_iter()
        .enumerate()
        .map(|(index, row)| generate_label(design, row, &base.at_row(index), options))
        .collect::<Vec<_>>()
        .concat()
}

// ── Label emission ──────────────────────────────────────────────────────

fn write_label(
    out: &mut String,
    design: &Design,
    row: &Row,
    ctx: &EvalContext,
    options: &GenerateOptions,
) {
    let dpi = options.dpi;
    out.push_str("^XA\n");
    out.push_str(&format!("^PW{}\n", dpi.mm_to_dots(design.width_mm)));
    out.push_str(&format!("^LL{}\n", dpi.mm_to_dots(design.height_mm)));
    if options.utf8 {
        out.push_str("^CI28\n");
    }
    for element in &design.elements {
        write_element(out, element, row, ctx, options);
        out.push('\n');
    }
    if options.copies > 1 {
        out.push_str(&format!("^PQ{}\n", options.copies));
    }
    out.push_str("^XZ\n");
}

/// Element geometry converted to dots.
#[derive(Debug, Clone, Copy)]
struct Frame {
    width: u32,
    height: u32,
    orientation: char,
}

fn write_element(
    out: &mut String,
    element: &Element,
    row: &Row,
    ctx: &EvalContext,
    options: &GenerateOptions,
) {
    let dpi = options.dpi;
    out.push_str(&format!(
        "^FO{},{}",
        dpi.mm_to_dots(element.x),
        dpi.mm_to_dots(element.y)
    ));
    let frame = Frame {
        width: dpi.mm_to_dots(element.width),
        height: dpi.mm_to_dots(element.height),
        orientation: Orientation::from_degrees(element.rotation).code(),
    };

    match &element.kind {
        ElementKind::Text(text) => {
            write_text(out, text, frame, dpi);
            write_field_data(out, "", &resolve_text(element, row, ctx), options.escape);
        }
        ElementKind::Barcode(barcode) => {
            write_barcode(out, barcode, frame, dpi);
            let value = resolve_code_value(element, row, ctx);
            write_field_data(out, "", &value, options.escape);
        }
        ElementKind::Qr(qr) => {
            let level = write_qr(out, qr, frame);
            let value = resolve_code_value(element, row, ctx);
            write_field_data(out, &format!("{level}A,"), &value, options.escape);
        }
        ElementKind::Rectangle(shape) => {
            let t = thickness(shape, dpi);
            let t = if shape.is_filled() {
                frame.width.min(frame.height).max(t)
            } else {
                t
            };
            out.push_str(&format!("^GB{},{},{}^FS", frame.width, frame.height, t));
        }
        ElementKind::Line(shape) => {
            let t = thickness(shape, dpi);
            let (w, h) = if frame.width >= frame.height {
                (frame.width, frame.height.max(t))
            } else {
                (frame.width.max(t), frame.height)
            };
            out.push_str(&format!("^GB{w},{h},{t}^FS"));
        }
        ElementKind::Circle(shape) => {
            let d = match (frame.width, frame.height) {
                (0, h) => h,
                (w, 0) => w,
                (w, h) => w.min(h),
            };
            let t = if shape.is_filled() {
                d.max(1)
            } else {
                thickness(shape, dpi)
            };
            out.push_str(&format!("^GC{d},{t},B^FS"));
        }
        ElementKind::Image(_) => {
            out.push_str(&format!("^GB{},{},1^FS", frame.width, frame.height));
        }
    }
}

fn write_text(out: &mut String, text: &TextElement, frame: Frame, dpi: Resolution) {
    let size = text
        .font_size
        .filter(|pt| *pt > 0.0)
        .map(|pt| dpi.pt_to_dots(pt))
        .filter(|h| *h > 0)
        .unwrap_or(frame.height);
    let size = if size == 0 {
        dpi.pt_to_dots(DEFAULT_FONT_PT)
    } else {
        size
    };
    out.push_str(&format!("^A0{},{size},{size}", frame.orientation));

    let justify = match text.text_align {
        TextAlign::Left => None,
        TextAlign::Center => Some('C'),
        TextAlign::Right => Some('R'),
        TextAlign::Justify => Some('J'),
    };
    if let Some(j) = justify {
        out.push_str(&format!("^FB{},1,0,{j},0", frame.width.max(1)));
    }
}

fn write_barcode(out: &mut String, barcode: &BarcodeElement, frame: Frame, dpi: Resolution) {
    let format = BarcodeFormat::resolve(barcode.barcode_format.as_deref());
    let module = (f64::from(dpi.dots_per_mm()) / 4.0).round().max(1.0) as u32;
    let o = frame.orientation;
    let h = frame.height.max(1);
    let f = if barcode.show_text.unwrap_or(true) {
        'Y'
    } else {
        'N'
    };
    let cmd = format.command();

    let params = match format {
        BarcodeFormat::Code128 | BarcodeFormat::Code93 | BarcodeFormat::Itf => {
            format!("{o},{h},{f},N,N")
        }
        BarcodeFormat::Code39 => format!("{o},N,{h},{f},N"),
        BarcodeFormat::Ean13 | BarcodeFormat::Ean8 => format!("{o},{h},{f},N"),
        BarcodeFormat::UpcA => format!("{o},{h},{f},N,Y"),
        BarcodeFormat::Codabar => format!("{o},N,{h},{f},N,A,A"),
        BarcodeFormat::DataMatrix => {
            let cell = (frame.width.min(frame.height) / 20).max(1);
            out.push_str(&format!("{cmd}{o},{cell},200"));
            return;
        }
        BarcodeFormat::Pdf417 => {
            out.push_str(&format!("^BY{module}{cmd}{o},{},0,,,N", module * 3));
            return;
        }
    };
    out.push_str(&format!("^BY{module}{cmd}{params}"));
}

/// Emits `^BQ` and returns the error-correction level for the data prefix.
fn write_qr(out: &mut String, qr: &QrElement, frame: Frame) -> char {
    let magnification = (frame.width / QR_DOTS_PER_MAGNIFICATION).clamp(1, 10);
    out.push_str(&format!("^BQN,2,{magnification}"));
    qr.qr_error_level
        .as_deref()
        .map(str::trim)
        .and_then(|l| l.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| matches!(c, 'L' | 'M' | 'Q' | 'H'))
        .unwrap_or(DEFAULT_QR_LEVEL)
}

fn thickness(shape: &ShapeElement, dpi: Resolution) -> u32 {
    shape
        .border_width
        .map(|mm| dpi.mm_to_dots(mm))
        .unwrap_or(0)
        .max(1)
}

/// `^FD<prefix><value>^FS`, with reserved characters neutralised.
fn write_field_data(out: &mut String, prefix: &str, value: &str, escape: FieldEscape) {
    match escape {
        FieldEscape::Strip => {
            out.push_str("^FD");
            out.push_str(prefix);
            out.push_str(&strip_reserved(value));
        }
        FieldEscape::Hex if has_reserved(value) => {
            out.push_str("^FH");
            out.push(char::from(INDICATOR));
            out.push_str("^FD");
            out.push_str(prefix);
            out.push_str(&encode_hex_escapes(value));
        }
        FieldEscape::Hex => {
            out.push_str("^FD");
            out.push_str(prefix);
            out.push_str(value);
        }
    }
    out.push_str("^FS");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::ImageElement;
    use chrono::NaiveDate;

    fn ctx() -> EvalContext {
        EvalContext::new(
            NaiveDate::from_ymd_opt(2026, 3, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        )
    }

    fn one(element: Element) -> String {
        let design = Design::new(50.0, 30.0).with_element(element);
        generate_label(&design, &Row::new(), &ctx(), &GenerateOptions::default())
    }

    fn element_line(zpl: &str) -> &str {
        zpl.lines()
            .find(|l| l.starts_with("^FO"))
            .expect("element line")
    }

    #[test]
    fn empty_design_layout() {
        let zpl = generate_label(
            &Design::new(50.0, 30.0),
            &Row::new(),
            &ctx(),
            &GenerateOptions::default(),
        );
        assert_eq!(zpl, "^XA\n^PW400\n^LL240\n^CI28\n^XZ\n");
    }

    #[test]
    fn copies_and_no_utf8() {
        let options = GenerateOptions::default().copies(3).utf8(false);
        let zpl = generate_label(&Design::new(10.0, 10.0), &Row::new(), &ctx(), &options);
        assert_eq!(zpl, "^XA\n^PW80\n^LL80\n^PQ3\n^XZ\n");
    }

    #[test]
    fn text_uses_font_size_in_points() {
        let text = TextElement {
            text_content: Some("Hola".into()),
            font_size: Some(12.0),
            ..Default::default()
        };
        let zpl = one(
            Element::new("t", ElementKind::Text(text))
                .at(10.0, 5.0)
                .sized(30.0, 5.0),
        );
        assert_eq!(element_line(&zpl), "^FO80,40^A0N,34,34^FDHola^FS");
    }

    #[test]
    fn text_without_size_uses_height() {
        let text = TextElement {
            text_content: Some("x".into()),
            ..Default::default()
        };
        let zpl = one(
            Element::new("t", ElementKind::Text(text))
                .sized(20.0, 4.0)
                .rotated(90.0),
        );
        assert_eq!(element_line(&zpl), "^FO0,0^A0R,32,32^FDx^FS");
    }

    #[test]
    fn text_without_size_or_height_uses_default() {
        let text = TextElement {
            text_content: Some("x".into()),
            ..Default::default()
        };
        let zpl = one(Element::new("t", ElementKind::Text(text)));
        assert!(element_line(&zpl).contains("^A0N,28,28"));
    }

    #[test]
    fn centred_text_gets_field_block() {
        let text = TextElement {
            text_content: Some("x".into()),
            font_size: Some(12.0),
            text_align: TextAlign::Center,
            ..Default::default()
        };
        let zpl = one(Element::new("t", ElementKind::Text(text)).sized(40.0, 5.0));
        assert_eq!(element_line(&zpl), "^FO0,0^A0N,34,34^FB320,1,0,C,0^FDx^FS");
    }

    #[test]
    fn code128_barcode() {
        let barcode = BarcodeElement {
            text_content: Some("ABC-123".into()),
            barcode_format: Some("CODE128".into()),
            ..Default::default()
        };
        let zpl = one(
            Element::new("b", ElementKind::Barcode(barcode))
                .sized(40.0, 10.0),
        );
        assert_eq!(element_line(&zpl), "^FO0,0^BY2^BCN,80,Y,N,N^FDABC-123^FS");
    }

    #[test]
    fn barcode_without_interpretation_line() {
        let barcode = BarcodeElement {
            text_content: Some("4006381333931".into()),
            barcode_format: Some("ean13".into()),
            show_text: Some(false),
            ..Default::default()
        };
        let zpl = one(
            Element::new("b", ElementKind::Barcode(barcode))
                .sized(40.0, 10.0)
                .rotated(180.0),
        );
        assert_eq!(element_line(&zpl), "^FO0,0^BY2^BEI,80,N,N^FD4006381333931^FS");
    }

    #[test]
    fn two_dimensional_barcodes() {
        let dm = BarcodeElement {
            text_content: Some("X".into()),
            barcode_format: Some("DATAMATRIX".into()),
            ..Default::default()
        };
        let zpl = one(
            Element::new("d", ElementKind::Barcode(dm))
                .sized(20.0, 20.0),
        );
        assert_eq!(element_line(&zpl), "^FO0,0^BXN,8,200^FDX^FS");

        let pdf = BarcodeElement {
            text_content: Some("X".into()),
            barcode_format: Some("PDF417".into()),
            ..Default::default()
        };
        let zpl = one(
            Element::new("p", ElementKind::Barcode(pdf))
                .sized(40.0, 10.0),
        );
        assert_eq!(element_line(&zpl), "^FO0,0^BY2^B7N,6,0,,,N^FDX^FS");
    }

    #[test]
    fn unknown_format_falls_back_to_code128() {
        let barcode = BarcodeElement {
            text_content: Some("1".into()),
            barcode_format: Some("AZTEC".into()),
            ..Default::default()
        };
        let zpl = one(
            Element::new("b", ElementKind::Barcode(barcode))
                .sized(40.0, 10.0),
        );
        assert!(element_line(&zpl).contains("^BCN,80,Y,N,N"));
    }

    #[test]
    fn qr_payload_prefix() {
        let qr = QrElement {
            text_content: Some("https://example.com".into()),
            ..Default::default()
        };
        let zpl = one(Element::new("q", ElementKind::Qr(qr)).sized(20.0, 20.0));
        assert_eq!(element_line(&zpl), "^FO0,0^BQN,2,5^FDQA,https://example.com^FS");
    }

    #[test]
    fn qr_error_level_is_honoured() {
        let qr = QrElement {
            text_content: Some("x".into()),
            qr_error_level: Some("h".into()),
            ..Default::default()
        };
        let zpl = one(Element::new("q", ElementKind::Qr(qr)).sized(2.0, 2.0));
        assert_eq!(element_line(&zpl), "^FO0,0^BQN,2,1^FDHA,x^FS");
    }

    #[test]
    fn shapes() {
        let outline = ShapeElement {
            border_width: Some(0.5),
            ..Default::default()
        };
        let filled = ShapeElement {
            background_color: Some("#000".into()),
            ..Default::default()
        };
        let rect = one(
            Element::new("r", ElementKind::Rectangle(outline.clone()))
                .sized(20.0, 10.0),
        );
        assert_eq!(element_line(&rect), "^FO0,0^GB160,80,4^FS");
        let rect = one(
            Element::new("r", ElementKind::Rectangle(filled.clone()))
                .sized(20.0, 10.0),
        );
        assert_eq!(element_line(&rect), "^FO0,0^GB160,80,80^FS");
        let line = one(
            Element::new("l", ElementKind::Line(outline.clone()))
                .sized(30.0, 0.0),
        );
        assert_eq!(element_line(&line), "^FO0,0^GB240,4,4^FS");
        let vline = one(
            Element::new("l", ElementKind::Line(ShapeElement::default()))
                .sized(0.0, 30.0),
        );
        assert_eq!(element_line(&vline), "^FO0,0^GB1,240,1^FS");
        let circle = one(
            Element::new("c", ElementKind::Circle(outline))
                .sized(10.0, 12.0),
        );
        assert_eq!(element_line(&circle), "^FO0,0^GC80,4,B^FS");
        let disc = one(
            Element::new("c", ElementKind::Circle(filled))
                .sized(10.0, 10.0),
        );
        assert_eq!(element_line(&disc), "^FO0,0^GC80,80,B^FS");
        let image = one(
            Element::new("i", ElementKind::Image(ImageElement::default()))
                .sized(5.0, 5.0),
        );
        assert_eq!(element_line(&image), "^FO0,0^GB40,40,1^FS");
    }

    #[test]
    fn strip_escape_removes_reserved() {
        let text = TextElement {
            text_content: Some("A^XZ~B".into()),
            ..Default::default()
        };
        let zpl = one(Element::new("t", ElementKind::Text(text)).sized(10.0, 3.0));
        assert!(element_line(&zpl).ends_with("^FDAXZB^FS"));
    }

    #[test]
    fn hex_escape_only_when_needed() {
        let design = |s: &str| {
            Design::new(10.0, 10.0).with_element(
                Element::new(
                    "t",
                    ElementKind::Text(TextElement {
                        text_content: Some(s.into()),
                        ..Default::default()
                    }),
                )
                .sized(10.0, 3.0),
            )
        };
        let options = GenerateOptions::default().escape(FieldEscape::Hex);
        let zpl = generate_label(&design("a^b_c"), &Row::new(), &ctx(), &options);
        assert!(element_line(&zpl).ends_with("^FH_^FDa_5Eb_5Fc^FS"));
        let zpl = generate_label(&design("a_b"), &Row::new(), &ctx(), &options);
        assert!(element_line(&zpl).ends_with("^A0N,24,24^FDa_b^FS"));
    }

    #[test]
    fn options_from_profile() {
        let profile = labelgen_profile::load_profile_from_str(
            r#"{"id":"zt411","schema_version":"1.0.0","dpi":300}"#,
        )
        .unwrap();
        let options = GenerateOptions::from_profile(&profile);
        assert_eq!(options.dpi, Resolution(300));
        assert_eq!(options.copies, 1);
    }
}
