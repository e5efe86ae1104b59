//! Content stream interpreter.
//!
//! Walks the operators of a decoded content stream, maintaining graphics and
//! text state, and reports one [`TextRun`] per text-showing operator to a
//! [`TextSink`]. Form XObjects are interpreted recursively through `Do`.

use std::collections::{HashMap, HashSet};

use lopdf::Object;
use lopdf::content::{Content, Operation};
use touki_core::{ExtractOptions, ExtractWarning, ExtractWarningCode};

use crate::error::BackendError;
use crate::font::{Font, Glyph};
use crate::handler::{TextRun, TextSink};
use crate::lopdf_backend::{decode_stream, object_to_f64, resolve_ref};
use crate::text_state::{GraphicsStack, Matrix, TextState};

/// Per-stream interpreter context.
struct StreamContext<'a> {
    doc: &'a lopdf::Document,
    resources: &'a lopdf::Dictionary,
    options: &'a ExtractOptions,
    depth: usize,
    fonts: HashMap<String, Font>,
    unmapped_fonts: HashSet<String>,
}

impl StreamContext<'_> {
    fn warn(&self, sink: &mut dyn TextSink, warning: ExtractWarning) {
        if self.options.collect_warnings {
            #[cfg(feature = "tracing")]
            tracing::debug!(%warning, "content stream warning");
            sink.on_warning(warning);
        }
    }

    fn font(&mut self, name: &str, sink: &mut dyn TextSink, op_index: usize) -> &Font {
        if !self.fonts.contains_key(name) {
            let font = match lookup_font_dict(self.doc, self.resources, name) {
                Some(dict) => Font::load(self.doc, name, dict),
                None => {
                    self.warn(
                        sink,
                        ExtractWarning::with_operator_context(
                            ExtractWarningCode::MissingFont,
                            "font not found in page resources, using defaults",
                            op_index,
                            name,
                        ),
                    );
                    Font::fallback(name)
                }
            };
            self.fonts.insert(name.to_string(), font);
        }
        &self.fonts[name]
    }
}

fn lookup_font_dict<'a>(
    doc: &'a lopdf::Document,
    resources: &'a lopdf::Dictionary,
    name: &str,
) -> Option<&'a lopdf::Dictionary> {
    let fonts = resolve_ref(doc, resources.get(b"Font").ok()?).as_dict().ok()?;
    resolve_ref(doc, fonts.get(name.as_bytes()).ok()?)
        .as_dict()
        .ok()
}

fn operand_f64(op: &Operation, index: usize) -> Option<f64> {
    op.operands.get(index).and_then(|o| object_to_f64(o).ok())
}

fn operand_numbers(op: &Operation) -> Vec<f64> {
    op.operands
        .iter()
        .filter_map(|o| object_to_f64(o).ok())
        .collect()
}

fn operand_name(op: &Operation) -> Option<String> {
    op.operands
        .first()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

/// One element of a shown string: text bytes or a `TJ` adjustment.
enum ShowElement<'a> {
    Text(&'a [u8]),
    Adjust(f64),
}

/// Interpret a decoded content stream.
///
/// Undecodable or oversized streams are reported as warnings and skipped.
#[allow(clippy::too_many_arguments)]
pub(crate) fn interpret_content_stream(
    doc: &lopdf::Document,
    stream_bytes: &[u8],
    resources: &lopdf::Dictionary,
    sink: &mut dyn TextSink,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut GraphicsStack,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    let mut ctx = StreamContext {
        doc,
        resources,
        options,
        depth,
        fonts: HashMap::new(),
        unmapped_fonts: HashSet::new(),
    };

    if stream_bytes.len() > options.max_stream_bytes {
        ctx.warn(
            sink,
            ExtractWarning::with_code(
                ExtractWarningCode::ResourceLimitReached,
                format!(
                    "content stream of {} bytes exceeds max_stream_bytes ({}), skipped",
                    stream_bytes.len(),
                    options.max_stream_bytes
                ),
            ),
        );
        return Ok(());
    }

    let content = match Content::decode(stream_bytes) {
        Ok(content) => content,
        Err(e) => {
            ctx.warn(
                sink,
                ExtractWarning::with_code(
                    ExtractWarningCode::MalformedObject,
                    format!("failed to decode content stream: {e}"),
                ),
            );
            return Ok(());
        }
    };

    for (op_index, op) in content.operations.iter().enumerate() {
        match op.operator.as_str() {
            "q" => gstate.save(tstate),
            "Q" => gstate.restore(tstate),
            "cm" => {
                if let Some(m) = Matrix::from_slice(&operand_numbers(op)) {
                    gstate.concat_matrix(&m);
                }
            }
            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                if let Some(name) = operand_name(op) {
                    let size = operand_f64(op, 1).unwrap_or(0.0);
                    ctx.font(&name, sink, op_index);
                    tstate.set_font(name, size);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_slice(&operand_numbers(op)) {
                    tstate.set_text_matrix(m);
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (operand_f64(op, 0), operand_f64(op, 1)) {
                    tstate.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (operand_f64(op, 0), operand_f64(op, 1)) {
                    tstate.move_text_position_and_set_leading(tx, ty);
                }
            }
            "T*" => tstate.move_to_next_line(),
            "TL" => {
                if let Some(v) = operand_f64(op, 0) {
                    tstate.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = operand_f64(op, 0) {
                    tstate.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operand_f64(op, 0) {
                    tstate.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = operand_f64(op, 0) {
                    tstate.h_scaling = v;
                }
            }
            "Ts" => {
                if let Some(v) = operand_f64(op, 0) {
                    tstate.rise = v;
                }
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    show(&mut ctx, sink, gstate, tstate, op_index, &[ShowElement::Text(bytes)]);
                }
            }
            "'" => {
                tstate.move_to_next_line();
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    show(&mut ctx, sink, gstate, tstate, op_index, &[ShowElement::Text(bytes)]);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (operand_f64(op, 0), operand_f64(op, 1)) {
                    tstate.word_spacing = aw;
                    tstate.char_spacing = ac;
                }
                tstate.move_to_next_line();
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    show(&mut ctx, sink, gstate, tstate, op_index, &[ShowElement::Text(bytes)]);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let elements: Vec<ShowElement<'_>> = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(ShowElement::Text(bytes)),
                            other => object_to_f64(other).ok().map(ShowElement::Adjust),
                        })
                        .collect();
                    show(&mut ctx, sink, gstate, tstate, op_index, &elements);
                }
            }
            "Do" => {
                if let Some(name) = operand_name(op) {
                    handle_do(&ctx, sink, gstate, tstate, &name)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Show strings with the current font, advancing the text matrix, and emit one run.
fn show(
    ctx: &mut StreamContext<'_>,
    sink: &mut dyn TextSink,
    gstate: &GraphicsStack,
    tstate: &mut TextState,
    op_index: usize,
    elements: &[ShowElement<'_>],
) {
    let font_name = tstate.font_name.clone();
    let (x, y) = tstate.origin(gstate.ctm());
    let scale = {
        let m = tstate.text_matrix().concat(gstate.ctm());
        (m.b * m.b + m.d * m.d).sqrt()
    };
    let font_size = tstate.font_size;
    let h_scale = tstate.h_scaling_normalized();

    let mut text = String::new();
    let mut unmapped = 0usize;
    for element in elements {
        match element {
            ShowElement::Text(bytes) => {
                let glyphs: Vec<Glyph> = ctx.font(&font_name, sink, op_index).decode(bytes);
                for glyph in glyphs {
                    let mut advance = glyph.width / 1000.0 * font_size + tstate.char_spacing;
                    if glyph.is_word_space {
                        advance += tstate.word_spacing;
                    }
                    tstate.advance_text_position(advance * h_scale);
                    if !glyph.mapped {
                        unmapped += 1;
                    }
                    text.push_str(&glyph.text);
                }
            }
            ShowElement::Adjust(amount) => {
                tstate.advance_text_position(-amount / 1000.0 * font_size * h_scale);
            }
        }
    }

    if unmapped > 0 && ctx.unmapped_fonts.insert(font_name.clone()) {
        ctx.warn(
            sink,
            ExtractWarning::with_operator_context(
                ExtractWarningCode::EncodingFallback,
                format!("{unmapped} character code(s) without Unicode mapping replaced with U+FFFD"),
                op_index,
                font_name.as_str(),
            ),
        );
    }

    if text.trim().is_empty() {
        return;
    }
    sink.on_text_run(TextRun {
        text,
        x,
        y,
        font_name,
        font_size: font_size * scale,
    });
}

fn handle_do(
    ctx: &StreamContext<'_>,
    sink: &mut dyn TextSink,
    gstate: &mut GraphicsStack,
    tstate: &mut TextState,
    name: &str,
) -> Result<(), BackendError> {
    let doc = ctx.doc;
    let stream = ctx
        .resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .and_then(|o| resolve_ref(doc, o).as_stream().ok());
    let Some(stream) = stream else {
        ctx.warn(
            sink,
            ExtractWarning::with_code(
                ExtractWarningCode::MalformedObject,
                format!("XObject /{name} not found in resources"),
            ),
        );
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|subtype| subtype == b"Form");
    if !is_form {
        return Ok(());
    }

    if ctx.depth + 1 > ctx.options.max_recursion_depth {
        ctx.warn(
            sink,
            ExtractWarning::with_code(
                ExtractWarningCode::ResourceLimitReached,
                format!(
                    "Form XObject /{name} exceeds max_recursion_depth ({}), skipped",
                    ctx.options.max_recursion_depth
                ),
            ),
        );
        return Ok(());
    }

    let content = match decode_stream(stream) {
        Ok(content) => content,
        Err(e) => {
            ctx.warn(
                sink,
                ExtractWarning::with_code(
                    ExtractWarningCode::MalformedObject,
                    format!("failed to decode Form XObject /{name}: {e}"),
                ),
            );
            return Ok(());
        }
    };

    let resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|o| resolve_ref(doc, o).as_dict().ok())
        .unwrap_or(ctx.resources);

    gstate.save(tstate);
    if let Some(m) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|o| o.as_array().ok())
        .and_then(|values| {
            let numbers: Vec<f64> = values.iter().filter_map(|v| object_to_f64(v).ok()).collect();
            Matrix::from_slice(&numbers)
        })
    {
        gstate.concat_matrix(&m);
    }
    let result = interpret_content_stream(
        doc,
        &content,
        resources,
        sink,
        ctx.options,
        ctx.depth + 1,
        gstate,
        tstate,
    );
    gstate.restore(tstate);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    #[derive(Default)]
    struct Recorder {
        runs: Vec<TextRun>,
        warnings: Vec<ExtractWarning>,
    }

    impl TextSink for Recorder {
        fn on_text_run(&mut self, run: TextRun) {
            self.runs.push(run);
        }

        fn on_warning(&mut self, warning: ExtractWarning) {
            self.warnings.push(warning);
        }
    }

    fn helvetica_resources() -> lopdf::Dictionary {
        dictionary! {
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                },
            },
        }
    }

    fn run_stream(doc: &lopdf::Document, content: &[u8], resources: &lopdf::Dictionary) -> Recorder {
        let mut recorder = Recorder::default();
        let mut gstate = GraphicsStack::new();
        let mut tstate = TextState::new();
        interpret_content_stream(
            doc,
            content,
            resources,
            &mut recorder,
            &ExtractOptions::default(),
            0,
            &mut gstate,
            &mut tstate,
        )
        .unwrap();
        recorder
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn tj_emits_one_run_at_text_origin() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(
            &doc,
            b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET",
            &helvetica_resources(),
        );
        assert_eq!(recorder.runs.len(), 1);
        assert_eq!(recorder.runs[0].text, "Hello");
        assert_approx(recorder.runs[0].x, 72.0);
        assert_approx(recorder.runs[0].y, 720.0);
        assert_approx(recorder.runs[0].font_size, 12.0);
        assert!(recorder.warnings.is_empty());
    }

    #[test]
    fn consecutive_tj_advance_x() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(
            &doc,
            b"BT /F1 10 Tf 0 0 Td (ab) Tj (c) Tj ET",
            &helvetica_resources(),
        );
        // Two glyphs of the 500-unit fallback width at 10pt.
        assert_approx(recorder.runs[1].x, 10.0);
    }

    #[test]
    fn tj_array_is_one_run() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(
            &doc,
            b"BT /F1 10 Tf 100 100 Td [(To) -250 (kyo)] TJ (x) Tj ET",
            &helvetica_resources(),
        );
        assert_eq!(recorder.runs.len(), 2);
        assert_eq!(recorder.runs[0].text, "Tokyo");
        // 5 glyphs * 5pt + 2.5pt kerning gap.
        assert_approx(recorder.runs[1].x, 127.5);
    }

    #[test]
    fn quote_operators_move_to_next_line() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(
            &doc,
            b"BT /F1 10 Tf 14 TL 50 500 Td (a) Tj (b) ' 1 0 (c) \" ET",
            &helvetica_resources(),
        );
        assert_eq!(recorder.runs.len(), 3);
        assert_approx(recorder.runs[1].y, 486.0);
        assert_approx(recorder.runs[1].x, 50.0);
        assert_approx(recorder.runs[2].y, 472.0);
    }

    #[test]
    fn whitespace_runs_are_dropped() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(&doc, b"BT /F1 10 Tf (   ) Tj ET", &helvetica_resources());
        assert!(recorder.runs.is_empty());
    }

    #[test]
    fn cm_and_q_transform_positions() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(
            &doc,
            b"q 1 0 0 1 100 200 cm BT /F1 10 Tf (in) Tj ET Q BT /F1 10 Tf (out) Tj ET",
            &helvetica_resources(),
        );
        assert_approx(recorder.runs[0].x, 100.0);
        assert_approx(recorder.runs[0].y, 200.0);
        assert_approx(recorder.runs[1].x, 0.0);
        assert_approx(recorder.runs[1].y, 0.0);
    }

    #[test]
    fn scaled_text_matrix_reports_effective_size() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(
            &doc,
            b"BT /F1 1 Tf 9 0 0 9 30 40 Tm (a) Tj ET",
            &helvetica_resources(),
        );
        assert_approx(recorder.runs[0].font_size, 9.0);
        assert_approx(recorder.runs[0].x, 30.0);
    }

    #[test]
    fn missing_font_warns_and_continues() {
        let doc = lopdf::Document::with_version("1.5");
        let recorder = run_stream(&doc, b"BT /F7 10 Tf (abc) Tj ET", &lopdf::Dictionary::new());
        assert_eq!(recorder.runs[0].text, "abc");
        assert_eq!(recorder.warnings.len(), 1);
        assert_eq!(recorder.warnings[0].code, ExtractWarningCode::MissingFont);
        assert_eq!(recorder.warnings[0].font_name.as_deref(), Some("F7"));
    }

    #[test]
    fn oversized_stream_is_skipped() {
        let doc = lopdf::Document::with_version("1.5");
        let mut recorder = Recorder::default();
        let options = ExtractOptions {
            max_stream_bytes: 4,
            ..ExtractOptions::default()
        };
        interpret_content_stream(
            &doc,
            b"BT /F1 10 Tf (abc) Tj ET",
            &helvetica_resources(),
            &mut recorder,
            &options,
            0,
            &mut GraphicsStack::new(),
            &mut TextState::new(),
        )
        .unwrap();
        assert!(recorder.runs.is_empty());
        assert_eq!(
            recorder.warnings[0].code,
            ExtractWarningCode::ResourceLimitReached
        );
    }

    #[test]
    fn form_xobject_is_interpreted() {
        let mut doc = lopdf::Document::with_version("1.5");
        let form = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => [0, 0, 100, 100].map(Object::Integer).to_vec(),
                "Matrix" => [1, 0, 0, 1, 10, 20].map(Object::Integer).to_vec(),
            },
            b"BT /F1 10 Tf (form) Tj ET".to_vec(),
        ));
        let mut resources = helvetica_resources();
        resources.set("XObject", dictionary! { "Fm1" => form });
        let recorder = run_stream(&doc, b"q /Fm1 Do Q BT /F1 10 Tf (page) Tj ET", &resources);
        assert_eq!(recorder.runs.len(), 2);
        assert_eq!(recorder.runs[0].text, "form");
        assert_approx(recorder.runs[0].x, 10.0);
        assert_approx(recorder.runs[0].y, 20.0);
        assert_approx(recorder.runs[1].x, 0.0);
    }

    #[test]
    fn self_referencing_form_stops_at_depth_limit() {
        let mut doc = lopdf::Document::with_version("1.5");
        let form_id = doc.new_object_id();
        let form_resources = dictionary! {
            "XObject" => dictionary! { "Fm1" => form_id },
        };
        doc.objects.insert(
            form_id,
            Object::Stream(Stream::new(
                dictionary! {
                    "Subtype" => "Form",
                    "Resources" => form_resources,
                },
                b"/Fm1 Do".to_vec(),
            )),
        );
        let resources = dictionary! {
            "XObject" => dictionary! { "Fm1" => form_id },
        };
        let recorder = run_stream(&doc, b"/Fm1 Do", &resources);
        assert_eq!(recorder.warnings.len(), 1);
        assert_eq!(
            recorder.warnings[0].code,
            ExtractWarningCode::ResourceLimitReached
        );
    }

    #[test]
    fn unmapped_identity_glyphs_warn_once_per_font() {
        let doc = lopdf::Document::with_version("1.5");
        let resources = dictionary! {
            "Font" => dictionary! {
                "F2" => dictionary! {
                    "Subtype" => "Type0",
                    "Encoding" => "Identity-H",
                },
            },
        };
        let recorder = run_stream(
            &doc,
            b"BT /F2 10 Tf <0102> Tj <0304> Tj ET",
            &resources,
        );
        assert_eq!(recorder.runs.len(), 2);
        assert_eq!(recorder.runs[0].text, "\u{FFFD}");
        assert_eq!(recorder.warnings.len(), 1);
        assert_eq!(
            recorder.warnings[0].code,
            ExtractWarningCode::EncodingFallback
        );
    }
}
