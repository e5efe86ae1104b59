//! Text and graphics state for the content stream interpreter.
//!
//! Implements the parts of the PDF graphics model that move text around:
//! the current transformation matrix (cm, q/Q), text objects (BT/ET), the
//! text and line matrices (Tm, Td, TD, T*) and the text state parameters
//! (Tc, Tw, Tz, TL, Tf, Ts).

/// A 2D affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Build a matrix from six numbers, as found in `cm`, `Tm` or `/Matrix`.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// Text state parameters saved and restored by `q`/`Q`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStateSnapshot {
    pub char_spacing: f64,
    pub word_spacing: f64,
    pub h_scaling: f64,
    pub leading: f64,
    pub font_name: String,
    pub font_size: f64,
    pub rise: f64,
}

/// Text state tracked during content stream interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Character spacing (Tc), added after every glyph.
    pub char_spacing: f64,
    /// Word spacing (Tw), added after single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (Tz) as a percentage.
    pub h_scaling: f64,
    /// Leading (TL) used by `T*`, `'` and `"`.
    pub leading: f64,
    /// Font resource name selected by Tf.
    pub font_name: String,
    pub font_size: f64,
    /// Text rise (Ts).
    pub rise: f64,
    in_text_object: bool,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextState {
    pub fn new() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
            in_text_object: false,
            text_matrix: Matrix::identity(),
            line_matrix: Matrix::identity(),
        }
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Matrix {
        &self.text_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `BT`: reset the text and line matrices.
    pub fn begin_text(&mut self) {
        self.text_matrix = Matrix::identity();
        self.line_matrix = Matrix::identity();
        self.in_text_object = true;
    }

    /// `ET`.
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    /// `Tf`.
    pub fn set_font(&mut self, font_name: String, font_size: f64) {
        self.font_name = font_name;
        self.font_size = font_size;
    }

    /// `Tm`: replace both the text matrix and the line matrix.
    pub fn set_text_matrix(&mut self, matrix: Matrix) {
        self.text_matrix = matrix;
        self.line_matrix = matrix;
    }

    /// `Td`: offset the start of the next line from the start of the current one.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: same as `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: same as `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Move the text matrix right by `tx` text-space units after showing glyphs.
    pub fn advance_text_position(&mut self, tx: f64) {
        self.text_matrix = Matrix::translation(tx, 0.0).concat(&self.text_matrix);
    }

    /// Origin of the next glyph in user space, rise included.
    pub fn origin(&self, ctm: &Matrix) -> (f64, f64) {
        self.text_matrix
            .concat(ctm)
            .transform_point(0.0, self.rise)
    }

    pub fn save_snapshot(&self) -> TextStateSnapshot {
        TextStateSnapshot {
            char_spacing: self.char_spacing,
            word_spacing: self.word_spacing,
            h_scaling: self.h_scaling,
            leading: self.leading,
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            rise: self.rise,
        }
    }

    pub fn restore_snapshot(&mut self, snapshot: TextStateSnapshot) {
        self.char_spacing = snapshot.char_spacing;
        self.word_spacing = snapshot.word_spacing;
        self.h_scaling = snapshot.h_scaling;
        self.leading = snapshot.leading;
        self.font_name = snapshot.font_name;
        self.font_size = snapshot.font_size;
        self.rise = snapshot.rise;
    }
}

/// The `q`/`Q` stack: CTM plus the text state parameters of each level.
#[derive(Debug, Default)]
pub struct GraphicsStack {
    ctm: Matrix,
    saved: Vec<(Matrix, TextStateSnapshot)>,
}

impl GraphicsStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctm(&self) -> &Matrix {
        &self.ctm
    }

    /// `cm`: premultiply the CTM.
    pub fn concat_matrix(&mut self, matrix: &Matrix) {
        self.ctm = matrix.concat(&self.ctm);
    }

    /// `q`.
    pub fn save(&mut self, text: &TextState) {
        self.saved.push((self.ctm, text.save_snapshot()));
    }

    /// `Q`; an unbalanced `Q` is ignored.
    pub fn restore(&mut self, text: &mut TextState) {
        if let Some((ctm, snapshot)) = self.saved.pop() {
            self.ctm = ctm;
            text.restore_snapshot(snapshot);
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
