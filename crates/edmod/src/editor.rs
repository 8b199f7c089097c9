use ascii_model::{LineKind, ModelText};
use modkit_common::{CommonError, Rgb};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Requested output color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorEdit {
    Fixed(Rgb),
    /// A fresh random color for every color line
    Random,
}

impl ColorEdit {
    /// Parse `R,G,B`, `rand` or `random`
    pub fn parse(input: &str) -> Result<Self, CommonError> {
        match input.trim() {
            "rand" | "random" => Ok(ColorEdit::Random),
            other => Rgb::parse_csv(other).map(ColorEdit::Fixed),
        }
    }
}

/// Field values to write into every edited object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEdits {
    pub name: Option<String>,
    pub color: Option<ColorEdit>,
    /// Transparency in percent, 0 is opaque
    pub transparency: Option<u32>,
    pub line_width: Option<u32>,
    /// `Some(true)` for filled, `Some(false)` for not filled
    pub fill: Option<bool>,
    pub point_size: Option<u32>,
}

impl FieldEdits {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.color.is_none()
            && self.transparency.is_none()
            && self.line_width.is_none()
            && self.fill.is_none()
            && self.point_size.is_none()
    }
}

/// Rewrites object fields in a text model
pub struct FieldEditor {
    edits: FieldEdits,
    rng: StdRng,
}

impl FieldEditor {
    /// A seed makes random colors reproducible
    pub fn new(edits: FieldEdits, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { edits, rng }
    }

    /// Apply the edits to every matching line, returning how many lines changed
    pub fn apply(&mut self, model: &mut ModelText) -> usize {
        model.replace_with(|_, kind| self.edit_line(kind))
    }

    fn edit_line(&mut self, kind: &LineKind) -> Option<LineKind> {
        match kind {
            LineKind::Name(_) => self.edits.name.clone().map(LineKind::Name),
            LineKind::Color { rgb, transparency } => self.edit_color(*rgb, *transparency),
            LineKind::Width2D(_) => self.edits.line_width.map(LineKind::Width2D),
            LineKind::SymFlags(_) => self.edits.fill.map(|filled| LineKind::SymFlags(u32::from(filled))),
            LineKind::PointSize(_) => self.edits.point_size.map(LineKind::PointSize),
            _ => None,
        }
    }

    fn edit_color(&mut self, rgb: Rgb, transparency: Option<f64>) -> Option<LineKind> {
        if self.edits.color.is_none() && self.edits.transparency.is_none() {
            return None;
        }

        let rgb = match self.edits.color {
            Some(ColorEdit::Fixed(color)) => color,
            Some(ColorEdit::Random) => self.random_color(),
            None => rgb,
        };
        let transparency = self.edits.transparency.map(f64::from).or(transparency);

        Some(LineKind::Color { rgb, transparency })
    }

    fn random_color(&mut self) -> Rgb {
        let mut component = || (self.rng.gen_range(0.0..1.0_f64) * 100.0).round() / 100.0;
        Rgb::new(component(), component(), component())
    }
}
