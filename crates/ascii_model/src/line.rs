use std::fmt;

use modkit_common::{Rgb, Xyz};

/// Parsed payload of one line of a text model.
///
/// The kind is decided by the first whitespace separated token of the line.
/// Lines with an unknown tag, or a known tag whose values do not parse, are
/// kept as [`LineKind::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `imod <objectCount>`
    Imod { object_count: usize },
    /// `units <unit>`
    Units(String),
    /// `scale <x> <y> <z>`
    Scale(Xyz),
    /// `pixsize <size>`
    PixSize(f64),
    /// `name <free text>`
    Name(String),
    /// `color <r> <g> <b> [transparency]`
    Color { rgb: Rgb, transparency: Option<f64> },
    Open,
    Scattered,
    /// `width2D <width>`
    Width2D(u32),
    /// `symflags <flags>`
    SymFlags(u32),
    /// `pointsize <size>`
    PointSize(u32),
    /// `object <index> <contourCount> ...`
    Object {
        index: i64,
        contour_count: usize,
        rest: Vec<String>,
    },
    /// `contour <index> <flag> <pointCount> ...`
    Contour {
        index: i64,
        flag: String,
        point_count: usize,
        rest: Vec<String>,
    },
    Other,
}

impl LineKind {
    pub fn parse(text: &str) -> Self {
        let mut tokens = text.split_whitespace();
        let Some(tag) = tokens.next() else {
            return LineKind::Other;
        };
        let values: Vec<&str> = tokens.collect();
        Self::parse_tagged(tag, &values, text).unwrap_or(LineKind::Other)
    }

    fn parse_tagged(tag: &str, values: &[&str], text: &str) -> Option<Self> {
        let kind = match tag {
            "imod" => LineKind::Imod {
                object_count: values.first()?.parse().ok()?,
            },
            "units" => LineKind::Units(values.first()?.to_string()),
            "scale" => {
                let [x, y, z] = floats::<3>(values)?;
                LineKind::Scale(Xyz::new(x, y, z))
            }
            "pixsize" => LineKind::PixSize(values.first()?.parse().ok()?),
            "name" => {
                let name = text.trim_start().strip_prefix("name")?;
                LineKind::Name(name.trim().to_string())
            }
            "color" => {
                if values.len() != 3 && values.len() != 4 {
                    return None;
                }
                let [r, g, b] = floats::<3>(&values[..3])?;
                let transparency = match values.get(3) {
                    Some(value) => Some(value.parse().ok()?),
                    None => None,
                };
                LineKind::Color {
                    rgb: Rgb::new(r, g, b),
                    transparency,
                }
            }
            "open" => LineKind::Open,
            "scattered" => LineKind::Scattered,
            "width2D" => LineKind::Width2D(values.first()?.parse().ok()?),
            "symflags" => LineKind::SymFlags(values.first()?.parse().ok()?),
            "pointsize" => LineKind::PointSize(values.first()?.parse().ok()?),
            "object" => LineKind::Object {
                index: values.first()?.parse().ok()?,
                contour_count: values.get(1)?.parse().ok()?,
                rest: owned(&values[2..]),
            },
            "contour" => LineKind::Contour {
                index: values.first()?.parse().ok()?,
                flag: values.get(1)?.to_string(),
                point_count: values.get(2)?.parse().ok()?,
                rest: owned(&values[3..]),
            },
            _ => return None,
        };
        Some(kind)
    }
}

fn floats<const N: usize>(values: &[&str]) -> Option<[f64; N]> {
    if values.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.parse().ok()?;
    }
    Some(out)
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn with_rest(f: &mut fmt::Formatter<'_>, rest: &[String]) -> fmt::Result {
    for value in rest {
        write!(f, " {value}")?;
    }
    Ok(())
}

/// Renders the canonical text of a line kind. [`LineKind::Other`] carries no
/// payload and renders as an empty string.
impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Imod { object_count } => write!(f, "imod {object_count}"),
            LineKind::Units(units) => write!(f, "units {units}"),
            LineKind::Scale(s) => write!(f, "scale {} {} {}", s.x, s.y, s.z),
            LineKind::PixSize(size) => write!(f, "pixsize {size}"),
            LineKind::Name(name) => write!(f, "name {name}"),
            LineKind::Color { rgb, transparency } => {
                write!(f, "color {} {} {}", rgb.r, rgb.g, rgb.b)?;
                if let Some(t) = transparency {
                    write!(f, " {t}")?;
                }
                Ok(())
            }
            LineKind::Open => write!(f, "open"),
            LineKind::Scattered => write!(f, "scattered"),
            LineKind::Width2D(width) => write!(f, "width2D {width}"),
            LineKind::SymFlags(flags) => write!(f, "symflags {flags}"),
            LineKind::PointSize(size) => write!(f, "pointsize {size}"),
            LineKind::Object {
                index,
                contour_count,
                rest,
            } => {
                write!(f, "object {index} {contour_count}")?;
                with_rest(f, rest)
            }
            LineKind::Contour {
                index,
                flag,
                point_count,
                rest,
            } => {
                write!(f, "contour {index} {flag} {point_count}")?;
                with_rest(f, rest)
            }
            LineKind::Other => Ok(()),
        }
    }
}

/// One line of a text model: its parsed kind and its exact text.
///
/// Lines read from a file keep their original text; lines built from a kind
/// get the canonical rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    kind: LineKind,
    text: String,
}

impl Line {
    pub fn parse(text: &str) -> Self {
        Self {
            kind: LineKind::parse(text),
            text: text.to_string(),
        }
    }

    pub fn from_kind(kind: LineKind) -> Self {
        let text = kind.to_string();
        Self { kind, text }
    }

    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
