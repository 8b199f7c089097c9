use std::fmt;
use std::fs;
use std::path::Path;

use modkit_common::{Rgb, Xyz};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::line::{Line, LineKind};

/// A text model held in memory as an ordered sequence of typed lines.
///
/// Serializing a parsed model reproduces the input exactly, except for the
/// lines that were replaced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelText {
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl ModelText {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(Line::parse).collect(),
            trailing_newline: content.ends_with('\n'),
        }
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::parse(&content);
        debug!("Read {} lines from {}", model.lines.len(), path.display());
        Ok(model)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| ModelError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn kinds(&self) -> impl Iterator<Item = &LineKind> {
        self.lines.iter().map(Line::kind)
    }

    /// Replace the line sequence, keeping the trailing newline convention
    pub fn set_lines(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }

    /// Move the lines out, leaving the model empty until [`ModelText::set_lines`]
    pub fn take_lines(&mut self) -> Vec<Line> {
        std::mem::take(&mut self.lines)
    }

    /// Rewrite every line whose replacement function returns a new kind
    pub fn replace_with<F>(&mut self, mut replace: F) -> usize
    where
        F: FnMut(usize, &LineKind) -> Option<LineKind>,
    {
        let mut replaced = 0;
        for (number, line) in self.lines.iter_mut().enumerate() {
            if let Some(kind) = replace(number + 1, line.kind()) {
                *line = Line::from_kind(kind);
                replaced += 1;
            }
        }
        replaced
    }

    /// Object count declared by the `imod` header line
    pub fn object_count(&self) -> Result<usize> {
        self.kinds()
            .find_map(|kind| match kind {
                LineKind::Imod { object_count } => Some(*object_count),
                _ => None,
            })
            .ok_or(ModelError::MissingField("imod"))
    }

    pub fn units(&self) -> Result<&str> {
        self.kinds()
            .find_map(|kind| match kind {
                LineKind::Units(units) => Some(units.as_str()),
                _ => None,
            })
            .ok_or(ModelError::MissingField("units"))
    }

    pub fn scale(&self) -> Result<Xyz> {
        self.kinds()
            .find_map(|kind| match kind {
                LineKind::Scale(scale) => Some(*scale),
                _ => None,
            })
            .ok_or(ModelError::MissingField("scale"))
    }

    /// First object name in the model
    pub fn name(&self) -> Option<&str> {
        self.kinds().find_map(|kind| match kind {
            LineKind::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// First object color in the model
    pub fn color(&self) -> Option<Rgb> {
        self.kinds().find_map(|kind| match kind {
            LineKind::Color { rgb, .. } => Some(*rgb),
            _ => None,
        })
    }

    /// Contour count declared by the first `object` line
    pub fn contour_count(&self) -> Result<usize> {
        self.kinds()
            .find_map(|kind| match kind {
                LineKind::Object { contour_count, .. } => Some(*contour_count),
                _ => None,
            })
            .ok_or(ModelError::MissingField("object"))
    }

    /// Lines describing the object, i.e. everything before the first contour
    pub fn object_header(&self) -> impl Iterator<Item = &LineKind> {
        self.kinds()
            .take_while(|kind| !matches!(kind, LineKind::Contour { .. }))
    }
}

impl fmt::Display for ModelText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line.text())?;
        }
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str("\n")?;
        }
        Ok(())
    }
}
