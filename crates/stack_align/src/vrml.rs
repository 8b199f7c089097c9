use modkit_common::Xyz;
use serde::Serialize;

/// Maps model coordinates onto the image stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneTransform {
    /// Pixel spacing of the stack
    pub scale: Xyz,
    pub origin: Xyz,
    /// Z scale recorded in the model header
    pub model_z_scale: f64,
}

impl SceneTransform {
    pub fn apply(&self, point: Xyz) -> Xyz {
        Xyz::new(
            point.x * self.scale.x + self.origin.x,
            point.y * self.scale.y + self.origin.y,
            point.z * self.scale.z / self.model_z_scale + self.origin.z,
        )
    }
}

/// Rewrite the coordinates of every `point [ ... ]` block of a VRML scene.
///
/// Coordinate lines keep their indentation and are written with one decimal
/// and a trailing comma. Lines inside a block that are not three numbers, and
/// everything outside the blocks, are copied unchanged. Returns the new text
/// and the number of points rewritten.
pub fn rewrite_scene(scene: &str, transform: &SceneTransform) -> (String, usize) {
    let mut out = String::with_capacity(scene.len());
    let mut in_points = false;
    let mut rewritten = 0;

    for line in scene.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("point") {
            in_points = true;
        } else if trimmed.starts_with(']') {
            in_points = false;
        } else if in_points {
            if let Some(point) = parse_point(trimmed) {
                let indent = &line[..line.len() - trimmed.len()];
                let p = transform.apply(point);
                out.push_str(&format!("{indent}{:.1} {:.1} {:.1},", p.x, p.y, p.z));
                if line.ends_with('\n') {
                    out.push('\n');
                }
                rewritten += 1;
                continue;
            }
        }
        out.push_str(line);
    }

    (out, rewritten)
}

/// `x y z,` with or without the trailing comma
fn parse_point(text: &str) -> Option<Xyz> {
    let mut values = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|v| !v.is_empty())
        .map(str::parse::<f64>);

    let point = Xyz::new(values.next()?.ok()?, values.next()?.ok()?, values.next()?.ok()?);
    match values.next() {
        None => Some(point),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = "#VRML V2.0 utf8
Transform {
  children [
    Shape {
      geometry IndexedFaceSet {
        coord Coordinate {
          point [
            1 2 4,
            10.5 0 8,
          ]
        }
        coordIndex [
          0, 1, 2, -1,
        ]
      }
    }
  ]
}
";

    fn transform() -> SceneTransform {
        SceneTransform {
            scale: Xyz::new(2.0, 3.0, 10.0),
            origin: Xyz::new(100.0, -50.0, 0.5),
            model_z_scale: 2.0,
        }
    }

    #[test]
    fn test_point_transform() {
        let p = transform().apply(Xyz::new(1.0, 2.0, 4.0));
        assert_eq!(p, Xyz::new(102.0, -44.0, 20.5));
    }

    #[test]
    fn test_points_are_rewritten_in_place() {
        let (out, rewritten) = rewrite_scene(SCENE, &transform());
        assert_eq!(rewritten, 2);
        assert!(out.contains("\n            102.0 -44.0 20.5,\n"));
        assert!(out.contains("\n            121.0 -50.0 40.5,\n"));
        assert_eq!(out.lines().count(), SCENE.lines().count());
    }

    #[test]
    fn test_lines_outside_point_blocks_are_untouched() {
        let (out, _) = rewrite_scene(SCENE, &transform());
        assert!(out.contains("          0, 1, 2, -1,\n"));
        assert!(out.starts_with("#VRML V2.0 utf8\nTransform {\n"));
        assert!(out.ends_with("  ]\n}\n"));
    }

    #[test]
    fn test_unparseable_lines_pass_through() {
        let scene = "point [\n  1 2\n  a b c,\n  1 2 3 4,\n  0 0 0\n]\n";
        let (out, rewritten) = rewrite_scene(scene, &transform());
        assert_eq!(rewritten, 1);
        assert_eq!(
            out,
            "point [\n  1 2\n  a b c,\n  1 2 3 4,\n  100.0 -50.0 0.5,\n]\n"
        );
    }

    #[test]
    fn test_missing_final_newline() {
        let (out, _) = rewrite_scene("point [\n 1 1 1,", &transform());
        assert_eq!(out, "point [\n 102.0 -47.0 5.5,");
    }
}
