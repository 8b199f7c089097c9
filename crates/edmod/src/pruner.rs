use ascii_model::{Line, LineKind, ModelText};
use serde::Serialize;

/// Drop every contour with `point_count <= max_points`.
///
/// A dropped contour takes all of its following lines with it, up to the next
/// `contour` line. Surviving contours are renumbered to close the gaps and,
/// when anything was dropped, the first `object` line's contour count is
/// reduced accordingly. Returns the number of contours dropped.
pub fn prune_contours(model: &mut ModelText, max_points: usize) -> usize {
    let lines = model.take_lines();
    let mut kept: Vec<Line> = Vec::with_capacity(lines.len());
    let mut removed = 0usize;
    let mut dropping = false;

    for line in lines {
        let point_count = match line.kind() {
            LineKind::Contour { point_count, .. } => Some(*point_count),
            _ => None,
        };
        match point_count {
            Some(points) if points <= max_points => {
                removed += 1;
                dropping = true;
            }
            Some(_) => {
                dropping = false;
                kept.push(renumber(line, removed));
            }
            None if dropping => {}
            None => kept.push(line),
        }
    }

    model.set_lines(kept);

    if removed > 0 {
        let mut updated = false;
        model.replace_with(|_, kind| match kind {
            LineKind::Object {
                index,
                contour_count,
                rest,
            } if !updated => {
                updated = true;
                Some(LineKind::Object {
                    index: *index,
                    contour_count: contour_count.saturating_sub(removed),
                    rest: rest.clone(),
                })
            }
            _ => None,
        });
    }

    removed
}

fn renumber(line: Line, removed: usize) -> Line {
    if removed == 0 {
        return line;
    }
    if let LineKind::Contour {
        index,
        flag,
        point_count,
        rest,
    } = line.kind()
    {
        return Line::from_kind(LineKind::Contour {
            index: index - removed as i64,
            flag: flag.clone(),
            point_count: *point_count,
            rest: rest.clone(),
        });
    }
    line
}

/// Rule for removing whole objects by their contour count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalRule {
    /// Remove objects without contours
    Empty,
    /// Remove objects with at most this many contours
    AtMostContours(usize),
}

impl RemovalRule {
    pub fn removes(&self, contour_count: usize) -> bool {
        match *self {
            RemovalRule::Empty => contour_count == 0,
            RemovalRule::AtMostContours(limit) => contour_count <= limit,
        }
    }
}

/// Which objects a [`RemovalRule`] is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RemovalScope {
    /// Only objects still selected after name and color matching
    #[default]
    Selected,
    /// Every object in the model, ignoring the selection
    AllObjects,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_with_contours(point_counts: &[usize]) -> String {
        let mut text = format!("object 0 {} 0\nname Cell\ncolor 1 0 0 0\n", point_counts.len());
        for (i, count) in point_counts.iter().enumerate() {
            text.push_str(&format!("contour {} 0 {}\n", i + 1, count));
            for p in 0..*count {
                text.push_str(&format!("{} {} {}\n", i, p, 0));
            }
        }
        text
    }

    fn contours(model: &ModelText) -> Vec<(i64, usize)> {
        model
            .kinds()
            .filter_map(|kind| match kind {
                LineKind::Contour { index, point_count, .. } => Some((*index, *point_count)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_small_contours_are_dropped_and_renumbered() {
        let mut model = ModelText::parse(&object_with_contours(&[5, 1, 3, 0, 7]));
        let removed = prune_contours(&mut model, 1);

        assert_eq!(removed, 2);
        assert_eq!(contours(&model), vec![(1, 5), (2, 3), (3, 7)]);
        assert_eq!(model.contour_count().unwrap(), 3);
        assert!(model.to_string().starts_with("object 0 3 0\n"));
    }

    #[test]
    fn test_points_of_dropped_contours_go_too() {
        let mut model = ModelText::parse(&object_with_contours(&[2, 1, 2]));
        prune_contours(&mut model, 1);
        let text = model.to_string();
        // contour 2 had the single point "1 0 0"
        assert!(!text.contains("\n1 0 0\n"));
        assert!(text.contains("\n2 1 0\n"));
        assert_eq!(text.lines().count(), 3 + 2 * 3);
    }

    #[test]
    fn test_nothing_to_prune_leaves_text_untouched() {
        let original = object_with_contours(&[4, 5]);
        let mut model = ModelText::parse(&original);
        assert_eq!(prune_contours(&mut model, 3), 0);
        assert_eq!(model.to_string(), original);
    }

    #[test]
    fn test_all_contours_pruned() {
        let mut model = ModelText::parse(&object_with_contours(&[1, 0]));
        assert_eq!(prune_contours(&mut model, 1), 2);
        assert_eq!(model.contour_count().unwrap(), 0);
        assert!(contours(&model).is_empty());
    }

    #[test]
    fn test_removal_rules() {
        assert!(RemovalRule::Empty.removes(0));
        assert!(!RemovalRule::Empty.removes(1));
        assert!(RemovalRule::AtMostContours(2).removes(2));
        assert!(!RemovalRule::AtMostContours(2).removes(3));
    }
}
