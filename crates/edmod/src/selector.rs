use crate::error::{EditError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionItem {
    Single(usize),
    /// Inclusive range with `start < end`
    Range(usize, usize),
}

/// A parsed object list such as `1,3,5-9`.
///
/// Parsing checks syntax only; [`ObjectSelection::expand`] applies the object
/// count once the model header has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSelection {
    items: Vec<SelectionItem>,
}

impl ObjectSelection {
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = || EditError::ObjectList(expr.to_string());

        let items = expr
            .split(',')
            .map(|token| {
                let token = token.trim();
                let item = match token.split_once('-') {
                    Some((low, high)) => {
                        let low = parse_index(low).ok_or_else(invalid)?;
                        let high = parse_index(high).ok_or_else(invalid)?;
                        if low >= high {
                            return Err(invalid());
                        }
                        SelectionItem::Range(low, high)
                    }
                    None => SelectionItem::Single(parse_index(token).ok_or_else(invalid)?),
                };
                Ok(item)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { items })
    }

    /// Object indices in list order, duplicates kept.
    ///
    /// Values at or above `object_count` are dropped without error, so an
    /// over-long range selects whatever part of it is present.
    pub fn expand(&self, object_count: usize) -> Vec<usize> {
        let last = object_count.saturating_sub(1);
        let mut indices = Vec::new();
        for item in &self.items {
            match *item {
                SelectionItem::Single(index) if index < object_count => indices.push(index),
                SelectionItem::Single(_) => {}
                // empty when the whole range lies past the last object
                SelectionItem::Range(low, high) => indices.extend(low..=high.min(last)),
            }
        }
        indices
    }
}

fn parse_index(token: &str) -> Option<usize> {
    match token.trim().parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(index) => Some(index),
    }
}

/// Parse and expand an object list in one step
pub fn select_objects(expr: &str, object_count: usize) -> Result<Vec<usize>> {
    Ok(ObjectSelection::parse(expr)?.expand(object_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_list_is_bounded_by_object_count() {
        assert_eq!(select_objects("2,4-6,10", 8).unwrap(), vec![2, 4, 5, 6]);
    }

    #[test]
    fn test_range_is_truncated_not_rejected() {
        assert_eq!(select_objects("5-12", 8).unwrap(), vec![5, 6, 7]);
        assert_eq!(select_objects("8", 8).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_huge_range_end_is_clamped() {
        assert_eq!(select_objects("1-400000000", 8).unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            select_objects(&format!("6-{}", usize::MAX), 8).unwrap(),
            vec![6, 7]
        );
        assert!(select_objects("9-400000000", 8).unwrap().is_empty());
        assert!(select_objects("1-5", 0).unwrap().is_empty());
    }

    #[test]
    fn test_order_and_duplicates_are_kept() {
        assert_eq!(select_objects("3,1,2-3", 10).unwrap(), vec![3, 1, 2, 3]);
    }

    #[test]
    fn test_descending_range_is_rejected() {
        assert!(matches!(
            select_objects("5-3", 8),
            Err(EditError::ObjectList(expr)) if expr == "5-3"
        ));
        assert!(select_objects("4-4", 8).is_err());
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        assert!(ObjectSelection::parse("a").is_err());
        assert!(ObjectSelection::parse("1,,2").is_err());
        assert!(ObjectSelection::parse("0").is_err());
        assert!(ObjectSelection::parse("1-").is_err());
        assert!(ObjectSelection::parse(" 1 , 3 - 4 ").is_ok());
    }
}
