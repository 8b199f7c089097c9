use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::line::LineKind;
use crate::model::ModelText;

/// Drawing type of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectType {
    Closed,
    Open,
    Scattered,
}

/// Classify an object from the two lines that follow its first `color` line.
///
/// `open` marks an open object and `open` followed by `scattered` a scattered
/// one; anything else is closed. The toolkit always writes these flags right
/// after the color, so no other position is inspected.
pub fn classify(model: &ModelText) -> ObjectType {
    let mut kinds = model
        .kinds()
        .skip_while(|kind| !matches!(kind, LineKind::Color { .. }))
        .skip(1);

    match (kinds.next(), kinds.next()) {
        (Some(LineKind::Open), Some(LineKind::Scattered)) => ObjectType::Scattered,
        (Some(LineKind::Open), _) => ObjectType::Open,
        _ => ObjectType::Closed,
    }
}
