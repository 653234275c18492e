//! Raw request data → the exact ordered feature vector the model expects.
//!
//! The steps here mirror the training pipeline and run in a fixed order:
//! derive `volume` from the physical dimensions, discard the columns the
//! model never sees, encode the categorical grades to their ordinal ranks,
//! then select the trained columns in their trained order.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("missing required feature: {0}")]
    MissingFeature(String),

    #[error("unknown {field} label: {value:?}")]
    UnknownLabel { field: &'static str, value: String },
}

/// One prediction request as submitted by a caller.
///
/// Every field is optional at the type level; whether an absence is fatal is
/// decided by the selection step against the trained feature list, not here.
/// Unknown JSON keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub carat: Option<f64>,
    pub cut: Option<String>,
    pub color: Option<String>,
    pub clarity: Option<String>,
    pub depth: Option<f64>,
    pub table: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

/// Ordinal rank of a cut grade, worst to best.
pub fn cut_rank(label: &str) -> Option<f64> {
    match label {
        "Fair" => Some(1.0),
        "Good" => Some(2.0),
        "Very Good" => Some(3.0),
        "Premium" => Some(4.0),
        "Ideal" => Some(5.0),
        _ => None,
    }
}

/// Ordinal rank of a color grade. D is colorless; ranks grow as the stone
/// yellows toward J.
pub fn color_rank(label: &str) -> Option<f64> {
    match label {
        "D" => Some(1.0),
        "E" => Some(2.0),
        "F" => Some(3.0),
        "G" => Some(4.0),
        "H" => Some(5.0),
        "I" => Some(6.0),
        "J" => Some(7.0),
        _ => None,
    }
}

/// Ordinal rank of a clarity grade, internally-flawless down to included.
pub fn clarity_rank(label: &str) -> Option<f64> {
    match label {
        "IF" => Some(1.0),
        "VVS1" => Some(2.0),
        "VVS2" => Some(3.0),
        "VS1" => Some(4.0),
        "VS2" => Some(5.0),
        "SI1" => Some(6.0),
        "SI2" => Some(7.0),
        "I1" => Some(8.0),
        _ => None,
    }
}

fn encode(
    field: &'static str,
    label: &str,
    lookup: fn(&str) -> Option<f64>,
) -> Result<f64, TransformError> {
    lookup(label).ok_or_else(|| TransformError::UnknownLabel {
        field,
        value: label.to_string(),
    })
}

/// Build the ordered feature vector named by `feature_cols`.
///
/// An unrecognized categorical label is a hard error rather than a silent
/// null: a null would only surface later as a garbage prediction. A column
/// named by `feature_cols` but absent from the record is also a hard error,
/// the last line of defense before the model call.
pub fn transform(record: &RawRecord, feature_cols: &[String]) -> Result<Vec<f64>, TransformError> {
    let mut working: BTreeMap<&str, f64> = BTreeMap::new();

    if let Some(v) = record.carat {
        working.insert("carat", v);
    }
    if let Some(v) = record.table {
        working.insert("table", v);
    }

    // volume supersedes the raw dimensions; x/y/z (and the unused depth)
    // never reach the model. Any missing dimension just means no volume.
    if let (Some(x), Some(y), Some(z)) = (record.x, record.y, record.z) {
        working.insert("volume", x * y * z);
    }

    if let Some(label) = record.cut.as_deref() {
        working.insert("cut", encode("cut", label, cut_rank)?);
    }
    if let Some(label) = record.color.as_deref() {
        working.insert("color", encode("color", label, color_rank)?);
    }
    if let Some(label) = record.clarity.as_deref() {
        working.insert("clarity", encode("clarity", label, clarity_rank)?);
    }

    feature_cols
        .iter()
        .map(|name| {
            working
                .get(name.as_str())
                .copied()
                .ok_or_else(|| TransformError::MissingFeature(name.clone()))
        })
        .collect()
}
