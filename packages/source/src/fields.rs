//! Prioritized field lookup over raw feature properties.
//!
//! Upstream feeds rename fields between sources and record vintages. Each
//! canonical [`FireField`] owns an ordered list of candidate keys; the first
//! candidate present with a non-empty value wins.

use fire_map_fire_models::RawProperties;
use serde_json::Value;
use strum_macros::Display;

/// A canonical fire attribute that may appear under several raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FireField {
    Id,
    Name,
    Status,
    Area,
    Containment,
    Detected,
    Extinguished,
    FetchedAt,
    Cause,
}

impl FireField {
    /// Candidate keys in priority order.
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Id => &["FIRE_ID", "FIRE_NUMBER", "ID", "OBJECTID"],
            Self::Name => &["FIRE_NAME", "NAME"],
            Self::Status => &["FIRE_STAT_DESC_E"],
            Self::Area => &["FIRE_SIZE", "SIZE_HA", "AREA"],
            Self::Containment => &[
                "PCT_CONTAINED",
                "PERCENT_CONTAINED",
                "CONTAINMENT_PCT",
                "CONTAINED_PCT",
                "PCTCONTAINED",
                "CONTAINMENT",
                "CONTAINMENT_PERCENT",
            ],
            Self::Detected => &[
                "TIME_DETECTED",
                "DATE_DETECTED",
                "DETECTED",
                "FIRE_START_DATE",
                "START_DATE",
            ],
            Self::Extinguished => &[
                "FIRE_OUT_DATE",
                "OUT_DATE",
                "DATE_OUT",
                "DATE_EXTINGUISHED",
                "OUT_TIME",
                "EXTINGUISHED",
                "FIRE_STAT_DATE",
            ],
            Self::FetchedAt => &[
                "FETCHED_FROM_ERD",
                "FETCHED_FROM_GNB",
                "GNB_FETCHED",
                "GNB_RETRIEVED_AT",
                "RETRIEVED_FROM_GNB",
                "FETCHED_AT",
                "FETCH_TIMESTAMP",
                "SOURCE_FETCHED_AT",
                "ERD_FETCHED_AT",
            ],
            Self::Cause => &[
                "FIRE_CAUSE",
                "CAUSE",
                "GENERAL_CAUSE",
                "CAUSE_DESC",
                "FIRE_CAUSE_DESC_E",
            ],
        }
    }
}

/// Returns the first key in `keys` whose value in `props` is present:
/// not missing, not `null`, and not the empty string. `0` and `false` are
/// present.
#[must_use]
pub fn first_present<'p, 'k>(
    props: &'p RawProperties,
    keys: &[&'k str],
) -> Option<(&'k str, &'p Value)> {
    keys.iter().find_map(|&key| {
        let value = props.get(key)?;
        is_present(value).then_some((key, value))
    })
}

/// [`first_present`] over a [`FireField`]'s candidate list.
#[must_use]
pub fn extract(props: &RawProperties, field: FireField) -> Option<(&'static str, &Value)> {
    first_present(props, field.candidates())
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Coerces a number or numeric string (optionally suffixed with `%`) to a
/// finite `f64`.
#[must_use]
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            s.strip_suffix('%').unwrap_or(s).trim().parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Renders a scalar value as text. Integral numbers render without a
/// fractional part so that `42` and `42.0` yield the same identifier.
#[must_use]
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub(crate) fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
