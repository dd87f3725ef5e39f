//! Routes with `{field}` placeholders filled from the payload,
//! e.g. `groups/{group_id}/members`.

use regex::Regex;
use serde_json::Value;
use url::form_urlencoded;

use super::{Payload, RequestError};

/// Substitutes each of `segment_fields` into `route`, removing the field from
/// `payload`.
///
/// Some backend routes address a parent row in the path rather than in the
/// body (`groups/{group_id}/members`). The table's draft still carries that
/// column like any other, and this moves it from the payload into the path.
///
/// # Arguments
/// * `route` - The configured route, possibly with `{field}` placeholders.
/// * `payload` - The payload to send; listed fields are taken out of it.
/// * `segment_fields` - The fields that fill placeholders.
///
/// # Returns
/// The route with every placeholder filled, each value percent-encoded as a
/// single path segment. [`RequestError::MissingSegment`] when a listed field
/// is absent from the payload, [`RequestError::UnresolvedPlaceholder`] when a
/// placeholder is left over.
pub fn expand_route(
    route: &str,
    payload: &mut Payload,
    segment_fields: &[String],
) -> Result<String, RequestError> {
    let mut expanded = route.to_string();
    for field in segment_fields {
        let value = payload
            .remove(field)
            .ok_or_else(|| RequestError::MissingSegment(field.clone()))?;
        let raw = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        expanded = expanded.replace(&format!("{{{field}}}"), &encode_segment(&raw));
    }

    let placeholder = Regex::new(r"\{[^{}/]+\}").unwrap();
    if placeholder.is_match(&expanded) {
        return Err(RequestError::UnresolvedPlaceholder(route.to_string()));
    }
    Ok(expanded)
}

fn encode_segment(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
