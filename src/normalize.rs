//! Field normalization rules applied during transformation.

use crate::frame::Value;

/// Lower-case a room type and collapse `_`, `-` and whitespace runs into
/// single spaces. Null passes through untouched, as does any non-text cell.
pub fn standardize_room_type(value: &Value) -> Value {
    let text = match value {
        Value::Text(s) => s,
        _ => return value.clone(),
    };
    let lowered = text.to_lowercase().replace(['_', '-'], " ");
    Value::Text(lowered.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Canonicalize an Indonesian phone number to `+62-` form.
///
/// The cell is stringified first (a phone number that lost its formatting
/// upstream can arrive as a plain integer). A `62` prefix becomes `+62-`, a
/// leading `0` is replaced by `+62-`, and anything else passes through
/// unchanged - including values already in canonical form and numbers with
/// foreign prefixes, which carry no country-code assumption.
pub fn format_phone_number(value: &Value) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    let text = value.to_string();
    if let Some(rest) = text.strip_prefix("62") {
        Value::Text(format!("+62-{rest}"))
    } else if let Some(rest) = text.strip_prefix('0') {
        Value::Text(format!("+62-{rest}"))
    } else {
        Value::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_standardize_room_type() {
        assert_eq!(standardize_room_type(&text("Single Earth")), text("single earth"));
        assert_eq!(standardize_room_type(&text("single-earth")), text("single earth"));
        assert_eq!(standardize_room_type(&text("SINGLE EARTH")), text("single earth"));
        assert_eq!(standardize_room_type(&text("single_earth")), text("single earth"));
        assert_eq!(standardize_room_type(&text("SINGLE-EARTH")), text("single earth"));
        assert_eq!(standardize_room_type(&Value::Null), Value::Null);
    }

    #[test]
    fn test_standardize_room_type_collapses_whitespace() {
        assert_eq!(
            standardize_room_type(&text("  Double__Ocean -View ")),
            text("double ocean view")
        );
    }

    #[test]
    fn test_standardize_room_type_is_idempotent() {
        for input in [text("Single_Earth"), text("  SUITE--deluxe "), Value::Null] {
            let once = standardize_room_type(&input);
            assert_eq!(standardize_room_type(&once), once);
        }
    }

    #[test]
    fn test_format_phone_number() {
        assert_eq!(format_phone_number(&text("08123456789")), text("+62-8123456789"));
        assert_eq!(format_phone_number(&text("628123456789")), text("+62-8123456789"));
        assert_eq!(format_phone_number(&text("+62-8123456789")), text("+62-8123456789"));
        // No hyphen and no recognized prefix: left alone.
        assert_eq!(format_phone_number(&text("+628123456789")), text("+628123456789"));
        assert_eq!(format_phone_number(&text("123456789")), text("123456789"));
        assert_eq!(format_phone_number(&Value::Null), Value::Null);
    }

    #[test]
    fn test_format_phone_number_stringifies_numeric_cells() {
        assert_eq!(
            format_phone_number(&Value::Int(628123456789)),
            text("+62-8123456789")
        );
    }

    #[test]
    fn test_format_phone_number_is_idempotent_on_canonical_values() {
        for input in [text("+62-8123456789"), text("123456789"), Value::Null] {
            let once = format_phone_number(&input);
            assert_eq!(format_phone_number(&once), once);
        }
    }
}
