/// Whether a caller-supplied text field counts as present.
///
/// A field is empty when it is absent, zero-length, or the literal string
/// "null". The last case comes from upstream clients that serialize missing
/// form values as the string "null"; it is an intentional part of the input
/// contract, not a typo.
pub fn has_text(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(s) => !s.is_empty() && s != "null",
    }
}

/// Unwrap a required text field, or report which field was invalid.
pub fn require_text(value: Option<&str>, field: &str) -> Result<String, String> {
    if has_text(value) {
        Ok(value.unwrap_or_default().to_string())
    } else {
        Err(format!("invalid {field}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_empty_and_literal_null_are_rejected() {
        assert!(!has_text(None));
        assert!(!has_text(Some("")));
        assert!(!has_text(Some("null")));
    }

    #[test]
    fn ordinary_text_passes() {
        assert!(has_text(Some("Dolomites")));
        // only the exact literal is special
        assert!(has_text(Some("NULL")));
        assert!(has_text(Some("nullish")));
    }

    #[test]
    fn require_text_names_the_field() {
        assert_eq!(
            require_text(Some("null"), "title"),
            Err("invalid title".to_string())
        );
        assert_eq!(require_text(Some("Alfama"), "title"), Ok("Alfama".to_string()));
    }
}
