/// Trim an upstream response body before embedding it in an error message.
pub fn truncate_for_error(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let truncated: String = trimmed.chars().take(max_chars).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::truncate_for_error;

    #[test]
    fn unit_truncate_for_error_trims_and_bounds_body() {
        assert_eq!(truncate_for_error("  short  ", 10), "short");
        assert_eq!(truncate_for_error("abcdef", 3), "abc…");
    }

    #[test]
    fn regression_truncate_for_error_respects_char_boundaries() {
        assert_eq!(truncate_for_error("❌❌❌❌", 2), "❌❌…");
    }
}
