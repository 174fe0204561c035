/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Pad or clip `s` to exactly `width` characters for fixed-width form fields,
/// keeping the tail visible while typing.
pub fn fit_field(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        format!("{:<width$}", s)
    } else {
        s.chars().skip(len - width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Piña Colada", 7), "Piña...");
    }

    #[test]
    fn test_fit_field() {
        assert_eq!(fit_field("gin", 5), "gin  ");
        assert_eq!(fit_field("margarita", 4), "rita");
        assert_eq!(fit_field("", 2), "  ");
    }
}
