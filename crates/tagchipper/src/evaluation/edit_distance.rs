//! # Normalized Edit Distance

/// Levenshtein distance over chars, divided by the longer length in chars.
///
/// ## Returns
/// A score in ``[0.0, 1.0]``; ``0.0`` when both strings are empty.
pub fn normalized_edit_distance(
    prediction: &str,
    reference: &str,
) -> f64 {
    let longest = prediction.chars().count().max(reference.chars().count());
    if longest == 0 {
        return 0.0;
    }
    strsim::levenshtein(prediction, reference) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_and_empty() {
        assert_eq!(normalized_edit_distance("", ""), 0.0);
        assert_eq!(normalized_edit_distance("ACME", "ACME"), 0.0);
        assert_eq!(normalized_edit_distance("", "ACME"), 1.0);
        assert_eq!(normalized_edit_distance("abc", "xyz"), 1.0);
    }

    #[test]
    fn test_total_example() {
        let score = normalized_edit_distance("<s_total>10.0</s_total>", "<s_total>10.00</s_total>");
        assert!((score - 1.0 / 24.0).abs() < 1e-12);
        assert!((score - 0.04).abs() < 0.01);
    }

    #[test]
    fn test_counts_chars() {
        // One substitution over four chars, not bytes.
        assert_eq!(normalized_edit_distance("café", "cafe"), 0.25);
    }

    #[test]
    fn test_symmetric() {
        let a = "<s_date>2024-01-01</s_date>";
        let b = "<s_date>2024-1-1</s_date>";
        assert_eq!(normalized_edit_distance(a, b), normalized_edit_distance(b, a));
    }
}
