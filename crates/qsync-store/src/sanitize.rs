//! Partition (collection) name sanitization.

/// Characters that are unsafe in a storage path, each replaced with `-`.
const UNSAFE_CHARS: &[char] = &['/', '#', '$', '[', ']'];

const DEFAULT_PARTITION: &str = "uncategorized";

/// Sanitizes a product type into a partition name.
///
/// Replaces `/`, `#`, `$`, `[`, `]` and a leading `.` with `-`; an empty
/// or whitespace-only input yields `uncategorized`. Idempotent:
/// `sanitize_partition(sanitize_partition(x)) == sanitize_partition(x)`.
#[must_use]
pub fn sanitize_partition(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_PARTITION.to_string();
    }

    let mut out: String = trimmed
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();
    if out.starts_with('.') {
        out.replace_range(0..1, "-");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_clean_names_through() {
        assert_eq!(sanitize_partition("Apparel"), "Apparel");
        assert_eq!(sanitize_partition("Mugs & Drinkware"), "Mugs & Drinkware");
    }

    #[test]
    fn replaces_unsafe_characters() {
        assert_eq!(sanitize_partition("Men/Women"), "Men-Women");
        assert_eq!(sanitize_partition("a#b$c[d]e"), "a-b-c-d-e");
    }

    #[test]
    fn replaces_a_leading_dot_only() {
        assert_eq!(sanitize_partition(".hidden"), "-hidden");
        assert_eq!(sanitize_partition("v1.2"), "v1.2");
    }

    #[test]
    fn empty_and_whitespace_default_to_uncategorized() {
        assert_eq!(sanitize_partition(""), "uncategorized");
        assert_eq!(sanitize_partition("   "), "uncategorized");
    }

    #[test]
    fn sanitization_is_idempotent() {
        for input in ["", "Apparel", "Men/Women", ".hidden", "a#b$c[d]e", "  spaced  ", "$$$"] {
            let once = sanitize_partition(input);
            assert_eq!(sanitize_partition(&once), once, "not idempotent for {input:?}");
        }
    }
}
