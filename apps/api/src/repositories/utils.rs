//! Shared utility functions for repositories

/// Escape special characters in LIKE patterns to prevent pattern injection.
///
/// LIKE uses `%` for any sequence and `_` for single character wildcards.
/// If user input contains these characters, they must be escaped to match literally.
///
/// # Example
/// ```
/// use secrest_api::repositories::utils::escape_like;
///
/// let input = "100%";
/// let escaped = escape_like(input);
/// assert_eq!(escaped, r"100\%");
/// ```
pub fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

/// SQL columns for privilege queries
pub const PRIVILEGE_COLUMNS: &str = "id, name, description";

/// Name of the unique constraint on `privileges.name`
pub const PRIVILEGE_NAME_CONSTRAINT: &str = "privileges_name_key";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_no_special_chars() {
        assert_eq!(escape_like("hello world"), "hello world");
    }

    #[test]
    fn test_escape_like_percent() {
        assert_eq!(escape_like("100% complete"), r"100\% complete");
    }

    #[test]
    fn test_escape_like_underscore() {
        assert_eq!(escape_like("READ_USERS"), r"READ\_USERS");
    }

    #[test]
    fn test_escape_like_all_special() {
        assert_eq!(escape_like(r"100%_\test"), r"100\%\_\\test");
    }

    #[test]
    fn test_escape_like_empty() {
        assert_eq!(escape_like(""), "");
    }
}
