//! Argument guards shared by the footprint constructors and the CLI.

use std::collections::HashSet;
use std::hash::Hash;

/// A rejected argument, named by the parameter it was passed as
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Non-empty '{name}' required.")]
    Empty { name: &'static str },

    #[error("Nonnull '{name}' required.")]
    Missing { name: &'static str },
}

/// Reject an empty string argument
pub fn check_empty(value: &str, name: &'static str) -> Result<(), GuardError> {
    if value.is_empty() {
        return Err(GuardError::Empty { name });
    }
    Ok(())
}

/// Unwrap an optional argument, rejecting `None`
pub fn check_present<T>(value: Option<T>, name: &'static str) -> Result<T, GuardError> {
    value.ok_or(GuardError::Missing { name })
}

/// Collect items into a duplicate-free list, keeping first-seen order.
///
/// Accepts plain values or `Option`s; `None` entries are dropped.
pub fn to_set<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator,
    I::Item: Into<Option<T>>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for item in items {
        if let Some(item) = item.into() {
            if seen.insert(item.clone()) {
                ordered.push(item);
            }
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_empty_rejects_empty_string() {
        let err = check_empty("", "logical_name").unwrap_err();
        assert_eq!(err, GuardError::Empty { name: "logical_name" });
        assert_eq!(err.to_string(), "Non-empty 'logical_name' required.");
    }

    #[test]
    fn test_check_empty_accepts_whitespace() {
        // Only the empty string is rejected, matching a length check
        assert!(check_empty(" ", "logical_name").is_ok());
        assert!(check_empty("app.db", "logical_name").is_ok());
    }

    #[test]
    fn test_check_present() {
        assert_eq!(check_present(Some(3), "count"), Ok(3));

        let err = check_present::<u8>(None, "root_directory").unwrap_err();
        assert_eq!(err.to_string(), "Nonnull 'root_directory' required.");
    }

    #[test]
    fn test_to_set_drops_none_and_duplicates() {
        let set: Vec<&str> = to_set(vec![Some("b"), None, Some("a"), Some("b"), None]);
        assert_eq!(set, vec!["b", "a"]);
    }

    #[test]
    fn test_to_set_plain_values() {
        let set: Vec<u32> = to_set(vec![3u32, 1, 3, 2, 1]);
        assert_eq!(set, vec![3, 1, 2]);
    }

    #[test]
    fn test_to_set_empty() {
        let set: Vec<String> = to_set(Vec::<Option<String>>::new());
        assert!(set.is_empty());
    }
}
