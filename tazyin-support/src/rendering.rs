//! Text rendering for type names and suggestions.
//!
//! `std::any::type_name` output is precise but noisy
//! (`alloc::sync::Arc<dyn my_app::service::Greeter>`). These helpers
//! make it readable in logs and error hints.

/// Shortens a fully qualified type name for display.
///
/// Every path segment is dropped, generic structure is kept.
///
/// ```
/// use tazyin_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_app::services::Greeter"), "Greeter");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Greeter>"),
///     "Arc<dyn Greeter>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut chars = full_name.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Picks registered type names that look like `requested`.
///
/// Scoring, highest first:
/// - full-name substring match
/// - short-name substring match
/// - shared short-name prefix of at least 3 characters
///
/// At most `limit` names are returned, best match first.
pub fn suggest_similar<'a, I>(requested: &str, available: I, limit: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let requested_full = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&'a str, usize)> = available
        .into_iter()
        .filter(|name| !name.eq_ignore_ascii_case(requested))
        .filter_map(|name| {
            let full = name.to_lowercase();
            let short = shorten_type_name(name).to_lowercase();

            if full.contains(&requested_full) || requested_full.contains(&full) {
                return Some((name, 100));
            }
            if short.contains(&requested_short) || requested_short.contains(&short) {
                return Some((name, 80));
            }

            let common = short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().take(limit).map(|(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_plain_path() {
        assert_eq!(shorten_type_name("app::greeting::Greeter"), "Greeter");
    }

    #[test]
    fn shorten_trait_object_in_arc() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn app::greeting::Greeter>"),
            "Arc<dyn Greeter>"
        );
    }

    #[test]
    fn shorten_nested_generics() {
        assert_eq!(
            shorten_type_name("core::option::Option<alloc::vec::Vec<app::Item>>"),
            "Option<Vec<Item>>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("u32"), "u32");
    }

    #[test]
    fn suggests_typo_match_first() {
        let available = [
            "app::Greeter",
            "app::GreeterFactory",
            "app::Clock",
        ];

        let suggestions = suggest_similar("app::Greter", available, 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].contains("Greeter"));
        assert!(!suggestions.contains(&"app::Clock"));
    }

    #[test]
    fn suggestions_respect_limit() {
        let available = ["app::Repo", "app::RepoA", "app::RepoB"];
        assert_eq!(suggest_similar("app::Rep", available, 2).len(), 2);
    }

    #[test]
    fn no_suggestion_for_exact_name() {
        let available = ["app::Greeter"];
        assert!(suggest_similar("app::Greeter", available, 3).is_empty());
    }

    #[test]
    fn no_suggestion_for_unrelated_names() {
        let available = ["app::Database"];
        assert!(suggest_similar("XyzAbc", available, 3).is_empty());
    }
}
