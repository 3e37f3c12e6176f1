//! Helpers for working with namespaced string keys in error output.
//!
//! Resolver keys are plain strings, but in practice they tend to be
//! namespaced: `app.services.Mailer`, `App\Mailer`, `app::mailer`.
//! These helpers shorten such keys for display and score near-miss
//! suggestions for "did you mean?" hints.

/// Returns the last segment of a namespaced key.
///
/// Recognised separators are `.`, `::`, `\` and `/`.
///
/// # Examples
/// ```
/// use tarkib_support::keys::shorten_key;
///
/// assert_eq!(shorten_key("app.services.Mailer"), "Mailer");
/// assert_eq!(shorten_key("App\\Mailer"), "Mailer");
/// assert_eq!(shorten_key("app::mailer"), "mailer");
/// assert_eq!(shorten_key("mailer"), "mailer");
/// ```
pub fn shorten_key(key: &str) -> &str {
    // All recognised separators are single ASCII bytes, so the slice
    // boundary is always valid.
    match key.rfind(['.', ':', '\\', '/']) {
        Some(index) => &key[index + 1..],
        None => key,
    }
}

/// Scores the available keys against a requested one and returns the
/// closest matches, best first.
///
/// Matching is case-insensitive and considers both the full key and its
/// shortened last segment, so `app.Mailr` still suggests
/// `app.services.Mailer`.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_key(&requested_lower).to_string();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&key| {
            if key == requested {
                return None;
            }

            let key_lower = key.to_lowercase();
            let key_short = shorten_key(&key_lower);

            // Exact substring match (highest priority)
            if key_lower.contains(&requested_lower)
                || requested_lower.contains(&key_lower)
            {
                return Some((key, 100));
            }

            // Last-segment match
            if key_short.contains(&requested_short)
                || requested_short.contains(key_short)
            {
                return Some((key, 80));
            }

            // Common prefix of the last segments
            let common = key_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((key, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(key, _)| key.to_string())
        .collect()
}
