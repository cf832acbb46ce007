//! Text cleanup for values sent to the remote API
//!
//! The AdWords API rejects a handful of punctuation characters in entity
//! names and keyword text. Every free-text CSV field goes through
//! [`clear_for_api`] before it is stored in an entity.

/// Characters the remote API refuses in names and keyword text
pub const ILLEGAL_CHARACTERS: &[char] = &[
    '@', '!', ',', '%', '^', '*', '(', ')', '=', '{', '}', '~', '`', '<', '>', '?', '|',
];

/// Remove characters the remote API refuses
///
/// The typographic apostrophe `’` is normalized to `'` first.
pub fn clear_for_api(text: &str) -> String {
    text.chars()
        .map(|c| if c == '’' { '\'' } else { c })
        .filter(|c| !ILLEGAL_CHARACTERS.contains(c))
        .collect()
}
