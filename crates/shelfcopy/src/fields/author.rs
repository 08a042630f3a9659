//! Author name formatting.

use crate::settings::AuthorFormat;

/// Render a contributor name.
///
/// `LastFirst` treats the last whitespace-separated token as the surname:
/// `"Ursula K. Le Guin"` becomes `"Guin, Ursula K. Le"`. Single-token
/// names are returned unchanged.
pub fn format_author(name: &str, format: AuthorFormat) -> String {
    match format {
        AuthorFormat::Full => name.to_string(),
        AuthorFormat::LastFirst => {
            let name = name.trim();
            match name.rsplit_once(char::is_whitespace) {
                Some((given, surname)) => format!("{surname}, {}", given.trim_end()),
                None => name.to_string(),
            }
        }
    }
}
