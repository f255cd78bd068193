/// Turns free text into a branch-name-safe slug.
///
/// Trims, transliterates to ASCII, lowercases, replaces every character
/// outside `[a-zA-Z0-9-_]` with `-` and collapses runs of `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text.trim()).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}
