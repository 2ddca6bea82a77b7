/// Slug derivation for post permalinks
///
/// A slug is the title transliterated to ASCII and lower-cased, with every
/// run of non-alphanumeric characters collapsed into a single `-`. Leading
/// and trailing separators are dropped.
///
/// # Example
///
/// ```
/// use quill_shared::slug::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  Rust -- 2024 "), "rust-2024");
/// assert_eq!(slugify("Café au lait"), "cafe-au-lait");
/// ```

use deunicode::deunicode;
use rand::RngCore;

/// Separator placed between alphanumeric runs
pub const SEPARATOR: char = '-';

/// Number of random bytes used for a collision suffix (hex-encoded, so 6 chars)
const SUFFIX_BYTES: usize = 3;

/// Derives a slug from a title
///
/// Letters outside ASCII are transliterated first (`é` → `e`, `П` → `P`).
/// Returns an empty string when nothing alphanumeric is left.
pub fn slugify(title: &str) -> String {
    let ascii = deunicode(title);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Appends a short random hex suffix to a slug
///
/// Used when the bare slug is already taken.
///
/// ```
/// use quill_shared::slug::with_random_suffix;
///
/// let slug = with_random_suffix("my-post");
/// assert!(slug.starts_with("my-post-"));
/// assert_eq!(slug.len(), "my-post-".len() + 6);
/// ```
pub fn with_random_suffix(slug: &str) -> String {
    let mut bytes = [0u8; SUFFIX_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}{}", slug, SEPARATOR, hex::encode(bytes))
}
