//! Slug derivation for notes.
//!
//! Titles are transliterated from Russian to Latin and reduced to a
//! lowercase, hyphen-separated identifier.

/// Transliterate one lowercase character.
///
/// Returns `None` for characters outside the transliteration alphabet, which
/// are dropped from the slug.
fn transliterate(c: char) -> Option<&'static str> {
    let out = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "`",
        'ы' => "yi",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        '\'' | '‘' | '’' => "'",
        '"' | '«' | '»' | '“' | '”' => "\"",
        '-' | '–' | '—' | '‒' | '−' => "-",
        '…' => "...",
        '№' => "#",
        _ => return None,
    };
    Some(out)
}

/// Derive a slug from arbitrary text.
///
/// Steps: lowercase, `&` becomes ` and `, runs of whitespace and hyphens
/// collapse to one `-`, Cyrillic is transliterated, anything that is not a
/// word character, whitespace or `-` is removed, and the result is trimmed.
///
/// # Examples
///
/// ```
/// use noteboard::notes::slugify;
///
/// assert_eq!(slugify("New title"), "new-title");
/// assert_eq!(slugify("Заголовок заметки"), "zagolovok-zametki");
/// assert_eq!(slugify("Tom & Jerry"), "tom-and-jerry");
/// ```
pub fn slugify(input: &str) -> String {
    let lowered = input
        .to_lowercase()
        .replace("&amp;", " and ")
        .replace('&', " and ");

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_separator = false;
    for c in lowered.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_separator {
                collapsed.push('-');
                in_separator = true;
            }
        } else {
            collapsed.push(c);
            in_separator = false;
        }
    }

    let mut translated = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            translated.push(c);
        } else if let Some(latin) = transliterate(c) {
            translated.push_str(latin);
        }
    }

    translated.retain(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace());
    translated.trim().to_lowercase()
}

/// Derive a slug from a title, truncated to `max_length` characters.
pub fn slug_from_title(title: &str, max_length: usize) -> String {
    slugify(title).chars().take(max_length).collect()
}

/// Check that an explicit slug only uses letters, digits, `_` and `-`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
