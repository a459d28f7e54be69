//! Attribute key normalization.

/// Normalize a field name to lowerCamelCase.
///
/// Words are split on any non-alphanumeric character. Words written entirely
/// in capitals are treated as acronyms and lowercased, so `ISO_A2` becomes
/// `isoA2` and `home city` becomes `homeCity`. Names that are already camel
/// case keep their interior capitals.
pub fn to_lower_camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for word in raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = if is_acronym(word) {
            word.to_lowercase()
        } else {
            word.to_string()
        };

        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if out.is_empty() {
            out.extend(first.to_lowercase());
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(chars.as_str());
    }

    out
}

fn is_acronym(word: &str) -> bool {
    word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_lower_camel_case("home_city"), "homeCity");
        assert_eq!(to_lower_camel_case("first_seen_at"), "firstSeenAt");
    }

    #[test]
    fn test_pascal_and_camel() {
        assert_eq!(to_lower_camel_case("CountryCode"), "countryCode");
        assert_eq!(to_lower_camel_case("countryCode"), "countryCode");
        assert_eq!(to_lower_camel_case("Population"), "population");
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(to_lower_camel_case("ISO_A2"), "isoA2");
        assert_eq!(to_lower_camel_case("URL"), "url");
    }

    #[test]
    fn test_spaces_and_dashes() {
        assert_eq!(to_lower_camel_case("last seen-by"), "lastSeenBy");
        assert_eq!(to_lower_camel_case("  padded  "), "padded");
    }

    #[test]
    fn test_only_separators() {
        assert_eq!(to_lower_camel_case("__"), "");
    }
}
