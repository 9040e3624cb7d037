//! Inflection helpers used to derive storage names from logical resource names.

use std::sync::Arc;

/// Function mapping a logical resource name to the name used in the store.
pub type NamingConvention = Arc<dyn Fn(&str) -> String + Send + Sync>;

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

/// Naming convention that only underscores and pluralizes, without a namespace prefix.
pub fn plain_naming_convention() -> NamingConvention {
    Arc::new(|name: &str| storage_name(name))
}

/// Naming convention producing `"<namespace>:<storage name>"`.
pub fn namespaced_naming_convention(namespace: impl Into<String>) -> NamingConvention {
    let namespace = namespace.into();
    Arc::new(move |name: &str| format!("{namespace}:{}", storage_name(name)))
}

/// Pluralized, underscored form of `name` with path separators flattened to `_`.
pub fn storage_name(name: &str) -> String {
    pluralize(&underscore(name)).replace('/', "_")
}

/// Convert `CamelCase` and `Module::Path` names into `snake_case` and `module/path`.
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.replace("::", "/").chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (idx, &ch) in chars.iter().enumerate() {
        if ch == '-' {
            out.push('_');
            continue;
        }
        if ch.is_uppercase() && idx > 0 {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|next| next.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }

    out
}

/// Convert `snake_case` and `module/path` names into `CamelCase` and `Module::Path`.
pub fn camelize(name: &str) -> String {
    name.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|word| !word.is_empty())
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Pluralize the trailing word of `word` using common English rules.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let split_at = word.rfind(['/', '_']).map_or(0, |idx| idx + 1);
    let (head, last) = word.split_at(split_at);
    let lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return format!("{head}{plural}");
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }

    format!("{head}{}", pluralize_regular(last))
}

fn pluralize_regular(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with("quiz") {
        return format!("{word}zes");
    }
    if lower == "ox" {
        return format!("{word}en");
    }
    if lower.ends_with("mouse") || lower.ends_with("louse") {
        return format!("{}ice", stem(word, 4));
    }
    if ["matrix", "vertex", "index"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{}ices", stem(word, 2));
    }
    if ["x", "ch", "ss", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", stem(word, 1));
    }
    if lower.ends_with("fe") && !lower.ends_with("ffe") {
        return format!("{}ves", stem(word, 2));
    }
    if lower.ends_with("lf") || lower.ends_with("rf") {
        return format!("{}ves", stem(word, 1));
    }
    if lower.ends_with("sis") {
        return format!("{}ses", stem(word, 3));
    }
    if lower.ends_with("tum") || lower.ends_with("ium") {
        return format!("{}a", stem(word, 2));
    }
    if lower.ends_with("buffalo") || lower.ends_with("tomato") {
        return format!("{word}es");
    }
    if lower.ends_with("octopus") || lower.ends_with("virus") {
        return format!("{}i", stem(word, 2));
    }
    if lower.ends_with("alias") || lower.ends_with("status") || lower.ends_with("bus") {
        return format!("{word}es");
    }
    if lower.ends_with('s') {
        return word.to_string();
    }

    format!("{word}s")
}

fn stem(word: &str, suffix_len: usize) -> &str {
    &word[..word.len() - suffix_len]
}

fn ends_with_vowel_y(lower: &str) -> bool {
    if lower.ends_with("quy") {
        return false;
    }
    let mut chars = lower.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}
