//! Department name lexicon.

/// Canonical department name for a full or abbreviated variant.
///
/// Lookup is case-insensitive; `None` for names outside the lexicon.
pub fn canonical_department(name: &str) -> Option<&'static str> {
    let canonical = match name.trim().to_lowercase().as_str() {
        "cs" | "computer science" => "Computer Science",
        "math" | "mathematics" => "Mathematics",
        "eng" | "english" => "English",
        "phy" | "phys" | "physics" => "Physics",
        "bus" | "business" => "Business",
        "chem" | "chemistry" => "Chemistry",
        "bio" | "biology" => "Biology",
        _ => return None,
    };
    Some(canonical)
}

/// Canonical name, or `name` unchanged when it is not in the lexicon.
pub fn normalize_department(name: &str) -> String {
    canonical_department(name)
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}
