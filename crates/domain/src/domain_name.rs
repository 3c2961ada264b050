/// Lower-cases a domain name and makes it fully qualified.
///
/// The root zone is returned as `"."`.
pub fn normalize_fqdn(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    if lower.is_empty() || lower == "." {
        ".".to_string()
    } else if lower.ends_with('.') {
        lower
    } else {
        format!("{}.", lower)
    }
}

/// True when `name` equals `zone` or sits below it. Both must be normalized.
pub fn is_in_zone(name: &str, zone: &str) -> bool {
    if zone == "." || name == zone {
        return true;
    }
    name.len() > zone.len()
        && name.ends_with(zone)
        && name.as_bytes()[name.len() - zone.len() - 1] == b'.'
}

/// Number of labels in a normalized name; the root has none.
pub fn label_count(name: &str) -> usize {
    if name == "." {
        0
    } else {
        name.trim_end_matches('.').split('.').count()
    }
}
