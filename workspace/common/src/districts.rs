//! Per-district humidity fallback used when an intake form arrives
//! without a measured value.

/// Average relative humidity (%) by Lima district.
pub const DISTRICT_HUMIDITY: &[(&str, f64)] = &[
    ("Ate", 83.9),
    ("Callao", 88.4),
    ("Comas", 85.6),
    ("Los Olivos", 70.3),
    ("Miraflores", 75.3),
    ("San Isidro", 84.9),
    ("San Juan de Lurigancho", 87.0),
    ("Surco", 84.7),
];

/// Look up the fallback humidity for a district. The name is matched
/// after trimming; unknown districts yield `None`.
pub fn humidity_for_district(district: &str) -> Option<f64> {
    let wanted = district.trim();
    DISTRICT_HUMIDITY
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, humidity)| *humidity)
}

/// Humidity to persist for a submission: the caller-supplied reading wins,
/// then the district table, then 0.
pub fn resolve_humidity(supplied: Option<f64>, district: &str) -> f64 {
    supplied.unwrap_or_else(|| humidity_for_district(district).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_district_resolves_from_table() {
        assert_eq!(humidity_for_district("Miraflores"), Some(75.3));
        assert_eq!(humidity_for_district("  Callao  "), Some(88.4));
    }

    #[test]
    fn unknown_district_has_no_entry() {
        assert_eq!(humidity_for_district("Cusco"), None);
    }

    #[test]
    fn supplied_value_wins_over_table() {
        assert_eq!(resolve_humidity(Some(42.0), "Miraflores"), 42.0);
    }

    #[test]
    fn missing_value_falls_back_to_table_then_zero() {
        assert_eq!(resolve_humidity(None, "Miraflores"), 75.3);
        assert_eq!(resolve_humidity(None, "Cusco"), 0.0);
    }
}
