use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Member states of the Schengen area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchengenCountry {
    Austria,
    Belgium,
    Bulgaria,
    Croatia,
    Czechia,
    Denmark,
    Estonia,
    Finland,
    France,
    Germany,
    Greece,
    Hungary,
    Iceland,
    Italy,
    Latvia,
    Liechtenstein,
    Lithuania,
    Luxembourg,
    Malta,
    Netherlands,
    Norway,
    Poland,
    Portugal,
    Romania,
    Slovakia,
    Slovenia,
    Spain,
    Sweden,
    Switzerland,
}

impl SchengenCountry {
    pub const fn ordered() -> [Self; 29] {
        [
            Self::Austria,
            Self::Belgium,
            Self::Bulgaria,
            Self::Croatia,
            Self::Czechia,
            Self::Denmark,
            Self::Estonia,
            Self::Finland,
            Self::France,
            Self::Germany,
            Self::Greece,
            Self::Hungary,
            Self::Iceland,
            Self::Italy,
            Self::Latvia,
            Self::Liechtenstein,
            Self::Lithuania,
            Self::Luxembourg,
            Self::Malta,
            Self::Netherlands,
            Self::Norway,
            Self::Poland,
            Self::Portugal,
            Self::Romania,
            Self::Slovakia,
            Self::Slovenia,
            Self::Spain,
            Self::Sweden,
            Self::Switzerland,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Austria => "Austria",
            Self::Belgium => "Belgium",
            Self::Bulgaria => "Bulgaria",
            Self::Croatia => "Croatia",
            Self::Czechia => "Czechia",
            Self::Denmark => "Denmark",
            Self::Estonia => "Estonia",
            Self::Finland => "Finland",
            Self::France => "France",
            Self::Germany => "Germany",
            Self::Greece => "Greece",
            Self::Hungary => "Hungary",
            Self::Iceland => "Iceland",
            Self::Italy => "Italy",
            Self::Latvia => "Latvia",
            Self::Liechtenstein => "Liechtenstein",
            Self::Lithuania => "Lithuania",
            Self::Luxembourg => "Luxembourg",
            Self::Malta => "Malta",
            Self::Netherlands => "Netherlands",
            Self::Norway => "Norway",
            Self::Poland => "Poland",
            Self::Portugal => "Portugal",
            Self::Romania => "Romania",
            Self::Slovakia => "Slovakia",
            Self::Slovenia => "Slovenia",
            Self::Spain => "Spain",
            Self::Sweden => "Sweden",
            Self::Switzerland => "Switzerland",
        }
    }

    /// ISO 3166-1 alpha-2 code.
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::Austria => "AT",
            Self::Belgium => "BE",
            Self::Bulgaria => "BG",
            Self::Croatia => "HR",
            Self::Czechia => "CZ",
            Self::Denmark => "DK",
            Self::Estonia => "EE",
            Self::Finland => "FI",
            Self::France => "FR",
            Self::Germany => "DE",
            Self::Greece => "GR",
            Self::Hungary => "HU",
            Self::Iceland => "IS",
            Self::Italy => "IT",
            Self::Latvia => "LV",
            Self::Liechtenstein => "LI",
            Self::Lithuania => "LT",
            Self::Luxembourg => "LU",
            Self::Malta => "MT",
            Self::Netherlands => "NL",
            Self::Norway => "NO",
            Self::Poland => "PL",
            Self::Portugal => "PT",
            Self::Romania => "RO",
            Self::Slovakia => "SK",
            Self::Slovenia => "SI",
            Self::Spain => "ES",
            Self::Sweden => "SE",
            Self::Switzerland => "CH",
        }
    }

    /// Resolve a country from its ISO code, English name, or a common alias.
    pub fn lookup(raw: &str) -> Option<Self> {
        let normalized = normalize_country(raw);
        if normalized.is_empty() {
            return None;
        }
        country_index().get(&normalized).copied()
    }
}

static COUNTRY_INDEX: OnceLock<HashMap<String, SchengenCountry>> = OnceLock::new();

fn country_index() -> &'static HashMap<String, SchengenCountry> {
    COUNTRY_INDEX.get_or_init(|| {
        const ALIASES: &[(&str, SchengenCountry)] = &[
            ("Czech Republic", SchengenCountry::Czechia),
            ("Holland", SchengenCountry::Netherlands),
            ("The Netherlands", SchengenCountry::Netherlands),
            ("Deutschland", SchengenCountry::Germany),
            ("Espana", SchengenCountry::Spain),
            ("España", SchengenCountry::Spain),
            ("Hellas", SchengenCountry::Greece),
            ("Slovak Republic", SchengenCountry::Slovakia),
            ("Swiss Confederation", SchengenCountry::Switzerland),
            ("Österreich", SchengenCountry::Austria),
            ("Hrvatska", SchengenCountry::Croatia),
        ];

        let mut index = HashMap::new();
        for country in SchengenCountry::ordered() {
            index.insert(normalize_country(country.label()), country);
            index.insert(normalize_country(country.iso_code()), country);
        }
        for (alias, country) in ALIASES {
            index.insert(normalize_country(alias), *country);
        }
        index
    })
}

fn normalize_country(value: &str) -> String {
    let cleaned: String = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}
