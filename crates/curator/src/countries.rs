//! Shared country name / code lookup.
//!
//! One table serves every adapter and the cleaner. It resolves ISO-3166-1
//! alpha-3 codes, alpha-2 codes, English and Spanish display names and the
//! provider-specific spellings that show up in World Bank, IMF and CEPALSTAT
//! payloads ("Korea, Rep.", "Venezuela, RB", "Bolivia (Plurinational State of)").

use std::collections::HashMap;

/// `(iso3, iso2, name, aliases)`.
type CountryRow = (&'static str, &'static str, &'static str, &'static [&'static str]);

/// ISO 3166-1, ordered by English short name.
const BUILTIN_COUNTRIES: &[CountryRow] = &[
    ("AFG", "AF", "Afghanistan", &[]),
    ("ALB", "AL", "Albania", &[]),
    ("DZA", "DZ", "Algeria", &[]),
    ("ASM", "AS", "American Samoa", &[]),
    ("AND", "AD", "Andorra", &[]),
    ("AGO", "AO", "Angola", &[]),
    ("AIA", "AI", "Anguilla", &[]),
    ("ATA", "AQ", "Antarctica", &[]),
    ("ATG", "AG", "Antigua and Barbuda", &["antigua y barbuda"]),
    ("ARG", "AR", "Argentina", &[]),
    ("ARM", "AM", "Armenia", &[]),
    ("ABW", "AW", "Aruba", &[]),
    ("AUS", "AU", "Australia", &[]),
    ("AUT", "AT", "Austria", &[]),
    ("AZE", "AZ", "Azerbaijan", &[]),
    ("BHS", "BS", "Bahamas", &["bahamas, the", "the bahamas"]),
    ("BHR", "BH", "Bahrain", &[]),
    ("BGD", "BD", "Bangladesh", &[]),
    ("BRB", "BB", "Barbados", &[]),
    ("BLR", "BY", "Belarus", &[]),
    ("BEL", "BE", "Belgium", &[]),
    ("BLZ", "BZ", "Belize", &["belice"]),
    ("BEN", "BJ", "Benin", &[]),
    ("BMU", "BM", "Bermuda", &[]),
    ("BTN", "BT", "Bhutan", &[]),
    ("BOL", "BO", "Bolivia", &["bolivia (plurinational state of)", "estado plurinacional de bolivia", "bolivia (estado plurinacional de)"]),
    ("BES", "BQ", "Bonaire, Sint Eustatius and Saba", &["bonaire"]),
    ("BIH", "BA", "Bosnia and Herzegovina", &[]),
    ("BWA", "BW", "Botswana", &[]),
    ("BVT", "BV", "Bouvet Island", &[]),
    ("BRA", "BR", "Brazil", &["brasil"]),
    ("IOT", "IO", "British Indian Ocean Territory", &[]),
    ("VGB", "VG", "British Virgin Islands", &["virgin islands (british)"]),
    ("BRN", "BN", "Brunei", &["brunei darussalam"]),
    ("BGR", "BG", "Bulgaria", &[]),
    ("BFA", "BF", "Burkina Faso", &[]),
    ("BDI", "BI", "Burundi", &[]),
    ("CPV", "CV", "Cabo Verde", &["cape verde"]),
    ("KHM", "KH", "Cambodia", &[]),
    ("CMR", "CM", "Cameroon", &[]),
    ("CAN", "CA", "Canada", &[]),
    ("CYM", "KY", "Cayman Islands", &[]),
    ("CAF", "CF", "Central African Republic", &[]),
    ("TCD", "TD", "Chad", &[]),
    ("CHL", "CL", "Chile", &[]),
    ("CHN", "CN", "China", &["china, people's republic of", "people's republic of china"]),
    ("CXR", "CX", "Christmas Island", &[]),
    ("CCK", "CC", "Cocos (Keeling) Islands", &[]),
    ("COL", "CO", "Colombia", &[]),
    ("COM", "KM", "Comoros", &[]),
    ("COG", "CG", "Congo", &["congo, rep.", "republic of the congo"]),
    ("COK", "CK", "Cook Islands", &[]),
    ("CRI", "CR", "Costa Rica", &[]),
    ("CIV", "CI", "Cote d'Ivoire", &["ivory coast"]),
    ("HRV", "HR", "Croatia", &[]),
    ("CUB", "CU", "Cuba", &[]),
    ("CUW", "CW", "Curacao", &[]),
    ("CYP", "CY", "Cyprus", &[]),
    ("CZE", "CZ", "Czechia", &["czech republic"]),
    ("COD", "CD", "Democratic Republic of Congo", &["congo, dem. rep.", "democratic republic of the congo", "congo (the democratic republic of the)"]),
    ("DNK", "DK", "Denmark", &[]),
    ("DJI", "DJ", "Djibouti", &[]),
    ("DMA", "DM", "Dominica", &[]),
    ("DOM", "DO", "Dominican Republic", &["republica dominicana"]),
    ("ECU", "EC", "Ecuador", &[]),
    ("EGY", "EG", "Egypt", &["egypt, arab rep."]),
    ("SLV", "SV", "El Salvador", &[]),
    ("GNQ", "GQ", "Equatorial Guinea", &[]),
    ("ERI", "ER", "Eritrea", &[]),
    ("EST", "EE", "Estonia", &[]),
    ("SWZ", "SZ", "Eswatini", &["swaziland"]),
    ("ETH", "ET", "Ethiopia", &[]),
    ("FLK", "FK", "Falkland Islands", &["falkland islands (malvinas)"]),
    ("FRO", "FO", "Faroe Islands", &[]),
    ("FJI", "FJ", "Fiji", &[]),
    ("FIN", "FI", "Finland", &[]),
    ("FRA", "FR", "France", &["francia"]),
    ("GUF", "GF", "French Guiana", &[]),
    ("PYF", "PF", "French Polynesia", &[]),
    ("ATF", "TF", "French Southern Territories", &[]),
    ("GAB", "GA", "Gabon", &[]),
    ("GMB", "GM", "Gambia", &["gambia, the", "the gambia"]),
    ("GEO", "GE", "Georgia", &[]),
    ("DEU", "DE", "Germany", &["alemania"]),
    ("GHA", "GH", "Ghana", &[]),
    ("GIB", "GI", "Gibraltar", &[]),
    ("GRC", "GR", "Greece", &[]),
    ("GRL", "GL", "Greenland", &[]),
    ("GRD", "GD", "Grenada", &["granada"]),
    ("GLP", "GP", "Guadeloupe", &[]),
    ("GUM", "GU", "Guam", &[]),
    ("GTM", "GT", "Guatemala", &[]),
    ("GGY", "GG", "Guernsey", &[]),
    ("GIN", "GN", "Guinea", &[]),
    ("GNB", "GW", "Guinea-Bissau", &[]),
    ("GUY", "GY", "Guyana", &[]),
    ("HTI", "HT", "Haiti", &[]),
    ("HMD", "HM", "Heard Island and McDonald Islands", &[]),
    ("VAT", "VA", "Holy See", &["vatican", "vatican city"]),
    ("HND", "HN", "Honduras", &[]),
    ("HKG", "HK", "Hong Kong", &["hong kong sar, china", "china, hong kong sar"]),
    ("HUN", "HU", "Hungary", &[]),
    ("ISL", "IS", "Iceland", &[]),
    ("IND", "IN", "India", &[]),
    ("IDN", "ID", "Indonesia", &[]),
    ("IRN", "IR", "Iran", &["iran, islamic rep.", "iran (islamic republic of)"]),
    ("IRQ", "IQ", "Iraq", &[]),
    ("IRL", "IE", "Ireland", &[]),
    ("IMN", "IM", "Isle of Man", &[]),
    ("ISR", "IL", "Israel", &[]),
    ("ITA", "IT", "Italy", &["italia"]),
    ("JAM", "JM", "Jamaica", &[]),
    ("JPN", "JP", "Japan", &["japon"]),
    ("JEY", "JE", "Jersey", &[]),
    ("JOR", "JO", "Jordan", &[]),
    ("KAZ", "KZ", "Kazakhstan", &[]),
    ("KEN", "KE", "Kenya", &[]),
    ("KIR", "KI", "Kiribati", &[]),
    ("KWT", "KW", "Kuwait", &[]),
    ("KGZ", "KG", "Kyrgyzstan", &["kyrgyz republic"]),
    ("LAO", "LA", "Laos", &["lao pdr", "lao people's democratic republic"]),
    ("LVA", "LV", "Latvia", &[]),
    ("LBN", "LB", "Lebanon", &[]),
    ("LSO", "LS", "Lesotho", &[]),
    ("LBR", "LR", "Liberia", &[]),
    ("LBY", "LY", "Libya", &[]),
    ("LIE", "LI", "Liechtenstein", &[]),
    ("LTU", "LT", "Lithuania", &[]),
    ("LUX", "LU", "Luxembourg", &[]),
    ("MAC", "MO", "Macao", &["macau", "macao sar, china", "china, macao sar"]),
    ("MDG", "MG", "Madagascar", &[]),
    ("MWI", "MW", "Malawi", &[]),
    ("MYS", "MY", "Malaysia", &[]),
    ("MDV", "MV", "Maldives", &[]),
    ("MLI", "ML", "Mali", &[]),
    ("MLT", "MT", "Malta", &[]),
    ("MHL", "MH", "Marshall Islands", &[]),
    ("MTQ", "MQ", "Martinique", &[]),
    ("MRT", "MR", "Mauritania", &[]),
    ("MUS", "MU", "Mauritius", &[]),
    ("MYT", "YT", "Mayotte", &[]),
    ("MEX", "MX", "Mexico", &[]),
    ("FSM", "FM", "Micronesia", &["micronesia, fed. sts.", "micronesia (federated states of)", "micronesia (country)"]),
    ("MDA", "MD", "Moldova", &["republic of moldova"]),
    ("MCO", "MC", "Monaco", &[]),
    ("MNG", "MN", "Mongolia", &[]),
    ("MNE", "ME", "Montenegro", &[]),
    ("MSR", "MS", "Montserrat", &[]),
    ("MAR", "MA", "Morocco", &[]),
    ("MOZ", "MZ", "Mozambique", &[]),
    ("MMR", "MM", "Myanmar", &["burma"]),
    ("NAM", "NA", "Namibia", &[]),
    ("NRU", "NR", "Nauru", &[]),
    ("NPL", "NP", "Nepal", &[]),
    ("NLD", "NL", "Netherlands", &["netherlands (kingdom of the)", "paises bajos"]),
    ("NCL", "NC", "New Caledonia", &[]),
    ("NZL", "NZ", "New Zealand", &["nueva zelandia"]),
    ("NIC", "NI", "Nicaragua", &[]),
    ("NER", "NE", "Niger", &[]),
    ("NGA", "NG", "Nigeria", &[]),
    ("NIU", "NU", "Niue", &[]),
    ("NFK", "NF", "Norfolk Island", &[]),
    ("PRK", "KP", "North Korea", &["korea, dem. people's rep.", "democratic people's republic of korea", "korea, democratic people's republic of"]),
    ("MKD", "MK", "North Macedonia", &["macedonia", "north macedonia, republic of"]),
    ("MNP", "MP", "Northern Mariana Islands", &[]),
    ("NOR", "NO", "Norway", &["noruega"]),
    ("OMN", "OM", "Oman", &[]),
    ("PAK", "PK", "Pakistan", &[]),
    ("PLW", "PW", "Palau", &[]),
    ("PSE", "PS", "Palestine", &["west bank and gaza", "state of palestine"]),
    ("PAN", "PA", "Panama", &[]),
    ("PNG", "PG", "Papua New Guinea", &[]),
    ("PRY", "PY", "Paraguay", &[]),
    ("PER", "PE", "Peru", &[]),
    ("PHL", "PH", "Philippines", &[]),
    ("PCN", "PN", "Pitcairn", &[]),
    ("POL", "PL", "Poland", &[]),
    ("PRT", "PT", "Portugal", &[]),
    ("PRI", "PR", "Puerto Rico", &[]),
    ("QAT", "QA", "Qatar", &[]),
    ("REU", "RE", "Reunion", &[]),
    ("ROU", "RO", "Romania", &[]),
    ("RUS", "RU", "Russia", &["russian federation"]),
    ("RWA", "RW", "Rwanda", &[]),
    ("BLM", "BL", "Saint Barthelemy", &[]),
    ("SHN", "SH", "Saint Helena", &["saint helena, ascension and tristan da cunha"]),
    ("KNA", "KN", "Saint Kitts and Nevis", &["st. kitts and nevis", "saint kitts y nevis"]),
    ("LCA", "LC", "Saint Lucia", &["st. lucia", "santa lucia"]),
    ("MAF", "MF", "Saint Martin (French part)", &["st. martin (french part)"]),
    ("SPM", "PM", "Saint Pierre and Miquelon", &[]),
    ("VCT", "VC", "Saint Vincent and the Grenadines", &["st. vincent and the grenadines", "san vicente y las granadinas"]),
    ("WSM", "WS", "Samoa", &[]),
    ("SMR", "SM", "San Marino", &[]),
    ("STP", "ST", "Sao Tome and Principe", &[]),
    ("SAU", "SA", "Saudi Arabia", &[]),
    ("SEN", "SN", "Senegal", &[]),
    ("SRB", "RS", "Serbia", &[]),
    ("SYC", "SC", "Seychelles", &[]),
    ("SLE", "SL", "Sierra Leone", &[]),
    ("SGP", "SG", "Singapore", &[]),
    ("SXM", "SX", "Sint Maarten (Dutch part)", &["sint maarten"]),
    ("SVK", "SK", "Slovakia", &["slovak republic"]),
    ("SVN", "SI", "Slovenia", &[]),
    ("SLB", "SB", "Solomon Islands", &[]),
    ("SOM", "SO", "Somalia", &[]),
    ("ZAF", "ZA", "South Africa", &["sudafrica"]),
    ("SGS", "GS", "South Georgia and the South Sandwich Islands", &[]),
    ("KOR", "KR", "South Korea", &["korea, rep.", "korea", "republic of korea", "korea, republic of"]),
    ("SSD", "SS", "South Sudan", &[]),
    ("ESP", "ES", "Spain", &["espana"]),
    ("LKA", "LK", "Sri Lanka", &[]),
    ("SDN", "SD", "Sudan", &[]),
    ("SUR", "SR", "Suriname", &[]),
    ("SJM", "SJ", "Svalbard and Jan Mayen", &[]),
    ("SWE", "SE", "Sweden", &["suecia"]),
    ("CHE", "CH", "Switzerland", &["suiza"]),
    ("SYR", "SY", "Syria", &["syrian arab republic"]),
    ("TWN", "TW", "Taiwan", &["taiwan, china", "taiwan province of china"]),
    ("TJK", "TJ", "Tajikistan", &[]),
    ("TZA", "TZ", "Tanzania", &["united republic of tanzania", "tanzania, united republic of"]),
    ("THA", "TH", "Thailand", &[]),
    ("TLS", "TL", "Timor-Leste", &["east timor"]),
    ("TGO", "TG", "Togo", &[]),
    ("TKL", "TK", "Tokelau", &[]),
    ("TON", "TO", "Tonga", &[]),
    ("TTO", "TT", "Trinidad and Tobago", &["trinidad y tabago", "trinidad y tobago"]),
    ("TUN", "TN", "Tunisia", &[]),
    ("TUR", "TR", "Turkey", &["turkiye", "türkiye"]),
    ("TKM", "TM", "Turkmenistan", &[]),
    ("TCA", "TC", "Turks and Caicos Islands", &[]),
    ("TUV", "TV", "Tuvalu", &[]),
    ("UGA", "UG", "Uganda", &[]),
    ("UKR", "UA", "Ukraine", &[]),
    ("ARE", "AE", "United Arab Emirates", &[]),
    ("GBR", "GB", "United Kingdom", &["uk", "great britain", "reino unido"]),
    ("USA", "US", "United States", &["united states of america", "us", "usa", "estados unidos"]),
    ("UMI", "UM", "United States Minor Outlying Islands", &[]),
    ("VIR", "VI", "United States Virgin Islands", &["virgin islands (u.s.)", "us virgin islands"]),
    ("URY", "UY", "Uruguay", &[]),
    ("UZB", "UZ", "Uzbekistan", &[]),
    ("VUT", "VU", "Vanuatu", &[]),
    ("VEN", "VE", "Venezuela", &["venezuela, rb", "venezuela (bolivarian republic of)", "republica bolivariana de venezuela", "venezuela (republica bolivariana de)"]),
    ("VNM", "VN", "Vietnam", &["viet nam"]),
    ("WLF", "WF", "Wallis and Futuna", &[]),
    ("ESH", "EH", "Western Sahara", &[]),
    ("YEM", "YE", "Yemen", &["yemen, rep."]),
    ("ZMB", "ZM", "Zambia", &[]),
    ("ZWE", "ZW", "Zimbabwe", &[]),
    ("ALA", "AX", "Åland Islands", &["aland islands"]),
];

/// Lowercase, strip accents and punctuation noise, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            '_' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Name → ISO-3 lookup shared by adapters and the cleaner.
#[derive(Debug, Clone)]
pub struct CountryLookup {
    /// ISO-3 → display name.
    names: HashMap<String, String>,
    /// ISO-2 → ISO-3.
    alpha2: HashMap<String, String>,
    /// Normalized name or alias → ISO-3.
    by_name: HashMap<String, String>,
}

impl CountryLookup {
    /// Create a lookup preloaded with the built-in country table.
    pub fn builtin() -> Self {
        let mut lookup = Self {
            names: HashMap::new(),
            alpha2: HashMap::new(),
            by_name: HashMap::new(),
        };

        for (iso3, iso2, name, aliases) in BUILTIN_COUNTRIES {
            lookup.names.insert(iso3.to_string(), name.to_string());
            lookup.alpha2.insert(iso2.to_string(), iso3.to_string());
            lookup.by_name.insert(normalize_name(name), iso3.to_string());
            for alias in *aliases {
                lookup.by_name.insert(normalize_name(alias), iso3.to_string());
            }
        }

        lookup
    }

    /// Add extra `name → ISO-3` aliases (e.g. from configuration).
    ///
    /// Aliases pointing at codes the table does not know register the code too.
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, iso3) in aliases {
            let iso3 = iso3.as_ref().trim().to_uppercase();
            self.names
                .entry(iso3.clone())
                .or_insert_with(|| name.as_ref().trim().to_string());
            self.by_name.insert(normalize_name(name.as_ref()), iso3);
        }
        self
    }

    /// Resolve a code or display name to ISO-3.
    pub fn resolve(&self, value: &str) -> Option<&str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            let upper = trimmed.to_ascii_uppercase();
            if let Some((code, _)) = self.names.get_key_value(&upper) {
                return Some(code.as_str());
            }
        }

        if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            if let Some(code) = self.alpha2.get(&trimmed.to_ascii_uppercase()) {
                return Some(code.as_str());
            }
        }

        self.by_name
            .get(&normalize_name(trimmed))
            .map(|code| code.as_str())
    }

    /// Display name for an ISO-3 code.
    pub fn name(&self, iso3: &str) -> Option<&str> {
        self.names
            .get(&iso3.trim().to_ascii_uppercase())
            .map(|s| s.as_str())
    }

    /// Resolve every entry, passing unresolved values through unchanged.
    ///
    /// Returns the resolved list and the values that could not be mapped.
    pub fn resolve_all(&self, values: &[String]) -> (Vec<String>, Vec<String>) {
        let mut resolved = Vec::with_capacity(values.len());
        let mut unresolved = Vec::new();
        for value in values {
            match self.resolve(value) {
                Some(code) => resolved.push(code.to_string()),
                None => {
                    unresolved.push(value.clone());
                    resolved.push(value.trim().to_string());
                }
            }
        }
        (resolved, unresolved)
    }

    /// Number of known ISO-3 codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CountryLookup {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_codes_and_names() {
        let lookup = CountryLookup::builtin();
        assert_eq!(lookup.resolve("ARG"), Some("ARG"));
        assert_eq!(lookup.resolve("bra"), Some("BRA"));
        assert_eq!(lookup.resolve("CL"), Some("CHL"));
        assert_eq!(lookup.resolve("Argentina"), Some("ARG"));
        assert_eq!(lookup.resolve("  brazil "), Some("BRA"));
        assert_eq!(lookup.resolve("México"), Some("MEX"));
        assert_eq!(lookup.resolve("Korea, Rep."), Some("KOR"));
        assert_eq!(lookup.resolve("Bolivia (Plurinational State of)"), Some("BOL"));
    }

    #[test]
    fn test_full_iso_table() {
        let lookup = CountryLookup::builtin();
        assert_eq!(lookup.len(), 249);
        for (iso3, iso2, name, _) in BUILTIN_COUNTRIES {
            assert_eq!(lookup.resolve(iso3), Some(*iso3));
            assert_eq!(lookup.resolve(iso2), Some(*iso3), "alpha-2 {}", iso2);
            assert_eq!(lookup.resolve(name), Some(*iso3), "name {}", name);
        }
        assert_eq!(lookup.resolve("afg"), Some("AFG"));
        assert_eq!(lookup.resolve("Congo, Dem. Rep."), Some("COD"));
        assert_eq!(lookup.resolve("Côte d'Ivoire"), Some("CIV"));
    }

    #[test]
    fn test_unresolved_names() {
        let lookup = CountryLookup::builtin();
        assert_eq!(lookup.resolve("World"), None);
        assert_eq!(lookup.resolve("Latin America & Caribbean"), None);
        assert_eq!(lookup.resolve(""), None);
        // Three letters but not a known code.
        assert_eq!(lookup.resolve("XYZ"), None);
    }

    #[test]
    fn test_with_aliases() {
        let lookup = CountryLookup::builtin().with_aliases([("Kosovo", "XKX"), ("Brasil (BR)", "BRA")]);
        assert_eq!(lookup.resolve("kosovo"), Some("XKX"));
        assert_eq!(lookup.resolve("XKX"), Some("XKX"));
        assert_eq!(lookup.resolve("brasil (br)"), Some("BRA"));
        assert_eq!(lookup.name("BRA"), Some("Brazil"));
    }

    #[test]
    fn test_resolve_all_passes_unknowns_through() {
        let lookup = CountryLookup::builtin();
        let (resolved, unresolved) =
            lookup.resolve_all(&["Argentina".to_string(), "Atlantis".to_string()]);
        assert_eq!(resolved, vec!["ARG", "Atlantis"]);
        assert_eq!(unresolved, vec!["Atlantis"]);
    }
}
