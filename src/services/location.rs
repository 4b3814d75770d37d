// src/services/location.rs
// DOCUMENTATION: Korean administrative-area parsing helpers
// PURPOSE: Break an address into 시/구/동 parts and build search keywords

/// Parsed region parts of a Korean address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLocation {
    /// 시/도 (e.g. 서울시)
    pub city: String,
    /// 구/군 (e.g. 광진구)
    pub district: String,
    /// 동/읍/면/리 (e.g. 구의동)
    pub dong: String,
    /// Normalized full address
    pub full_address: String,
}

/// 시/도 names Kakao uses in addresses, with their standardized short forms
const CITY_FORMS: [(&str, &str); 17] = [
    ("서울특별시", "서울시"),
    ("부산광역시", "부산시"),
    ("대구광역시", "대구시"),
    ("인천광역시", "인천시"),
    ("광주광역시", "광주시"),
    ("대전광역시", "대전시"),
    ("울산광역시", "울산시"),
    ("세종특별자치시", "세종시"),
    ("경기도", "경기도"),
    ("강원도", "강원도"),
    ("충청북도", "충청북도"),
    ("충청남도", "충청남도"),
    ("전라북도", "전라북도"),
    ("전라남도", "전라남도"),
    ("경상북도", "경상북도"),
    ("경상남도", "경상남도"),
    ("제주특별자치도", "제주특별자치도"),
];

/// Standardize a 시/도 name (서울특별시 -> 서울시)
/// Already-short forms pass through unchanged
pub fn standardize_city(city: &str) -> String {
    for (full, short) in CITY_FORMS {
        if city == full || city == short {
            return short.to_string();
        }
    }
    city.to_string()
}

/// Parse a Kakao address into region parts
/// DOCUMENTATION: Token-based scan - the first token matching a known 시/도
/// becomes the city, the first 구/군 suffix the district, the first
/// 동/읍/면/리 suffix the dong. Lot numbers and road names are ignored.
pub fn parse_location(address: &str) -> ParsedLocation {
    let normalized = address.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return ParsedLocation::default();
    }

    let mut city = String::new();
    let mut district = String::new();
    let mut dong = String::new();

    for token in normalized.split(' ') {
        if city.is_empty() {
            let standardized = standardize_city(token);
            if CITY_FORMS.iter().any(|(_, short)| *short == standardized) {
                city = standardized;
                continue;
            }
        }

        if district.is_empty() && (token.ends_with('구') || token.ends_with('군')) {
            district = token.to_string();
            continue;
        }

        if dong.is_empty()
            && (token.ends_with('동')
                || token.ends_with('읍')
                || token.ends_with('면')
                || token.ends_with('리'))
        {
            dong = token.to_string();
        }
    }

    ParsedLocation {
        city,
        district,
        dong,
        full_address: normalized,
    }
}

/// Build deduplicated search keywords for an address or area name
/// DOCUMENTATION: Individual parts plus the useful combinations, in
/// specific-first order; falls back to the raw input when nothing parses
pub fn search_keywords(address: &str) -> Vec<String> {
    let parsed = parse_location(address);
    let mut keywords: Vec<String> = Vec::new();

    if !parsed.city.is_empty() && !parsed.district.is_empty() {
        push_unique(&mut keywords, format!("{} {}", parsed.city, parsed.district));
    }
    if !parsed.district.is_empty() && !parsed.dong.is_empty() {
        push_unique(
            &mut keywords,
            format!("{} {}", parsed.district, parsed.dong),
        );
    }
    push_unique(&mut keywords, parsed.district);
    push_unique(&mut keywords, parsed.dong);
    push_unique(&mut keywords, parsed.city);

    if keywords.is_empty() {
        push_unique(&mut keywords, parsed.full_address);
    }

    keywords
}

fn push_unique(keywords: &mut Vec<String>, keyword: String) {
    if !keyword.is_empty() && !keywords.contains(&keyword) {
        keywords.push(keyword);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_address() {
        let parsed = parse_location("서울특별시 광진구 구의동 123-45");
        assert_eq!(parsed.city, "서울시");
        assert_eq!(parsed.district, "광진구");
        assert_eq!(parsed.dong, "구의동");
        assert_eq!(parsed.full_address, "서울특별시 광진구 구의동 123-45");
    }

    #[test]
    fn test_parse_short_city_form() {
        let parsed = parse_location("서울시 성동구 성수1동");
        assert_eq!(parsed.city, "서울시");
        assert_eq!(parsed.district, "성동구");
        assert_eq!(parsed.dong, "성수1동");
    }

    #[test]
    fn test_parse_road_address_has_no_dong() {
        let parsed = parse_location("서울특별시 강남구 테헤란로 789");
        assert_eq!(parsed.city, "서울시");
        assert_eq!(parsed.district, "강남구");
        assert_eq!(parsed.dong, "");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_location(""), ParsedLocation::default());
        assert_eq!(parse_location("   "), ParsedLocation::default());
    }

    #[test]
    fn test_standardize_city() {
        assert_eq!(standardize_city("서울특별시"), "서울시");
        assert_eq!(standardize_city("부산광역시"), "부산시");
        assert_eq!(standardize_city("경기도"), "경기도");
        // Unknown names pass through
        assert_eq!(standardize_city("뉴욕"), "뉴욕");
    }

    #[test]
    fn test_search_keywords_specific_first_and_deduplicated() {
        let keywords = search_keywords("서울특별시 광진구 구의동 123-45");
        assert_eq!(
            keywords,
            vec![
                "서울시 광진구".to_string(),
                "광진구 구의동".to_string(),
                "광진구".to_string(),
                "구의동".to_string(),
                "서울시".to_string(),
            ]
        );
    }

    #[test]
    fn test_search_keywords_fallback_to_raw_input() {
        let keywords = search_keywords("Gangnam Station");
        assert_eq!(keywords, vec!["Gangnam Station".to_string()]);
    }
}
