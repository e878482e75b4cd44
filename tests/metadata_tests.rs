use chrono::{Local, NaiveDate};
use filingintel::metadata::{
    detect_announcement_type, extract_company, extract_date_from_url, extract_date_from_url_or,
    extract_metadata, extract_symbol, guess_sector,
};

#[cfg(test)]
mod company_tests {
    use super::*;

    #[test]
    fn test_company_with_corporate_suffix() {
        assert_eq!(
            extract_company("Disclosure by Tata Steel Limited under Regulation 30"),
            "Tata Steel Limited"
        );
        assert_eq!(extract_company("Reliance Industries informs the exchange"), "Reliance Industries");
        assert_eq!(extract_company("Update from Infosys Ltd today"), "Infosys Ltd");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_company("Alpha Corporation acquires Beta Limited"),
            "Alpha Corporation"
        );
    }

    #[test]
    fn test_unknown_company() {
        assert_eq!(extract_company("no capitalised suffix here"), "Unknown");
        // All-caps names do not fit the pattern
        assert_eq!(extract_company("TCS LIMITED"), "Unknown");
    }
}

#[cfg(test)]
mod sector_tests {
    use super::*;

    #[test]
    fn test_sector_keywords_are_case_insensitive() {
        assert_eq!(guess_sector("Leading PHARMACEUTICAL maker"), "Healthcare");
        assert_eq!(guess_sector("specialty chemicals producer"), "Specialty Chemicals");
        assert_eq!(guess_sector("Thermal POWER generation"), "Energy");
    }

    #[test]
    fn test_short_keyword_matches_inside_words() {
        // "it" appears inside "profit"
        assert_eq!(guess_sector("net profit grew"), "Technology");
    }

    #[test]
    fn test_unknown_sector() {
        assert_eq!(guess_sector("Annual general meeting"), "Unknown");
    }
}

#[cfg(test)]
mod symbol_tests {
    use super::*;

    #[test]
    fn test_symbol_from_url_underscore() {
        assert_eq!(
            extract_symbol("https://archives.example.com/corporate/RELIANCE_17052024.pdf", ""),
            "RELIANCE"
        );
    }

    #[test]
    fn test_symbol_from_companies_path() {
        assert_eq!(
            extract_symbol("https://www.screener.in/companies/INFY/consolidated/", ""),
            "INFY"
        );
    }

    #[test]
    fn test_symbol_from_bse_mention() {
        assert_eq!(
            extract_symbol("https://example.com/news/item", "Listed on BSE: SUNPHARMA and NSE"),
            "SUNPHARMA"
        );
    }

    #[test]
    fn test_url_takes_precedence_over_text() {
        assert_eq!(
            extract_symbol("https://example.com/TCS_results.pdf", "BSE: INFY"),
            "TCS"
        );
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(extract_symbol("https://example.com/news", "nothing"), "Unknown");
    }
}

#[cfg(test)]
mod announcement_tests {
    use super::*;

    #[test]
    fn test_keywords_checked_in_order() {
        assert_eq!(detect_announcement_type("Capacity EXPANSION and a dividend"), "Expansion");
        assert_eq!(detect_announcement_type("Board declares interim dividend"), "Dividend");
        assert_eq!(detect_announcement_type("Completion of acquisition"), "Merger/Acquisition");
        assert_eq!(detect_announcement_type("Received a new contract"), "Order Win");
        assert_eq!(detect_announcement_type("Quarterly results"), "Financial Result");
        assert_eq!(detect_announcement_type("Approval of buyback"), "Buyback");
        assert_eq!(detect_announcement_type("Formation of a joint venture"), "JV/Partnership");
    }

    #[test]
    fn test_general_when_nothing_matches() {
        assert_eq!(detect_announcement_type("Change in company secretary"), "General");
    }
}

#[cfg(test)]
mod date_tests {
    use super::*;

    fn fallback() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    #[test]
    fn test_date_formats_in_url() {
        assert_eq!(extract_date_from_url_or("https://x.com/2024-05-17/a.pdf", fallback()), "2024-05-17");
        assert_eq!(extract_date_from_url_or("https://x.com/2024/05/17/a.html", fallback()), "2024-05-17");
        assert_eq!(extract_date_from_url_or("https://x.com/ann_20240517.pdf", fallback()), "2024-05-17");
    }

    #[test]
    fn test_date_falls_back_to_today() {
        assert_eq!(extract_date_from_url_or("https://x.com/latest", fallback()), "2025-01-31");
        assert_eq!(
            extract_date_from_url("https://x.com/latest"),
            Local::now().date_naive().format("%Y-%m-%d").to_string()
        );
    }
}

#[test]
fn test_extract_metadata_bundles_all_fields() {
    let metadata = extract_metadata(
        "https://example.com/HDFCBANK_2024-04-20.pdf",
        "HDFC Bank Limited reports quarterly results",
    );

    assert_eq!(metadata.symbol, "HDFCBANK");
    assert_eq!(metadata.company, "Bank Limited");
    assert_eq!(metadata.sector, "Financials");
    assert_eq!(metadata.date, "2024-04-20");
    assert_eq!(metadata.announcement_type, "Financial Result");
}
