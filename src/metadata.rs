use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

pub const UNKNOWN: &str = "Unknown";
pub const GENERAL: &str = "General";

// Capitalised words followed by a corporate suffix, e.g. "Tata Steel Limited"
static COMPANY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-z]+(?: [A-Z][a-z]+)* (?:Limited|Ltd|Industries|Corporation))").unwrap()
});

static URL_SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([A-Z]{1,10})_").unwrap());
static URL_COMPANIES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/companies/([A-Z]{1,10})").unwrap());
static BSE_SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"BSE[:\s]+([A-Z]{1,10})").unwrap());

static URL_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})[-/]?(\d{2})[-/]?(\d{2})").unwrap());

// Checked in order; the first keyword found wins.
const SECTOR_KEYWORDS: &[(&str, &str)] = &[
    ("Pharma", "Healthcare"),
    ("Chemical", "Specialty Chemicals"),
    ("Bank", "Financials"),
    ("Power", "Energy"),
    ("Steel", "Metals"),
    ("Auto", "Automobile"),
    ("IT", "Technology"),
    ("Software", "Technology"),
    ("Retail", "Consumer"),
    ("FMCG", "Consumer Staples"),
];

const ANNOUNCEMENT_KEYWORDS: &[(&str, &str)] = &[
    ("expansion", "Expansion"),
    ("capex", "Capex"),
    ("dividend", "Dividend"),
    ("merger", "Merger/Acquisition"),
    ("acquisition", "Merger/Acquisition"),
    ("order", "Order Win"),
    ("contract", "Order Win"),
    ("plant", "Capacity/Infra"),
    ("result", "Financial Result"),
    ("profit", "Financial Result"),
    ("loss", "Financial Result"),
    ("bonus", "Bonus/Split"),
    ("buyback", "Buyback"),
    ("joint venture", "JV/Partnership"),
];

/// Heuristic metadata derived from a filing's URL and text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FilingMetadata {
    pub symbol: String,
    pub company: String,
    pub sector: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub announcement_type: String,
}

pub fn extract_metadata(url: &str, text: &str) -> FilingMetadata {
    FilingMetadata {
        symbol: extract_symbol(url, text),
        company: extract_company(text),
        sector: guess_sector(text),
        date: extract_date_from_url(url),
        announcement_type: detect_announcement_type(text),
    }
}

pub fn extract_company(text: &str) -> String {
    COMPANY_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn guess_sector(text: &str) -> String {
    let lower = text.to_lowercase();
    SECTOR_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(&keyword.to_lowercase()))
        .map(|(_, sector)| sector.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Ticker from the URL (`/SYMBOL_...` or `/companies/SYMBOL`), falling back to
/// a `BSE: SYMBOL` mention in the text.
pub fn extract_symbol(url: &str, text: &str) -> String {
    URL_SYMBOL_RE
        .captures(url)
        .or_else(|| URL_COMPANIES_RE.captures(url))
        .or_else(|| BSE_SYMBOL_RE.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn detect_announcement_type(text: &str) -> String {
    let lower = text.to_lowercase();
    ANNOUNCEMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, kind)| kind.to_string())
        .unwrap_or_else(|| GENERAL.to_string())
}

/// First `YYYY[-/]MM[-/]DD` in the URL, or today's local date.
pub fn extract_date_from_url(url: &str) -> String {
    extract_date_from_url_or(url, Local::now().date_naive())
}

pub fn extract_date_from_url_or(url: &str, today: NaiveDate) -> String {
    match URL_DATE_RE.captures(url) {
        Some(caps) => format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => today.format("%Y-%m-%d").to_string(),
    }
}
