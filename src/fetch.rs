use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use select::document::Document;
use select::predicate::Text;
use url::Url;

use crate::error::AppError;

// Exchange sites reject the default reqwest agent
pub const SPOOFED_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36";

const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// Download `url` and return up to `max_chars` characters of readable text.
///
/// PDFs are detected by the `.pdf` suffix, an `application/pdf` content type or
/// the `%PDF-` magic bytes. Everything else is treated as HTML.
#[tracing::instrument(skip(client), fields(url = %url))]
pub async fn fetch_clean_text(client: &Client, url: &str, max_chars: usize) -> Result<String, AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::FetchError(format!("{}: invalid URL: {}", url, e)))?;

    let response = client
        .get(parsed)
        .header(USER_AGENT, SPOOFED_USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("HTTP error {} fetching document: {}", status, url);
        return Err(AppError::FetchError(format!("{}: server returned status {}", url, status)));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::FetchError(format!("{}: failed to read body: {}", url, e)))?;
    tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);

    // Both extractors are CPU bound
    let text = if is_pdf(url, content_type.as_deref(), &bytes) {
        let pdf_bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || extract_pdf_text(&pdf_bytes))
            .await
            .map_err(|e| AppError::FetchError(format!("{}: PDF extraction aborted: {}", url, e)))??
    } else {
        let html = decode_body(&bytes, content_type.as_deref())
            .map_err(|e| AppError::FetchError(format!("{}: {}", url, e)))?;
        tokio::task::spawn_blocking(move || html_to_text(&html))
            .await
            .map_err(|e| AppError::InternalError(format!("HTML extraction aborted: {}", e)))?
    };

    Ok(truncate_chars(&text, max_chars))
}

pub fn is_pdf(url: &str, content_type: Option<&str>, head: &[u8]) -> bool {
    let ct = content_type.unwrap_or("").to_ascii_lowercase();
    url.to_lowercase().ends_with(".pdf") || ct.contains("application/pdf") || head.starts_with(b"%PDF-")
}

/// `charset` parameter of a Content-Type header, if any.
pub fn charset_of(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"'))
}

/// Decode an HTML body with its declared charset, UTF-8 when none is given.
/// Bytes that are invalid in that encoding are an error, not replaced.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<String, String> {
    let encoding = match content_type.and_then(charset_of) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| format!("unsupported charset {:?}", label))?,
        None => UTF_8,
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(format!("body is not valid {}", used.name()));
    }
    Ok(text.into_owned())
}

/// Text of every page, in order. A document without any text is an error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::FetchError(format!("PDF: {}", e)))?;

    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument("No text found in PDF".to_string()));
    }
    Ok(text)
}

/// Visible text of an HTML page: script and style contents dropped, every
/// text node trimmed, empty ones skipped, the rest joined by single spaces.
pub fn html_to_text(html: &str) -> String {
    let document = Document::from(html);

    document
        .find(Text)
        .filter(|node| {
            let mut parent = node.parent();
            while let Some(p) = parent {
                if p.name().map_or(false, |name| SKIPPED_TAGS.contains(&name)) {
                    return false;
                }
                parent = p.parent();
            }
            true
        })
        .filter_map(|node| node.as_text().map(str::trim))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-page PDF with one line of Helvetica text, built with lopdf.
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET")
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn html_text_skips_script_and_style() {
        let html = r#"<html><head><title>Board Meeting</title>
            <style>body { color: red; }</style>
            <script>var tracking = "ignore me";</script></head>
            <body><h1>  Outcome of Board Meeting </h1><p>Dividend of <b>Rs 5</b> declared.</p></body></html>"#;

        let text = html_to_text(html);

        assert_eq!(text, "Board Meeting Outcome of Board Meeting Dividend of Rs 5 declared.");
        assert!(!text.contains("ignore me"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn html_text_of_empty_page_is_empty() {
        assert_eq!(html_to_text("<html><body>   </body></html>"), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "₹".repeat(10);
        let cut = truncate_chars(&text, 4);
        assert_eq!(cut.chars().count(), 4);
        assert_eq!(truncate_chars("short", 4000), "short");
    }

    #[test]
    fn pdf_detection() {
        assert!(is_pdf("https://example.com/FILING.PDF", None, b""));
        assert!(is_pdf("https://example.com/download?id=1", Some("application/pdf"), b""));
        assert!(is_pdf("https://example.com/download?id=1", None, b"%PDF-1.4 ..."));
        assert!(!is_pdf("https://example.com/news.html", Some("text/html; charset=utf-8"), b"<html>"));
    }

    #[test]
    fn extracts_text_from_digital_pdf() {
        let bytes = make_test_pdf("Quarterly results announced");
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(
            text.contains("Quarterly") || text.contains("results"),
            "unexpected PDF text: {text}"
        );
    }

    #[test]
    fn pdf_without_text_is_empty_document() {
        let bytes = make_test_pdf("");
        let err = extract_pdf_text(&bytes).unwrap_err();
        assert!(matches!(err, AppError::EmptyDocument(_)));
        assert_eq!(err.to_string(), "Error: No text found in PDF");
    }

    #[test]
    fn charset_parameter_is_found() {
        assert_eq!(charset_of("text/html; charset=windows-1252"), Some("windows-1252"));
        assert_eq!(charset_of("text/html;Charset=\"Shift_JIS\""), Some("Shift_JIS"));
        assert_eq!(charset_of("text/html"), None);
    }

    #[test]
    fn body_decoded_with_declared_charset() {
        let bytes = b"Soci\xe9t\xe9 G\xe9n\xe9rale";
        let text = decode_body(bytes, Some("text/html; charset=windows-1252")).unwrap();
        assert_eq!(text, "Soci\u{e9}t\u{e9} G\u{e9}n\u{e9}rale");
    }

    #[test]
    fn undecodable_body_is_an_error() {
        assert!(decode_body(b"Soci\xe9t\xe9", None).is_err());
        assert!(decode_body(b"plain", Some("text/html; charset=no-such-charset")).is_err());
    }

    #[test]
    fn invalid_pdf_is_an_error() {
        assert!(extract_pdf_text(b"not a pdf").is_err());
    }
}
