//! Display URL derivation for listed images

use crate::models::{ImageRecord, ImageSummary, Resolution};
use std::collections::BTreeMap;

/// Append `width` and `height` query parameters set to `size`.
///
/// Purely textual: `&` is used when the URL already has a `?`, otherwise `?`.
pub fn derive_resized_url(base_url: &str, size: u32) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}width={}&height={}", base_url, separator, size, size)
}

/// Build the caller-facing summary from a backend record.
///
/// Returns `None` when the record has no variants to display.
pub fn summarize(record: ImageRecord) -> Option<ImageSummary> {
    let uri = record.variants.into_iter().next()?;

    let resolutions: BTreeMap<String, String> = Resolution::ALL
        .iter()
        .map(|r| (r.label().to_string(), derive_resized_url(&uri, r.size())))
        .collect();

    tracing::debug!("Built resolutions for image {}: {:?}", record.id, resolutions);

    Some(ImageSummary {
        id: record.id,
        uri,
        resolutions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_without_query() {
        assert_eq!(
            derive_resized_url("https://cdn.example/abc", 500),
            "https://cdn.example/abc?width=500&height=500"
        );
    }

    #[test]
    fn test_derive_with_existing_query() {
        let url = derive_resized_url("https://cdn.example/abc?x=1", 250);
        assert_eq!(url, "https://cdn.example/abc?x=1&width=250&height=250");
        assert_eq!(url.matches('?').count(), 1);
    }

    #[test]
    fn test_summarize_uses_first_variant() {
        let record = ImageRecord {
            id: "img-1".to_string(),
            variants: vec![
                "https://cdn.example/img-1/public".to_string(),
                "https://cdn.example/img-1/thumb".to_string(),
            ],
        };

        let summary = summarize(record).unwrap();
        assert_eq!(summary.uri, "https://cdn.example/img-1/public");

        let expected: BTreeMap<String, String> = [
            ("250px", "https://cdn.example/img-1/public?width=250&height=250"),
            ("500px", "https://cdn.example/img-1/public?width=500&height=500"),
            ("750px", "https://cdn.example/img-1/public?width=750&height=750"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(summary.resolutions, expected);
    }

    #[test]
    fn test_summarize_without_variants() {
        let record = ImageRecord {
            id: "empty".to_string(),
            variants: vec![],
        };
        assert!(summarize(record).is_none());
    }
}
