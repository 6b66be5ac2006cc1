//! Listing output for the non-interactive modes.

use crate::model::AppRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Pre-formatted lines for `--list`.
pub(crate) struct TextListing {
    pub lines: Vec<String>,
}

/// One `name<TAB>identifier` line per app, in the order given.
pub(crate) fn build_text_listing(apps: &[AppRecord]) -> TextListing {
    let lines = apps
        .iter()
        .map(|a| format!("{}\t{}", a.display_name, a.identifier))
        .collect();
    TextListing { lines }
}

#[derive(Serialize)]
struct ListingReport<'a> {
    generated_at: String,
    count: usize,
    apps: &'a [AppRecord],
}

/// Pretty JSON document for `--json`.
pub(crate) fn build_json_listing(apps: &[AppRecord], now: OffsetDateTime) -> Result<String> {
    let report = ListingReport {
        generated_at: now.format(&Rfc3339).context("format timestamp")?,
        count: apps.len(),
        apps,
    };
    serde_json::to_string_pretty(&report).context("encode app listing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn text_listing_is_tab_separated_and_keeps_order() {
        let apps = vec![
            AppRecord::new("Alpha", "pkg.a.desktop"),
            AppRecord::new("Zeta", "pkg.z.desktop"),
        ];
        let listing = build_text_listing(&apps);
        assert_eq!(
            listing.lines,
            vec!["Alpha\tpkg.a.desktop", "Zeta\tpkg.z.desktop"]
        );
        assert!(build_text_listing(&[]).lines.is_empty());
    }

    #[test]
    fn json_listing_carries_timestamp_and_records() {
        let apps = vec![AppRecord::new("Alpha", "pkg.a.desktop")];
        let json = build_json_listing(&apps, datetime!(2024-01-15 14:30:45 UTC)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["generated_at"], "2024-01-15T14:30:45Z");
        assert_eq!(v["count"], 1);
        assert_eq!(v["apps"][0]["display_name"], "Alpha");
        assert_eq!(v["apps"][0]["identifier"], "pkg.a.desktop");
        assert!(v["apps"][0]["icon"].is_null());
    }

    #[test]
    fn json_count_matches_apps_length() {
        let apps = vec![
            AppRecord::new("Alpha", "pkg.a.desktop"),
            AppRecord::new("Alpha", "pkg.a.desktop"),
        ];
        let json = build_json_listing(&apps, datetime!(2024-01-15 14:30:45 UTC)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["count"], 2);
        assert_eq!(v["apps"].as_array().map(Vec::len), Some(2));

        let empty = build_json_listing(&[], datetime!(2024-01-15 14:30:45 UTC)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&empty).unwrap();
        assert_eq!(v["count"], 0);
        assert_eq!(v["apps"], serde_json::json!([]));
    }
}
