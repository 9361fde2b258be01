//! Android density buckets.
//!
//! Android picks drawables at runtime from `res/drawable-<bucket>/` based on
//! the device's screen density. Every bucket is a fixed multiple of the
//! baseline `mdpi` (160 dpi) density:
//!
//! | Bucket | Scale | Folder |
//! |---|---|---|
//! | ldpi | 0.75 | `drawable-ldpi` |
//! | mdpi | 1.0 | `drawable-mdpi` |
//! | hdpi | 1.5 | `drawable-hdpi` |
//! | xhdpi | 2.0 | `drawable-xhdpi` |
//! | xxhdpi | 3.0 | `drawable-xxhdpi` |
//! | xxxhdpi | 4.0 | `drawable-xxxhdpi` |
//!
//! The table is compiled in. A bucket cannot be constructed outside of it, so
//! lookups are total; only parsing user text can fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named Android density tier.
///
/// Variants are declared from lowest to highest density, so the derived
/// `Ord` sorts reports and selections the way Android tooling lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityBucket {
    Ldpi,
    Mdpi,
    Hdpi,
    Xhdpi,
    Xxhdpi,
    Xxxhdpi,
}

/// One row of the density table.
struct DensityInfo {
    name: &'static str,
    scale_factor: f64,
    folder_name: &'static str,
}

static TABLE: [DensityInfo; 6] = [
    DensityInfo {
        name: "ldpi",
        scale_factor: 0.75,
        folder_name: "drawable-ldpi",
    },
    DensityInfo {
        name: "mdpi",
        scale_factor: 1.0,
        folder_name: "drawable-mdpi",
    },
    DensityInfo {
        name: "hdpi",
        scale_factor: 1.5,
        folder_name: "drawable-hdpi",
    },
    DensityInfo {
        name: "xhdpi",
        scale_factor: 2.0,
        folder_name: "drawable-xhdpi",
    },
    DensityInfo {
        name: "xxhdpi",
        scale_factor: 3.0,
        folder_name: "drawable-xxhdpi",
    },
    DensityInfo {
        name: "xxxhdpi",
        scale_factor: 4.0,
        folder_name: "drawable-xxxhdpi",
    },
];

impl DensityBucket {
    /// Every bucket, lowest density first.
    pub const ALL: [DensityBucket; 6] = [
        DensityBucket::Ldpi,
        DensityBucket::Mdpi,
        DensityBucket::Hdpi,
        DensityBucket::Xhdpi,
        DensityBucket::Xxhdpi,
        DensityBucket::Xxxhdpi,
    ];

    fn info(self) -> &'static DensityInfo {
        &TABLE[self as usize]
    }

    /// Short bucket name, e.g. `"xhdpi"`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Scale relative to mdpi.
    pub fn scale_factor(self) -> f64 {
        self.info().scale_factor
    }

    /// Output folder name, e.g. `"drawable-xhdpi"`.
    pub fn folder_name(self) -> &'static str {
        self.info().folder_name
    }

    /// `(scale_factor, folder_name)` for a bucket.
    pub fn lookup(self) -> (f64, &'static str) {
        let info = self.info();
        (info.scale_factor, info.folder_name)
    }

    /// Scale to apply to artwork drawn at `source` to produce this bucket.
    ///
    /// Always relative: artwork drawn at xhdpi exported to ldpi is scaled by
    /// `0.75 / 2.0`, not by `0.75`.
    pub fn scale_from(self, source: DensityBucket) -> f64 {
        self.scale_factor() / source.scale_factor()
    }
}

impl fmt::Display for DensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown density '{0}' (expected one of: ldpi, mdpi, hdpi, xhdpi, xxhdpi, xxxhdpi)")]
pub struct ParseDensityError(pub String);

impl FromStr for DensityBucket {
    type Err = ParseDensityError;

    /// Accepts the bucket name or its folder name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let name = trimmed.strip_prefix("drawable-").unwrap_or(&trimmed);
        DensityBucket::ALL
            .into_iter()
            .find(|bucket| bucket.name() == name)
            .ok_or_else(|| ParseDensityError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_line_up_with_variants() {
        for bucket in DensityBucket::ALL {
            assert_eq!(bucket.folder_name(), format!("drawable-{}", bucket.name()));
        }
    }

    #[test]
    fn canonical_scale_factors() {
        let factors: Vec<f64> = DensityBucket::ALL
            .iter()
            .map(|b| b.scale_factor())
            .collect();
        assert_eq!(factors, vec![0.75, 1.0, 1.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn lookup_returns_factor_and_folder() {
        assert_eq!(DensityBucket::Xhdpi.lookup(), (2.0, "drawable-xhdpi"));
        assert_eq!(DensityBucket::Ldpi.lookup(), (0.75, "drawable-ldpi"));
    }

    #[test]
    fn ordering_is_lowest_density_first() {
        let mut shuffled = vec![
            DensityBucket::Xxxhdpi,
            DensityBucket::Ldpi,
            DensityBucket::Hdpi,
            DensityBucket::Mdpi,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                DensityBucket::Ldpi,
                DensityBucket::Mdpi,
                DensityBucket::Hdpi,
                DensityBucket::Xxxhdpi,
            ]
        );
    }

    #[test]
    fn scale_is_relative_to_source() {
        assert_eq!(DensityBucket::Hdpi.scale_from(DensityBucket::Mdpi), 1.5);
        assert_eq!(DensityBucket::Ldpi.scale_from(DensityBucket::Xhdpi), 0.375);
        assert_eq!(DensityBucket::Mdpi.scale_from(DensityBucket::Xxxhdpi), 0.25);
        assert_eq!(DensityBucket::Xhdpi.scale_from(DensityBucket::Xhdpi), 1.0);
    }

    #[test]
    fn parse_names_case_insensitively() {
        assert_eq!("xhdpi".parse::<DensityBucket>(), Ok(DensityBucket::Xhdpi));
        assert_eq!("XXHDPI".parse::<DensityBucket>(), Ok(DensityBucket::Xxhdpi));
        assert_eq!(" mdpi ".parse::<DensityBucket>(), Ok(DensityBucket::Mdpi));
    }

    #[test]
    fn parse_accepts_folder_names() {
        assert_eq!("drawable-ldpi".parse::<DensityBucket>(), Ok(DensityBucket::Ldpi));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "tvdpi".parse::<DensityBucket>().unwrap_err();
        assert_eq!(err, ParseDensityError("tvdpi".to_string()));
        assert!(err.to_string().contains("tvdpi"));
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(DensityBucket::Xxxhdpi.to_string(), "xxxhdpi");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DensityBucket::Xxhdpi).unwrap();
        assert_eq!(json, "\"xxhdpi\"");
        let parsed: DensityBucket = serde_json::from_str("\"hdpi\"").unwrap();
        assert_eq!(parsed, DensityBucket::Hdpi);
    }
}
