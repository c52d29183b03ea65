//! Rate classification into display buckets.

use serde::Serialize;

/// One of the six fixed heat-map bands: a fill color and a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateBucket {
    pub color: &'static str,
    pub label: &'static str,
}

const NO_DATA: RateBucket = RateBucket {
    color: "#e6e7e8",
    label: "No Data",
};

/// Classifies an average rate into its display bucket.
///
/// Total over every `(avg_rate, has_data)` pair; the higher thresholds are
/// checked first, so exactly one band matches.
///
/// | Condition        | Color     | Label              |
/// |------------------|-----------|--------------------|
/// | no data          | `#e6e7e8` | No Data            |
/// | `rate >= 100`    | `#de8b39` | ≥ 100 (Very High)  |
/// | `rate >= 50`     | `#ffc719` | 50-99 (High)       |
/// | `rate >= 25`     | `#c2ce51` | 25-49 (Medium)     |
/// | `rate >= 10`     | `#7fafc3` | 10-24 (Low)        |
/// | `rate > 0`       | `#cbdce1` | 1-9 (Very Low)     |
/// | `rate <= 0`      | `#e6e7e8` | No Rate Data       |
pub fn classify(avg_rate: f64, has_data: bool) -> RateBucket {
    if !has_data {
        return NO_DATA;
    }

    match avg_rate {
        r if r >= 100.0 => RateBucket {
            color: "#de8b39",
            label: "≥ 100 (Very High)",
        },
        r if r >= 50.0 => RateBucket {
            color: "#ffc719",
            label: "50-99 (High)",
        },
        r if r >= 25.0 => RateBucket {
            color: "#c2ce51",
            label: "25-49 (Medium)",
        },
        r if r >= 10.0 => RateBucket {
            color: "#7fafc3",
            label: "10-24 (Low)",
        },
        r if r > 0.0 => RateBucket {
            color: "#cbdce1",
            label: "1-9 (Very Low)",
        },
        _ => RateBucket {
            color: "#e6e7e8",
            label: "No Rate Data",
        },
    }
}

/// The fixed legend, highest band first, for presentation callers.
pub fn legend() -> [RateBucket; 6] {
    [
        classify(100.0, true),
        classify(50.0, true),
        classify(25.0, true),
        classify(10.0, true),
        classify(1.0, true),
        classify(0.0, false),
    ]
}
