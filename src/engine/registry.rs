//! Static jurisdiction registry: the 50 US states plus the District of
//! Columbia, with their two-letter codes.
//!
//! This table is reference data owned by the engine; callers never supply
//! or override it. It is read-only after startup, so concurrent lookups
//! need no synchronization.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical name/code pairs for every jurisdiction the heat map renders.
pub static JURISDICTIONS: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("District of Columbia", "DC"),
];

static NAME_TO_CODE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| JURISDICTIONS.iter().copied().collect());

static CODE_TO_NAME: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| JURISDICTIONS.iter().map(|&(name, code)| (code, name)).collect());

/// Exact-name lookup of a jurisdiction's two-letter code.
pub fn code_for(name: &str) -> Option<&'static str> {
    NAME_TO_CODE.get(name).copied()
}

/// Reverse lookup of a canonical name from a two-letter code.
pub fn name_for(code: &str) -> Option<&'static str> {
    CODE_TO_NAME.get(code).copied()
}
