//! Category precedence and display ordering
//!
//! Traits are listed in a fixed anatomical order: background first, then
//! the structural layers from outline inward, with the catch-all
//! `Palette` and `Unassigned` buckets at the end. Categories this table
//! does not know about sort after every known one.

use std::cmp::Ordering;

/// Rank given to categories missing from [`CATEGORY_ORDER`].
pub const UNKNOWN_CATEGORY_RANK: u32 = 1000;

/// Known categories and their display rank.
pub const CATEGORY_ORDER: &[(&str, u32)] = &[
    ("Background", 0),
    ("Outline", 1),
    ("Skin", 2),
    ("Headwear", 3),
    ("HeadwearAccessory", 4),
    ("Hair", 5),
    ("FacialHair", 6),
    ("Eyes", 7),
    ("Mouth", 8),
    ("FaceAccessory", 9),
    ("Clothing", 10),
    ("NeckAccessory", 11),
    ("Palette", 200),
    ("Unassigned", 300),
];

/// Display rank of a category.
pub fn category_priority(category: &str) -> u32 {
    CATEGORY_ORDER
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_CATEGORY_RANK)
}

/// Order two traits by (rank, category, variant).
pub fn compare_traits(
    a_category: &str,
    a_variant: &str,
    b_category: &str,
    b_variant: &str,
) -> Ordering {
    category_priority(a_category)
        .cmp(&category_priority(b_category))
        .then_with(|| a_category.cmp(b_category))
        .then_with(|| a_variant.cmp(b_variant))
}

/// Order two raw layer records, additionally breaking ties on colour.
///
/// A missing colour sorts before any present colour.
pub fn compare_records(
    a: (&str, &str, Option<&str>),
    b: (&str, &str, Option<&str>),
) -> Ordering {
    compare_traits(a.0, a.1, b.0, b.1).then_with(|| a.2.cmp(&b.2))
}

/// Turn a `snake_case` variant hint into a title-cased label.
///
/// `"bob_cut"` becomes `"Bob Cut"`.
pub fn friendly_name(variant_hint: &str) -> String {
    variant_hint
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
