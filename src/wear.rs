//! Maps a wear count to a tiered label.

/// Classify a wear count into its display tier.
///
/// The bands are fixed and inclusive of their upper bound: 0, 1–5, 6–15,
/// 16–30, 31–50, 51–75 and 76 and above.
pub fn wear_level(wears: usize) -> &'static str {
    match wears {
        0 => "🌱 New Arrival",
        1..=5 => "👟 Lightly Worn",
        6..=15 => "🔁 In Rotation",
        16..=30 => "🧵 Well Worn",
        31..=50 => "🧥 Long-Term Use",
        51..=75 => "⭐ Wardrobe MVP",
        _ => "🏆 Legacy Item",
    }
}
