/// Canned saving tips per spending category.
///
/// Expects a normalized category; anything outside the known buckets falls
/// back to the general tips.
pub fn tips_for(category: &str) -> &'static [&'static str] {
    match category {
        "food" => &[
            "Try cooking at home more often",
            "Use coupons for groceries",
        ],
        "travel" => &["Try public transport", "Book trips in advance"],
        "entertainment" => &[
            "Look for cheaper streaming options",
            "Limit in-app purchases",
        ],
        "rent" => &["Negotiate rent at renewal", "Save on utilities"],
        _ => &["Track your receipts", "Set spending limits per category"],
    }
}
