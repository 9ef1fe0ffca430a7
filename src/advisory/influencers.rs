//! Parsing of the model's influencer list, with a static fallback

use crate::models::Influencer;

/// (name, topic, platform, link) of the list served when the model output is unusable
const FALLBACK: [(&str, &str, &str, &str); 6] = [
    ("CA Rachana Ranade", "Investing", "YouTube", "https://youtube.com/@RachanaRanade"),
    ("Pranjal Kamra", "Investments", "YouTube", "https://youtube.com/@PranjalKamra"),
    ("Nitin Bhatia", "Personal Finance", "YouTube", "https://youtube.com/@NitinBhatia"),
    ("Ankur Warikoo", "Entrepreneurship", "Instagram", "https://instagram.com/warikoo"),
    ("CA Rachana Ranade", "Investing", "Instagram", "https://instagram.com/rachana.ranade"),
    ("Invest Yadnya", "Mutual Funds", "YouTube", "https://youtube.com/@InvestYadnya"),
];

/// The hardcoded 6-entry influencer list
pub fn fallback_influencers() -> Vec<Influencer> {
    FALLBACK
        .iter()
        .map(|(name, topic, platform, link)| Influencer {
            name: name.to_string(),
            topic: topic.to_string(),
            platform: platform.to_string(),
            link: link.to_string(),
        })
        .collect()
}

/// Parse model output as a JSON array of influencers
///
/// Returns `None` for anything else, including fenced or prose-wrapped JSON.
pub fn parse_influencers(raw: &str) -> Option<Vec<Influencer>> {
    serde_json::from_str::<Vec<Influencer>>(raw.trim()).ok()
}
