use crate::domain::model::{Card, ProviderRecord};

pub const MAX_CARDS: usize = 10;
const MAX_TITLE_CHARS: usize = 70;

/// Cards for the first [`MAX_CARDS`] records in the order the store returned
/// them. `None` when there is nothing to show, so the caller can fall back to
/// the hotline message instead of an empty card.
pub fn format_results(records: &[ProviderRecord]) -> Option<Vec<Card>> {
    if records.is_empty() {
        return None;
    }

    Some(records.iter().take(MAX_CARDS).map(card_for).collect())
}

fn card_for(record: &ProviderRecord) -> Card {
    Card {
        title: truncate_title(&record.name),
        sub_title: contact_line(record),
        attachment_link_url: record.website.clone(),
    }
}

fn truncate_title(name: &str) -> String {
    if name.chars().count() > MAX_TITLE_CHARS {
        let truncated: String = name.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}...", truncated)
    } else {
        name.to_string()
    }
}

// 優先順序：hotline > phone > email
fn contact_line(record: &ProviderRecord) -> String {
    if let Some(hotline) = &record.hotline {
        format!("Hotline: {}", hotline)
    } else if let Some(phone) = &record.phone {
        format!("Phone: {}", phone)
    } else if let Some(email) = &record.email {
        format!("Email: {}", email)
    } else {
        "No contact info".to_string()
    }
}
