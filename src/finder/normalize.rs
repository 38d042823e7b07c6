//! Turns raw slot text into the exact labels stored in provider records.
//!
//! Gender and age are two-valued: anything other than `male` becomes
//! [`Gender::Female`] and anything other than `adult` becomes
//! [`AgeGroup::Minor`]. The validator rejects other values earlier in the
//! dialog, so the default branch only applies to input that skipped it.

use crate::domain::reference::ReferenceData;

const EDUCATION_JOB_TRAINING: &str = "education/job training";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_slot(raw: &str) -> Self {
        if raw.to_lowercase() == "male" {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Adult,
    Minor,
}

impl AgeGroup {
    pub fn from_slot(raw: &str) -> Self {
        if raw.to_lowercase() == "adult" {
            AgeGroup::Adult
        } else {
            AgeGroup::Minor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Adult => "Adult",
            AgeGroup::Minor => "Minor (Under 18)",
        }
    }
}

pub struct SlotNormalizer<'a> {
    reference: &'a ReferenceData,
}

impl<'a> SlotNormalizer<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Taxonomy id → name, then capitalized-words formatting.
    pub fn normalize_service(&self, raw: &str) -> String {
        let name = match self.reference.service_by_id(raw) {
            Some(entry) => entry.name.as_str(),
            None => raw,
        };
        format_service_label(name)
    }

    /// State name or abbreviation → upper-case abbreviation; unknown input unchanged.
    pub fn normalize_location(&self, raw: &str) -> String {
        if self.reference.state_by_abbreviation(raw).is_some() {
            raw.to_uppercase()
        } else if let Some(state) = self.reference.state_by_name(raw) {
            state.abbreviation.to_uppercase()
        } else {
            raw.to_string()
        }
    }

    /// Lowercase state name used in reply text.
    pub fn display_location(&self, raw: &str) -> String {
        if let Some(state) = self.reference.state_by_abbreviation(raw) {
            state.name.clone()
        } else if self.reference.state_by_name(raw).is_some() {
            raw.to_lowercase()
        } else {
            raw.to_string()
        }
    }
}

/// 把服務名稱轉成資料庫中的大小寫格式
pub fn format_service_label(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    if lowered == EDUCATION_JOB_TRAINING {
        return "Education/Job Training".to_string();
    }
    capitalize_words(&lowered)
}

fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
