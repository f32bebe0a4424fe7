//! Fixed catalog of ATPL exam subjects and question databases.

use serde::{Deserialize, Serialize};

/// One ATPL theory subject.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub question_count: u32,
}

const fn subject(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    question_count: u32,
) -> Subject {
    Subject {
        id,
        name,
        description,
        question_count,
    }
}

pub const SUBJECTS: [Subject; 13] = [
    subject("010", "010 - Air Law", "Aviation regulations and legal requirements", 1858),
    subject(
        "021",
        "021 - Airframe, Systems, Electrics, Power Plant",
        "Aircraft systems and components",
        2156,
    ),
    subject("022", "022 - Instrumentation", "Aircraft instruments and displays", 798),
    subject("031", "031 - Mass & Balance", "Weight and balance calculations", 456),
    subject("032", "032 - Performance", "Aircraft performance calculations", 892),
    subject(
        "033",
        "033 - Flight Planning & Monitoring",
        "Flight planning procedures and monitoring",
        1234,
    ),
    subject(
        "040",
        "040 - Human Performance & Limitations",
        "Human factors in aviation",
        567,
    ),
    subject("050", "050 - Meteorology", "Weather and atmospheric conditions", 1456),
    subject("061", "061 - General Navigation", "Basic navigation principles", 1123),
    subject("062", "062 - Radio Navigation", "Radio navigation systems", 934),
    subject("070", "070 - Operational Procedures", "Flight operations and procedures", 1789),
    subject("081", "081 - Principles of Flight", "Aerodynamics and flight principles", 1345),
    subject("090", "090 - Communications", "Aviation communications and procedures", 678),
];

/// Returns every subject in catalog order.
pub fn all_subjects() -> &'static [Subject] {
    &SUBJECTS
}

/// Looks up a subject by its three-digit id.
pub fn find_subject(id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

/// Human-readable label for a subject id.
///
/// Known ids map to their catalog name; anything else is title-cased with
/// underscores turned into spaces.
pub fn display_subject(id: &str) -> String {
    if let Some(subject) = find_subject(id) {
        return subject.name.to_string();
    }

    id.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Question bank a job extracts from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum QuestionDatabase {
    #[default]
    #[serde(rename = "EASA 2020")]
    Easa2020,
    #[serde(rename = "EASA 2020 All Questions")]
    Easa2020AllQuestions,
}

impl QuestionDatabase {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionDatabase::Easa2020 => "EASA 2020",
            QuestionDatabase::Easa2020AllQuestions => "EASA 2020 All Questions",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EASA 2020" => Some(QuestionDatabase::Easa2020),
            "EASA 2020 All Questions" => Some(QuestionDatabase::Easa2020AllQuestions),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_thirteen_unique_subjects() {
        let mut ids: Vec<&str> = all_subjects().iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 13);
    }

    #[test]
    fn test_find_subject() {
        let meteo = find_subject("050").unwrap();
        assert_eq!(meteo.name, "050 - Meteorology");
        assert_eq!(meteo.question_count, 1456);
        assert!(find_subject("999").is_none());
    }

    #[test]
    fn test_display_subject() {
        assert_eq!(display_subject("010"), "010 - Air Law");
        assert_eq!(display_subject("air_law"), "Air Law");
        assert_eq!(display_subject("radio"), "Radio");
    }

    #[test]
    fn test_question_database_serde() {
        let json = serde_json::to_string(&QuestionDatabase::Easa2020AllQuestions).unwrap();
        assert_eq!(json, "\"EASA 2020 All Questions\"");
        let parsed: QuestionDatabase = serde_json::from_str("\"EASA 2020\"").unwrap();
        assert_eq!(parsed, QuestionDatabase::Easa2020);
        assert_eq!(QuestionDatabase::parse("EASA 2020"), Some(parsed));
        assert_eq!(QuestionDatabase::parse("FAA"), None);
    }
}
