//! Canonical resume model — the single template-agnostic aggregate every
//! other module operates on.
//!
//! Nothing in here encodes presentation. Template identity, the active step,
//! and the display language are UI state and live outside the document.
//! Serialized field names are camelCase to match the wire contract shared
//! with the assistant service.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// The canonical document aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<Skill>,
    pub languages: Vec<LanguageSkill>,
    pub interests: Vec<String>,
    pub is_bilingual: bool,
    #[serde(default)]
    pub cover_letter: Option<CoverLetter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Free-text professional summary shown under the header.
    pub summary: String,
    #[serde(default)]
    pub photo: Option<Photo>,
    #[serde(default)]
    pub driving_license: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Embedded image payload. `data` is the base64-encoded image body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Ongoing role — the end date is rendered as localized "Present" text.
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    #[serde(default)]
    pub graduation_date: Option<NaiveDate>,
    pub description: String,
}

/// Ordinal proficiency rank for a skill. Ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSkill {
    pub id: String,
    pub name: String,
    /// Proficiency 0–100; clamped on construction and on deserialization.
    #[serde(deserialize_with = "clamp_language_level")]
    pub level: u8,
}

impl LanguageSkill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: level.min(100),
        }
    }
}

fn clamp_language_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u32::deserialize(deserializer)?;
    Ok(raw.min(100) as u8)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub company: String,
    pub role: String,
    pub content: String,
}

impl Resume {
    /// Fully populated sample document.
    ///
    /// Doubles as the editor placeholder and the template-preview fixture,
    /// so it must exercise every section a projector can render.
    pub fn sample() -> Self {
        Resume {
            personal_info: PersonalInfo {
                first_name: "Sarah".to_string(),
                last_name: "Mitchell".to_string(),
                job_title: "Senior Product Manager".to_string(),
                email: "sarah.mitchell@example.com".to_string(),
                phone: "+1 555 010 4477".to_string(),
                address: "Austin, TX".to_string(),
                summary: "Product manager with eight years of experience shipping \
                          B2B analytics tools. Led cross-functional teams of up to \
                          twelve across three product lines."
                    .to_string(),
                photo: None,
                driving_license: Some("Class C".to_string()),
                birth_date: date(1991, 4, 17),
                website: Some("linkedin.com/in/sarahmitchell".to_string()),
            },
            experience: vec![
                ExperienceEntry {
                    id: "exp-1".to_string(),
                    company: "Northbeam Analytics".to_string(),
                    position: "Senior Product Manager".to_string(),
                    location: "Austin, TX".to_string(),
                    start_date: date(2021, 3, 1),
                    end_date: None,
                    current: true,
                    description: "Own the reporting product line; grew weekly active \
                                  accounts from 1,200 to 4,800."
                        .to_string(),
                },
                ExperienceEntry {
                    id: "exp-2".to_string(),
                    company: "Gridline Software".to_string(),
                    position: "Product Manager".to_string(),
                    location: "Denver, CO".to_string(),
                    start_date: date(2017, 6, 1),
                    end_date: date(2021, 2, 1),
                    current: false,
                    description: "Launched the self-serve onboarding flow, cutting \
                                  time-to-first-dashboard from 3 days to 40 minutes."
                        .to_string(),
                },
            ],
            education: vec![EducationEntry {
                id: "edu-1".to_string(),
                institution: "University of Texas at Austin".to_string(),
                degree: "B.S.".to_string(),
                field: "Information Systems".to_string(),
                location: "Austin, TX".to_string(),
                graduation_date: date(2015, 5, 1),
                description: "Minor in Statistics.".to_string(),
            }],
            skills: vec![
                Skill {
                    id: "skill-1".to_string(),
                    name: "Product Strategy".to_string(),
                    level: SkillLevel::Expert,
                },
                Skill {
                    id: "skill-2".to_string(),
                    name: "SQL".to_string(),
                    level: SkillLevel::Advanced,
                },
                Skill {
                    id: "skill-3".to_string(),
                    name: "User Research".to_string(),
                    level: SkillLevel::Advanced,
                },
            ],
            languages: vec![
                LanguageSkill::new("lang-1", "English", 100),
                LanguageSkill::new("lang-2", "Arabic", 70),
            ],
            interests: vec!["Trail running".to_string(), "Ceramics".to_string()],
            is_bilingual: false,
            cover_letter: None,
        }
    }

    /// Sample structure with every content field cleared and all lists empty.
    pub fn blank(bilingual: bool) -> Self {
        Resume {
            personal_info: PersonalInfo {
                first_name: String::new(),
                last_name: String::new(),
                job_title: String::new(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                summary: String::new(),
                photo: None,
                driving_license: None,
                birth_date: None,
                website: None,
            },
            experience: vec![],
            education: vec![],
            skills: vec![],
            languages: vec![],
            interests: vec![],
            is_bilingual: bilingual,
            cover_letter: None,
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_populates_every_section() {
        let r = Resume::sample();
        assert!(!r.personal_info.first_name.is_empty());
        assert!(!r.personal_info.summary.is_empty());
        assert!(!r.experience.is_empty());
        assert!(!r.education.is_empty());
        assert!(!r.skills.is_empty());
        assert!(!r.languages.is_empty());
        assert!(!r.interests.is_empty());
    }

    #[test]
    fn test_blank_clears_content_and_sets_flag() {
        let r = Resume::blank(true);
        assert!(r.personal_info.first_name.is_empty());
        assert!(r.experience.is_empty());
        assert!(r.skills.is_empty());
        assert!(r.is_bilingual);
        assert!(r.cover_letter.is_none());
        assert!(!Resume::blank(false).is_bilingual);
    }

    #[test]
    fn test_serializes_camel_case_wire_shape() {
        let json = serde_json::to_value(Resume::sample()).unwrap();
        assert!(json.get("personalInfo").is_some());
        assert!(json.get("isBilingual").is_some());
        assert!(json["experience"][0].get("startDate").is_some());
        assert!(json["personalInfo"].get("firstName").is_some());
    }

    #[test]
    fn test_round_trip_preserves_list_order() {
        let r = Resume::sample();
        let json = serde_json::to_string(&r).unwrap();
        let back: Resume = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        let ids: Vec<&str> = back.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["skill-1", "skill-2", "skill-3"]);
    }

    #[test]
    fn test_language_level_clamped_on_load() {
        let json = r#"{"id": "l1", "name": "French", "level": 140}"#;
        let lang: LanguageSkill = serde_json::from_str(json).unwrap();
        assert_eq!(lang.level, 100);
    }

    #[test]
    fn test_skill_level_is_ordinal() {
        assert!(SkillLevel::Novice < SkillLevel::Intermediate);
        assert!(SkillLevel::Advanced < SkillLevel::Expert);
        let level: SkillLevel = serde_json::from_str(r#""Expert""#).unwrap();
        assert_eq!(level, SkillLevel::Expert);
    }
}
