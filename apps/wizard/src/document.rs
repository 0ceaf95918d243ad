//! Pure editing operations over the resume aggregate.
//!
//! Every operation consumes the document by value and returns a new one.
//! Untouched subtrees are moved, never rebuilt, so downstream change
//! detection can rely on sibling slices being identical after an edit.
//! Item ids are assigned exactly once, at insertion, and survive every
//! later edit of the entry.

use uuid::Uuid;

use crate::models::{
    CoverLetter, EducationEntry, ExperienceEntry, LanguageSkill, PersonalInfo, Resume, Skill,
};

/// One replaceable slice of the document tree. Each editing surface owns
/// exactly one of these and replaces it wholesale.
#[derive(Debug, Clone)]
pub enum Subtree {
    PersonalInfo(PersonalInfo),
    Experience(Vec<ExperienceEntry>),
    Education(Vec<EducationEntry>),
    Skills(Vec<Skill>),
    Languages(Vec<LanguageSkill>),
    Interests(Vec<String>),
    CoverLetter(Option<CoverLetter>),
}

/// Names one of the item lists for removal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Experience,
    Education,
    Skills,
    Languages,
    Interests,
}

/// An item to append to one of the document's lists.
#[derive(Debug, Clone)]
pub enum ListItem {
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Skill(Skill),
    Language(LanguageSkill),
    Interest(String),
}

/// Fresh list-item id. UUID v4 makes collisions over an editing session
/// negligible, but `add_item` still checks.
pub fn new_item_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns a new document with exactly one subtree replaced.
pub fn replace_subtree(doc: Resume, subtree: Subtree) -> Resume {
    match subtree {
        Subtree::PersonalInfo(v) => Resume {
            personal_info: v,
            ..doc
        },
        Subtree::Experience(v) => Resume {
            experience: v,
            ..doc
        },
        Subtree::Education(v) => Resume {
            education: v,
            ..doc
        },
        Subtree::Skills(v) => Resume { skills: v, ..doc },
        Subtree::Languages(v) => Resume {
            languages: v,
            ..doc
        },
        Subtree::Interests(v) => Resume {
            interests: v,
            ..doc
        },
        Subtree::CoverLetter(v) => Resume {
            cover_letter: v,
            ..doc
        },
    }
}

/// Appends an item to its list, preserving order.
///
/// If the supplied id already exists in the target list the item gets a
/// fresh id instead; existing ids are never reused or regenerated.
pub fn add_item(doc: Resume, item: ListItem) -> Resume {
    let mut doc = doc;
    match item {
        ListItem::Experience(mut e) => {
            if doc.experience.iter().any(|x| x.id == e.id) {
                e.id = new_item_id();
            }
            doc.experience.push(e);
        }
        ListItem::Education(mut e) => {
            if doc.education.iter().any(|x| x.id == e.id) {
                e.id = new_item_id();
            }
            doc.education.push(e);
        }
        ListItem::Skill(mut s) => {
            if doc.skills.iter().any(|x| x.id == s.id) {
                s.id = new_item_id();
            }
            doc.skills.push(s);
        }
        ListItem::Language(mut l) => {
            if doc.languages.iter().any(|x| x.id == l.id) {
                l.id = new_item_id();
            }
            // The field is public; re-assert the 0-100 bound here.
            l.level = l.level.min(100);
            doc.languages.push(l);
        }
        ListItem::Interest(text) => doc.interests.push(text),
    }
    doc
}

/// Removes the item with the given id from the named list.
///
/// Interests carry no ids; `id` matches the interest text itself.
/// Removing a nonexistent id is a no-op, not an error. Remaining ids are
/// left untouched.
pub fn remove_item(doc: Resume, list: ListKind, id: &str) -> Resume {
    let mut doc = doc;
    match list {
        ListKind::Experience => doc.experience.retain(|e| e.id != id),
        ListKind::Education => doc.education.retain(|e| e.id != id),
        ListKind::Skills => doc.skills.retain(|s| s.id != id),
        ListKind::Languages => doc.languages.retain(|l| l.id != id),
        ListKind::Interests => doc.interests.retain(|i| i != id),
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillLevel;

    fn skill(id: &str, name: &str) -> Skill {
        Skill {
            id: id.to_string(),
            name: name.to_string(),
            level: SkillLevel::Expert,
        }
    }

    #[test]
    fn test_replace_subtree_touches_only_named_slice() {
        let doc = Resume::sample();
        let original_experience = doc.experience.clone();
        let replaced = replace_subtree(doc, Subtree::Skills(vec![skill("s1", "Negotiation")]));

        assert_eq!(replaced.skills.len(), 1);
        assert_eq!(replaced.skills[0].name, "Negotiation");
        assert_eq!(replaced.experience, original_experience);
    }

    #[test]
    fn test_add_item_appends_preserving_order() {
        let doc = Resume::sample();
        let before: Vec<String> = doc.skills.iter().map(|s| s.id.clone()).collect();
        let doc = add_item(doc, ListItem::Skill(skill("s-new", "Pricing")));

        let after: Vec<String> = doc.skills.iter().map(|s| s.id.clone()).collect();
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().map(String::as_str), Some("s-new"));
    }

    #[test]
    fn test_add_item_reassigns_colliding_id() {
        let doc = Resume::blank(false);
        let doc = add_item(doc, ListItem::Skill(skill("dup", "SQL")));
        let doc = add_item(doc, ListItem::Skill(skill("dup", "Python")));

        assert_eq!(doc.skills.len(), 2);
        assert_ne!(doc.skills[0].id, doc.skills[1].id);
        // The first insertion keeps its id.
        assert_eq!(doc.skills[0].id, "dup");
    }

    #[test]
    fn test_ids_pairwise_distinct_under_add_remove_sequences() {
        let mut doc = Resume::blank(false);
        for i in 0..20 {
            doc = add_item(doc, ListItem::Skill(skill("same-seed", &format!("s{i}"))));
        }
        doc = remove_item(doc, ListKind::Skills, "same-seed");
        for i in 0..5 {
            doc = add_item(
                doc,
                ListItem::Skill(skill(&format!("fresh-{i}"), "extra")),
            );
        }

        let mut ids: Vec<&str> = doc.skills.iter().map(|s| s.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "ids must be pairwise distinct");
    }

    #[test]
    fn test_remove_item_nonexistent_id_is_noop() {
        let doc = Resume::sample();
        let before = doc.clone();
        let doc = remove_item(doc, ListKind::Experience, "no-such-id");
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_preserves_remaining_ids() {
        let doc = Resume::sample();
        let doc = remove_item(doc, ListKind::Skills, "skill-2");
        let ids: Vec<&str> = doc.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["skill-1", "skill-3"]);
    }

    #[test]
    fn test_add_then_remove_restores_blank_skills() {
        let blank = Resume::blank(false);
        let original_skills = blank.skills.clone();

        let doc = add_item(blank, ListItem::Skill(skill("s1", "Negotiation")));
        let doc = remove_item(doc, ListKind::Skills, "s1");

        assert_eq!(doc.skills, original_skills);
    }

    #[test]
    fn test_add_item_clamps_language_level() {
        let doc = Resume::blank(false);
        let doc = add_item(
            doc,
            ListItem::Language(LanguageSkill {
                id: "l1".to_string(),
                name: "Spanish".to_string(),
                level: 200,
            }),
        );
        assert_eq!(doc.languages[0].level, 100);
    }

    #[test]
    fn test_interests_remove_by_value() {
        let doc = Resume::blank(false);
        let doc = add_item(doc, ListItem::Interest("Chess".to_string()));
        let doc = add_item(doc, ListItem::Interest("Sailing".to_string()));
        let doc = remove_item(doc, ListKind::Interests, "Chess");
        assert_eq!(doc.interests, vec!["Sailing".to_string()]);
    }

    #[test]
    fn test_new_item_ids_unique() {
        let a = new_item_id();
        let b = new_item_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
