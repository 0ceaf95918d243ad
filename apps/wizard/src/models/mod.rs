pub mod resume;

pub use resume::{
    CoverLetter, EducationEntry, ExperienceEntry, LanguageSkill, PersonalInfo, Photo, Resume,
    Skill, SkillLevel,
};
