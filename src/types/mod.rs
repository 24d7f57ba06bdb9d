// src/types/mod.rs

pub mod resume_data;

pub use resume_data::{
    EducationEntry, ExperienceEntry, LinkKind, RecoveredFields, ResumeLink,
};
