use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
}

/// Structured professional profile captured once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub headline: String,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: BTreeSet<String>,
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile_url: String,
}

impl ExperienceEntry {
    pub fn label(&self) -> String {
        match (self.title.is_empty(), self.organization.is_empty()) {
            (false, false) => format!("{} at {}", self.title, self.organization),
            (false, true) => self.title.clone(),
            (true, false) => format!("Role at {}", self.organization),
            (true, true) => "Unknown position".to_string(),
        }
    }
}

impl EducationEntry {
    pub fn label(&self) -> String {
        let degree = match &self.field {
            Some(field) if !field.is_empty() => format!("{} in {}", self.degree, field),
            _ => self.degree.clone(),
        };
        format!("{} from {}", degree.trim(), self.institution)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_label_handles_missing_parts() {
        let exp = ExperienceEntry {
            title: String::new(),
            organization: "Acme".to_string(),
            description: String::new(),
        };
        assert_eq!(exp.label(), "Role at Acme");
    }

    #[test]
    fn test_education_label_includes_field() {
        let edu = EducationEntry {
            institution: "State University".to_string(),
            degree: "BSc".to_string(),
            field: Some("Computer Science".to_string()),
        };
        assert_eq!(edu.label(), "BSc in Computer Science from State University");
    }
}
