use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::embedded::{self, EditError, EmbeddedEntry};

/// Developer profile document owned by a user, with embedded experience and
/// education sub-collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user: Uuid,
    pub company: String,
    pub website: String,
    pub location: String,
    pub designation: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub bio: String,
    pub github_username: String,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub social: SocialLinks,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub from: String,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: String,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl EmbeddedEntry for ExperienceItem {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

impl EmbeddedEntry for EducationItem {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

/// Partial update for a profile. Presence is explicit: a field is applied
/// exactly when the request carried it, even if the value is empty.
/// `skills` arrives as a comma-separated string on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub designation: Option<String>,
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl ProfilePatch {
    /// JSON object for the single-statement merge update (`doc || patch`).
    ///
    /// Only fields present in the request appear, except `social`, which is
    /// rebuilt wholesale from the provided links on every update.
    pub fn to_merge_document(&self) -> Map<String, Value> {
        let mut doc = Map::new();
        if let Some(company) = &self.company {
            doc.insert("company".into(), json!(company));
        }
        if let Some(website) = &self.website {
            doc.insert("website".into(), json!(website));
        }
        if let Some(location) = &self.location {
            doc.insert("location".into(), json!(location));
        }
        if let Some(designation) = &self.designation {
            doc.insert("designation".into(), json!(designation));
        }
        if let Some(bio) = &self.bio {
            doc.insert("bio".into(), json!(bio));
        }
        if let Some(github) = &self.github_username {
            doc.insert("githubUsername".into(), json!(github));
        }
        if let Some(raw) = &self.skills {
            doc.insert("skills".into(), json!(parse_skills(raw)));
        }

        let mut social = Map::new();
        for (key, value) in [
            ("youtube", &self.youtube),
            ("facebook", &self.facebook),
            ("twitter", &self.twitter),
            ("linkedin", &self.linkedin),
            ("instagram", &self.instagram),
        ] {
            if let Some(link) = value {
                social.insert(key.into(), json!(link));
            }
        }
        doc.insert("social".into(), Value::Object(social));
        doc.insert("updatedAt".into(), json!(Utc::now()));
        doc
    }
}

impl Profile {
    /// Build a fresh profile from a patch whose required fields the handler
    /// has already validated as present.
    pub fn from_patch(user: Uuid, patch: &ProfilePatch) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user,
            company: patch.company.clone().unwrap_or_default(),
            website: patch.website.clone().unwrap_or_default(),
            location: patch.location.clone().unwrap_or_default(),
            designation: patch.designation.clone().unwrap_or_default(),
            skills: patch.skills.as_deref().map(parse_skills).unwrap_or_default(),
            bio: patch.bio.clone().unwrap_or_default(),
            github_username: patch.github_username.clone().unwrap_or_default(),
            experience: Vec::new(),
            education: Vec::new(),
            social: SocialLinks {
                youtube: patch.youtube.clone(),
                facebook: patch.facebook.clone(),
                twitter: patch.twitter.clone(),
                linkedin: patch.linkedin.clone(),
                instagram: patch.instagram.clone(),
            },
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_experience(&mut self, item: ExperienceItem) {
        embedded::append(&mut self.experience, item);
    }

    pub fn remove_experience(&mut self, id: Uuid) -> Result<ExperienceItem, EditError> {
        embedded::remove(&mut self.experience, id)
    }

    pub fn add_education(&mut self, item: EducationItem) {
        embedded::append(&mut self.education, item);
    }

    pub fn remove_education(&mut self, id: Uuid) -> Result<EducationItem, EditError> {
        embedded::remove(&mut self.education, id)
    }
}
