use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Fresh UUIDv7 row id.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current UTC timestamp in RFC 3339, the format all tables store.
pub fn now() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub experience_id: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_trainer: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Experience {
    pub fn new(name: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            name: name.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Sport {
    pub fn new(name: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            name: name.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationDifficulty {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CertificationDifficulty {
    pub fn new(name: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            name: name.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub difficulty_id: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Certification {
    pub fn new(name: impl Into<String>, difficulty_id: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            name: name.into(),
            difficulty_id: difficulty_id.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

/// Join row linking a user to a sport and the certification they hold for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSportCertification {
    pub id: String,
    pub user_id: String,
    pub sport_id: String,
    pub certification_id: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserSportCertification {
    pub fn new(
        user_id: impl Into<String>,
        sport_id: impl Into<String>,
        certification_id: impl Into<String>,
    ) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            sport_id: sport_id.into(),
            certification_id: certification_id.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub is_user_created: bool,
    pub user_id: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            name: name.into(),
            is_user_created: false,
            user_id: user_id.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsSports {
    pub id: String,
    pub sport_id: String,
    pub tag_id: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TagsSports {
    pub fn new(sport_id: impl Into<String>, tag_id: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            sport_id: sport_id.into(),
            tag_id: tag_id.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub user_id: String,
    /// Reply/repost target; NULL for a root post.
    pub post_id: Option<String>,
    pub is_edited: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    pub fn new(content: impl Into<String>, user_id: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            content: content.into(),
            user_id: user_id.into(),
            post_id: None,
            is_edited: false,
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.post_id = Some(parent_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsTags {
    pub id: String,
    pub post_id: String,
    pub tag_id: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl PostsTags {
    pub fn new(post_id: impl Into<String>, tag_id: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            post_id: post_id.into(),
            tag_id: tag_id.into(),
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    /// Parent comment for threaded replies; NULL for a top-level comment.
    pub comment_id: Option<String>,
    pub user_id: String,
    pub is_edited: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Comment {
    pub fn new(
        content: impl Into<String>,
        post_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            content: content.into(),
            post_id: post_id.into(),
            comment_id: None,
            user_id: user_id.into(),
            is_edited: false,
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.comment_id = Some(parent_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    /// Parent like when this is a like of a like; NULL for a direct like.
    pub like_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Like {
    pub fn new(user_id: impl Into<String>, post_id: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            post_id: post_id.into(),
            like_id: None,
            is_active: true,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }

    pub fn of_like(mut self, parent_id: impl Into<String>) -> Self {
        self.like_id = Some(parent_id.into());
        self
    }
}
