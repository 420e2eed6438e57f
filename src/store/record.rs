// Row mapping for the entity store. Every persisted type describes its
// table, its entity-specific columns and how to bind/read them; the store
// builds all SQL from these descriptions so the base-entity columns
// (id, is_active, created_at, updated_at) are handled uniformly.

use rusqlite::types::Value;
use rusqlite::Row;
use serde::Serialize;

use crate::db::models::{
    Certification, CertificationDifficulty, Comment, Experience, Like, Post, PostsTags, Sport,
    Tag, TagsSports, User, UserSportCertification,
};

pub trait Record: Serialize + Sized {
    const TABLE: &'static str;
    /// Entity-specific columns, in the order `values` yields them.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn created_at(&self) -> &str;
    fn updated_at(&self) -> &str;
    fn touch(&mut self, ts: &str);

    /// Values for `COLUMNS`, same order.
    fn values(&self) -> Vec<Value>;

    /// Reads a row selected as: id, is_active, created_at, updated_at, COLUMNS...
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

macro_rules! base_accessors {
    () => {
        fn id(&self) -> &str {
            &self.id
        }
        fn is_active(&self) -> bool {
            self.is_active
        }
        fn set_active(&mut self, active: bool) {
            self.is_active = active;
        }
        fn created_at(&self) -> &str {
            &self.created_at
        }
        fn updated_at(&self) -> &str {
            &self.updated_at
        }
        fn touch(&mut self, ts: &str) {
            self.updated_at = ts.to_string();
        }
    };
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "email",
        "username",
        "password_hash",
        "first_name",
        "last_name",
        "state",
        "city",
        "latitude",
        "longitude",
        "experience_id",
        "is_staff",
        "is_superuser",
        "is_trainer",
    ];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![
            self.email.clone().into(),
            self.username.clone().into(),
            self.password_hash.clone().into(),
            self.first_name.clone().into(),
            self.last_name.clone().into(),
            self.state.clone().into(),
            self.city.clone().into(),
            self.latitude.into(),
            self.longitude.into(),
            self.experience_id.clone().into(),
            self.is_staff.into(),
            self.is_superuser.into(),
            self.is_trainer.into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            email: row.get(4)?,
            username: row.get(5)?,
            password_hash: row.get(6)?,
            first_name: row.get(7)?,
            last_name: row.get(8)?,
            state: row.get(9)?,
            city: row.get(10)?,
            latitude: row.get(11)?,
            longitude: row.get(12)?,
            experience_id: row.get(13)?,
            is_staff: row.get(14)?,
            is_superuser: row.get(15)?,
            is_trainer: row.get(16)?,
        })
    }
}

impl Record for Experience {
    const TABLE: &'static str = "experiences";
    const COLUMNS: &'static [&'static str] = &["name"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            name: row.get(4)?,
        })
    }
}

impl Record for Sport {
    const TABLE: &'static str = "sports";
    const COLUMNS: &'static [&'static str] = &["name"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            name: row.get(4)?,
        })
    }
}

impl Record for CertificationDifficulty {
    const TABLE: &'static str = "certification_difficulties";
    const COLUMNS: &'static [&'static str] = &["name"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            name: row.get(4)?,
        })
    }
}

impl Record for Certification {
    const TABLE: &'static str = "certifications";
    const COLUMNS: &'static [&'static str] = &["name", "difficulty_id"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.difficulty_id.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            name: row.get(4)?,
            difficulty_id: row.get(5)?,
        })
    }
}

impl Record for UserSportCertification {
    const TABLE: &'static str = "user_sport_certifications";
    const COLUMNS: &'static [&'static str] = &["user_id", "sport_id", "certification_id"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![
            self.user_id.clone().into(),
            self.sport_id.clone().into(),
            self.certification_id.clone().into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            user_id: row.get(4)?,
            sport_id: row.get(5)?,
            certification_id: row.get(6)?,
        })
    }
}

impl Record for Tag {
    const TABLE: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["name", "is_user_created", "user_id"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.is_user_created.into(),
            self.user_id.clone().into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            name: row.get(4)?,
            is_user_created: row.get(5)?,
            user_id: row.get(6)?,
        })
    }
}

impl Record for TagsSports {
    const TABLE: &'static str = "tags_sports";
    const COLUMNS: &'static [&'static str] = &["sport_id", "tag_id"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![self.sport_id.clone().into(), self.tag_id.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            sport_id: row.get(4)?,
            tag_id: row.get(5)?,
        })
    }
}

impl Record for Post {
    const TABLE: &'static str = "posts";
    const COLUMNS: &'static [&'static str] = &["content", "user_id", "post_id", "is_edited"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![
            self.content.clone().into(),
            self.user_id.clone().into(),
            self.post_id.clone().into(),
            self.is_edited.into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            content: row.get(4)?,
            user_id: row.get(5)?,
            post_id: row.get(6)?,
            is_edited: row.get(7)?,
        })
    }
}

impl Record for PostsTags {
    const TABLE: &'static str = "posts_tags";
    const COLUMNS: &'static [&'static str] = &["post_id", "tag_id"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![self.post_id.clone().into(), self.tag_id.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            post_id: row.get(4)?,
            tag_id: row.get(5)?,
        })
    }
}

impl Record for Comment {
    const TABLE: &'static str = "comments";
    const COLUMNS: &'static [&'static str] =
        &["content", "post_id", "comment_id", "user_id", "is_edited"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![
            self.content.clone().into(),
            self.post_id.clone().into(),
            self.comment_id.clone().into(),
            self.user_id.clone().into(),
            self.is_edited.into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            content: row.get(4)?,
            post_id: row.get(5)?,
            comment_id: row.get(6)?,
            user_id: row.get(7)?,
            is_edited: row.get(8)?,
        })
    }
}

impl Record for Like {
    const TABLE: &'static str = "likes";
    const COLUMNS: &'static [&'static str] = &["user_id", "post_id", "like_id"];

    base_accessors!();

    fn values(&self) -> Vec<Value> {
        vec![
            self.user_id.clone().into(),
            self.post_id.clone().into(),
            self.like_id.clone().into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            is_active: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            user_id: row.get(4)?,
            post_id: row.get(5)?,
            like_id: row.get(6)?,
        })
    }
}
