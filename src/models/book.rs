use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    #[sea_orm(unique)]
    pub ol_key: Option<String>,
    pub year: Option<i32>,
    pub added_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A cataloged book as exchanged over the API.
///
/// `id` is always assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_edition_key: Option<String>,
    #[serde(default)]
    pub ol_key: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub added_at: DateTime<Utc>,
}

impl Book {
    /// Direct cover URL if one was stored, otherwise one built from the edition key.
    pub fn cover_image(&self, covers: &crate::openlibrary::Covers) -> Option<String> {
        self.cover_url.clone().or_else(|| {
            self.cover_edition_key
                .as_deref()
                .map(|key| covers.url(key, crate::openlibrary::CoverSize::Medium))
        })
    }
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            cover_url: model.cover_url,
            cover_edition_key: None,
            ol_key: model.ol_key,
            year: model.year,
            added_at: model.added_at,
        }
    }
}

/// Payload for `POST /api/books`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub ol_key: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}
