//! Read-only access to the blog's posts table

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

/// The titles of one post
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct PostTitles {
    pub title: Option<String>,
    pub bangla_title: Option<String>,
}

impl PostTitles {
    /// Stored title, or the slug with dashes turned into spaces
    pub fn display_title(&self, slug: &str) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => slug.replace('-', " "),
        }
    }

    pub fn secondary_title(&self) -> String {
        self.bangla_title.clone().unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

impl PostStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        tracing::info!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<PostTitles>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT title, bangla_title
            FROM posts
            WHERE slug = ?
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }
}
