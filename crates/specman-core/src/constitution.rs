use crate::id::SpecId;
use crate::item::{self, SpecItem, Supersession};
use crate::types::{ArticleStatus, SpecType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// One principle of a constitution (`art-NNN`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub principle: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(flatten)]
    pub links: Supersession,
}

impl Article {
    pub fn new(title: impl Into<String>, principle: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            principle: principle.into(),
            rationale: String::new(),
            status: ArticleStatus::Active,
            links: Supersession::default(),
        }
    }
}

impl SpecItem for Article {
    const PREFIX: &'static str = "art";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn supersession(&self) -> &Supersession {
        &self.links
    }
    fn supersession_mut(&mut self) -> &mut Supersession {
        &mut self.links
    }
    fn rewrite_refs(&mut self, _old: &str, _new: &str) {}
}

// ---------------------------------------------------------------------------
// Constitution
// ---------------------------------------------------------------------------

/// Project-wide principles that constrain every other spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constitution {
    pub number: u32,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub articles: Vec<Article>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Constitution {
    pub fn new(number: u32, slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            articles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SpecId {
        SpecId::new(SpecType::Constitution, self.number, self.slug.clone())
    }

    pub fn add_article(&mut self, title: impl Into<String>, principle: impl Into<String>) -> String {
        let id = item::push_item(&mut self.articles, Article::new(title, principle));
        self.updated_at = Utc::now();
        id
    }

    pub fn active_articles(&self) -> Vec<&Article> {
        item::active(&self.articles)
            .filter(|a| a.status == ArticleStatus::Active)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_ids_increment() {
        let mut con = Constitution::new(1, "eng-principles", "Engineering principles");
        assert_eq!(con.add_article("Simplicity", "Prefer boring tech"), "art-001");
        assert_eq!(con.add_article("Safety", "No force pushes"), "art-002");
        assert_eq!(con.id().to_string(), "con-001-eng-principles");
    }

    #[test]
    fn archived_articles_not_active() {
        let mut con = Constitution::new(1, "eng", "Eng");
        con.add_article("A", "a");
        con.add_article("B", "b");
        con.articles[0].status = ArticleStatus::Archived;
        let active = con.active_articles();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "B");
    }

    #[test]
    fn superseded_article_replaced_in_active() {
        let mut con = Constitution::new(1, "eng", "Eng");
        let old = con.add_article("Testing", "Unit tests only");
        item::supersede(
            &mut con.articles,
            &old,
            Article::new("Testing", "Unit and integration tests"),
        )
        .unwrap();

        let active = con.active_articles();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].principle, "Unit and integration tests");
        assert_eq!(active[0].links.supersedes.as_deref(), Some("art-001"));
    }
}
