//! Test fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use rating::{Entity, EntityId, EntityRef, Rankable, RateStore, Rater, RatingEngine};

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: u64,
}

impl Entity for Author {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::KIND, self.id)
    }
}

impl Rater for Author {}

impl Rankable for Author {
    const KIND: &'static str = "author";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: u64,
}

impl Entity for Article {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::KIND, self.id)
    }
}

impl Rankable for Article {
    const KIND: &'static str = "article";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: u64,
}

impl Entity for Category {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("category", self.id)
    }
}

/// Arena of every entity in the ranking scenario, indexed by id.
pub struct Scenario {
    pub category: Category,
    pub author_1: Author,
    pub author_2: Author,
    pub article_1: Article,
    pub article_2: Article,
    pub article_3: Article,
    pub authors: HashMap<EntityId, Author>,
    pub articles: HashMap<EntityId, Article>,
}

impl Scenario {
    pub fn new() -> Self {
        let authors: HashMap<_, _> = (1..=2)
            .map(|id| (EntityId::Num(id), Author { id }))
            .collect();
        let articles: HashMap<_, _> = (1..=3)
            .map(|id| (EntityId::Num(id), Article { id }))
            .collect();

        Self {
            category: Category { id: 1 },
            author_1: Author { id: 1 },
            author_2: Author { id: 2 },
            article_1: Article { id: 1 },
            article_2: Article { id: 2 },
            article_3: Article { id: 3 },
            authors,
            articles,
        }
    }

    /// Records the standard rating set:
    ///
    /// - author 1 rates articles 1, 2, 3 with 100, 11, 10
    /// - author 2 rates article 1 with 1
    /// - authors 1 and 2 rate article 1 with 1 and 2 under the category
    pub fn seed<S: RateStore>(&self, engine: &RatingEngine<S>) {
        let scope = Some(self.category.entity_ref());

        self.author_1
            .rate(engine, &self.article_1, 100.0, None)
            .expect("rate article 1");
        self.author_1
            .rate(engine, &self.article_2, 11.0, None)
            .expect("rate article 2");
        self.author_1
            .rate(engine, &self.article_3, 10.0, None)
            .expect("rate article 3");
        self.author_2
            .rate(engine, &self.article_1, 1.0, None)
            .expect("rate article 1");

        self.author_1
            .rate(engine, &self.article_1, 1.0, scope.clone())
            .expect("rate article 1 in category");
        self.author_2
            .rate(engine, &self.article_1, 2.0, scope)
            .expect("rate article 1 in category");
    }

    /// Authors rating each other, unscoped.
    pub fn seed_authors<S: RateStore>(&self, engine: &RatingEngine<S>) {
        self.author_1
            .rate(engine, &self.author_2, 3.0, None)
            .expect("rate author 2");
        self.author_2
            .rate(engine, &self.author_1, 4.0, None)
            .expect("rate author 1");
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ids(articles: &[Article]) -> Vec<u64> {
    articles.iter().map(|a| a.id).collect()
}
