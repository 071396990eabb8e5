use std::collections::HashMap;

use super::*;
use crate::metrics::Metric;
use crate::ranking::Direction;
use crate::store::MemoryRateStore;

#[derive(Debug, Clone, PartialEq)]
struct Author {
    id: u64,
    name: &'static str,
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
struct Article {
    id: u64,
    title: &'static str,
}

impl Entity for Article {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::KIND, self.id)
    }
}

impl Rankable for Article {
    const KIND: &'static str = "article";
}

struct Category {
    id: u64,
}

impl Entity for Category {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("category", self.id)
    }
}

fn articles() -> HashMap<EntityId, Article> {
    [(1, "first"), (2, "second"), (3, "third")]
        .into_iter()
        .map(|(id, title)| (EntityId::Num(id), Article { id, title }))
        .collect()
}

#[test]
fn test_rate_binds_rater_reference() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let author = Author { id: 7, name: "ann" };
    let article = Article { id: 3, title: "third" };

    let event = author.rate(&engine, &article, 3.0, None).unwrap();

    assert_eq!(event.rater, EntityRef::new("author", 7u64));
    assert_eq!(event.rateable, EntityRef::new("article", 3u64));
    assert_eq!(event.scope, None);
    assert_eq!(event.value, 3.0);
    assert_eq!(engine.store().len(), 1);
}

#[test]
fn test_rate_with_scope() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let author = Author { id: 7, name: "ann" };
    let article = Article { id: 3, title: "third" };
    let category = Category { id: 9 };

    let event = author
        .rate(&engine, &article, 3.0, Some(category.entity_ref()))
        .unwrap();

    assert_eq!(event.scope, Some(EntityRef::new("category", 9u64)));
}

#[test]
fn test_rate_for_and_has_rated() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let author = Author { id: 1, name: "ann" };
    let article = Article { id: 1, title: "first" };
    let category = Category { id: 1 }.entity_ref();

    assert!(!author.has_rated(&engine, &article, None).unwrap());

    author.rate(&engine, &article, 2.0, None).unwrap();
    author.rate(&engine, &article, 4.0, None).unwrap();

    let latest = author.rate_for(&engine, &article, None).unwrap().unwrap();
    assert_eq!(latest.value, 4.0);
    assert!(author.has_rated(&engine, &article, None).unwrap());
    assert!(!author.has_rated(&engine, &article, Some(&category)).unwrap());
}

#[test]
fn test_order_by_rating_hydrates_instances() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let ann = Author { id: 1, name: "ann" };
    let bob = Author { id: 2, name: "bob" };
    let arena = articles();

    ann.rate(&engine, &arena[&EntityId::Num(1)], 100.0, None).unwrap();
    ann.rate(&engine, &arena[&EntityId::Num(2)], 11.0, None).unwrap();
    ann.rate(&engine, &arena[&EntityId::Num(3)], 10.0, None).unwrap();
    bob.rate(&engine, &arena[&EntityId::Num(1)], 1.0, None).unwrap();

    let ranked = Article::order_by_default_rating(&engine, &arena).unwrap();
    let titles: Vec<_> = ranked.iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);

    let query = RankQuery::new()
        .metric(Metric::Average)
        .direction(Direction::Ascending);
    let ranked = Article::order_by_rating(&engine, &arena, &query).unwrap();
    let titles: Vec<_> = ranked.iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[test]
fn test_order_by_rating_skips_unresolvable_ids() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let ann = Author { id: 1, name: "ann" };

    ann.rate(&engine, &EntityRef::new("article", 1u64), 5.0, None)
        .unwrap();
    ann.rate(&engine, &EntityRef::new("article", 99u64), 9.0, None)
        .unwrap();

    let arena = articles();
    let ranked = Article::order_by_rating(&engine, &arena, &RankQuery::new()).unwrap();

    assert_eq!(ranked, vec![arena[&EntityId::Num(1)].clone()]);
}

#[test]
fn test_closure_resolver() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let ann = Author { id: 1, name: "ann" };
    let bob = Author { id: 2, name: "bob" };
    let cid = Author { id: 3, name: "cid" };

    ann.rate(&engine, &bob, 4.0, None).unwrap();
    bob.rate(&engine, &cid, 2.0, None).unwrap();
    cid.rate(&engine, &bob, 5.0, None).unwrap();

    let people = [ann.clone(), bob.clone(), cid.clone()];
    let resolver = |id: &EntityId| people.iter().find(|a| &EntityId::Num(a.id) == id).cloned();

    let query = RankQuery::new().metric(Metric::Sum);
    let ranked = Author::order_by_rating(&engine, &resolver, &query).unwrap();
    let names: Vec<_> = ranked.iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["bob", "cid"]);
}

#[test]
fn test_rating_of_single_instance() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let ann = Author { id: 1, name: "ann" };
    let bob = Author { id: 2, name: "bob" };
    let arena = articles();
    let first = &arena[&EntityId::Num(1)];
    let category = Category { id: 1 }.entity_ref();

    ann.rate(&engine, first, 1.0, Some(category.clone())).unwrap();
    bob.rate(&engine, first, 2.0, Some(category.clone())).unwrap();

    let scoped = first.rating(&engine, Some(&category)).unwrap().unwrap();
    assert_eq!(scoped.count, 2);
    assert_eq!(scoped.sum, 3.0);
    assert_eq!(scoped.average, 1.5);

    assert!(first.rating(&engine, None).unwrap().is_none());
    assert!(
        arena[&EntityId::Num(2)]
            .rating(&engine, Some(&category))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_rate_rejects_malformed_rateable() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let ann = Author { id: 1, name: "ann" };

    let err = ann
        .rate(&engine, &EntityRef::new("", 1u64), 1.0, None)
        .unwrap_err();
    assert!(err.is_invalid_reference());
}

/// Addresses itself under a legacy kind but ranks as `article`.
#[derive(Debug, Clone, PartialEq)]
struct LegacyPost {
    id: u64,
}

impl Entity for LegacyPost {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("post", self.id)
    }
}

impl Rankable for LegacyPost {
    const KIND: &'static str = "article";
}

#[test]
fn test_rating_uses_rankable_kind() {
    let engine = RatingEngine::new(MemoryRateStore::new());
    let ann = Author { id: 1, name: "ann" };
    ann.rate(&engine, &EntityRef::new("article", 7u64), 4.0, None)
        .unwrap();

    let post = LegacyPost { id: 7 };
    let resolver = |id: &EntityId| (*id == EntityId::Num(7)).then(|| post.clone());
    let ranked = LegacyPost::order_by_rating(&engine, &resolver, &RankQuery::new()).unwrap();
    assert_eq!(ranked, vec![post.clone()]);

    let score = post.rating(&engine, None).unwrap().unwrap();
    assert_eq!(score.rateable_id, EntityId::Num(7));
    assert_eq!(score.sum, 4.0);
}
