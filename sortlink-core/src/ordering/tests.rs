//! Tests for the ordering resolver

use super::*;
use crate::error::{OrderingError, ResolveError};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};

#[derive(Debug, Clone)]
struct Author {
    name: String,
}

impl FieldAccess for Author {
    fn field(&self, name: &str) -> Option<SortKey> {
        match name {
            "name" => Some(SortKey::from(self.name.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Post {
    id: usize,
    name: String,
    created_at: i64,
    score: i64,
    author: Author,
    reads: Arc<AtomicUsize>,
}

fn post_author(post: &Post) -> &dyn FieldAccess {
    &post.author
}

static POST_FIELDS: Lazy<FieldTable<Post>> = Lazy::new(|| {
    FieldTable::<Post>::builder()
        .native("id", |p| SortKey::from(p.id))
        .native("name", |p| SortKey::from(p.name.as_str()))
        .native("created_at", |p| SortKey::from(p.created_at))
        .computed("nickname", |p| SortKey::from(p.name.to_lowercase()))
        .computed("score", |p| SortKey::from(p.score))
        .relation("author", post_author)
        .build()
});

impl FieldAccess for Post {
    fn field(&self, name: &str) -> Option<SortKey> {
        self.reads.fetch_add(1, AtomicOrdering::SeqCst);
        POST_FIELDS.get(self, name)
    }

    fn related(&self, name: &str) -> Option<&dyn FieldAccess> {
        POST_FIELDS.related(self, name)
    }
}

/// Backend that records its ordering clause and counts materializations.
#[derive(Debug, Clone)]
struct SpyQuery {
    rows: Vec<Post>,
    pending: Option<OrderingExpression>,
    fetches: Arc<AtomicUsize>,
    orderings: Arc<AtomicUsize>,
}

impl SpyQuery {
    fn new(rows: Vec<Post>) -> Self {
        Self {
            rows,
            pending: None,
            fetches: Arc::new(AtomicUsize::new(0)),
            orderings: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(AtomicOrdering::SeqCst)
    }

    fn order_count(&self) -> usize {
        self.orderings.load(AtomicOrdering::SeqCst)
    }
}

impl QueryHandle for SpyQuery {
    type Record = Post;
    type Error = MemoryQueryError;

    fn exists(&self) -> Result<bool, Self::Error> {
        Ok(!self.rows.is_empty())
    }

    fn order_by(
        &self,
        ordering: &OrderingExpression,
    ) -> Result<Self, Self::Error> {
        self.orderings.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Self {
            pending: Some(ordering.clone()),
            ..self.clone()
        })
    }

    fn fetch(&self) -> Result<Vec<Self::Record>, Self::Error> {
        self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
        let query = MemoryQuery::new(self.rows.clone());
        match &self.pending {
            Some(ordering) => query.order_by(ordering)?.fetch(),
            None => query.fetch(),
        }
    }
}

fn post(id: usize, name: &str, created_at: i64, score: i64) -> Post {
    Post {
        id,
        name: name.to_string(),
        created_at,
        score,
        author: Author {
            name: format!("author-{}", (id * 7) % 5),
        },
        reads: Arc::new(AtomicUsize::new(0)),
    }
}

fn sample_posts() -> Vec<Post> {
    vec![
        post(1, "Charlie", 300, 2),
        post(2, "alice", 100, 5),
        post(3, "Bob", 200, 2),
    ]
}

fn descriptor() -> CollectionDescriptor {
    CollectionDescriptor::new(["name", "created_at"])
}

fn ids(posts: &[Post]) -> Vec<usize> {
    posts.iter().map(|p| p.id).collect()
}

fn read_total(posts: &[Post]) -> usize {
    posts
        .iter()
        .map(|p| p.reads.load(AtomicOrdering::SeqCst))
        .sum()
}

#[test]
fn test_native_field_descending_is_delegated() {
    let resolver = OrderingResolver::default();
    let query = SpyQuery::new(sample_posts());
    let collection = SortableCollection::Query(query.clone());
    let expr = OrderingExpression::from("-created_at");

    let ordered = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap();

    let handle = match ordered {
        Ordered::Delegated(handle) => handle,
        other => panic!("expected backend delegation, got {}", other.label()),
    };
    assert_eq!(
        handle.pending.as_ref().map(|o| o.as_str()),
        Some("-created_at")
    );
    assert_eq!(query.fetch_count(), 0);
    assert_eq!(query.order_count(), 1);

    assert_eq!(ids(&handle.fetch().unwrap()), vec![1, 3, 2]);
}

#[test]
fn test_computed_field_sorts_in_memory_ascending() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());
    let expr = OrderingExpression::from("nickname");

    let ordered = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap();

    let posts = match ordered {
        Ordered::Sorted(posts) => posts,
        other => panic!("expected in-memory sort, got {}", other.label()),
    };
    assert_eq!(ids(&posts), vec![2, 3, 1]);
}

#[test]
fn test_in_memory_sort_on_query_materializes_once() {
    let resolver = OrderingResolver::default();
    let query = SpyQuery::new(sample_posts());
    let collection = SortableCollection::Query(query.clone());
    let expr = OrderingExpression::from("-score");

    let ordered = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap();

    let posts = match ordered {
        Ordered::Sorted(posts) => posts,
        other => panic!("expected in-memory sort, got {}", other.label()),
    };
    // Ties (score 2) keep their input order when descending too.
    assert_eq!(ids(&posts), vec![2, 1, 3]);
    assert_eq!(query.fetch_count(), 1);
    assert_eq!(query.order_count(), 0);
}

#[test]
fn test_missing_attribute_is_reported() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());
    let expr = OrderingExpression::from("-bogus");

    let err = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Ordering(OrderingError::AttributeNotFound { ref field })
            if field == "bogus"
    ));
}

#[test]
fn test_compound_path_always_delegates() {
    let resolver = OrderingResolver::default();
    let query = SpyQuery::new(sample_posts());
    let collection = SortableCollection::Query(query.clone());

    for fields in [
        CollectionDescriptor::default(),
        descriptor(),
        CollectionDescriptor::new(["author.name"]),
    ] {
        let expr = OrderingExpression::from("author.name");
        let ordered =
            resolver.resolve(&collection, &fields, Some(&expr)).unwrap();
        assert!(ordered.is_delegated());
    }
    assert_eq!(query.fetch_count(), 0);
}

#[test]
fn test_invalid_relation_error_comes_from_backend() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::Query(MemoryQuery::new(sample_posts()));
    let expr = OrderingExpression::from("-publisher.name");

    let err = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Backend(MemoryQueryError::UnknownField { ref path })
            if path == "publisher.name"
    ));
}

#[test]
fn test_marker_only_is_invalid_expression() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());
    let expr = OrderingExpression::from("-");

    let err = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Ordering(OrderingError::InvalidExpression { .. })
    ));
}

#[test]
fn test_missing_expression_is_identity() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());

    for expr in [None, Some(OrderingExpression::from(""))] {
        let ordered = resolver
            .resolve(&collection, &descriptor(), expr.as_ref())
            .unwrap();
        let original = match ordered {
            Ordered::Original(original) => original,
            other => panic!("expected identity, got {}", other.label()),
        };
        assert!(std::ptr::eq(original, &collection));
    }
}

#[test]
fn test_empty_collection_ignores_invalid_expressions() {
    let resolver = OrderingResolver::default();
    let records = SortableCollection::<SpyQuery>::Records(Vec::new());
    let query = SpyQuery::new(Vec::new());
    let lazy = SortableCollection::Query(query.clone());

    for raw in ["-", "-bogus", "nickname", "author.name", "name"] {
        let expr = OrderingExpression::from(raw);
        assert!(
            resolver
                .resolve(&records, &descriptor(), Some(&expr))
                .unwrap()
                .is_original()
        );
        assert!(
            resolver
                .resolve(&lazy, &descriptor(), Some(&expr))
                .unwrap()
                .is_original()
        );
    }
    assert_eq!(query.order_count(), 0);
    assert_eq!(query.fetch_count(), 0);
}

#[test]
fn test_native_field_on_records_is_sorted_in_memory() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());
    let expr = OrderingExpression::from("-created_at");

    let ordered = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap();

    assert!(ordered.is_sorted());
    assert_eq!(ids(&ordered.into_records().unwrap()), vec![1, 3, 2]);
}

#[test]
fn test_compound_path_on_records_walks_relations() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());
    let expr = OrderingExpression::from("author.name");

    let ordered = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap();

    // authors are author-2, author-4, author-1
    assert_eq!(ids(&ordered.into_records().unwrap()), vec![3, 1, 2]);
}

#[test]
fn test_unknown_path_on_records_names_the_path() {
    let resolver = OrderingResolver::default();
    let collection =
        SortableCollection::<SpyQuery>::Records(sample_posts());
    let expr = OrderingExpression::from("-author.age");

    let err = resolver
        .resolve(&collection, &descriptor(), Some(&expr))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Ordering(OrderingError::AttributeNotFound { ref field })
            if field == "author.age"
    ));
}

#[test]
fn test_mixed_numeric_values_sort_by_value() {
    let rows: Vec<BTreeMap<String, SortKey>> =
        [SortKey::from(3i64), SortKey::from(2.5f64), SortKey::from(10i64)]
            .into_iter()
            .map(|price| BTreeMap::from([("price".to_string(), price)]))
            .collect();

    let sorted = sort_records(&rows, "price", SortOrder::Ascending).unwrap();

    let prices: Vec<String> =
        sorted.iter().map(|row| row["price"].to_string()).collect();
    assert_eq!(prices, vec!["2.5", "3", "10"]);
}

#[test]
fn test_classify_examples() {
    let resolver = OrderingResolver::default();
    let fields = descriptor();

    assert_eq!(
        resolver.classify(&fields, &"-created_at".into()).unwrap(),
        OrderingPlan::Delegate
    );
    assert_eq!(
        resolver.classify(&fields, &"nickname".into()).unwrap(),
        OrderingPlan::InMemory {
            field: "nickname".to_string(),
            order: SortOrder::Ascending,
        }
    );
    assert_eq!(
        resolver.classify(&fields, &"-bogus".into()).unwrap(),
        OrderingPlan::InMemory {
            field: "bogus".to_string(),
            order: SortOrder::Descending,
        }
    );
    assert_eq!(
        resolver.classify(&fields, &"author.name".into()).unwrap(),
        OrderingPlan::Delegate
    );
}

#[test]
fn test_configured_separator() {
    let resolver = OrderingResolver::new(ResolverSettings {
        path_separator: "__".to_string(),
    });
    let fields = descriptor();

    assert_eq!(
        resolver.classify(&fields, &"author__name".into()).unwrap(),
        OrderingPlan::Delegate
    );
    // With `__` as separator a dotted name is just an unknown simple field.
    assert!(matches!(
        resolver.classify(&fields, &"author.name".into()).unwrap(),
        OrderingPlan::InMemory { .. }
    ));
}

#[test]
fn test_later_record_missing_field_fails_whole_sort() {
    use std::collections::BTreeMap;

    let full = BTreeMap::from([("rank".to_string(), SortKey::from(1i64))]);
    let partial = BTreeMap::from([("other".to_string(), SortKey::Null)]);

    let err = sort_records(&[full, partial], "rank", SortOrder::Ascending)
        .unwrap_err();
    assert_eq!(
        err,
        OrderingError::AttributeNotFound {
            field: "rank".to_string()
        }
    );
}

// Property tests

fn arb_posts() -> impl Strategy<Value = Vec<Post>> {
    prop::collection::vec(
        ("[a-zA-Z]{1,6}", 0i64..1_000, 0i64..4),
        1..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, (name, created_at, score))| {
                post(id, &name, created_at, score)
            })
            .collect()
    })
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Ascending), Just(SortOrder::Descending)]
}

proptest! {
    #[test]
    fn native_fields_never_touch_records(
        posts in arb_posts(),
        field in prop_oneof![Just("name"), Just("created_at")],
        order in arb_order(),
    ) {
        let resolver = OrderingResolver::default();
        let query = SpyQuery::new(posts.clone());
        let collection = SortableCollection::Query(query.clone());
        let expr = OrderingExpression::for_field(field, order);

        let ordered = resolver
            .resolve(&collection, &descriptor(), Some(&expr))
            .unwrap();

        prop_assert!(ordered.is_delegated());
        prop_assert_eq!(query.fetch_count(), 0);
        prop_assert_eq!(read_total(&posts), 0);
    }

    #[test]
    fn compound_paths_always_delegate(
        relation in "[a-z]{1,8}",
        leaf in "[a-z]{1,8}",
        order in arb_order(),
        listed in any::<bool>(),
    ) {
        let resolver = OrderingResolver::default();
        let path = format!("{relation}.{leaf}");
        let mut fields = descriptor();
        if listed {
            fields.insert(path.clone());
        }

        let plan = resolver
            .classify(&fields, &OrderingExpression::for_field(&path, order))
            .unwrap();
        prop_assert_eq!(plan, OrderingPlan::Delegate);
    }

    #[test]
    fn in_memory_sort_is_ordered_stable_and_complete(
        posts in arb_posts(),
        order in arb_order(),
    ) {
        let resolver = OrderingResolver::default();
        let collection = SortableCollection::<SpyQuery>::Records(posts.clone());
        let expr = OrderingExpression::for_field("score", order);

        let Ordered::Sorted(sorted) = resolver
            .resolve(&collection, &descriptor(), Some(&expr))
            .unwrap()
        else {
            panic!("expected an in-memory sort");
        };

        prop_assert_eq!(sorted.len(), posts.len());

        let mut seen = ids(&sorted);
        seen.sort_unstable();
        prop_assert_eq!(seen, ids(&posts));

        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            match order {
                SortOrder::Ascending => prop_assert!(a.score <= b.score),
                SortOrder::Descending => prop_assert!(a.score >= b.score),
            }
            // ids follow input order, so equal keys must keep ascending ids
            if a.score == b.score {
                prop_assert!(a.id < b.id);
            }
        }
    }

    #[test]
    fn missing_attribute_never_returns_partial_result(
        posts in arb_posts(),
        field in "[a-z]{3,8}",
        order in arb_order(),
    ) {
        prop_assume!(POST_FIELDS.kind(&field).is_none());
        let resolver = OrderingResolver::default();
        let collection = SortableCollection::<SpyQuery>::Records(posts);
        let expr = OrderingExpression::for_field(&field, order);

        let result = resolver.resolve(&collection, &descriptor(), Some(&expr));
        prop_assert!(
            matches!(
                result,
                Err(ResolveError::Ordering(
                    OrderingError::AttributeNotFound { .. }
                ))
            ),
            "expected AttributeNotFound"
        );
    }

    #[test]
    fn empty_collection_is_always_unchanged(raw in "-?[a-z._]{0,10}") {
        let resolver = OrderingResolver::default();
        let collection = SortableCollection::<SpyQuery>::Records(Vec::new());
        let expr = OrderingExpression::from(raw);

        let ordered = resolver
            .resolve(&collection, &descriptor(), Some(&expr))
            .unwrap();
        prop_assert!(ordered.is_original());
    }
}
