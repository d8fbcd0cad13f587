//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! The `order_store_tests!` macro generates a test module that validates any
//! `OrderStore` implementation against the full contract: upsert merge rules,
//! ordering, filter composition and concurrent commits.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use order_ingest::storage::InMemoryOrderStore;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Upsert
//! - `test_find_on_empty_store` — nothing stored yet, empty result
//! - `test_upsert_then_find_all` — insertion order preserved
//! - `test_upsert_replaces_whole_record` — second upsert of 791 wins
//! - `test_upsert_is_idempotent` — same order twice, one entry
//! - `test_replacement_keeps_position` — replaced id stays where it was
//! - `test_empty_batch_is_noop` — summary is zero, store unchanged
//!
//! ## Filters
//! - `test_filter_by_order_id`
//! - `test_filter_by_date_range`
//! - `test_filter_composition_is_intersection`
//! - `test_filter_without_match_is_empty`
//!
//! ## Concurrency
//! - `test_concurrent_upserts_keep_every_order` — parallel commits from spawned tasks

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh store implementing
/// `OrderStore + Clone + 'static`; clones must share state. It is
/// re-evaluated for each test.
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use order_ingest::core::{OrderFilter, OrderStore, UpsertSummary};

            // ==================================================================
            // Upsert
            // ==================================================================

            #[tokio::test]
            async fn test_find_on_empty_store() {
                let store = $factory;
                let found = store.find(&OrderFilter::all()).await.unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_upsert_then_find_all() {
                let store = $factory;

                let summary = store
                    .upsert_all(vec![
                        order(836, "1899.02", "20210909"),
                        order(966, "1564.21", "20210507"),
                        order(791, "224.75", "20211122"),
                    ])
                    .await
                    .unwrap();

                assert_eq!(summary, UpsertSummary { inserted: 3, replaced: 0 });
                let found = store.find(&OrderFilter::all()).await.unwrap();
                assert_eq!(ids(&found), vec!["836", "966", "791"]);
            }

            #[tokio::test]
            async fn test_upsert_replaces_whole_record() {
                let store = $factory;

                store
                    .upsert_all(vec![order(791, "224.75", "20211122")])
                    .await
                    .unwrap();
                let replacement = decode(&fixture_line(
                    99,
                    "Someone Else",
                    791,
                    2,
                    "300.00",
                    "20220101",
                ));
                let summary = store.upsert_all(vec![replacement.clone()]).await.unwrap();

                assert_eq!(summary, UpsertSummary { inserted: 0, replaced: 1 });
                let found = store
                    .find(&OrderFilter::all().by_order_id("791"))
                    .await
                    .unwrap();
                assert_eq!(found, vec![replacement]);
                assert_eq!(found[0].value(), 300.0);
                assert_eq!(found[0].user_name(), "Someone Else");
            }

            #[tokio::test]
            async fn test_upsert_is_idempotent() {
                let store = $factory;
                let o = order(791, "224.75", "20211122");

                store.upsert_all(vec![o.clone()]).await.unwrap();
                store.upsert_all(vec![o.clone()]).await.unwrap();

                let found = store.find(&OrderFilter::all()).await.unwrap();
                assert_eq!(found, vec![o]);
            }

            #[tokio::test]
            async fn test_replacement_keeps_position() {
                let store = $factory;
                store
                    .upsert_all(vec![
                        order(1, "1.00", "20210101"),
                        order(2, "2.00", "20210102"),
                        order(3, "3.00", "20210103"),
                    ])
                    .await
                    .unwrap();

                store
                    .upsert_all(vec![order(4, "4.00", "20210104"), order(1, "10.00", "20210101")])
                    .await
                    .unwrap();

                let found = store.find(&OrderFilter::all()).await.unwrap();
                assert_eq!(ids(&found), vec!["1", "2", "3", "4"]);
                assert_eq!(found[0].value(), 10.0);
            }

            #[tokio::test]
            async fn test_empty_batch_is_noop() {
                let store = $factory;
                store
                    .upsert_all(vec![order(1, "1.00", "20210101")])
                    .await
                    .unwrap();

                let summary = store.upsert_all(Vec::new()).await.unwrap();

                assert_eq!(summary, UpsertSummary::default());
                assert_eq!(store.find(&OrderFilter::all()).await.unwrap().len(), 1);
            }

            // ==================================================================
            // Filters
            // ==================================================================

            async fn seeded() -> impl OrderStore + Clone + 'static {
                let store = $factory;
                store
                    .upsert_all(vec![
                        order(1, "10.00", "20210115"),
                        order(2, "20.00", "20210310"),
                        order(3, "30.00", "20210630"),
                        order(4, "40.00", "20211122"),
                    ])
                    .await
                    .unwrap();
                store
            }

            #[tokio::test]
            async fn test_filter_by_order_id() {
                let store = seeded().await;
                let found = store
                    .find(&OrderFilter::all().by_order_id("3"))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["3"]);
            }

            #[tokio::test]
            async fn test_filter_by_date_range() {
                let store = seeded().await;
                let found = store
                    .find(&OrderFilter::all().from_date("2021-03-10").until_date("2021-06-30"))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["2", "3"]);
            }

            #[tokio::test]
            async fn test_filter_composition_is_intersection() {
                let store = seeded().await;

                let by_id = store
                    .find(&OrderFilter::all().by_order_id("4"))
                    .await
                    .unwrap();
                let by_start = store
                    .find(&OrderFilter::all().from_date("2021-06-01"))
                    .await
                    .unwrap();
                let both = store
                    .find(&OrderFilter::all().by_order_id("4").from_date("2021-06-01"))
                    .await
                    .unwrap();
                assert_eq!(ids(&by_id), vec!["4"]);
                assert_eq!(ids(&by_start), vec!["3", "4"]);
                assert_eq!(ids(&both), vec!["4"]);

                let disjoint = store
                    .find(&OrderFilter::all().by_order_id("1").from_date("2021-06-01"))
                    .await
                    .unwrap();
                assert!(disjoint.is_empty());
            }

            #[tokio::test]
            async fn test_filter_without_match_is_empty() {
                let store = seeded().await;
                let found = store
                    .find(&OrderFilter::all().from_date("2030-01-01"))
                    .await
                    .unwrap();
                assert!(found.is_empty());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_upserts_keep_every_order() {
                let store = $factory;

                let mut handles = Vec::new();
                for i in 1..=20u64 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .upsert_all(vec![order(i, "1.00", "20210101"), order(999, "9.99", "20210101")])
                            .await
                    }));
                }
                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                let found = store.find(&OrderFilter::all()).await.unwrap();
                assert_eq!(found.len(), 21);
                assert_eq!(
                    found.iter().filter(|o| o.order_id() == "999").count(),
                    1
                );
            }
        }
    };
}
