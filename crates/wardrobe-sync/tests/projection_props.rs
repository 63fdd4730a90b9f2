//! Property tests for pagination, projection and single-item mutation

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use wardrobe_domain::{Category, Item, SortField, SortKey, SortSpec};
use wardrobe_sync::{project, ItemMutation, ListSyncController, PageWindow, SyncConfig};

fn base() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

prop_compose! {
    fn arb_item()(
        name in "[a-zA-Z ]{0,10}",
        brand in prop::option::of("[a-zA-Z]{1,8}"),
        category in arb_category(),
        tags in prop::collection::vec("[a-z]{1,6}", 0..3),
        wear_count in 0u32..5,
        last_worn in prop::option::of(0i64..1_000),
        age in 0i64..10_000,
    ) -> Item {
        let mut item = Item::new(name, category, base() - Duration::seconds(age));
        item.brand = brand;
        item.tags = tags;
        item.wear_count = wear_count;
        item.last_worn = last_worn.map(|m| base() - Duration::minutes(m));
        item
    }
}

fn arb_sort() -> impl Strategy<Value = SortSpec> {
    (
        prop::sample::select(vec![
            SortField::CreatedAt,
            SortField::Name,
            SortField::WearCount,
            SortField::LastWorn,
        ]),
        any::<bool>(),
    )
        .prop_map(|(field, asc)| {
            if asc {
                SortSpec::ascending(field)
            } else {
                SortSpec::descending(field)
            }
        })
}

fn keys(items: &[Item], field: SortField) -> Vec<Option<SortKey>> {
    items.iter().map(|i| SortKey::of(i, field)).collect()
}

proptest! {
    #[test]
    fn test_has_more_iff_full_page(page_size in 1usize..50, fetched in 0usize..60) {
        let mut window = PageWindow::new(page_size);
        window.record(0, fetched);
        prop_assert_eq!(window.has_more, fetched == page_size);
    }

    #[test]
    fn test_first_page_replaces_later_pages_append(
        first in prop::collection::vec(arb_item(), 0..10),
        second in prop::collection::vec(arb_item(), 0..10),
        refill in prop::collection::vec(arb_item(), 0..10),
    ) {
        let mut c = ListSyncController::new(&SyncConfig::with_page_size(10));
        let req = c.begin_load(0, false).unwrap();
        c.finish_load(&req, Ok(first.clone())).unwrap();
        prop_assert_eq!(c.items(), first.as_slice());

        let req = c.begin_load(1, false).unwrap();
        c.finish_load(&req, Ok(second.clone())).unwrap();
        prop_assert_eq!(c.items().len(), first.len() + second.len());

        let req = c.begin_load(0, true).unwrap();
        c.finish_load(&req, Ok(refill.clone())).unwrap();
        prop_assert_eq!(c.items(), refill.as_slice());
        prop_assert_eq!(c.window().page, 0);
    }

    #[test]
    fn test_missing_values_sort_last(
        items in prop::collection::vec(arb_item(), 0..20),
        sort in arb_sort(),
    ) {
        let out = project(&items, "", &sort);
        let ks = keys(&out, sort.field);
        let first_missing = ks.iter().position(Option::is_none).unwrap_or(ks.len());
        prop_assert!(ks[first_missing..].iter().all(Option::is_none));
    }

    #[test]
    fn test_reversing_direction_reverses_present_values(
        items in prop::collection::vec(arb_item(), 0..20),
        sort in arb_sort(),
    ) {
        let forward: Vec<_> = keys(&project(&items, "", &sort), sort.field)
            .into_iter()
            .flatten()
            .collect();
        let mut backward: Vec<_> = keys(&project(&items, "", &sort.reversed()), sort.field)
            .into_iter()
            .flatten()
            .collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn test_query_matches_iff_substring(
        items in prop::collection::vec(arb_item(), 0..20),
        query in "[a-zA-Z]{1,3}",
    ) {
        let out = project(&items, &query, &SortSpec::default());
        let needle = query.to_lowercase();
        for item in &items {
            let expected = item.name.to_lowercase().contains(&needle)
                || item.brand.as_ref().is_some_and(|b| b.to_lowercase().contains(&needle))
                || item.category.as_str().contains(&needle)
                || item.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            prop_assert_eq!(out.iter().any(|i| i.id == item.id), expected);
        }
    }

    #[test]
    fn test_mutate_single_touches_one_entry(
        items in prop::collection::vec(arb_item(), 1..15),
        pick in any::<prop::sample::Index>(),
        remove in any::<bool>(),
    ) {
        let mut c = ListSyncController::new(&SyncConfig::with_page_size(20));
        let req = c.begin_load(0, false).unwrap();
        c.finish_load(&req, Ok(items.clone())).unwrap();

        let idx = pick.index(items.len());
        let target = items[idx].clone();
        if remove {
            prop_assert!(c.mutate_single(ItemMutation::Removed(target.id)));
            let mut expected = items.clone();
            expected.remove(idx);
            prop_assert_eq!(c.items(), expected.as_slice());
        } else {
            let mut changed = target.clone();
            changed.is_favorite = !changed.is_favorite;
            changed.wear_count += 1;
            prop_assert!(c.mutate_single(ItemMutation::Updated(changed.clone())));
            let mut expected = items.clone();
            expected[idx] = changed;
            prop_assert_eq!(c.items(), expected.as_slice());
        }
    }
}
