use watchbot_models::CatalogItem;

/// Sort by popularity, highest first, and keep at most `limit` items.
/// Equal scores keep their input order.
pub fn rank_by_popularity(mut items: Vec<CatalogItem>, limit: usize) -> Vec<CatalogItem> {
    items.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchbot_models::MediaKind;

    fn item(id: i64, kind: MediaKind, popularity: f64) -> CatalogItem {
        CatalogItem {
            id,
            title: format!("Title {}", id),
            kind,
            date: String::new(),
            overview: String::new(),
            poster_path: None,
            popularity,
        }
    }

    #[test]
    fn test_sorted_descending() {
        let items = vec![
            item(1, MediaKind::Movie, 10.0),
            item(2, MediaKind::Show, 99.5),
            item(3, MediaKind::Movie, 42.0),
        ];
        let ranked = rank_by_popularity(items, 20);
        let ids: Vec<i64> = ranked.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let items: Vec<CatalogItem> =
            (0..45).map(|i| item(i, MediaKind::Movie, i as f64)).collect();
        let ranked = rank_by_popularity(items, 20);
        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked[0].id, 44);
        assert!(ranked.windows(2).all(|w| w[0].popularity >= w[1].popularity));
    }

    #[test]
    fn test_shorter_than_limit() {
        let items = vec![item(1, MediaKind::Movie, 1.0), item(2, MediaKind::Show, 2.0)];
        assert_eq!(rank_by_popularity(items, 20).len(), 2);
        assert!(rank_by_popularity(Vec::new(), 20).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![
            item(1, MediaKind::Movie, 5.0),
            item(2, MediaKind::Show, 5.0),
            item(3, MediaKind::Movie, 7.0),
        ];
        let ids: Vec<i64> = rank_by_popularity(items, 20).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
