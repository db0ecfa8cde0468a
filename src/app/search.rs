use crate::app::models::TodoEntry;

// Keep the entries whose text contains the query, ignoring case.
// An empty query keeps everything; the source order is preserved.
pub fn filter<'a, I>(entries: I, query: &str) -> Vec<&'a TodoEntry>
where
    I: IntoIterator<Item = &'a TodoEntry>,
{
    let needle = query.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| needle.is_empty() || entry.text.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    fn entries(texts: &[&str]) -> Vec<TodoEntry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| TodoEntry {
                id: i as u64 + 1,
                text: text.to_string(),
                due_date: None,
                success: false,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            })
            .collect()
    }

    fn texts<'a>(found: &[&'a TodoEntry]) -> Vec<&'a str> {
        found.iter().map(|entry| entry.text.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let list = entries(&["Buy milk", "Walk dog", "Call mom"]);
        let found = filter(&list, "");
        assert_eq!(found, list.iter().collect::<Vec<_>>());
    }

    #[rstest]
    #[case("milk", vec!["Buy milk", "Milkshake"])]
    #[case("MILK", vec!["Buy milk", "Milkshake"])]
    #[case("k d", vec!["Walk dog"])]
    #[case("bread", vec![])]
    fn matches_substrings_case_insensitively(#[case] query: &str, #[case] expected: Vec<&str>) {
        let list = entries(&["Buy milk", "Walk dog", "Milkshake"]);
        assert_eq!(texts(&filter(&list, query)), expected);
    }

    #[test]
    fn filtering_twice_gives_the_same_result() {
        let list = entries(&["Buy milk", "Walk dog", "Milkshake", "milk the cow"]);
        let once = filter(&list, "Milk");
        let twice = filter(once.iter().copied(), "Milk");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_list_yields_nothing() {
        assert!(filter(&Vec::<TodoEntry>::new(), "milk").is_empty());
    }

    proptest! {
        #[test]
        fn filter_is_idempotent_and_keeps_order(
            texts in prop::collection::vec("[a-zA-Z ]{0,12}", 0..30),
            query in "[a-zA-Z ]{0,3}"
        ) {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let list = entries(&refs);

            let once = filter(&list, &query);
            let twice = filter(once.iter().copied(), &query);
            prop_assert_eq!(&once, &twice);

            let ids: Vec<u64> = once.iter().map(|entry| entry.id).collect();
            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn empty_query_returns_the_whole_list(
            texts in prop::collection::vec("[a-zA-Z ]{0,12}", 0..30)
        ) {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let list = entries(&refs);
            prop_assert_eq!(filter(&list, ""), list.iter().collect::<Vec<_>>());
        }
    }
}
