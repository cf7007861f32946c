//! Step id substitution into parameter templates

use super::results::ResultMap;

/// Replace every occurrence of each recorded step id in `template` with its
/// stored value, visiting results in insertion order.
///
/// Substitution is purely textual: `#E1` also matches the first three
/// characters of `#E10`, and tokens inside unrelated string literals are
/// rewritten too. Tokens without a recorded value are left as they are.
pub fn resolve(template: &str, results: &ResultMap) -> String {
    results
        .iter()
        .filter(|(step_id, _)| !step_id.is_empty())
        .fold(template.to_string(), |resolved, (step_id, value)| {
            resolved.replace(step_id, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(entries: &[(&str, &str)]) -> ResultMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_unknown_token_is_left_untouched() {
        assert_eq!(resolve("use #E9", &ResultMap::new()), "use #E9");
        assert_eq!(resolve("use #E9", &results(&[("#E1", "7")])), "use #E9");
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let template = r#"{"a": #E1, "b": [#E1, #E1]}"#;
        assert_eq!(
            resolve(template, &results(&[("#E1", "7")])),
            r#"{"a": 7, "b": [7, 7]}"#
        );
    }

    #[test]
    fn test_quoted_value_substitutes_into_json_position() {
        let template = r#"{"participants": ["u-1", #E1]}"#;
        let resolved = resolve(template, &results(&[("#E1", "\"u-42\"")]));

        assert_eq!(resolved, r#"{"participants": ["u-1", "u-42"]}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&resolved).is_ok());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let map = results(&[("#E1", "\"u-42\""), ("#E2", "\"c-9\"")]);
        let template = r#"{"receiverId": #E1, "conversationId": #E2}"#;

        let once = resolve(template, &map);
        let twice = resolve(template, &map);

        assert_eq!(once, twice);
        assert_eq!(resolve(&once, &map), once);
    }

    #[test]
    fn test_substring_tokens_are_rewritten() {
        let map = results(&[("#E1", "X")]);
        assert_eq!(resolve("#E10 and #E1", &map), "X0 and X");
    }

    #[test]
    fn test_insertion_order_drives_replacement() {
        // #E10 inserted first wins over the #E1 prefix match
        let map = results(&[("#E10", "ten"), ("#E1", "one")]);
        assert_eq!(resolve("#E10 #E1", &map), "ten one");
    }

    #[test]
    fn test_empty_step_id_is_never_a_token() {
        let map = results(&[("", "\"ignored\""), ("#E1", "1")]);
        assert_eq!(resolve("{#E1}", &map), "{1}");
    }
}
