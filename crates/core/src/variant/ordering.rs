//! Display order for option values.

/// Known size ladders rendered in their natural order.
///
/// Only value sets that equal one of these exactly are reordered; anything
/// else keeps server order.
const SIZE_LADDERS: &[&[&str]] = &[&["S", "M", "L", "XL"], &["S", "M", "L", "XL", "XXL"]];

/// Order option values for rendering.
///
/// If the values are exactly one of the known size ladders (compared
/// case-insensitively), they come back in ladder order; otherwise in the
/// order given. Deterministic for a given input.
#[must_use]
pub fn display_order(values: &[String]) -> Vec<&str> {
    let ladder = SIZE_LADDERS.iter().find(|ladder| {
        ladder.len() == values.len()
            && ladder
                .iter()
                .all(|size| values.iter().filter(|v| v.eq_ignore_ascii_case(size)).count() == 1)
    });

    match ladder {
        Some(ladder) => ladder
            .iter()
            .filter_map(|size| {
                values
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(size))
                    .map(String::as_str)
            })
            .collect(),
        None => values.iter().map(String::as_str).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_four_sizes_any_input_order() {
        for input in [
            ["XL", "S", "L", "M"],
            ["M", "XL", "S", "L"],
            ["L", "M", "XL", "S"],
        ] {
            let values = owned(&input);
            assert_eq!(display_order(&values), vec!["S", "M", "L", "XL"]);
        }
    }

    #[test]
    fn test_five_sizes() {
        let values = owned(&["XXL", "M", "S", "XL", "L"]);
        assert_eq!(display_order(&values), vec!["S", "M", "L", "XL", "XXL"]);
    }

    #[test]
    fn test_case_insensitive_keeps_server_spelling() {
        let values = owned(&["xl", "m", "s", "l"]);
        assert_eq!(display_order(&values), vec!["s", "m", "l", "xl"]);
    }

    #[test]
    fn test_other_sets_keep_server_order() {
        let three = owned(&["L", "S", "M"]);
        assert_eq!(display_order(&three), vec!["L", "S", "M"]);

        let six = owned(&["XXXL", "S", "M", "L", "XL", "XXL"]);
        assert_eq!(display_order(&six), vec!["XXXL", "S", "M", "L", "XL", "XXL"]);

        let colors = owned(&["White", "Black"]);
        assert_eq!(display_order(&colors), vec!["White", "Black"]);
    }

    #[test]
    fn test_duplicates_are_not_a_ladder() {
        let values = owned(&["S", "S", "L", "XL"]);
        assert_eq!(display_order(&values), vec!["S", "S", "L", "XL"]);
    }
}
