/// Field delimiter of the command grammar
pub const FIELD_DELIMITER: char = '|';

/// Split `payload` on `delimiter`, left to right.
///
/// Empty fields between delimiters are kept; the remainder after the last
/// delimiter is only a field when non-empty. No escaping is supported.
pub fn split_fields(payload: &str, delimiter: char) -> Vec<&str> {
    payload.split_terminator(delimiter).collect()
}

/// Take exactly `N` fields from `payload`.
///
/// The last field is everything after the `N - 1`th delimiter, delimiters
/// included. Returns `Err(found)` with the number of fields present when the
/// payload has fewer than `N - 1` delimiters.
pub fn split_exact<const N: usize>(payload: &str, delimiter: char) -> Result<[&str; N], usize> {
    let mut fields = [""; N];
    let mut found = 0;

    for (slot, field) in fields.iter_mut().zip(payload.splitn(N, delimiter)) {
        *slot = field;
        found += 1;
    }

    if found == N {
        Ok(fields)
    } else {
        Err(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_delimiter_adds_no_field() {
        assert_eq!(split_fields("a|b|", '|'), vec!["a", "b"]);
        assert_eq!(split_fields("a|b|c", '|'), vec!["a", "b", "c"]);
    }

    #[test]
    fn inner_empty_fields_are_kept() {
        assert_eq!(split_fields("a||b", '|'), vec!["a", "", "b"]);
        assert_eq!(split_fields("a||", '|'), vec!["a", ""]);
    }

    #[test]
    fn empty_payload_has_no_fields() {
        assert!(split_fields("", '|').is_empty());
        assert_eq!(split_fields("solo", '|'), vec!["solo"]);
    }

    #[test]
    fn exact_split_keeps_rest_in_last_field() {
        let fields = split_exact::<3>("a|b|c|d", '|').unwrap();
        assert_eq!(fields, ["a", "b", "c|d"]);
    }

    #[test]
    fn exact_split_reports_found_count() {
        assert_eq!(split_exact::<5>("a|b|c|d", '|'), Err(4));
        assert_eq!(split_exact::<5>("", '|'), Err(1));
    }
}
