use super::expression::FilterExpression;

/// Build the free-text search fragment for `q`.
///
/// One case-insensitive substring match per searchable field, combined with
/// OR. Returns `None` when the term is empty or there is nothing to search,
/// so an empty `q` behaves exactly like an absent one. The term is cut to
/// `max_length` characters.
#[must_use]
pub fn build_search(
    term: &str,
    fields: &[String],
    max_length: usize,
) -> Option<FilterExpression> {
    if term.is_empty() || fields.is_empty() {
        return None;
    }

    let needle: String = term.chars().take(max_length).collect();

    Some(FilterExpression::Or(
        fields
            .iter()
            .map(|field| FilterExpression::Contains {
                path: field.clone(),
                needle: needle.clone(),
            })
            .collect(),
    ))
}
