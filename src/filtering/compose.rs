use super::expression::FilterExpression;
use super::override_filter::Clause;

/// The fragments of one request, grouped by category
#[derive(Debug, Clone, Default)]
pub struct FilterParts {
    /// Equality from the query string, followed by the endpoint's base filter
    pub equality: Vec<FilterExpression>,
    pub in_list: Vec<FilterExpression>,
    pub not_in_list: Vec<FilterExpression>,
    /// Clauses parsed from `mongoQuery`
    pub raw_override: Vec<Clause>,
    pub element_in: Vec<FilterExpression>,
    pub element_not_in: Vec<FilterExpression>,
    pub search: Option<FilterExpression>,
}

/// Merge all fragments into one conjunction.
///
/// Categories are applied in a fixed order: equality, set membership,
/// negated set membership, the raw override, positive then negative array
/// element matches. A clause replaces any earlier clause on the same key
/// (field path, or `$and` / `$or`), keeping the earlier position. The search
/// disjunction is appended last as its own term and never replaces anything.
#[must_use]
pub fn compose_filter(parts: FilterParts) -> FilterExpression {
    let FilterParts {
        equality,
        in_list,
        not_in_list,
        raw_override,
        element_in,
        element_not_in,
        search,
    } = parts;

    let mut clauses: Vec<Clause> = Vec::new();
    let keyed = |exprs: Vec<FilterExpression>| {
        exprs
            .into_iter()
            .map(|e| (e.key().to_string(), e))
            .collect::<Vec<_>>()
    };

    for (key, expr) in keyed(equality)
        .into_iter()
        .chain(keyed(in_list))
        .chain(keyed(not_in_list))
        .chain(raw_override)
        .chain(keyed(element_in))
        .chain(keyed(element_not_in))
    {
        merge_clause(&mut clauses, key, expr);
    }

    let mut terms: Vec<FilterExpression> = clauses.into_iter().map(|(_, e)| e).collect();
    if let Some(search) = search {
        terms.push(search);
    }
    FilterExpression::And(terms)
}

fn merge_clause(clauses: &mut Vec<Clause>, key: String, expr: FilterExpression) {
    if let Some(slot) = clauses.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = expr;
    } else {
        clauses.push((key, expr));
    }
}
