use crate::config::{ListConfig, ListOptions};
use crate::errors::ListError;
use crate::filtering::{
    FilterExpression, FilterParts, Membership, build_array_element, build_equality,
    build_in_list, build_not_in_list, build_search, compose_filter,
};
use crate::models::ListResponse;
use crate::pagination::PageInfo;
use crate::query_parser::{ParsedListQuery, parse_list_query};
use crate::store::{DocumentStore, FindRequest};

/// Compose the store filter for a parsed request.
///
/// The endpoint's base filter is appended after the query equality so it
/// replaces a query parameter of the same name.
///
/// # Errors
///
/// Returns `ListError::InvalidFieldPath` if an `inListArrOfObj` or
/// `notInListArrOfObj` key is not of the form `arrayField.subField`.
pub fn build_filter(
    parsed: &ParsedListQuery,
    options: &ListOptions,
    config: &ListConfig,
) -> Result<FilterExpression, ListError> {
    let mut equality = build_equality(&parsed.remaining_filters);
    equality.extend(
        options
            .base_filter
            .iter()
            .map(|(field, value)| FilterExpression::equals(field.clone(), value.clone())),
    );

    let parts = FilterParts {
        equality,
        in_list: build_in_list(&parsed.in_list),
        not_in_list: build_not_in_list(&parsed.not_in_list),
        raw_override: parsed.raw_filter_override.clone(),
        element_in: build_array_element(&parsed.in_list_arr_of_obj, Membership::In)?,
        element_not_in: build_array_element(&parsed.not_in_list_arr_of_obj, Membership::NotIn)?,
        search: build_search(
            &parsed.search_term,
            &options.search_fields,
            config.max_search_length,
        ),
    };

    Ok(compose_filter(parts))
}

/// Run one list request against `store`.
///
/// Parses the query pairs, composes a single filter, counts the matches and
/// fetches the requested page with that same filter. The count is issued
/// first; a failure in either call aborts the request.
///
/// # Errors
///
/// - `ListError::MalformedFilter` for a rejected `mongoQuery`
/// - `ListError::InvalidFieldPath` for a bad array-element key
/// - `ListError::StoreOperation` if the store fails
///
/// Parse errors are returned before the store is called.
pub async fn list_documents<S>(
    store: &S,
    pairs: &[(String, String)],
    options: &ListOptions,
    config: &ListConfig,
) -> Result<ListResponse, ListError>
where
    S: DocumentStore + ?Sized,
{
    let parsed = parse_list_query(pairs, config)?;
    let filter = build_filter(&parsed, options, config)?;

    tracing::debug!(
        filter = %filter.to_document(),
        sort = %parsed.sort.to_document(),
        page = parsed.pagination.page,
        limit = parsed.pagination.limit,
        skip = parsed.pagination.skip,
        "Listing documents"
    );

    let item_count = store.count(&filter).await.inspect_err(|e| {
        tracing::error!(error = %e, operation = "count", "Document store failed");
    })?;
    let data = store
        .find(&FindRequest {
            filter: &filter,
            sort: &parsed.sort,
            skip: parsed.pagination.skip,
            limit: parsed.pagination.limit,
            projection: &parsed.projection,
            expansions: &options.expansions,
        })
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, operation = "find", "Document store failed");
        })?;

    let page_info = PageInfo::new(&parsed.pagination, item_count);
    Ok(ListResponse::success(data, page_info))
}
