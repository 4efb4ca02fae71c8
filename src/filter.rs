use crate::models::{CaseRecord, StatusFilter};

/// Returns the cases matching both the free-text query and the status
/// selector, in input order.
///
/// A case matches the query when the query is empty or when its case number,
/// client name or title contains the query, ignoring case. The query is used
/// as given; surrounding whitespace is part of it.
pub fn filter_cases<'a>(
    cases: &'a [CaseRecord],
    query: &str,
    status: StatusFilter,
) -> Vec<&'a CaseRecord> {
    let needle = query.to_lowercase();
    cases
        .iter()
        .filter(|case| status.accepts(case.status) && matches_query(case, &needle))
        .collect()
}

fn matches_query(case: &CaseRecord, needle: &str) -> bool {
    needle.is_empty()
        || [&case.case_number, &case.client_name, &case.title]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}
