/* 📖 # How are listing fragments merged?

The same resource can be documented by several fragments under one declaration key. They are
folded into a single listing in fragment order, and whatever was seen first wins:
- scalar fields come from the first fragment, except the description, which is the first
  non-empty one;
- produces, consumes and protocols are unions that keep first-seen order;
- authorizations and models are unions by name and by id;
- api descriptions are grouped by path, and inside one path operations are unique by HTTP
  method. A later fragment only contributes the operations the earlier ones lack.
*/

use crate::mapper::{ApiDescriptionDto, ApiListingDto};

/// Merge every fragment of one declaration key into a single listing.
///
/// Absent or empty input yields `None`; a single fragment is returned as is.
pub fn merged_api_listing(listings: Option<&[ApiListingDto]>) -> Option<ApiListingDto> {
    let (first, rest) = listings?.split_first()?;
    let mut merged = first.clone();
    for listing in rest {
        merge_into(&mut merged, listing);
    }
    Some(merged)
}

fn merge_into(merged: &mut ApiListingDto, listing: &ApiListingDto) {
    if merged.description.is_empty() {
        merged.description.clone_from(&listing.description);
    }
    union_into(&mut merged.produces, &listing.produces);
    union_into(&mut merged.consumes, &listing.consumes);
    union_into(&mut merged.protocols, &listing.protocols);
    for (name, scopes) in &listing.authorizations {
        merged
            .authorizations
            .entry(name.clone())
            .or_insert_with(|| scopes.clone());
    }
    for (id, model) in &listing.models {
        merged
            .models
            .entry(id.clone())
            .or_insert_with(|| model.clone());
    }
    for api in &listing.apis {
        merge_api(&mut merged.apis, api);
    }
}

fn union_into(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

fn merge_api(apis: &mut Vec<ApiDescriptionDto>, api: &ApiDescriptionDto) {
    let Some(existing) = apis.iter_mut().find(|existing| existing.path == api.path) else {
        apis.push(api.clone());
        return;
    };
    if existing.description.is_empty() {
        existing.description.clone_from(&api.description);
    }
    for operation in &api.operations {
        let known = existing
            .operations
            .iter()
            .any(|existing| existing.method.eq_ignore_ascii_case(&operation.method));
        if !known {
            existing.operations.push(operation.clone());
        }
    }
}
