//! Matching result columns to mapped properties.

use crate::Property;

use heck::ToUpperCamelCase;

/// Selects the property a result column binds to.
///
/// The first rule that matches wins:
///
/// 1. the property's effective name equals the column name;
/// 2. the names are equal ignoring ASCII case;
/// 3. the column name converted to UpperCamelCase (`user_id` becomes
///    `UserId`) matches by rule 1, then rule 2.
///
/// Skipped properties never match. `None` means the column is ignored.
pub fn select_property<'a, T>(properties: &'a [Property<T>], column: &str) -> Option<&'a Property<T>> {
    find(properties, column).or_else(|| {
        let pascal = column.to_upper_camel_case();

        if pascal != column {
            find(properties, &pascal)
        } else {
            None
        }
    })
}

fn find<'a, T>(properties: &'a [Property<T>], name: &str) -> Option<&'a Property<T>> {
    let mut candidates = properties.iter().filter(|property| !property.is_skipped());

    candidates
        .clone()
        .find(|property| property.effective_name() == name)
        .or_else(|| candidates.find(|property| property.effective_name().eq_ignore_ascii_case(name)))
}
