//! Localization placeholder substitution.
//!
//! Game strings carry placeholders such as `{DAMAGE}` or `{[DAMAGE]}` that are
//! filled from a per-entity parameter table. Substitution is a single pass:
//! replaced text is never scanned again, and unknown placeholders are left
//! untouched.

use std::collections::BTreeMap;

/// Parameter table produced from a `LocalizationParamsManager` component.
pub type LocParams = BTreeMap<String, String>;

/// Replaces every `{KEY}` and `{[KEY]}` occurrence whose key is in `params`.
pub fn resolve_tokens(text: &str, params: &LocParams) -> String {
    if params.is_empty() || !text.contains('{') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match match_placeholder(candidate, params) {
            Some((consumed, value)) => {
                out.push_str(value);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Applies [`resolve_tokens`] when a parameter table is available.
pub fn resolve_opt(text: &str, params: Option<&LocParams>) -> String {
    match params {
        Some(p) => resolve_tokens(text, p),
        None => text.to_string(),
    }
}

/// Matches a placeholder at the start of `s` (which begins with `{`).
///
/// Returns the byte length consumed and the replacement value.
fn match_placeholder<'a>(s: &str, params: &'a LocParams) -> Option<(usize, &'a str)> {
    let end = s.find('}')?;
    let inner = &s[1..end];
    let key = inner
        .strip_prefix('[')
        .and_then(|k| k.strip_suffix(']'))
        .unwrap_or(inner);
    params.get(key).map(|v| (end + 1, v.as_str()))
}
