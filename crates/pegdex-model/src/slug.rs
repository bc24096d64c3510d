//! Entity id derivation from asset names.

/// Derives an entity id from an asset name.
///
/// Lower-cases the name, maps spaces and dashes to underscores and strips
/// brackets and parentheses: `"Fire Dragon (Boss)"` becomes
/// `"fire_dragon_boss"`.
pub fn entity_id(asset_name: &str) -> String {
    asset_name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')'))
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}
