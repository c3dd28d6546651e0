use std::collections::BTreeMap;

/// Flatten provider key/value pairs into a map. Later duplicates win.
pub fn flatten_tags<I, K, V>(tags: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    tags.into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Values of every output whose key starts with `prefix`, in key order
pub fn outputs_with_prefix(outputs: &BTreeMap<String, String>, prefix: &str) -> Vec<String> {
    outputs
        .iter()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(_, value)| value.clone())
        .collect()
}
