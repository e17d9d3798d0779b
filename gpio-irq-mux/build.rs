fn main() {
    let backends: Vec<_> = std::env::vars()
        .filter_map(|(key, _value)| {
            if key.starts_with("CARGO_FEATURE_") && key.ends_with("_BACKEND") {
                Some(key[14..].to_ascii_lowercase()) // Strip 'CARGO_FEATURE_'
            } else {
                None
            }
        })
        .collect();

    // No backend is fine: the parent line is then provided by the application.
    if backends.len() > 1 {
        panic!("Multiple parent line backends selected: {:?}", backends);
    }
}
