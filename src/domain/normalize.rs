/// Canonicalize an identifier or name for comparison: keep only ASCII
/// letters and digits, lowercased. Missing input becomes the empty string.
///
/// Both sides of every comparison must go through this same function;
/// normalizing only one side is a correctness bug.
pub fn normalize(input: Option<&str>) -> String {
    match input {
        None => String::new(),
        Some(s) => s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect(),
    }
}
