//! String similarity scoring for fuzzy table-name matching.

/// Clamp any ratio into `0..=100`.
pub fn normalize(ratio: i64) -> u8 {
    ratio.clamp(0, 100) as u8
}

/// Similarity of two strings as a percentage, case-insensitive.
///
/// `((max_len - distance) * 100) / max_len`, where `distance` is the weighted
/// edit distance from [`edit_distance`]. Two empty strings score 100.
pub fn score(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let max_len = a.len().max(b.len()) as i64;
    if max_len == 0 {
        return 100;
    }

    let distance = edit_distance(&a, &b) as i64;
    normalize(((max_len - distance) * 100) / max_len)
}

/// Levenshtein distance with insertions and deletions costing 1 and
/// substitutions costing 2.
pub fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row over `b`.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb { diagonal } else { diagonal + 2 };
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }
    row[b.len()]
}
