/// Normalized edit-distance similarity in `[0, 1]`.
///
/// `1.0` for identical strings (including two empty ones), `0.0` when nothing lines up.
/// Lengths are counted in `char`s.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (longer, shorter) = if a.chars().count() >= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let max_len = longer.chars().count();
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(longer, shorter);
    (max_len - distance) as f64 / max_len as f64
}

/// Classic single-character insert/delete/substitute distance, each with cost 1.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Rows index `b`, columns index `a`.
    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            table[i][j] = if b[i - 1] == a[j - 1] {
                table[i - 1][j - 1]
            } else {
                1 + table[i - 1][j - 1].min(table[i][j - 1]).min(table[i - 1][j])
            };
        }
    }

    table[b.len()][a.len()]
}
