/// Levenshtein distance between two strings, counted in `char`s.
///
/// Case and whitespace are compared as-is; normalise before calling if needed.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Rows are sized by the shorter operand
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev: Vec<usize> = (0..=shorter.len()).collect();
    let mut cur: Vec<usize> = vec![0; shorter.len() + 1];

    for (i, c1) in longer.iter().enumerate() {
        cur[0] = i + 1;
        for (j, c2) in shorter.iter().enumerate() {
            let insert = prev[j + 1] + 1;
            let delete = cur[j] + 1;
            let substitute = prev[j] + usize::from(c1 != c2);
            cur[j + 1] = insert.min(delete).min(substitute);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[shorter.len()]
}
