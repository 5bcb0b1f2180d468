/// Levenshtein distance with unit insert, delete and substitute costs.
///
/// Works over any comparable elements, so the same routine serves
/// character error rate (`char`) and word error rate (tokens). The full
/// `(b.len() + 1) x (a.len() + 1)` table is kept; callers that need a size
/// limit must enforce it themselves.
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];

    for (i, cell) in matrix[0].iter_mut().enumerate() {
        *cell = i;
    }
    for (j, row) in matrix.iter_mut().enumerate() {
        row[0] = j;
    }

    for j in 1..=b.len() {
        for i in 1..=a.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[j][i] = (matrix[j - 1][i] + 1)
                .min(matrix[j][i - 1] + 1)
                .min(matrix[j - 1][i - 1] + cost);
        }
    }

    matrix[b.len()][a.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_example() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein(&a, &b), 3);
    }

    #[test]
    fn test_empty_sides() {
        let empty: Vec<char> = Vec::new();
        let abc: Vec<char> = "abc".chars().collect();
        assert_eq!(levenshtein(&empty, &abc), 3);
        assert_eq!(levenshtein(&abc, &empty), 3);
        assert_eq!(levenshtein(&empty, &empty), 0);
    }

    #[test]
    fn test_word_tokens() {
        let a = ["the", "cat", "sat"];
        let b = ["the", "dog", "sat", "down"];
        assert_eq!(levenshtein(&a, &b), 2);
    }
}
