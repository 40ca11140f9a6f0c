//! Minimal edit scripts between two sequences
//!
//! The script is read off a longest-common-subsequence table, so every element
//! that can be kept is kept. Removals come before additions where both are
//! possible, which lets [`Differ::diff_with_replacements`] pair them up.

/// One step of an edit script turning `old` into `new`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffElem<O, N> {
    Keep(O, N),
    Remove(O),
    Add(N),
    Replace(O, N),
}

/// Sequence differ parameterized by an equality predicate
#[derive(Debug, Clone, Copy)]
pub struct Differ<F> {
    is_equal: F,
}

impl<F> Differ<F> {
    pub fn new(is_equal: F) -> Self {
        Self { is_equal }
    }

    /// Edit script using only keeps, removals and additions
    pub fn diff<O: Copy, N: Copy>(&self, old: &[O], new: &[N]) -> Vec<DiffElem<O, N>>
    where
        F: Fn(&O, &N) -> bool,
    {
        let eq = &self.is_equal;
        let (n, m) = (old.len(), new.len());

        // lcs[i][j] = length of the LCS of old[i..] and new[j..]
        let mut lcs = vec![vec![0usize; m + 1]; n + 1];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                lcs[i][j] = if eq(&old[i], &new[j]) {
                    lcs[i + 1][j + 1] + 1
                } else {
                    lcs[i + 1][j].max(lcs[i][j + 1])
                };
            }
        }

        let mut script = Vec::with_capacity(n.max(m));
        let (mut i, mut j) = (0, 0);
        while i < n && j < m {
            if eq(&old[i], &new[j]) {
                script.push(DiffElem::Keep(old[i], new[j]));
                i += 1;
                j += 1;
            } else if lcs[i + 1][j] >= lcs[i][j + 1] {
                script.push(DiffElem::Remove(old[i]));
                i += 1;
            } else {
                script.push(DiffElem::Add(new[j]));
                j += 1;
            }
        }
        script.extend(old[i..].iter().map(|&o| DiffElem::Remove(o)));
        script.extend(new[j..].iter().map(|&n| DiffElem::Add(n)));
        script
    }

    /// Like [`Differ::diff`], but a run of removals directly followed by an
    /// equally long run of additions becomes pairwise replacements
    pub fn diff_with_replacements<O: Copy, N: Copy>(
        &self,
        old: &[O],
        new: &[N],
    ) -> Vec<DiffElem<O, N>>
    where
        F: Fn(&O, &N) -> bool,
    {
        let script = self.diff(old, new);
        let mut result = Vec::with_capacity(script.len());

        let mut i = 0;
        while i < script.len() {
            if !matches!(script[i], DiffElem::Remove(_)) {
                result.push(script[i]);
                i += 1;
                continue;
            }

            let removes_end = i + script[i..]
                .iter()
                .take_while(|e| matches!(e, DiffElem::Remove(_)))
                .count();
            let adds_end = removes_end
                + script[removes_end..]
                    .iter()
                    .take_while(|e| matches!(e, DiffElem::Add(_)))
                    .count();

            if removes_end - i == adds_end - removes_end {
                let pairs = script[i..removes_end].iter().zip(&script[removes_end..adds_end]);
                for (removed, added) in pairs {
                    if let (DiffElem::Remove(o), DiffElem::Add(n)) = (removed, added) {
                        result.push(DiffElem::Replace(*o, *n));
                    }
                }
            } else {
                result.extend_from_slice(&script[i..adds_end]);
            }
            i = adds_end;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn chars_differ() -> Differ<fn(&char, &char) -> bool> {
        Differ::<fn(&char, &char) -> bool>::new(|a, b| a == b)
    }

    /// Render a script as e.g. `=a =b +x -c`
    fn render(script: &[DiffElem<char, char>]) -> String {
        script
            .iter()
            .map(|e| match e {
                DiffElem::Keep(o, _) => format!("={o}"),
                DiffElem::Remove(o) => format!("-{o}"),
                DiffElem::Add(n) => format!("+{n}"),
                DiffElem::Replace(o, n) => format!("{o}>{n}"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_insertion_in_the_middle_is_minimal() {
        let script = chars_differ().diff(&chars("abcdef"), &chars("abcxyzdef"));
        assert_eq!(render(&script), "=a =b =c +x +y +z =d =e =f");
    }

    #[rstest]
    #[case("abc", "abc", "=a =b =c")]
    #[case("", "ab", "+a +b")]
    #[case("ab", "", "-a -b")]
    #[case("abc", "ac", "=a -b =c")]
    #[case("abc", "axc", "=a -b +x =c")]
    fn test_diff(#[case] old: &str, #[case] new: &str, #[case] expected: &str) {
        assert_eq!(render(&chars_differ().diff(&chars(old), &chars(new))), expected);
    }

    #[rstest]
    #[case("abc", "axc", "=a b>x =c")]
    #[case("abcd", "axyd", "=a b>x c>y =d")]
    #[case("abc", "axyc", "=a -b +x +y =c")]
    #[case("ab", "ab", "=a =b")]
    fn test_diff_with_replacements(#[case] old: &str, #[case] new: &str, #[case] expected: &str) {
        let script = chars_differ().diff_with_replacements(&chars(old), &chars(new));
        assert_eq!(render(&script), expected);
    }

    #[test]
    fn test_kept_elements_pair_old_with_new() {
        let old = [(1, "x"), (2, "y")];
        let new = [2, 3];
        let differ = Differ::new(|o: &(i32, &str), n: &i32| o.0 == *n);
        let script = differ.diff(&old, &new);
        assert_eq!(
            script,
            vec![
                DiffElem::Remove((1, "x")),
                DiffElem::Keep((2, "y"), 2),
                DiffElem::Add(3),
            ]
        );
    }
}
