//! Edit scripts from the public differ

use docblock::printer::{DiffElem, Differ};

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Collapse a script into runs like `[("keep", 3), ("add", 3)]`
fn runs<O, N>(script: &[DiffElem<O, N>]) -> Vec<(&'static str, usize)> {
    let mut runs: Vec<(&'static str, usize)> = Vec::new();
    for elem in script {
        let name = match elem {
            DiffElem::Keep(..) => "keep",
            DiffElem::Remove(_) => "remove",
            DiffElem::Add(_) => "add",
            DiffElem::Replace(..) => "replace",
        };
        match runs.last_mut() {
            Some((last, count)) if *last == name => *count += 1,
            _ => runs.push((name, 1)),
        }
    }
    runs
}

#[test]
fn test_insertion_is_minimal() {
    let differ = Differ::new(|a: &char, b: &char| a == b);
    let script = differ.diff(&chars("abcdef"), &chars("abcxyzdef"));
    assert_eq!(runs(&script), vec![("keep", 3), ("add", 3), ("keep", 3)]);
}

#[test]
fn test_script_rebuilds_both_sequences() {
    let old = chars("the quick brown fox");
    let new = chars("a quick red fox jumps");
    let differ = Differ::new(|a: &char, b: &char| a == b);
    let script = differ.diff_with_replacements(&old, &new);

    let mut rebuilt_old = String::new();
    let mut rebuilt_new = String::new();
    for elem in &script {
        match *elem {
            DiffElem::Keep(o, n) | DiffElem::Replace(o, n) => {
                rebuilt_old.push(o);
                rebuilt_new.push(n);
            }
            DiffElem::Remove(o) => rebuilt_old.push(o),
            DiffElem::Add(n) => rebuilt_new.push(n),
        }
    }
    assert_eq!(rebuilt_old, "the quick brown fox");
    assert_eq!(rebuilt_new, "a quick red fox jumps");
}

#[test]
fn test_replacements_pair_equal_runs_only() {
    let differ = Differ::new(|a: &char, b: &char| a == b);
    assert_eq!(
        runs(&differ.diff_with_replacements(&chars("xaby"), &chars("xcdy"))),
        vec![("keep", 1), ("replace", 2), ("keep", 1)]
    );
    assert_eq!(
        runs(&differ.diff_with_replacements(&chars("xay"), &chars("xcdy"))),
        vec![("keep", 1), ("remove", 1), ("add", 2), ("keep", 1)]
    );
}

#[test]
fn test_custom_equality() {
    let old = ["Foo", "bar"];
    let new = ["foo", "BAR", "baz"];
    let differ = Differ::new(|a: &&str, b: &&str| a.eq_ignore_ascii_case(b));
    assert_eq!(
        differ.diff(&old, &new),
        vec![
            DiffElem::Keep("Foo", "foo"),
            DiffElem::Keep("bar", "BAR"),
            DiffElem::Add("baz"),
        ]
    );
}
