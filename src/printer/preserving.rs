//! Format-preserving reconciliation of an edited tree against its source

use rustc_hash::FxHashMap;

use crate::ast::{DocBlock, FieldValue, GenericType, NodeId, NodeRef, TypeNode, Variance};
use crate::parser::{TokenIterator, TokenKind};

use super::differ::{DiffElem, Differ};
use super::{DOC_LINE_SEPARATOR, Printer, SlotKey};

/// State for one [`Printer::print_format_preserving`] call
pub(super) struct Session<'a> {
    printer: &'a Printer,
    /// Every node of the original tree by id
    originals: FxHashMap<NodeId, NodeRef<'a>>,
    tokens: &'a TokenIterator<'a>,
}

/// Text kept back while the leading items of a list are being removed
struct LeadingRemoval {
    /// Everything before the first removed item
    prefix: String,
    /// The same, cut at the first line break
    prefix_until_eol: String,
}

impl<'a> Session<'a> {
    pub(super) fn new(
        printer: &'a Printer,
        original: &'a DocBlock,
        tokens: &'a TokenIterator<'a>,
    ) -> Self {
        let mut originals = FxHashMap::default();
        NodeRef::DocBlock(original).walk(&mut |node| {
            let id = node.attributes().id;
            if id.is_assigned() {
                originals.insert(id, node);
            }
        });
        Self {
            printer,
            originals,
            tokens,
        }
    }

    fn original_of(&self, node: NodeRef<'_>) -> Option<NodeRef<'a>> {
        node.attributes()
            .original
            .and_then(|id| self.originals.get(&id).copied())
    }

    /// Print one node, copying source text around every unchanged part
    pub(super) fn print_node(&self, node: NodeRef<'_>) -> String {
        let fresh = || self.printer.print(node);

        if node.attributes().original.is_none() {
            return fresh();
        }
        let Some(original) = self.original_of(node) else {
            tracing::debug!("[PRINT] No original node for {}, printing from scratch", node.kind());
            return fresh();
        };
        if original.kind() != node.kind() {
            tracing::debug!(
                "[PRINT] {} replaced by {}, printing from scratch",
                original.kind(),
                node.kind()
            );
            return fresh();
        }
        let (start, end) = token_range(original);
        if end < start {
            // No source text, as for the record of a missing `*/`
            return if self.printer.print(node) == self.printer.print(original) {
                String::new()
            } else {
                fresh()
            };
        }

        if let (NodeRef::Type(TypeNode::Generic(new)), NodeRef::Type(TypeNode::Generic(old))) =
            (node, original)
        {
            if let Some(variance) = variance_change(new, old) {
                tracing::debug!(
                    "[PRINT] Generic argument variance {} cannot be kept, printing from scratch",
                    variance.as_str()
                );
                return fresh();
            }
        }

        let kind = node.kind();
        let mut result = String::new();
        let mut pos = start;
        for (field, original_field) in node.fields().into_iter().zip(original.fields()) {
            match (field.value, original_field.value) {
                (FieldValue::Value(new), FieldValue::Value(old)) => {
                    if new != old {
                        return fresh();
                    }
                }
                (FieldValue::List(new), FieldValue::List(old)) => {
                    match self.print_list(&new, &old, &mut pos, (kind, field.name)) {
                        Some(text) => result.push_str(&text),
                        None => return fresh(),
                    }
                }
                (FieldValue::Node(new), FieldValue::Node(old)) => {
                    let Some(old) = old else {
                        if new.is_none() {
                            continue;
                        }
                        return fresh();
                    };
                    let (sub_start, sub_end) = token_range(old);
                    let Some(new) = new else {
                        return fresh();
                    };
                    if sub_end < sub_start {
                        if !self.print_node(new).is_empty() {
                            return fresh();
                        }
                        continue;
                    }

                    result.push_str(&self.tokens.content_between(pos, sub_start));
                    let add_parentheses = self
                        .printer
                        .parentheses
                        .get(&(kind, field.name))
                        .is_some_and(|needs| {
                            needs(new.kind())
                                && !self.original_of(new).is_some_and(|o| needs(o.kind()))
                        })
                        && !self.tokens.has_parentheses(sub_start, sub_end);
                    push_wrapped(&mut result, &self.print_node(new), add_parentheses);
                    pos = sub_end + 1;
                }
                _ => return fresh(),
            }
        }

        debug_assert!(pos <= end + 1, "cursor moved past the end of {kind}");
        result.push_str(&self.tokens.content_between(pos, end + 1));
        result
    }

    /// Print a list slot, advancing `token_index` past the original items
    ///
    /// Returns `None` when the edit cannot be expressed against the source.
    pub(super) fn print_list(
        &self,
        new: &[NodeRef<'_>],
        old: &[NodeRef<'a>],
        token_index: &mut usize,
        key: SlotKey,
    ) -> Option<String> {
        let differ = Differ::new(|o: &NodeRef<'a>, n: &NodeRef<'_>| {
            n.attributes().original == Some(o.attributes().id)
        });
        let script = differ.diff_with_replacements(old, new);

        let (multiline, before, after) = self.is_multiline(*token_index, old);
        let newline = self.tokens.detected_newline().unwrap_or("\n");
        let line_break = format!("{newline}{before}*{after}");

        let mut insert = self.printer.list_insertion.get(&key).map(|s| s.to_string());
        if insert.as_deref() == Some(DOC_LINE_SEPARATOR) {
            insert = Some(line_break.clone());
        }
        let parentheses = self.printer.parentheses_list.get(&key);

        let mut result = String::new();
        let mut before_first_keep = true;
        let mut insert_newline = false;
        let mut delayed_adds: Vec<NodeRef<'_>> = Vec::new();
        let mut leading_removal: Option<LeadingRemoval> = None;

        for elem in script {
            match elem {
                DiffElem::Keep(old_node, new_node) | DiffElem::Replace(old_node, new_node) => {
                    before_first_keep = false;
                    let (item_start, item_end) = token_range(old_node);
                    assert!(
                        item_start >= *token_index,
                        "{} starts at token {item_start}, before the cursor at {}",
                        old_node.kind(),
                        *token_index
                    );

                    match leading_removal.take() {
                        Some(removal) => result.push_str(&removal.prefix),
                        None => result.push_str(&self.tokens.content_between(*token_index, item_start)),
                    }

                    for added in delayed_adds.drain(..) {
                        let wrap = parentheses.is_some_and(|needs| needs(added.kind()));
                        push_wrapped(&mut result, &self.print_node(added), wrap);
                        result.push_str(insert.as_deref().unwrap_or_default());
                        if insert_newline {
                            result.push_str(&line_break);
                        }
                    }

                    let add_parentheses = parentheses.is_some_and(|needs| {
                        needs(new_node.kind()) && !needs(old_node.kind())
                    }) && !self.tokens.has_parentheses(item_start, item_end);
                    push_wrapped(&mut result, &self.print_node(new_node), add_parentheses);
                    *token_index = item_end + 1;
                }
                DiffElem::Add(new_node) => {
                    let separator = insert.as_deref()?;
                    if separator == ", " && multiline {
                        insert = Some(",".to_string());
                        insert_newline = true;
                    }

                    if before_first_keep {
                        delayed_adds.push(new_node);
                        continue;
                    }

                    result.push_str(insert.as_deref().unwrap_or_default());
                    if insert_newline {
                        result.push_str(&line_break);
                    }
                    let wrap = parentheses.is_some_and(|needs| needs(new_node.kind()));
                    push_wrapped(&mut result, &self.print_node(new_node), wrap);
                }
                DiffElem::Remove(old_node) => {
                    let (item_start, item_end) = token_range(old_node);
                    if before_first_keep && leading_removal.is_none() {
                        leading_removal = Some(self.leading_removal(*token_index, item_start));
                    }
                    *token_index = item_end + 1;
                }
            }
        }

        if let Some(removal) = leading_removal {
            if !delayed_adds.is_empty() {
                return None;
            }
            result.push_str(&removal.prefix_until_eol);
        }

        if !delayed_adds.is_empty() {
            let opening = self.printer.empty_list_insertion.get(&key)?;
            let tokens = self.tokens.tokens();
            while *token_index < tokens.len() {
                let token = &tokens[*token_index];
                result.push_str(token.text);
                *token_index += 1;
                if token.text == opening.find {
                    break;
                }
            }

            result.push_str(opening.extra_left);
            for (i, added) in delayed_adds.into_iter().enumerate() {
                if i > 0 {
                    result.push_str(insert.as_deref().unwrap_or_default());
                    if insert_newline {
                        result.push_str(&line_break);
                    }
                }
                result.push_str(&self.print_node(added));
            }
            result.push_str(opening.extra_right);
        }

        Some(result)
    }

    fn leading_removal(&self, token_index: usize, item_start: usize) -> LeadingRemoval {
        let skipped = self
            .tokens
            .tokens()
            .get(token_index..item_start)
            .unwrap_or_default();
        LeadingRemoval {
            prefix: skipped.iter().map(|t| t.text).collect(),
            prefix_until_eol: skipped
                .iter()
                .take_while(|t| t.kind != TokenKind::PHPDOC_EOL)
                .map(|t| t.text)
                .collect(),
        }
    }

    /// Whether every item of the list starts on its own line, plus the widest
    /// indentation seen around the `*` line markers
    fn is_multiline(&self, initial: usize, nodes: &[NodeRef<'a>]) -> (bool, String, String) {
        let mut multiline = nodes.len() > 1;
        let mut pos = initial;
        let mut all_text = String::new();
        for node in nodes {
            let Some((_, end)) = node.attributes().index_range() else {
                continue;
            };
            let text = self.tokens.content_between(pos, end + 1);
            if !text.contains('\n') {
                multiline = false;
            }
            all_text.push_str(&text);
            pos = end + 1;
        }

        let (before, after) = asterisk_indent(&all_text).unwrap_or((" ".into(), " ".into()));
        (multiline, before, after)
    }
}

/// The first variance that the source text of `old` cannot express for `new`
///
/// Variance keywords sit outside the argument's token range. A kept argument
/// must keep its variance, and arguments that are added, replaced or removed
/// must be invariant.
fn variance_change(new: &GenericType, old: &GenericType) -> Option<Variance> {
    let variance_of = |variances: &[Variance], i: usize| {
        variances.get(i).copied().unwrap_or(Variance::Invariant)
    };
    let linked = |param: &TypeNode| {
        let original = param.attributes().original?;
        old.params
            .iter()
            .position(|o| o.attributes().id == original)
    };

    let mut kept = vec![false; old.params.len()];
    for (i, param) in new.params.iter().enumerate() {
        let variance = variance_of(&new.variances, i);
        match linked(param) {
            Some(j) if variance_of(&old.variances, j) == variance => kept[j] = true,
            Some(_) => return Some(variance),
            None if variance != Variance::Invariant => return Some(variance),
            None => {}
        }
    }
    (0..old.params.len())
        .map(|j| variance_of(&old.variances, j))
        .zip(kept)
        .find(|&(variance, kept)| !kept && variance != Variance::Invariant)
        .map(|(variance, _)| variance)
}

fn token_range(node: NodeRef<'_>) -> (usize, usize) {
    match node.attributes().index_range() {
        Some(range) => range,
        None => panic!("{} of an indexed tree has no token range", node.kind()),
    }
}

/// Longest whitespace runs before and after a `*` that starts a line
fn asterisk_indent(text: &str) -> Option<(String, String)> {
    let mut found: Option<(&str, &str)> = None;
    for (i, _) in text.match_indices('\n') {
        let rest = &text[i + 1..];
        let before_len = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let Some(after_star) = rest[before_len..].strip_prefix('*') else {
            continue;
        };
        let after_len = after_star.len() - after_star.trim_start_matches(' ').len();
        let (before, after) = (&rest[..before_len], &after_star[..after_len]);

        found = Some(match found {
            None => (before, after),
            Some((b, a)) => (
                if before.len() > b.len() { before } else { b },
                if after.len() > a.len() { after } else { a },
            ),
        });
    }
    found.map(|(before, after)| (before.to_string(), after.to_string()))
}

fn push_wrapped(result: &mut String, text: &str, wrap: bool) {
    if wrap {
        result.push('(');
        result.push_str(text);
        result.push(')');
    } else {
        result.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/**\n * a\n * b", Some((" ", " ")))]
    #[case("\n\t*   x\n *y", Some(("\t", "   ")))]
    #[case("a|b", None)]
    #[case("\n */", Some((" ", "")))]
    fn test_asterisk_indent(#[case] text: &str, #[case] expected: Option<(&str, &str)>) {
        let expected = expected.map(|(b, a)| (b.to_string(), a.to_string()));
        assert_eq!(asterisk_indent(text), expected);
    }
}
