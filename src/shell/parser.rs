//! Line parsing: operator segmentation, word splitting, alias
//! substitution, and redirection clauses.
//!
//! Splitting is deliberately loose. Operators are recognized by a single
//! preceding space, not by a grammar, and quoted regions do not shield
//! them; word splitting protects a space only while the current token has
//! exactly one unclosed quote. Inputs that mix quotes and operators split
//! differently than a bash user might expect, and that split is the
//! contract.

use super::table::AliasTable;

/// Control operator following a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    /// Last segment of the line.
    None,
    /// `;` (also a lone `&`, or an unrecognized operator pair)
    Seq,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `|`
    Pipe,
}

/// One command's text between control operators.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub op: ChainOp,
}

/// Redirection mode for a segment's trailing clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `<` - preload the file as the segment's standard input
    Input,
    /// `>` - overwrite the target file with the segment's output
    Truncate,
    /// `>>` - append the segment's output to the target file
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Redirection {
    pub kind: RedirectKind,
    pub target: String,
}

/// Width of the operator starting with `c`, or 0 if `c` cannot start one.
/// Any `&`/`|` followed by another `&`/`|` counts as two characters;
/// classification happens separately.
fn operator_len(c: char, next: Option<char>) -> usize {
    match c {
        ';' => 1,
        '&' | '|' => match next {
            Some('&') | Some('|') => 2,
            _ => 1,
        },
        _ => 0,
    }
}

fn classify_operator(op: &str) -> ChainOp {
    match op {
        "&&" => ChainOp::And,
        "||" => ChainOp::Or,
        "|" => ChainOp::Pipe,
        _ => ChainOp::Seq,
    }
}

/// Split a raw line into command segments and the operator after each.
///
/// An operator is recognized only when the character before it is a space
/// still inside the current segment; that space terminates the segment,
/// and the single character after the operator is consumed whether or not
/// it is a space.
pub fn segment_line(line: &str) -> Vec<Segment> {
    let chars: Vec<char> = line.chars().collect();
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut i = 1usize;

    while i < chars.len() {
        let len = operator_len(chars[i], chars.get(i + 1).copied());
        if len > 0 && i > start && chars[i - 1] == ' ' {
            let text: String = chars[start..i - 1].iter().collect();
            let op: String = chars[i..(i + len).min(chars.len())].iter().collect();
            segments.push(Segment {
                text,
                op: classify_operator(&op),
            });
            start = i + len + 1;
            i = start;
            continue;
        }
        i += 1;
    }

    let text: String = chars.get(start..).unwrap_or(&[]).iter().collect();
    segments.push(Segment {
        text,
        op: ChainOp::None,
    });
    segments
}

/// True when the token accumulated so far holds exactly one unclosed
/// quote of either kind.
fn in_open_quote(token: &[char]) -> bool {
    let singles = token.iter().filter(|&&c| c == '\'').count();
    let doubles = token.iter().filter(|&&c| c == '"').count();
    singles == 1 || doubles == 1
}

fn strip_quote_pair(word: &mut String) {
    if word.len() < 2 {
        return;
    }
    let first = word.as_bytes()[0];
    let last = word.as_bytes()[word.len() - 1];
    if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
        *word = word[1..word.len() - 1].to_string();
    }
}

/// Split one segment into words on spaces. A space inside an open quote
/// does not split; adjacent spaces produce empty words. A word whose
/// first and last characters are the same quote has that pair stripped.
pub fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut start = 0usize;

    for i in 0..chars.len() {
        if chars[i] == ' ' && !in_open_quote(&chars[start..i]) {
            words.push(chars[start..i].iter().collect());
            start = i + 1;
        }
    }
    words.push(chars[start..].iter().collect());

    for word in &mut words {
        strip_quote_pair(word);
    }
    words
}

/// Replace the first word with its alias expansion, if one is defined.
///
/// The expansion is re-split on spaces with no quote handling and spliced
/// in front of the remaining words. Substitution runs once and only the
/// first word is ever checked, so a self-referential alias resolves to a
/// plain (probably nonexistent) program name instead of looping.
pub fn expand_alias(words: &mut Vec<String>, aliases: &AliasTable) {
    let Some(first) = words.first() else { return };
    let Some(expansion) = aliases.lookup(first) else {
        return;
    };
    let mut expanded: Vec<String> = expansion.split(' ').map(str::to_string).collect();
    expanded.extend(words.drain(1..));
    *words = expanded;
}

/// Split a trailing redirection clause off a segment.
///
/// The clause starts at the first space followed by `<` or `>`. The
/// command text is everything before the operator character, preceding
/// space included. An operator not followed by a space is read as two
/// characters wide, so only the ` < `, ` > `, and ` >> ` forms resolve to
/// a usable clause; anything else still truncates the segment and
/// redirects nothing. The target is the remainder of the text, verbatim.
pub fn split_redirect(text: &str) -> (String, Option<Redirection>) {
    let chars: Vec<char> = text.chars().collect();

    for i in 1..chars.len() {
        if chars[i - 1] != ' ' || (chars[i] != '<' && chars[i] != '>') {
            continue;
        }

        let command: String = chars[..i].iter().collect();
        let two_char = chars.get(i + 1) != Some(&' ');
        let (op_end, target_start) = if two_char { (i + 2, i + 3) } else { (i + 1, i + 2) };
        let op: String = chars[i..op_end.min(chars.len())].iter().collect();
        let target: String = chars.get(target_start..).unwrap_or(&[]).iter().collect();

        let kind = match op.as_str() {
            "<" => Some(RedirectKind::Input),
            ">" => Some(RedirectKind::Truncate),
            ">>" => Some(RedirectKind::Append),
            _ => None,
        };
        return (command, kind.map(|kind| Redirection { kind, target }));
    }

    (text.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(line: &str) -> Vec<(String, ChainOp)> {
        segment_line(line)
            .into_iter()
            .map(|s| (s.text, s.op))
            .collect()
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(segs("echo hi"), vec![("echo hi".to_string(), ChainOp::None)]);
    }

    #[test]
    fn test_sequence_split() {
        assert_eq!(
            segs("echo a ; echo b"),
            vec![
                ("echo a".to_string(), ChainOp::Seq),
                ("echo b".to_string(), ChainOp::None),
            ]
        );
    }

    #[test]
    fn test_and_or_pipe_operators() {
        assert_eq!(
            segs("a && b"),
            vec![("a".to_string(), ChainOp::And), ("b".to_string(), ChainOp::None)]
        );
        assert_eq!(
            segs("a || b"),
            vec![("a".to_string(), ChainOp::Or), ("b".to_string(), ChainOp::None)]
        );
        assert_eq!(
            segs("a | b"),
            vec![("a".to_string(), ChainOp::Pipe), ("b".to_string(), ChainOp::None)]
        );
    }

    #[test]
    fn test_lone_ampersand_is_a_separator() {
        assert_eq!(
            segs("a & b"),
            vec![("a".to_string(), ChainOp::Seq), ("b".to_string(), ChainOp::None)]
        );
    }

    #[test]
    fn test_operator_requires_preceding_space() {
        assert_eq!(
            segs("echo a&& echo b"),
            vec![("echo a&& echo b".to_string(), ChainOp::None)]
        );
    }

    #[test]
    fn test_operator_consumes_following_char() {
        // The character after the operator is eaten even when it is not a
        // space, leaving an empty second segment here.
        assert_eq!(
            segs("a ;b"),
            vec![("a".to_string(), ChainOp::Seq), ("".to_string(), ChainOp::None)]
        );
    }

    #[test]
    fn test_quotes_do_not_shield_operators() {
        assert_eq!(
            segs("echo 'a ; b'"),
            vec![
                ("echo 'a".to_string(), ChainOp::Seq),
                ("b'".to_string(), ChainOp::None),
            ]
        );
    }

    #[test]
    fn test_split_simple_words() {
        assert_eq!(split_words("ls -la"), vec!["ls", "-la"]);
    }

    #[test]
    fn test_split_quoted_span() {
        assert_eq!(split_words("echo 'hello world'"), vec!["echo", "hello world"]);
        assert_eq!(
            split_words(r#"echo "hello world""#),
            vec!["echo", "hello world"]
        );
    }

    #[test]
    fn test_split_keeps_empty_words() {
        assert_eq!(split_words("echo  hi"), vec!["echo", "", "hi"]);
        assert_eq!(split_words("echo hi "), vec!["echo", "hi", ""]);
    }

    #[test]
    fn test_unclosed_quote_protects_to_end() {
        assert_eq!(split_words("echo 'a b c"), vec!["echo", "'a b c"]);
    }

    #[test]
    fn test_closed_quotes_stop_protecting() {
        assert_eq!(split_words("echo 'a' b"), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_strip_only_matching_pairs() {
        assert_eq!(split_words("'abc'"), vec!["abc"]);
        assert_eq!(split_words("\"abc'"), vec!["\"abc'"]);
        assert_eq!(split_words("'"), vec!["'"]);
    }

    #[test]
    fn test_alias_expands_first_word() {
        let mut aliases = AliasTable::new();
        aliases.define("ll", "ls -la");

        let mut words = vec!["ll".to_string(), "src".to_string()];
        expand_alias(&mut words, &aliases);
        assert_eq!(words, vec!["ls", "-la", "src"]);
    }

    #[test]
    fn test_alias_only_first_word() {
        let mut aliases = AliasTable::new();
        aliases.define("ll", "ls -la");

        let mut words = vec!["echo".to_string(), "ll".to_string()];
        expand_alias(&mut words, &aliases);
        assert_eq!(words, vec!["echo", "ll"]);
    }

    #[test]
    fn test_alias_self_reference_single_pass() {
        let mut aliases = AliasTable::new();
        aliases.define("a", "a");

        let mut words = vec!["a".to_string()];
        expand_alias(&mut words, &aliases);
        assert_eq!(words, vec!["a"]);
    }

    #[test]
    fn test_redirect_truncate() {
        let (command, clause) = split_redirect("echo data > out.txt");
        assert_eq!(command, "echo data ");
        assert_eq!(
            clause,
            Some(Redirection {
                kind: RedirectKind::Truncate,
                target: "out.txt".to_string(),
            })
        );
    }

    #[test]
    fn test_redirect_append() {
        let (command, clause) = split_redirect("echo data >> out.txt");
        assert_eq!(command, "echo data ");
        assert_eq!(
            clause,
            Some(Redirection {
                kind: RedirectKind::Append,
                target: "out.txt".to_string(),
            })
        );
    }

    #[test]
    fn test_redirect_input() {
        let (command, clause) = split_redirect("cat < in.txt");
        assert_eq!(command, "cat ");
        assert_eq!(
            clause,
            Some(Redirection {
                kind: RedirectKind::Input,
                target: "in.txt".to_string(),
            })
        );
    }

    #[test]
    fn test_redirect_requires_preceding_space() {
        let (command, clause) = split_redirect("echo a>b");
        assert_eq!(command, "echo a>b");
        assert_eq!(clause, None);
    }

    #[test]
    fn test_redirect_without_following_space_is_dropped() {
        // `>f` is read as a two-character operator and matches nothing;
        // the segment is still truncated.
        let (command, clause) = split_redirect("echo x >file");
        assert_eq!(command, "echo x ");
        assert_eq!(clause, None);
    }

    #[test]
    fn test_redirect_first_clause_wins() {
        let (command, clause) = split_redirect("a < b > c");
        assert_eq!(command, "a ");
        assert_eq!(
            clause,
            Some(Redirection {
                kind: RedirectKind::Input,
                target: "b > c".to_string(),
            })
        );
    }
}
