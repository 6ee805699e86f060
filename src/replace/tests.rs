use super::*;

/// Apply full edits to a copy of `text`, last position first.
fn apply(text: &str, mut ops: Vec<EditOp>) -> String {
    let mut rope = Rope::from_str(text);
    ops.sort_by_key(|op| std::cmp::Reverse(op.start()));
    for op in ops {
        if let Some(range) = op.delete {
            let from = range.start.to_char_index(&rope);
            let to = range.end.to_char_index(&rope);
            rope.remove(from..to);
        }
        let at = op.insert_pos.to_char_index(&rope);
        rope.insert(at, &op.insert_text);
    }
    rope.to_string()
}

fn cursor(line: usize, column: usize) -> Selection {
    Selection::cursor(Position::new(line, column))
}

#[test]
fn type_overwrites_inside_line() {
    let doc = Rope::from_str("hello");
    let ops = overtype_before_type(&doc, &[cursor(0, 2)], "XY");
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind, EditKind::Overwrite);
    assert_eq!(
        ops[0].delete,
        Some(Range::new(Position::new(0, 2), Position::new(0, 4)))
    );
    assert_eq!(apply("hello", ops), "heXYo");
}

#[test]
fn type_at_line_end_inserts() {
    let doc = Rope::from_str("hi");
    let ops = overtype_before_type(&doc, &[cursor(0, 2)], "Z");
    assert_eq!(ops[0].delete, None);
    assert_eq!(ops[0].insert_pos, Position::new(0, 2));
    assert_eq!(apply("hi", ops), "hiZ");
}

#[test]
fn type_on_last_char_keeps_line_break() {
    let doc = Rope::from_str("ab\ncd\n");
    let ops = overtype_before_type(&doc, &[cursor(0, 1)], "X");
    assert_eq!(ops[0].deleted_columns(), 1);
    assert_eq!(apply("ab\ncd\n", ops.clone()), "aX\ncd\n");

    let ops = overtype_before_type(&doc, &[cursor(0, 2)], "X");
    assert_eq!(ops[0].delete, None);
    assert_eq!(apply("ab\ncd\n", ops), "abX\ncd\n");
}

#[test]
fn type_keeps_crlf_line_break() {
    let doc = Rope::from_str("ab\r\ncd");
    let ops = overtype_before_type(&doc, &[cursor(0, 1)], "XYZ");
    assert_eq!(ops[0].deleted_columns(), 1);
    assert_eq!(apply("ab\r\ncd", ops), "aXYZ\r\ncd");
}

#[test]
fn type_longer_than_remaining_overwrites_then_extends() {
    let doc = Rope::from_str("hello\nline 2");
    let ops = overtype_before_type(&doc, &[cursor(0, 3)], "ping world");
    assert_eq!(ops[0].deleted_columns(), 2);
    assert_eq!(apply("hello\nline 2", ops), "helping world\nline 2");
}

#[test]
fn overwrite_count_matches_min_rule() {
    let doc = Rope::from_str("abcdef");
    for column in 0..=8 {
        for wanted in 0..=8 {
            let expected = if column < 6 { wanted.min(6 - column) } else { 0 };
            assert_eq!(
                overwrite_count(&doc, Position::new(0, column), wanted),
                expected,
                "column {column}, wanted {wanted}"
            );
        }
    }
}

#[test]
fn typed_line_break_deletes_nothing() {
    let doc = Rope::from_str("hello");
    for text in ["\n", "\r\n"] {
        let ops = overtype_before_type(&doc, &[cursor(0, 1)], text);
        assert_eq!(ops[0].delete, None);
    }
}

#[test]
fn type_counts_chars_not_bytes() {
    let doc = Rope::from_str("naïve");
    let ops = overtype_before_type(&doc, &[cursor(0, 1)], "éé");
    assert_eq!(ops[0].deleted_columns(), 2);
    assert_eq!(apply("naïve", ops), "nééve");
}

#[test]
fn non_empty_selection_is_plain_replace() {
    let doc = Rope::from_str("hello world");
    let sel = Selection::new(Position::new(0, 6), Position::new(0, 11));
    let ops = overtype_before_type(&doc, &[sel], "X");
    assert_eq!(ops[0].kind, EditKind::ReplaceSelection);
    assert_eq!(ops[0].delete, Some(sel.range()));
    assert_eq!(apply("hello world", ops), "hello X");

    let reversed = Selection::new(Position::new(0, 5), Position::new(0, 0));
    let ops = overtype_before_paste(&doc, &[reversed], "bye\nnow", false);
    assert_eq!(ops[0].kind, EditKind::ReplaceSelection);
    assert_eq!(apply("hello world", ops), "bye\nnow world");
}

#[test]
fn multi_cursor_selections_are_independent() {
    let text = "abcd\nefgh\nij";
    let doc = Rope::from_str(text);
    let sels = [cursor(0, 1), cursor(1, 3), cursor(2, 2)];
    let ops = overtype_before_type(&doc, &sels, "XY");
    let counts: Vec<usize> = ops.iter().map(EditOp::deleted_columns).collect();
    assert_eq!(counts, vec![2, 1, 0]);
    assert_eq!(apply(text, ops), "aXYd\nefgXY\nijXY");
}

#[test]
fn multi_cursor_on_one_line() {
    let doc = Rope::from_str("0123456789");
    let ops = overtype_before_type(&doc, &[cursor(0, 2), cursor(0, 6)], "x");
    assert_eq!(apply("0123456789", ops), "01x345x789");
}

#[test]
fn paste_single_line_matches_typing() {
    let doc = Rope::from_str("abcdef");
    let sels = [cursor(0, 4)];
    assert_eq!(
        overtype_before_paste(&doc, &sels, "XYZ", false),
        overtype_before_type(&doc, &sels, "XYZ")
    );
}

#[test]
fn paste_multi_line_overwrites_first_line_only() {
    let doc = Rope::from_str("XYZ\nnext");
    let ops = overtype_before_paste(&doc, &[cursor(0, 1)], "ab\ncd", false);
    assert_eq!(ops[0].deleted_columns(), 2);
    assert_eq!(apply("XYZ\nnext", ops), "Xab\ncd\nnext");
}

#[test]
fn paste_multi_line_short_first_line() {
    let doc = Rope::from_str("abcdef");
    let ops = overtype_before_paste(&doc, &[cursor(0, 1)], "X\nlong second line", false);
    assert_eq!(ops[0].deleted_columns(), 1);
    assert_eq!(apply("abcdef", ops), "aX\nlong second linecdef");
}

#[test]
fn paste_full_line_deletes_nothing() {
    let doc = Rope::from_str("abcdef\nxyz");
    let ops = overtype_before_paste(&doc, &[cursor(1, 2)], "copied\n", true);
    assert_eq!(ops[0].delete, None);
    assert_eq!(ops[0].insert_pos, Position::new(1, 0));
    assert_eq!(ops[0].deletion(), None);
    assert_eq!(apply("abcdef\nxyz", ops), "abcdef\ncopied\nxyz");
}

#[test]
fn paste_full_line_still_replaces_selection() {
    let doc = Rope::from_str("abcdef");
    let sel = Selection::new(Position::new(0, 1), Position::new(0, 3));
    let ops = overtype_before_paste(&doc, &[sel], "line\n", true);
    assert_eq!(ops[0].kind, EditKind::ReplaceSelection);
    assert_eq!(ops[0].delete, Some(sel.range()));
}

#[test]
fn adjacent_cursors_never_overlap() {
    let doc = Rope::from_str("abcdef");
    let ops = overtype_before_type(&doc, &[cursor(0, 0), cursor(0, 1)], "XY");
    let counts: Vec<usize> = ops.iter().map(EditOp::deleted_columns).collect();
    assert_eq!(counts, vec![1, 2]);
    assert_eq!(apply("abcdef", ops), "XYXYdef");
}

#[test]
fn cursor_stops_at_following_selection() {
    let doc = Rope::from_str("abcdef");
    let sels = [
        Selection::new(Position::new(0, 4), Position::new(0, 2)),
        cursor(0, 0),
    ];
    let ops = overtype_before_type(&doc, &sels, "XYZ");
    assert_eq!(ops[1].deleted_columns(), 2);
    assert_eq!(apply("abcdef", ops), "XYZXYZef");
}

#[test]
fn coinciding_cursors_overwrite_once() {
    let doc = Rope::from_str("abcdef");
    let ops = overtype_before_type(&doc, &[cursor(0, 2), cursor(0, 2)], "XY");
    let counts: Vec<usize> = ops.iter().map(EditOp::deleted_columns).collect();
    assert_eq!(counts, vec![2, 0]);
}

#[test]
fn cursor_past_end_of_document_deletes_nothing() {
    let doc = Rope::from_str("one");
    let ops = overtype_before_type(&doc, &[cursor(4, 0)], "q");
    assert_eq!(ops[0].delete, None);
    assert_eq!(ops[0].insert_pos, Position::new(4, 0));
}

#[test]
fn no_selections_no_edits() {
    let doc = Rope::from_str("text");
    assert!(overtype_before_type(&doc, &[], "x").is_empty());
}
