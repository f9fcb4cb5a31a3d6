use pretty_assertions::assert_eq;
use treemark::to_html;

fn html(input: &str) -> String {
    to_html(input)
}

// --- Recognition ---

#[test]
fn basic_table() {
    assert_eq!(
        html("a | b\n--- | ---\n1 | 2"),
        "<table>\n  <thead>\n    <tr>\n      <th>a</th>\n      <th>b</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <td>1</td>\n      <td>2</td>\n    </tr>\n  </tbody>\n</table>\n"
    );
}

#[test]
fn header_only_table_has_no_tbody() {
    let out = html("a | b\n--- | ---");
    assert!(out.contains("<thead>"));
    assert!(!out.contains("<tbody>"));
}

#[test]
fn outer_pipes_are_optional() {
    let with = html("| a | b |\n| --- | --- |\n| 1 | 2 |");
    let without = html("a | b\n--- | ---\n1 | 2");
    assert_eq!(with, without);
}

#[test]
fn alignment_attributes() {
    let out = html("l | c | r | n\n:-- | :-: | --: | ---\n1 | 2 | 3 | 4");
    assert!(out.contains("<th align=\"left\">l</th>"));
    assert!(out.contains("<th align=\"center\">c</th>"));
    assert!(out.contains("<th align=\"right\">r</th>"));
    assert!(out.contains("<th>n</th>"));
    assert!(out.contains("<td align=\"left\">1</td>"));
}

// --- Rejection ---

#[test]
fn single_column_is_a_paragraph() {
    let out = html("a|\n---|");
    assert!(out.starts_with("<p>"));
}

#[test]
fn column_count_mismatch_is_a_paragraph() {
    let out = html("a | b\n--- | ---\n1 | 2 | 3");
    assert!(out.starts_with("<p>"));
    assert!(!out.contains("<table>"));
}

#[test]
fn missing_delimiter_row_is_a_paragraph() {
    assert_eq!(html("a | b\n1 | 2"), "<p>a | b\n1 | 2</p>\n");
}

// --- Cell content ---

#[test]
fn cells_are_inline_parsed() {
    let out = html("*em* | `code`\n--- | ---\nx | y");
    assert!(out.contains("<th><em>em</em></th>"));
    assert!(out.contains("<th><code>code</code></th>"));
}

#[test]
fn escaped_pipe_stays_in_cell() {
    let out = html("a \\| b | c\n--- | ---\n1 | 2");
    assert!(out.contains("<th>a | b</th>"));
}

#[test]
fn code_span_pipe_does_not_split() {
    let out = html("`a | b` | c\n--- | ---\n1 | 2");
    assert!(out.contains("<th><code>a | b</code></th>"));
}

#[test]
fn table_inside_blockquote() {
    let out = html("> a | b\n> --- | ---\n> 1 | 2");
    assert!(out.contains("<blockquote>\n  <table>"));
}
