use alloc::string::String;
use core::fmt;
use core::fmt::Display;
use core::fmt::Write;

/// Width of the left-justified first column in column dumps.
pub(crate) const COLUMN_WIDTH: usize = 30;

/// Writes `items` as `[a, b, c]`, or `[]` when there are none.
pub(crate) fn write_list<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: Display,
{
    f.write_char('[')?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(']')
}

/// Writes each item back to back inside one pair of brackets, for items that
/// already bracket themselves.
pub(crate) fn write_concatenated<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: Display,
{
    f.write_char('[')?;
    for item in items {
        write!(f, "{item}")?;
    }
    f.write_char(']')
}

/// Renders a two-column listing: a header row, a dashed underline sized to
/// each label, then one row per pair with the first column padded to
/// [`COLUMN_WIDTH`].
pub(crate) fn two_columns<'a, A, B, I>(left_label: &str, right_label: &str, rows: I) -> String
where
    A: Display + 'a,
    B: Display + 'a,
    I: IntoIterator<Item = (&'a A, &'a B)>,
{
    let mut out = String::new();
    push_line(&mut out, format_args!("{left_label:<COLUMN_WIDTH$}{right_label}"));
    push_line(
        &mut out,
        format_args!(
            "{:<COLUMN_WIDTH$}{}",
            underline(left_label),
            underline(right_label)
        ),
    );
    for (left, right) in rows {
        // Padding is applied to the rendered text so that types whose Display
        // ignores width flags still line up.
        let left = alloc::format!("{left}");
        push_line(&mut out, format_args!("{left:<COLUMN_WIDTH$}{right}"));
    }
    out
}

/// Renders a single-column listing with a header row and dashed underline.
pub(crate) fn one_column<'a, A, I>(label: &str, rows: I) -> String
where
    A: Display + 'a,
    I: IntoIterator<Item = &'a A>,
{
    let mut out = String::new();
    push_line(&mut out, format_args!("{label:<COLUMN_WIDTH$}"));
    push_line(&mut out, format_args!("{:<COLUMN_WIDTH$}", underline(label)));
    for item in rows {
        let item = alloc::format!("{item}");
        push_line(&mut out, format_args!("{item:<COLUMN_WIDTH$}"));
    }
    out
}

/// Appends the formatted `args` and a newline to `out`.
fn push_line(out: &mut String, args: fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    let _ = out.write_fmt(args);
    out.push('\n');
}

fn underline(label: &str) -> String {
    "-".repeat(label.chars().count())
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    struct List(alloc::vec::Vec<u32>);

    impl Display for List {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_list(f, &self.0)
        }
    }

    #[test]
    fn list_formats() {
        assert_eq!(List(vec![]).to_string(), "[]");
        assert_eq!(List(vec![1]).to_string(), "[1]");
        assert_eq!(List(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
    }

    #[test]
    fn two_column_layout() {
        let rows = [("Ohio", 11), ("Guam", 2)];
        let out = two_columns("State", "Total", rows.iter().map(|(a, b)| (a, b)));
        let lines: alloc::vec::Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], alloc::format!("{:<30}Total", "State"));
        assert_eq!(lines[1], alloc::format!("{:<30}-----", "-----"));
        assert_eq!(lines[2], alloc::format!("{:<30}11", "Ohio"));
        assert_eq!(lines[3], alloc::format!("{:<30}2", "Guam"));
    }

    #[test]
    fn one_column_layout() {
        let out = one_column("State", ["Ohio"].iter());
        let lines: alloc::vec::Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                alloc::format!("{:<30}", "State"),
                alloc::format!("{:<30}", "-----"),
                alloc::format!("{:<30}", "Ohio"),
            ]
        );
    }
}
