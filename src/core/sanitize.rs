// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Remove grouping separators from a numeric token: `"12,345.6"` → `"12345.6"`.
pub fn strip_grouping(num: &str) -> String {
    num.chars().filter(|&c| c != ',').collect()
}

/// Remove each boilerplate fragment verbatim.
pub fn strip_fragments<S: AsRef<str>>(s: &str, fragments: &[S]) -> String {
    let mut out = s.to_string();
    for f in fragments {
        let f = f.as_ref();
        if !f.is_empty() {
            out = out.replace(f, "");
        }
    }
    out
}

/// First `max` chars (not bytes), with a marker when something was cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => join!(&s[..idx], "…"),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_separators_are_dropped() {
        assert_eq!(strip_grouping("12,345.6"), "12345.6");
        assert_eq!(strip_grouping("1,000,000"), "1000000");
        assert_eq!(strip_grouping("42"), "42");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("签到成功", 2), "签到…");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn fragments_are_removed_verbatim() {
        let s = r#"a<span style="float:right">b点击白色背景的圆点进行补签。"#;
        let out = strip_fragments(s, &[r#"<span style="float:right">"#, "点击白色背景的圆点进行补签。"]);
        assert_eq!(out, "ab");
    }
}
