// src/core/html.rs

/// Drop every `<...>` tag, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Remove only the listed tags (open and close forms), leave the rest alone.
/// `strip_named_tags("第 <b>7</b>", &["b"])` → `"第 7"`.
pub fn strip_named_tags(s: &str, names: &[&str]) -> String {
    let mut out = s.to_string();
    for name in names {
        out = out.replace(&format!("<{name}>"), "");
        out = out.replace(&format!("</{name}>"), "");
    }
    out
}

/// Text of the `<title>` element, if any. Handy when a site answers with an
/// error page whose body is mostly script.
pub fn title(doc: &str) -> Option<String> {
    let lc = doc.to_ascii_lowercase();
    let open = lc.find("<title")?;
    let after = doc[open..].find('>')? + open + 1;
    let close = lc[after..].find("</title>")? + after;
    let t = strip_tags(&doc[after..close]);
    if t.is_empty() { None } else { Some(t) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_collapses_whitespace() {
        assert_eq!(strip_tags("<p>a\n  <b>b</b></p>  c"), "a b c");
    }

    #[test]
    fn strip_named_tags_keeps_other_markup() {
        assert_eq!(
            strip_named_tags("<i>x</i> <b>7</b>", &["b"]),
            "<i>x</i> 7"
        );
    }

    #[test]
    fn title_is_case_insensitive() {
        let doc = "<html><HEAD><TITLE> 502 Bad Gateway </TITLE></HEAD></html>";
        assert_eq!(title(doc).as_deref(), Some("502 Bad Gateway"));
        assert_eq!(title("<html></html>"), None);
    }
}
