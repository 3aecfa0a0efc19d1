// src/specs/builtin.rs
//! Sites shipped with the binary. GGPT and HDtime follow the multi-site
//! script (no TLS verification, non-2xx is a failed request); Piggo keeps
//! its own script's verified TLS. Override with `--sites`.

use super::site::SiteDescriptor;

/// Browser-like headers sent to every site unless it opts out.
pub const COMMON_HEADERS: &[(&str, &str)] = &[
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
    ("accept-language", "zh-CN,zh;q=0.9,und;q=0.8"),
    ("sec-ch-ua", r#""Chromium";v="122", "Not(A:Brand";v="24", "Google Chrome";v="122""#),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""Windows""#),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("sec-gpc", "1"),
    ("upgrade-insecure-requests", "1"),
    ("user-agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
];

pub fn builtin_sites() -> Vec<SiteDescriptor> {
    vec![ggpt(), hdtime(), piggo()]
}

fn ggpt() -> SiteDescriptor {
    SiteDescriptor::new("GGPT", "https://www.gamegamept.com/attendance.php")
        .with_header("authority", "www.gamegamept.com")
        .with_header("referer", "https://www.gamegamept.com/attendance.php")
        .with_value_keyword("G值")
        .with_verify_tls(false)
        .with_require_http_success(true)
}

fn hdtime() -> SiteDescriptor {
    SiteDescriptor::new("HDtime", "https://hdtime.org/attendance.php")
        .with_header("authority", "hdtime.org")
        .with_header("referer", "https://hdtime.org/attendance.php")
        .with_value_keyword("魔力值")
        .with_verify_tls(false)
        .with_require_http_success(true)
}

fn piggo() -> SiteDescriptor {
    SiteDescriptor::new("Piggo", "https://piggo.me/attendance.php")
        .with_header("authority", "piggo.me")
        .with_header("referer", "https://piggo.me/attendance.php")
        .with_value_keyword("魔力值")
}
