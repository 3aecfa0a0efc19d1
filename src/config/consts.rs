// src/config/consts.rs

// Probe defaults
pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY_SECS: u64 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

// Run
pub const SITE_PAUSE_SECS: u64 = 2; // be polite between sites
pub const BODY_SNIPPET_CHARS: usize = 200;

// Local bookkeeping
pub const STORE_DIR: &str = ".store";
pub const STORE_FILE: &str = "checkins.txt";
pub const STORE_SEP: char = ',';
pub const LOG_FILE: &str = "debug.log";

// Environment
pub const ENV_JSON_COOKIES: &str = "PT_COOKIES";
pub const ENV_SITE_COOKIE_SUFFIX: &str = "_COOKIE";
pub const ENV_SYNC_SERVER: &str = "COOKIE_SYNC_SERVER";
pub const ENV_SYNC_UUID: &str = "COOKIE_SYNC_UUID";
pub const ENV_SYNC_PASSWORD: &str = "COOKIE_SYNC_PASSWORD";
pub const ENV_SYNC_FILE: &str = "COOKIE_SYNC_FILE";
pub const ENV_WEBHOOK: &str = "CHECKIN_WEBHOOK";

// Response markers shared by the NexusPHP attendance pages
pub const SUCCESS_MARKER: &str = "这是您的第";
pub const AUTH_REDIRECT_MARKER: &str = "https://www.gov.cn/";
pub const TRANSIENT_MARKERS: &[&str] = &["503 Service Temporarily", "502 Bad Gateway"];
pub const STREAK_PATTERN: &str = r"这是您的第 <b>(\d+)</b>[\s\S]*?今日签到排名：<b>(\d+)</b>";
pub const STREAK_STRIP: &[&str] = &["点击白色背景的圆点进行补签。", r#"<span style="float:right">"#];

// Notification titles
pub const SUMMARY_TITLE: &str = "PT多站签到报告";
