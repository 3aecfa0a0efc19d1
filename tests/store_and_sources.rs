// tests/store_and_sources.rs
//
// On-disk pieces: the check-in store and cookie files.
//
use chrono::NaiveDate;

use checkin::credentials::{CookieJarSource, CredentialSource};
use checkin::specs::{self, SiteDescriptor};
use checkin::store::CheckinStore;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

#[test]
fn store_records_and_overwrites_per_site() {
    let dir = tempfile::tempdir().unwrap();
    // nested dir does not exist yet
    let store = CheckinStore::new(dir.path().join("state").join("checkins.txt"));

    assert_eq!(store.last_success("HDtime").unwrap(), None);
    assert!(!store.already_signed("HDtime", day(18)));

    store.record_success("HDtime", day(17)).unwrap();
    store.record_success("GGPT", day(18)).unwrap();
    store.record_success("HDtime", day(18)).unwrap();

    assert_eq!(store.last_success("HDtime").unwrap(), Some(day(18)));
    assert_eq!(store.last_success("GGPT").unwrap(), Some(day(18)));
    assert!(store.already_signed("HDtime", day(18)));
    assert!(!store.already_signed("HDtime", day(19)));

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(text, "HDtime,2026-10-18\nGGPT,2026-10-18\n");
}

#[test]
fn store_survives_hand_edited_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkins.txt");
    std::fs::write(&path, "nonsense\nHDtime,2026-10-18\n").unwrap();

    let store = CheckinStore::new(&path);
    assert!(store.already_signed("HDtime", day(18)));
    store.record_success("GGPT", day(18)).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "HDtime,2026-10-18\nGGPT,2026-10-18\n");
}

#[test]
fn exported_cookie_jar_file_resolves_by_domain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jar.json");
    std::fs::write(
        &path,
        r#"{"cookie_data": {
            ".hdtime.org": [{"name":"c_secure_uid","value":"1"},{"name":"c_secure_pass","value":"p"}],
            "example.com": [{"name":"x","value":"y"}]
        }}"#,
    )
    .unwrap();

    let jar = CookieJarSource::from_file(&path).unwrap();
    let site = SiteDescriptor::new("HDtime", "https://www.hdtime.org/attendance.php");
    let cred = jar.credential(&site).unwrap();
    assert_eq!(cred.expose(), "c_secure_uid=1; c_secure_pass=p");

    let other = SiteDescriptor::new("GGPT", "https://www.gamegamept.com/attendance.php");
    assert!(jar.credential(&other).is_none());
}

#[test]
fn sites_file_overrides_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    std::fs::write(
        &path,
        r#"[{"name":"Mine","url":"https://pt.example/attendance.php","value_keyword":"魔力值"}]"#,
    )
    .unwrap();

    let sites = specs::load_file(&path).unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "Mine");
    assert!(sites[0].verify_tls);
    assert_eq!(sites[0].rules, specs::site::default_rules());
}
