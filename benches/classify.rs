// benches/classify.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use checkin::engine::classify::Classifier;
use checkin::specs::SiteDescriptor;

/// A NexusPHP-sized attendance page: lots of markup, markers near the end.
fn sample_page(success: bool) -> String {
    let mut doc = String::with_capacity(64 * 1024);
    doc.push_str("<html><head><title>HDtime :: 签到</title></head><body>");
    for i in 0..800 {
        doc.push_str(&format!("<tr><td class=\"rowfollow\">row {i}</td><td><a href=\"/t/{i}\">x</a></td></tr>"));
    }
    if success {
        doc.push_str("<td>这是您的第 <b>42</b> 次签到，已连续签到 <b>12</b> 天。今日签到排名：<b>5</b> / <b>300</b></td>");
    }
    doc.push_str("<span class=\"medium\">魔力值 [使用]: 123,456.7</span></body></html>");
    doc
}

fn bench_classify(c: &mut Criterion) {
    let site = SiteDescriptor::new("HDtime", "https://hdtime.org/attendance.php").with_value_keyword("魔力值");
    let classifier = Classifier::compile(&site, 200).expect("compile classifier");
    let hit = sample_page(true);
    let miss = sample_page(false);

    c.bench_function("classify_success", |b| {
        b.iter(|| black_box(classifier.classify(black_box(&hit))))
    });

    c.bench_function("classify_unknown", |b| {
        b.iter(|| black_box(classifier.classify(black_box(&miss))))
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
