use super::*;
use crate::fixtures::{PostingBuilder, SignalBuilder};
use crate::model::{RemoteType, Seniority};

#[test]
fn test_strip_html_removes_tags_and_entities() {
    let html = "<p>Build <b>APIs</b> &amp; services</p>\n\n<ul><li>Go</li><li>Postgres</li></ul>";
    let text = strip_html(html);
    assert!(!text.contains('<'));
    assert!(text.contains("APIs"));
    assert!(text.contains("& services"));
    assert!(text.contains("Go"));
    assert!(text.contains("Postgres"));
}

#[test]
fn test_strip_html_decodes_named_and_numeric_entities() {
    let text = strip_html("<p>We&rsquo;re hiring &mdash; caf&eacute; &#8220;team&#8221;</p>");
    assert_eq!(text, "We\u{2019}re hiring \u{2014} caf\u{e9} \u{201c}team\u{201d}");
}

#[test]
fn test_strip_html_keeps_text_after_bare_angle_bracket() {
    let text = strip_html("<p>Salary < 100k and bonus > 10%</p>");
    assert_eq!(text, "Salary < 100k and bonus > 10%");
}

#[test]
fn test_strip_html_passes_plain_text_through() {
    assert_eq!(strip_html("We use Go,\n  Postgres."), "We use Go, Postgres.");
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
    assert_eq!(truncate_chars("short", 50), "short");
}

#[test]
fn test_tokenize_keeps_stack_punctuation() {
    assert_eq!(
        tokenize("Senior C++/C# Developer (.NET, Node.js)."),
        vec!["senior", "c++", "c#", "developer", ".net", "node.js"]
    );
}

#[test]
fn test_normalize_term_strips_punctuation() {
    assert_eq!(normalize_term("Node.js"), "nodejs");
    assert_eq!(normalize_term(".NET"), "net");
    assert_eq!(normalize_term("C++"), "c++");
}

#[test]
fn test_contains_phrase_matches_token_runs() {
    let tokens = tokenize("Licensed Physical Therapist - Outpatient");
    assert!(contains_phrase(&tokens, "physical therapist"));
    assert!(!contains_phrase(&tokens, "therapist physical"));
    assert!(!contains_phrase(&tokens, ""));
}

#[test]
fn test_represent_user_caps_and_orders_sections() {
    let skills: Vec<String> = (0..40).map(|i| format!("skill{i}")).collect();
    let skill_refs: Vec<&str> = skills.iter().map(String::as_str).collect();

    let signal = SignalBuilder::new()
        .target_roles(&["Backend Engineer"])
        .seniority(Seniority::Senior)
        .skills(&skill_refs)
        .experience("Engineer", "OldCo", 2015)
        .experience("Senior Engineer", "NewCo", 2021)
        .experience("Intern", "FirstCo", 2012)
        .experience("Developer", "MidCo", 2018)
        .build();

    let doc = represent_user(&signal);

    assert!(doc.starts_with("Target roles: Backend Engineer. Seniority: senior."));
    assert!(doc.contains("skill24"));
    assert!(!doc.contains("skill25"));
    assert!(doc.contains("Recent experience: Senior Engineer at NewCo; Developer at MidCo; Engineer at OldCo."));
    assert!(!doc.contains("FirstCo"));
}

#[test]
fn test_represent_user_keeps_five_most_recent_interests() {
    let mut builder = SignalBuilder::new().target_roles(&["Data Engineer"]);
    for day in 0..7 {
        builder = builder.interest(&format!("Role {day}"), "Acme", day);
    }
    let doc = represent_user(&builder.build());

    assert!(doc.contains("Recently interested in: Role 0 at Acme; Role 1 at Acme"));
    assert!(doc.contains("Role 4 at Acme"));
    assert!(!doc.contains("Role 5"));
}

#[test]
fn test_represent_user_omits_empty_sections() {
    let signal = SignalBuilder::new().skills(&["rust"]).build();
    assert_eq!(represent_user(&signal), "Technical skills: rust.");
}

#[test]
fn test_represent_posting_truncates_description() {
    let description = format!("<div>{}</div>", "word ".repeat(300));
    let posting = PostingBuilder::new("Backend Engineer", "Acme")
        .location("Berlin, Germany")
        .remote_type(RemoteType::Hybrid)
        .description(&description)
        .build();

    let doc = represent_posting(&posting);

    assert!(doc.starts_with("Backend Engineer at Acme. Hybrid. Location: Berlin, Germany. word"));
    let header = "Backend Engineer at Acme. Hybrid. Location: Berlin, Germany. ";
    assert!(doc.len() <= header.len() + 500);
    assert!(!doc.contains('<'));
}

#[test]
fn test_represent_posting_prefers_normalized_title() {
    let mut posting = PostingBuilder::new("Backend Engineer - Remote (US)", "Acme").build();
    posting.normalized_title = Some("Backend Engineer".into());

    assert_eq!(represent_posting(&posting), "Backend Engineer at Acme.");
}
