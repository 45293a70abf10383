#![no_main]

use libfuzzer_sys::fuzz_target;
use warden_issues::issue_comment::append_template_details;
use warden_issues::issue_template::{parse_issue_template, render_template_details};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let Ok(template) = parse_issue_template(&raw) else {
        return;
    };
    assert_eq!(template.body, template.body.trim_end());
    if let Some(first_line) = template.body.lines().next() {
        assert!(!first_line.trim().is_empty());
    }

    let block = render_template_details(&template);
    assert!(block.starts_with("<details><summary>"));
    assert!(block.ends_with("</details>\n\n"));

    let body = append_template_details("base", std::slice::from_ref(&template));
    assert!(body.starts_with("base"));
    assert!(body.ends_with("</details>"));
});
