use super::super::helpers::prepare_html_template;

pub fn get_welcome_text(name: &str, site_url: &str) -> String {
    format!(
        "
        Hello, {name}!

        Thank you for subscribing to Budget Ndio Story.

        Every week we break down how public money is raised and spent, in plain
        language. Your first issue is on its way.

        Catch up on past stories any time: {site_url}

        Changed your mind? You can unsubscribe from any issue.
    "
    )
}

pub fn get_welcome_html(name: &str, site_url: &str) -> String {
    prepare_html_template(&[("name", name), ("site_url", site_url)], "welcome_email.html")
}
