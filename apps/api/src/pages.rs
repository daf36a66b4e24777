//! Server-rendered pages. They show cached data only; model calls go
//! through the JSON endpoints their scripts invoke after load.

use axum::response::Html;

use crate::auth::flash::FlashMessage;
use crate::formatting::escape_html;
use crate::models::profile::{ChallengeSet, ProfileDocument};
use crate::models::user::UserRecord;

fn layout(title: &str, flash: Option<&FlashMessage>, body: &str) -> Html<String> {
    let flash_html = flash
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.kind.css_class(),
                escape_html(&f.text)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} · Ignite</title></head>
<body>
{flash_html}
{body}
</body>
</html>"#,
        title = escape_html(title),
    ))
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">{submit}</button>
</form>"#
    )
}

pub fn login_page(flash: Option<&FlashMessage>) -> Html<String> {
    let body = format!(
        "<h1>Log in</h1>\n{}\n<p><a href=\"/register\">Create an account</a></p>",
        credentials_form("/login", "Log in")
    );
    layout("Log in", flash, &body)
}

pub fn register_page(flash: Option<&FlashMessage>) -> Html<String> {
    let body = format!(
        "<h1>Register</h1>\n{}\n<p><a href=\"/login\">Already registered? Log in</a></p>",
        credentials_form("/register", "Register")
    );
    layout("Register", flash, &body)
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

fn profile_summary(profile: &ProfileDocument) -> String {
    let years = profile
        .experience
        .total_years
        .map(|y| format!("{y}"))
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        r#"<section id="profile">
  <h2>{name}</h2>
  <p>Email: {emails}</p>
  <p>Phone: {phones}</p>
  <p>Experience: {years} years</p>
  <h3>Skills</h3>
  <ul>{skills}</ul>
</section>"#,
        name = escape_html(&profile.name),
        emails = escape_html(&profile.emails.join(", ")),
        phones = escape_html(&profile.phones.join(", ")),
        skills = list_items(&profile.skills),
    )
}

pub fn dashboard_page(
    username: &str,
    user: &UserRecord,
    profile: Option<&ProfileDocument>,
    flash: Option<&FlashMessage>,
) -> Html<String> {
    let display_name = user.profile_str("fullName").unwrap_or(username);
    let profile_html = profile
        .map(profile_summary)
        .unwrap_or_else(|| "<p>No resume analysed yet. Upload one to get started.</p>".to_string());
    let recommendations = profile
        .map(|p| list_items(&p.missing_skills))
        .unwrap_or_default();
    let has_profile = profile.is_some();

    let body = format!(
        r#"<h1>Welcome, {name}</h1>
<nav><a href="/roadmap">Roadmap</a> · <a href="/recommendation">Recommendations</a> · <a href="/logout">Log out</a></nav>
<form id="upload" enctype="multipart/form-data">
  <input type="file" name="resume" accept="application/pdf">
  <button type="submit">Analyse resume</button>
</form>
<p id="upload-status"></p>
{profile_html}
<section>
  <h3>Skills to learn next</h3>
  <ul id="missing-skills">{recommendations}</ul>
</section>
<section>
  <h3>Ask the career counsellor</h3>
  <form id="chat"><input name="message"><button type="submit">Send</button></form>
  <p id="chat-reply"></p>
</section>
<script>
const hasProfile = {has_profile};
async function postJson(url, body) {{
  const res = await fetch(url, {{method: 'POST', headers: {{'Content-Type': 'application/json'}}, body: JSON.stringify(body || {{}})}});
  return res.json();
}}
function fillList(id, items) {{
  const ul = document.getElementById(id);
  ul.replaceChildren(...items.map(t => {{ const li = document.createElement('li'); li.textContent = t; return li; }}));
}}
if (hasProfile) {{
  postJson('/generate').then(d => {{ if (d.skills) fillList('missing-skills', d.skills); }});
}}
document.getElementById('upload').addEventListener('submit', async e => {{
  e.preventDefault();
  const res = await fetch('/upload', {{method: 'POST', body: new FormData(e.target)}});
  const d = await res.json();
  document.getElementById('upload-status').textContent = d.message || d.error;
  if (res.ok) location.reload();
}});
document.getElementById('chat').addEventListener('submit', async e => {{
  e.preventDefault();
  const d = await postJson('/chat', {{message: e.target.message.value}});
  document.getElementById('chat-reply').textContent = d.response || d.error;
}});
</script>"#,
        name = escape_html(display_name),
    );
    layout("Dashboard", flash, &body)
}

fn challenges_html(challenges: &ChallengeSet) -> String {
    match challenges {
        ChallengeSet::Failed { error } => {
            format!(r#"<p class="error">{}</p>"#, escape_html(error))
        }
        ChallengeSet::Ready(months) => months
            .iter()
            .map(|(month, weeks)| {
                let items: String = weeks
                    .iter()
                    .map(|c| {
                        format!(
                            "<li>Week {}: <b>{}</b> ({}) {}</li>",
                            c.week,
                            escape_html(&c.title),
                            escape_html(&c.related_skill),
                            escape_html(&c.description)
                        )
                    })
                    .collect();
                format!("<h4>{}</h4><ul>{items}</ul>", escape_html(month))
            })
            .collect(),
    }
}

pub fn roadmap_page(username: &str, profile: Option<&ProfileDocument>) -> Html<String> {
    // roadmap_html is rendered from model markdown and embedded as-is.
    let roadmap = profile
        .and_then(|p| p.roadmap_html.as_deref())
        .unwrap_or("<p>No roadmap yet.</p>");
    let challenges = profile
        .and_then(|p| p.challenges.as_ref())
        .map(challenges_html)
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Roadmap for {name}</h1>
<nav><a href="/dashboard">Dashboard</a> · <a href="/logout">Log out</a></nav>
<button id="regenerate">Generate roadmap</button>
<div id="roadmap">{roadmap}</div>
<section id="challenges">{challenges}</section>
<script>
document.getElementById('regenerate').addEventListener('click', async () => {{
  const res = await fetch('/generate_roadmap_data', {{method: 'POST'}});
  const d = await res.json();
  if (d.roadmap_html) {{ location.reload(); }} else {{ document.getElementById('roadmap').textContent = d.error; }}
}});
</script>"#,
        name = escape_html(username),
    );
    layout("Roadmap", None, &body)
}

/// Career recommendations, fetched from `/generate_recommendations` after load.
pub fn recommendation_page(username: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Career recommendations for {name}</h1>
<nav><a href="/dashboard">Dashboard</a> · <a href="/roadmap">Roadmap</a> · <a href="/logout">Log out</a></nav>
<div id="next-steps"><p>Thinking about your next steps...</p></div>
<script>
fetch('/generate_recommendations')
  .then(res => res.json())
  .then(d => {{
    const target = document.getElementById('next-steps');
    if (d.next_steps) {{ target.innerHTML = d.next_steps; }} else {{ target.textContent = d.error; }}
  }});
</script>"#,
        name = escape_html(username),
    );
    layout("Recommendations", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_text_is_escaped() {
        let page = login_page(Some(&FlashMessage::danger("<b>bad</b>")));
        assert!(page.0.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(page.0.contains(r#"class="flash danger""#));
    }

    #[test]
    fn test_dashboard_escapes_profile_fields() {
        let profile = ProfileDocument {
            name: "<script>alert(1)</script>".to_string(),
            missing_skills: vec!["Docker".to_string()],
            ..Default::default()
        };
        let page = dashboard_page("ada", &UserRecord::new("pw"), Some(&profile), None);
        assert!(!page.0.contains("<script>alert(1)</script>"));
        assert!(page.0.contains("<li>Docker</li>"));
        assert!(page.0.contains("const hasProfile = true;"));
    }

    #[test]
    fn test_dashboard_without_profile_prompts_upload() {
        let page = dashboard_page("ada", &UserRecord::new("pw"), None, None);
        assert!(page.0.contains("No resume analysed yet"));
        assert!(page.0.contains("const hasProfile = false;"));
    }

    #[test]
    fn test_recommendation_page_loads_steps_after_render() {
        let page = recommendation_page("<ada>");
        assert!(page.0.contains("fetch('/generate_recommendations')"));
        assert!(page.0.contains("&lt;ada&gt;"));
    }

    #[test]
    fn test_roadmap_page_shows_challenge_error_marker() {
        let profile = ProfileDocument {
            roadmap_html: Some("<h3>Month 1</h3>".to_string()),
            challenges: Some(ChallengeSet::failed("Could not generate challenges")),
            ..Default::default()
        };
        let page = roadmap_page("ada", Some(&profile));
        assert!(page.0.contains("<h3>Month 1</h3>"));
        assert!(page.0.contains("Could not generate challenges"));
    }
}
