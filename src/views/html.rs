//! Bare HTML for the browser-facing pages. Every interpolated value goes through `escape`.

use axum::response::Html;

use crate::auth::repo_types::User;
use crate::jobs::dto::JobView;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"nb\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

pub fn index() -> Html<String> {
    page(
        "Odyer",
        r#"<h1>Velkommen</h1>
<p><a href="/login">Logg inn</a> | <a href="/register">Registrer deg</a></p>"#,
    )
}

pub fn register_form() -> Html<String> {
    page(
        "Registrer deg",
        r#"<h1>Registrer deg</h1>
<form method="post" action="/register">
  <label>Fullt navn <input name="full_name" required></label>
  <label>E-post <input name="email" type="email" required></label>
  <label>Passord <input name="password" type="password" required></label>
  <button type="submit">Registrer</button>
</form>"#,
    )
}

pub fn login_form() -> Html<String> {
    page(
        "Logg inn",
        r#"<h1>Logg inn</h1>
<form method="post" action="/login">
  <label>E-post <input name="email" type="email" required></label>
  <label>Passord <input name="password" type="password" required></label>
  <button type="submit">Logg inn</button>
</form>"#,
    )
}

pub fn dashboard(full_name: &str) -> Html<String> {
    page(
        "Dashboard",
        &format!(
            r#"<h1>Hei, {}!</h1>
<form id="order-form">
  <label>Beskrivelse <textarea id="description" required></textarea></label>
  <button type="submit">Bestill</button>
</form>
<p><a href="/thank_you">Mine bestillinger</a> | <a href="/logout">Logg ut</a></p>
<script>
document.getElementById('order-form').addEventListener('submit', async (e) => {{
  e.preventDefault();
  const description = document.getElementById('description').value;
  const res = await fetch('/order', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ description }}),
  }});
  const body = await res.json();
  if (res.ok) {{ window.location.href = '/thank_you'; }} else {{ alert('Noe gikk galt: ' + body.message); }}
}});
</script>"#,
            escape(full_name)
        ),
    )
}

fn jobs_table(jobs: &[JobView], owners: Option<&[User]>) -> String {
    let mut rows = String::new();
    for job in jobs {
        let owner_cell = match owners {
            Some(users) => {
                let owner = users
                    .iter()
                    .find(|u| u.id == job.user_id)
                    .map(|u| escape(&u.email))
                    .unwrap_or_else(|| job.user_id.to_string());
                format!("<td>{}</td>", owner)
            }
            None => String::new(),
        };
        rows.push_str(&format!(
            "<tr><td>{}</td>{}<td>{}</td></tr>\n",
            escape(&job.created_at),
            owner_cell,
            escape(&job.description)
        ));
    }
    let owner_head = if owners.is_some() { "<th>Bruker</th>" } else { "" };
    format!(
        "<table>\n<tr><th>Tidspunkt</th>{}<th>Beskrivelse</th></tr>\n{}</table>",
        owner_head, rows
    )
}

pub fn thank_you(jobs: &[JobView]) -> Html<String> {
    page(
        "Takk for bestillingen",
        &format!(
            "<h1>Takk for bestillingen!</h1>\n<h2>Dine bestillinger</h2>\n{}\n<p><a href=\"/dashboard\">Tilbake</a></p>",
            jobs_table(jobs, None)
        ),
    )
}

pub fn admin(users: &[User], jobs: &[JobView]) -> Html<String> {
    let mut user_rows = String::new();
    for u in users {
        user_rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&u.full_name),
            escape(&u.email),
            if u.is_admin { "ja" } else { "nei" }
        ));
    }
    page(
        "Admin",
        &format!(
            "<h1>Admin</h1>\n<h2>Brukere</h2>\n<table>\n<tr><th>Navn</th><th>E-post</th><th>Admin</th></tr>\n{}</table>\n<h2>Bestillinger</h2>\n{}\n<p><a href=\"/logout\">Logg ut</a></p>",
            user_rows,
            jobs_table(jobs, Some(users))
        ),
    )
}

pub fn logged_out() -> Html<String> {
    page(
        "Logget ut",
        "<h1>Du er nå logget ut.</h1>\n<p><a href=\"/login\">Logg inn igjen</a></p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn dashboard_greets_by_escaped_name() {
        let Html(body) = dashboard("<Kari>");
        assert!(body.contains("Hei, &lt;Kari&gt;!"));
        assert!(!body.contains("<Kari>"));
    }

    #[test]
    fn admin_lists_owner_email_and_never_hashes() {
        let user = User {
            id: Uuid::new_v4(),
            full_name: "Kari".into(),
            email: "kari@x.no".into(),
            password_hash: "$argon2id$secret".into(),
            is_admin: false,
        };
        let job = JobView {
            id: Uuid::new_v4(),
            user_id: user.id,
            description: "Vask hytte".into(),
            created_at: "2024-06-01 14:00:00".into(),
        };
        let Html(body) = admin(&[user], &[job]);
        assert!(body.contains("<td>kari@x.no</td>"));
        assert!(body.contains("Vask hytte"));
        assert!(body.contains("2024-06-01 14:00:00"));
        assert!(!body.contains("argon2"));
    }
}
