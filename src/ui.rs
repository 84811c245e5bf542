//! UI - dashboard layout and its HTML page
//!
//! Two collapsible groups, "Minting" (Mint, Burn) and "Spending" (Deposit,
//! Withdraw). The server renders the page; the browser bindings hand the
//! same layout to JS as JSON.

use serde::Serialize;

use crate::dispatch::{Action, Group};

pub const GROUPS: [Group; 2] = [Group::Minting, Group::Spending];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub action: Action,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub buttons: Vec<Button>,
}

pub fn layout() -> Vec<Section> {
    GROUPS
        .iter()
        .map(|group| Section {
            title: group.as_str(),
            buttons: group.actions().iter().map(|a| Button { action: *a, label: a.label() }).collect(),
        })
        .collect()
}

/// Full page. Buttons POST to `/actions/{action}` and print the JSON reply.
pub fn render_dashboard(address: &str) -> String {
    let mut sections = String::new();
    for section in layout() {
        sections.push_str(&format!("    <details open>\n      <summary>{}</summary>\n      <div class=\"row\">\n", section.title));
        for button in &section.buttons {
            sections.push_str(&format!(
                "        <button onclick=\"run('{}')\">{}</button>\n",
                button.action.as_str(),
                button.label
            ));
        }
        sections.push_str("      </div>\n    </details>\n");
    }
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Dashboard</title>
  <style>
    body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
    details {{ border: 1px solid #ddd; border-radius: 8px; padding: .5rem 1rem; margin-bottom: .5rem; }}
    .row {{ display: flex; flex-wrap: wrap; gap: .5rem; margin: .5rem 0; }}
    button {{ border: 0; border-radius: 999px; padding: .5rem 1.25rem; color: #fff; background: linear-gradient(45deg, #ec4899, #eab308); }}
    pre {{ background: #f5f5f5; padding: .5rem; overflow-x: auto; }}
  </style>
</head>
<body>
  <p>Wallet: <code>{address}</code></p>
  <div>
{sections}  </div>
  <pre id="out"></pre>
  <script>
    async function run(action) {{
      const res = await fetch('/actions/' + action, {{ method: 'POST' }});
      document.getElementById('out').textContent = JSON.stringify(await res.json(), null, 2);
    }}
  </script>
</body>
</html>
"#,
        address = escape(address),
        sections = sections
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_groups() {
        let layout = layout();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[0].title, "Minting");
        assert_eq!(layout[1].buttons.iter().map(|b| b.label).collect::<Vec<_>>(), vec!["Deposit", "Withdraw"]);
    }

    #[test]
    fn test_layout_json() {
        let json = serde_json::to_value(layout()).unwrap();
        assert_eq!(json[0]["buttons"][1], serde_json::json!({"action": "burn", "label": "Burn"}));
    }

    #[test]
    fn test_render_escapes_address() {
        let html = render_dashboard("<addr>");
        assert!(html.contains("&lt;addr&gt;"));
        assert!(html.contains("<summary>Spending</summary>"));
        assert!(html.contains("run('withdraw')"));
    }
}
