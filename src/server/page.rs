use crate::draw::Drawer;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>Rank Wheel</title>
<style>
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 2rem auto; max-width: 40rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; }
td.swatch { width: 1rem; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
#result { margin-top: 1rem; font-size: 1.4rem; min-height: 2rem; }
</style>
</head>
<body>
<h1>Rank Wheel</h1>
"#;

const TAIL: &str = r#"<button id="spinButton">Spin</button>
<div id="result"></div>
<script>
const button = document.getElementById("spinButton");
const result = document.getElementById("result");
button.addEventListener("click", async () => {
  button.disabled = true;
  try {
    const resp = await fetch("/spin", { method: "POST" });
    const data = await resp.json();
    result.textContent = resp.ok
      ? `${data.rank} (${data.percent.toFixed(2)}%)`
      : `Error: ${data.error}`;
  } catch (err) {
    result.textContent = `Error: ${err}`;
  } finally {
    button.disabled = false;
  }
});
</script>
</body>
</html>
"#;

/// Wheel colors for the built-in ranks
const RANK_COLORS: [(&str, &str); 7] = [
    ("E", "#A9A9A9"),
    ("D", "#6BCB77"),
    ("C", "#5DADE2"),
    ("B", "#AF7AC5"),
    ("A", "#F1C40F"),
    ("S", "#E74C3C"),
    ("NATIONAL", "#E67E22"),
];

/// Cycled for ranks outside the built-in table
const FALLBACK_COLORS: [&str; 4] = ["#48C9B0", "#F5B041", "#85929E", "#EC7063"];

fn rank_color(key: &str, idx: usize) -> &'static str {
    RANK_COLORS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLORS[idx % FALLBACK_COLORS.len()])
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Render the index page: every rank with its limit and display percentage
pub fn render_index(drawer: &Drawer) -> String {
    let mut html = String::from(HEAD);

    if drawer.ranks().is_empty() {
        html.push_str("<p>No ranks configured.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr><th></th><th>Rank</th><th>Limit</th><th>Chance</th></tr></thead>\n<tbody>\n");
        for (idx, rank) in drawer.ranks().iter().enumerate() {
            let percent = drawer.weights().at(idx).unwrap_or(0.0);
            html.push_str(&format!(
                "<tr data-key=\"{}\"><td class=\"swatch\" style=\"background: {}\"></td><td>{}</td><td class=\"num\">{}</td><td class=\"num percent\">{:.2}%</td></tr>\n",
                escape(&rank.key),
                rank_color(&rank.key, idx),
                escape(&rank.name),
                rank.limit,
                percent
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str(TAIL);
    html
}
