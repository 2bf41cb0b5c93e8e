use crate::core::item::Item;
use crate::utils::{date_part, escape_html};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    /// Document `<title>`.
    pub title: String,
    /// Visible `<h1>` above the grid.
    pub heading: String,
    pub description: String,
    /// Google Analytics measurement id. No tag is emitted when unset.
    pub analytics_id: Option<String>,
    pub lang: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: "Heti Tóra".to_string(),
            heading: "Hetiszakasz archívum".to_string(),
            description: "Heti Tóra".to_string(),
            analytics_id: None,
            lang: "hu".to_string(),
        }
    }
}

const STYLE: &str = r#"<style>
:root{--gap:12px;--card-radius:12px;--maxw:1100px;}
*{box-sizing:border-box}
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,'Helvetica Neue',Arial;line-height:1.35;margin:16px;background:#f7f7f8;color:#111}
.container{max-width:var(--maxw);margin:0 auto}
.header{display:flex;align-items:center;gap:12px;margin-bottom:12px}
h1{font-size:1.25rem;margin:0}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:var(--gap)}
.card{background:#fff;border-radius:var(--card-radius);overflow:hidden;box-shadow:0 6px 18px rgba(20,20,20,0.06);display:flex;flex-direction:column;text-decoration:none;color:inherit}
.thumb{position:relative;aspect-ratio:16/9;background:#ddd}
.thumb img{width:100%;height:100%;object-fit:cover;display:block}
.meta-badge{position:absolute;right:8px;bottom:8px;background:rgba(0,0,0,0.8);color:#fff;padding:4px 6px;border-radius:6px;font-size:0.85rem}
.card-body{padding:10px 12px;display:flex;flex-direction:column;gap:8px;flex:1}
.title{font-weight:600;font-size:0.98rem;margin:0;line-height:1.2}
.sub{font-size:0.85rem;color:#555}
.footer-note{margin-top:32px;text-align:center;font-size:9px;color:#666}
.footer-note a{color:#444;text-decoration:underline dotted}
@media (max-width:420px){
  .grid{grid-template-columns:repeat(2,minmax(0,1fr))}
  h1{font-size:1.05rem}
}
</style>
"#;

const FOOTER: &str = r#"  </div>
  <div class="footer-note">
    Powered by <a href="https://github.com/binyominzeev/weekly-torah" target="_blank" rel="noopener noreferrer">Weekly Torah</a>
  </div>
</div>
</body>
</html>
"#;

fn analytics_tag(id: &str) -> String {
    let id = escape_html(id);
    format!(
        r#"<script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
<script>
  window.dataLayer = window.dataLayer || [];
  function gtag(){{dataLayer.push(arguments);}}
  gtag('js', new Date());
  gtag('config', '{id}');
</script>
"#
    )
}

fn head(page: &PageSettings) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<!doctype html>\n<html lang=\"{}\">\n<head>\n",
        escape_html(&page.lang)
    ));
    if let Some(id) = page.analytics_id.as_deref().filter(|id| !id.is_empty()) {
        out.push_str(&analytics_tag(id));
    }
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(&page.title)));
    out.push_str("<link rel=\"manifest\" href=\"manifest.json\">\n");
    out.push_str("<link rel=\"icon\" type=\"image/png\" sizes=\"192x192\" href=\"icon-192.png\">\n");
    out.push_str("<link rel=\"icon\" type=\"image/png\" sizes=\"512x512\" href=\"icon-512.png\">\n");
    out.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        escape_html(&page.description)
    ));
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n<div class=\"container\">\n");
    out.push_str(&format!(
        "  <div class=\"header\">\n    <h1>{}</h1>\n  </div>\n  <div class=\"grid\">\n",
        escape_html(&page.heading)
    ));
    out
}

/// Text for the corner overlay: the duration, else the publish date.
fn badge_text(item: &Item) -> Option<&str> {
    item.duration
        .as_deref()
        .filter(|d| !d.is_empty())
        .or_else(|| {
            item.published_at
                .as_deref()
                .map(date_part)
                .filter(|d| !d.is_empty())
        })
}

fn card(item: &Item) -> String {
    let title = escape_html(&item.title);
    let link = escape_html(&item.link);
    let thumb = escape_html(&item.thumbnail);
    let published = escape_html(item.published_at.as_deref().map(date_part).unwrap_or(""));
    let badge = badge_text(item)
        .map(|text| format!("<div class=\"meta-badge\">{}</div>", escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"
    <a class="card" href="{link}" target="_blank" rel="noopener noreferrer">
      <div class="thumb">
        <img loading="lazy" src="{thumb}" alt="{title}">
        {badge}
      </div>
      <div class="card-body">
        <div class="title">{title}</div>
        <div class="sub">{published}</div>
      </div>
    </a>
"#
    )
}

/// Render the gallery document. Cards follow `items` order and the output
/// depends only on `items` and `page`.
pub fn render_page(items: &[Item], page: &PageSettings) -> String {
    let mut html = head(page);
    for item in items {
        html.push_str(&card(item));
    }
    html.push_str(FOOTER);
    html
}
