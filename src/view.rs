//! Server-rendered HTML for the task listing.

use tracker_core::models::{TaskPage, TaskRow};
use tracker_core::{ListParams, TaskGroup};

/// Delay before a typed search is submitted.
const SEARCH_DEBOUNCE_MS: u64 = 300;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #fafafa; color: #171717; }
main { max-width: 40rem; margin: 0 auto; padding: 1rem; }
h1 { font-size: 1.25rem; }
h2 { font-size: 0.9rem; color: #525252; margin: 1.5rem 0 0.5rem; }
.search input { width: 100%; padding: 0.5rem; box-sizing: border-box; }
.task { background: #fff; border: 1px solid #e5e5e5; border-radius: 0.5rem; padding: 0.75rem 1rem; margin-bottom: 0.75rem; }
.task header { display: flex; justify-content: space-between; align-items: baseline; }
.task h3 { font-size: 1rem; margin: 0; }
.value { font-weight: 600; color: #525252; }
.meta, .description { font-size: 0.8rem; color: #737373; }
.task form { display: grid; gap: 0.5rem; margin-top: 0.5rem; }
.pagination { display: flex; justify-content: center; gap: 1rem; margin: 1rem 0; }
.empty { color: #737373; }
"#;

/// Renders the full listing page.
pub fn render_index(page: &TaskPage, groups: &[TaskGroup], params: &ListParams) -> String {
    let mut body = String::new();
    if groups.is_empty() {
        body.push_str(r#"<p class="empty">No tasks found.</p>"#);
    }
    for group in groups {
        body.push_str(&render_group(group, params));
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Daily Progress</title>
<style>{style}</style>
</head>
<body>
<main>
<h1>Daily Progress Update</h1>
<form class="search" method="get" action="/">
<input type="search" name="search" value="{search}" placeholder="Search task name" autocomplete="off">
</form>
{body}
{pagination}
</main>
<script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        search = escape(&params.search),
        body = body,
        pagination = render_pagination(page, params),
        script = search_script(),
    )
}

fn render_group(group: &TaskGroup, params: &ListParams) -> String {
    let cards: String = group
        .tasks
        .iter()
        .map(|task| render_task(task, params))
        .collect();

    format!(
        r#"<section class="group" data-sub-category="{id}">
<h2>{title}</h2>
{cards}</section>
"#,
        id = group.sub_category_id,
        title = escape(&group.title()),
    )
}

fn render_task(row: &TaskRow, params: &ListParams) -> String {
    let task = &row.task;
    let value = format_value(row.progress_value());

    let meta = match &row.latest_progress {
        Some(latest) if latest.note.is_empty() => {
            format!("Latest progress: {}% on {}", format_value(latest.value), latest.date)
        }
        Some(latest) => format!(
            "Latest progress: {}% on {} ({})",
            format_value(latest.value),
            latest.date,
            escape(&latest.note)
        ),
        None => "No progress recorded yet".to_string(),
    };

    let description = if task.description.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="description">{}</p>"#, escape(&task.description))
    };

    format!(
        r#"<article class="task" id="task-{id}">
<header><h3>{name}</h3><span class="value">{value}%</span></header>
{description}
<p class="meta">{meta}</p>
<details>
<summary>Update progress</summary>
<form method="post" action="/progress">
<input type="hidden" name="task_id" value="{id}">
<input type="hidden" name="search" value="{search}">
<input type="hidden" name="page" value="{page}">
<input type="number" name="value" min="0" max="100" step="any" value="{value}" required placeholder="Latest progress">
<textarea name="note" placeholder="Today's progress note (optional)">{note}</textarea>
<button type="submit">Save</button>
</form>
</details>
</article>
"#,
        id = task.id,
        name = escape(&task.name),
        search = escape(&params.search),
        page = params.page,
        note = escape(row.latest_progress.as_ref().map_or("", |p| p.note.as_str())),
    )
}

/// Previous only off the first page; next only when another page exists.
fn render_pagination(page: &TaskPage, params: &ListParams) -> String {
    let mut links = String::new();
    if let Some(previous) = params.previous() {
        links.push_str(&format!(
            r#"<a rel="prev" href="{}">&larr; Previous</a>"#,
            escape(&list_url(&previous))
        ));
    }
    if page.has_next_page {
        links.push_str(&format!(
            r#"<a rel="next" href="{}">Next &rarr;</a>"#,
            escape(&list_url(&params.next()))
        ));
    }
    format!(r#"<nav class="pagination">{links}</nav>"#)
}

/// Submits the search form once typing pauses; the timer is cleared when
/// the page is torn down.
fn search_script() -> String {
    format!(
        r#"
(() => {{
  const form = document.querySelector("form.search");
  const input = form.querySelector("input[name=search]");
  let timer = null;
  input.addEventListener("input", () => {{
    clearTimeout(timer);
    timer = setTimeout(() => form.submit(), {SEARCH_DEBOUNCE_MS});
  }});
  window.addEventListener("pagehide", () => clearTimeout(timer));
}})();
"#
    )
}

/// Canonical listing URL; default parameters are left out.
pub fn list_url(params: &ListParams) -> String {
    match serde_urlencoded::to_string(params) {
        Ok(query) if !query.is_empty() => format!("/?{query}"),
        _ => "/".to_string(),
    }
}

fn format_value(value: f64) -> String {
    format!("{value}")
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
