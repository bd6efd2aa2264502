// Page shell rendering
use crate::application::dashboard_service::WidgetSummary;
use crate::domain::dashboard::Page;
use crate::infrastructure::template::{escape_html, fill_template};
use std::collections::HashMap;

const PAGE_TEMPLATE: &str = include_str!("../../templates/page.html");

pub fn render_page_html(page: &Page, widgets: &[WidgetSummary], static_url: &str) -> String {
    let sections: String = widgets.iter().map(widget_section).collect();

    let mut vars = HashMap::new();
    vars.insert("title", escape_html(&page.title));
    vars.insert("static_url", escape_html(static_url.trim_end_matches('/')));
    vars.insert("widgets", sections);
    fill_template(PAGE_TEMPLATE, &vars)
}

fn widget_section(widget: &WidgetSummary) -> String {
    let refresh = widget
        .refresh_ms
        .map(|ms| format!(" data-refresh-ms=\"{}\"", ms))
        .unwrap_or_default();
    format!(
        "<section class=\"widget\" data-widget-id=\"{id}\"{refresh}>\n  <h2>{title}</h2>\n  <div class=\"widget-controls\"></div>\n  <div class=\"widget-outputs\"></div>\n</section>\n",
        id = escape_html(&widget.id),
        title = escape_html(&widget.title),
    )
}
