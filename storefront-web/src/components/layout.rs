//! Layout components - headers, cards, navigation, form controls

/// Renders a page header with title and optional subtitle.
///
/// Used at the top of main content areas to establish page context.
/// Callers escape any user-provided text.
pub fn page_header(title: &str, subtitle: Option<&str>, actions: Option<&str>) -> String {
    let subtitle_html = subtitle
        .map(|s| format!(r#"<p class="text-gray-400 mt-2">{s}</p>"#))
        .unwrap_or_default();

    let actions_html = actions
        .map(|a| format!(r#"<div class="flex items-center space-x-4">{a}</div>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="flex items-start justify-between mb-8">
            <div>
                <h1 class="text-3xl font-bold text-white">{title}</h1>
                {subtitle_html}
            </div>
            {actions_html}
        </div>"#
    )
}

/// Renders a card container with optional header.
pub fn card(title: Option<&str>, content: &str) -> String {
    let header_html = title
        .map(|t| format!(r#"<h3 class="text-lg font-semibold text-white mb-4">{t}</h3>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="bg-gray-800 border border-gray-700 rounded-lg p-6 mb-6">
            {header_html}
            {content}
        </div>"#
    )
}

/// Renders the main navigation bar, highlighting `active_page`.
pub fn nav_bar(active_page: &str) -> String {
    let nav_item = |href: &str, label: &str, page: &str| {
        let active_class = if page == active_page {
            "nav-active text-store-500 bg-store-500 bg-opacity-10"
        } else {
            "text-gray-300 hover:text-store-500 hover:bg-gray-700"
        };

        format!(
            r#"<a href="{href}" class="px-3 py-2 rounded-md text-sm font-medium transition-colors {active_class}">{label}</a>"#
        )
    };

    format!(
        r#"<nav class="bg-gray-800 border-b border-gray-700 sticky top-0 z-50">
            <div class="max-w-7xl mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <div class="flex items-center space-x-8">
                        <div class="text-2xl font-bold text-store-500">Storefront</div>
                        <div class="flex space-x-6">
                            {}
                            {}
                        </div>
                    </div>
                </div>
            </div>
        </nav>"#,
        nav_item("/", "Products", "products"),
        nav_item("/chat", "Chat", "chat")
    )
}

/// Renders a grid container with `columns` equal columns on large screens.
pub fn grid(columns: usize, content: &str) -> String {
    format!(
        r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-{columns} gap-6">{content}</div>"#
    )
}

/// Renders a button with Tailwind styling.
///
/// Variants: primary, secondary, danger, ghost.
pub fn button(text: &str, variant: &str, attributes: Option<&str>) -> String {
    let base_classes = "px-4 py-2 rounded-lg font-medium transition-colors focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-offset-gray-900 disabled:opacity-40 disabled:cursor-not-allowed";

    let variant_classes = match variant {
        "primary" => "bg-store-500 hover:bg-store-600 text-white focus:ring-store-500",
        "secondary" => "bg-gray-700 hover:bg-gray-600 text-white focus:ring-gray-500",
        "danger" => "bg-red-600 hover:bg-red-700 text-white focus:ring-red-500",
        "ghost" => "text-gray-300 hover:text-white hover:bg-gray-700 focus:ring-gray-500",
        _ => "bg-gray-600 hover:bg-gray-700 text-white focus:ring-gray-500",
    };

    let attrs = attributes.unwrap_or("");

    format!(r#"<button class="{base_classes} {variant_classes}" {attrs}>{text}</button>"#)
}

/// Renders a text input with Tailwind styling.
///
/// `value` is escaped.
pub fn input(name: &str, placeholder: &str, value: &str, attributes: Option<&str>) -> String {
    let attrs = attributes.unwrap_or("");
    let value = super::escape_html(value);

    format!(
        r#"<input type="text" name="{name}" placeholder="{placeholder}" value="{value}"
                  class="w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-store-500 focus:border-transparent"
                  {attrs} />"#
    )
}
