//! Notification and empty-state components

/// Renders a notification toast
pub fn notification_toast(message: &str, toast_type: &str, dismissible: bool) -> String {
    let (bg_class, border_class, icon) = match toast_type {
        "success" => ("bg-green-800", "border-green-600", "✓"),
        "error" => ("bg-red-800", "border-red-600", "✗"),
        "warning" => ("bg-yellow-800", "border-yellow-600", "!"),
        "info" => ("bg-blue-800", "border-blue-600", "i"),
        _ => ("bg-gray-800", "border-gray-600", "•"),
    };

    let dismiss_button = if dismissible {
        r#"<button class="ml-4 text-gray-400 hover:text-white" onclick="this.parentElement.remove()">
            <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"></path>
            </svg>
        </button>"#
    } else {
        ""
    };

    let message = super::escape_html(message);
    format!(
        r#"<div class="flex items-center p-4 mb-4 border rounded-lg {bg_class} {border_class} fadeInDown" role="alert" data-toast="{toast_type}">
            <span class="mr-3">{icon}</span>
            <span class="flex-1 text-sm text-white">{message}</span>
            {dismiss_button}
        </div>"#
    )
}

/// Renders a centered placeholder for empty lists
pub fn empty_state(icon: &str, title: &str, hint: Option<&str>) -> String {
    let hint_html = hint
        .map(|h| format!(r#"<p class="text-gray-500 text-sm mt-1">{h}</p>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="text-center py-12">
                <div class="text-4xl mb-2">{icon}</div>
                <p class="text-gray-400">{title}</p>
                {hint_html}
            </div>"#
    )
}
