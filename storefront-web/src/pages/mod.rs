//! Full page handlers using component system
//!
//! Pages compose multiple components into complete HTML responses.
//! All pages use the same base layout with HTMX and Tailwind CSS.

use axum::response::Html;

use crate::components::layout;

pub mod chat;
pub mod products;

// Re-export page handlers
pub use chat::chat_page;
pub use products::products_page;

/// Wraps page content in the base layout with navigation.
pub fn render_page(title: &str, active_nav: &str, content: &str) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
        <html lang="en">
        <head>
            <title>{} - Storefront</title>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <script src="https://cdn.tailwindcss.com"></script>
            <script src="https://unpkg.com/htmx.org@1.9.10"></script>
            <script>
                tailwind.config = {{
                    darkMode: 'class',
                    theme: {{
                        extend: {{
                            colors: {{
                                'store': {{
                                    50: '#fff7ed',
                                    400: '#fb923c',
                                    500: '#f97316',
                                    600: '#ea580c',
                                    900: '#0a0a0a'
                                }}
                            }}
                        }}
                    }}
                }}
            </script>
            <style>
                .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
                .htmx-request .htmx-indicator {{ opacity: 1; }}
                .htmx-request.htmx-indicator {{ opacity: 1; }}

                .fadeInDown {{
                    animation: fadeInDown 0.3s ease-out;
                }}

                @keyframes fadeInDown {{
                    from {{ opacity: 0; transform: translateY(-10px); }}
                    to {{ opacity: 1; transform: translateY(0); }}
                }}
            </style>
        </head>
        <body class="bg-gray-900 text-white min-h-screen font-sans">
            {}

            <main class="max-w-7xl mx-auto px-4 py-8">
                {}
            </main>
        </body>
        </html>"#,
        title,
        layout::nav_bar(active_nav),
        content
    );

    Html(html)
}
