use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>linkcast</title>
</head>
<body>
    <h1>Latest link:</h1>
    <a href="#" id="output" style="font-family: monospace; font-size: 1.5em;"></a>

    <script>
        const output = document.getElementById("output");
        const eventSource = new EventSource("/events");

        eventSource.onmessage = function(event) {
            output.textContent = event.data;
            output.href = event.data;
        };

        eventSource.onerror = function(err) {
            console.error("EventSource failed:", err);
            eventSource.close();
        };
    </script>
</body>
</html>
"##;

/// GET the page that subscribes to `/events` and shows the latest link
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}
