pub async fn root_handler() -> &'static str {
    "URL Shortener API"
}
