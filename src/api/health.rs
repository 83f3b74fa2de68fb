/// GET /health - liveness probe, no upstream checks.
pub async fn health() -> &'static str {
    "OK"
}
