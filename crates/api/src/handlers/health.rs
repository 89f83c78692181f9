/// Liveness probe
///
/// Never contacts Square.
pub async fn health() -> &'static str {
    "OK"
}
