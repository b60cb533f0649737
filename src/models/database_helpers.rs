#[derive(serde::Deserialize)]
pub struct CountResult {
    pub total: u64,
}
