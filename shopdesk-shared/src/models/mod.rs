pub mod bulk;
pub mod catalog;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
