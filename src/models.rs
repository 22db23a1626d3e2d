/// Data for the /v1/models endpoint.
/// This endpoint mimics the openai API's models endpoint. The stub server serves exactly one
/// model: the configured default, which requests without a `model` field fall back to.
use serde::{Deserialize, Serialize};

/// The returned models from the /v1/models endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct Model {
    /// The model identifier, which can be referenced in the API endpoints.
    pub(crate) id: String,
    /// The Unix timestamp (in seconds) when the model was created.
    pub(crate) created: Option<u32>,
    /// The object type, which is always "model".
    pub(crate) object: String,
    /// The organization that owns the model.
    pub(crate) owned_by: String,
}

impl Model {
    pub(crate) fn local(id: &str) -> Self {
        Model {
            id: id.to_owned(),
            created: None,
            object: "model".into(),
            owned_by: "tenstorrent".into(),
        }
    }
}

/// The response from the /v1/models endpoint, which is a list of models.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct ListModelResponse {
    /// The object type, which is always "list".
    pub object: String,
    /// A list of model objects.
    pub data: Vec<Model>,
}

impl ListModelResponse {
    pub(crate) fn from_default_model(model: &str) -> Self {
        ListModelResponse {
            object: "list".into(),
            data: vec![Model::local(model)],
        }
    }
}
