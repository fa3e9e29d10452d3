use serde::{Deserialize, Deserializer};

/// A workflow as returned by `GET /api/v1/workflows`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkflowRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// Envelope of the workflow listing endpoint
#[derive(Debug, Deserialize)]
pub struct WorkflowList {
    pub data: Vec<WorkflowRecord>,
    /// Set when more pages are available
    #[serde(default, rename = "nextCursor")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedWorkflow {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

/// Body of a successful `POST /api/v1/workflows`.
///
/// Older n8n releases wrap the created workflow in `data`, newer ones return it bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateResponse {
    Wrapped { data: CreatedWorkflow },
    Bare(CreatedWorkflow),
}

impl CreateResponse {
    pub fn into_id(self) -> String {
        match self {
            CreateResponse::Wrapped { data } | CreateResponse::Bare(data) => data.id,
        }
    }
}

// n8n used numeric ids before 1.0 and string ids after
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
