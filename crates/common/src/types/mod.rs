use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Readiness probe body; `database` is omitted when the probe succeeds.
#[derive(Serialize, Debug)]
pub struct Readiness {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl Readiness {
    pub fn ready() -> Self {
        Self { status: "ready", database: None }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self { status: "unavailable", database: Some(reason.into()) }
    }
}
