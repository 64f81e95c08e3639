use serde::Serialize;

/// Liveness payload returned by `/health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Error envelope shared by every failing JSON response: `{"erro": "..."}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub erro: String,
}

/// Success envelope for update/delete responses: `{"mensagem": "..."}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub mensagem: String,
}
