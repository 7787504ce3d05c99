// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Equipamento não encontrado")]
    EquipmentNotFound,

    #[error("Ordem de serviço não encontrada")]
    OrderNotFound,

    #[error("Peça não encontrada")]
    PartNotFound,

    #[error("Requisição de peça não encontrada")]
    RequestNotFound,

    #[error("Notificação não encontrada")]
    NotificationNotFound,

    // A ordem já está em um estado terminal e não aceita mais transições.
    #[error("Transição inválida: a ordem já está em '{current}'")]
    TerminalStatus { current: String },

    #[error("Transição de '{from}' para '{to}' não é permitida")]
    InvalidTransition { from: String, to: String },

    // Exclusão de ordem exige status `cancelled`.
    #[error("Apenas ordens canceladas podem ser excluídas")]
    OrderNotCancelled,

    #[error("A requisição não está pendente")]
    RequestNotPending,

    #[error("A requisição não está aprovada")]
    RequestNotApproved,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Corpo serializável que o front recebe. Handlers retornam Result<_, ApiError>
// e convertem com `.map_err(|e| e.to_api_error(&locale))`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::ClientNotFound
            | AppError::EquipmentNotFound
            | AppError::OrderNotFound
            | AppError::PartNotFound
            | AppError::RequestNotFound
            | AppError::NotificationNotFound => StatusCode::NOT_FOUND,
            AppError::TerminalStatus { .. }
            | AppError::InvalidTransition { .. }
            | AppError::OrderNotCancelled
            | AppError::RequestNotPending
            | AppError::RequestNotApproved
            | AppError::InsufficientStock => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Mensagens voltadas ao usuário final, no idioma do Accept-Language.
    // O conjunto é pequeno o suficiente para viver aqui em vez de num
    // catálogo externo.
    fn message(&self, lang: &str) -> String {
        match lang {
            "pt" => self.message_pt(),
            "es" => self.message_es(),
            _ => self.message_en(),
        }
    }

    fn message_pt(&self) -> String {
        match self {
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.".into(),
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".into(),
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".into(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".into(),
            AppError::Forbidden => "Você não tem permissão para esta ação.".into(),
            AppError::UserNotFound => "Usuário não encontrado.".into(),
            AppError::ClientNotFound => "Cliente não encontrado.".into(),
            AppError::EquipmentNotFound => "Equipamento não encontrado.".into(),
            AppError::OrderNotFound => "Ordem de serviço não encontrada.".into(),
            AppError::PartNotFound => "Peça não encontrada.".into(),
            AppError::RequestNotFound => "Requisição de peça não encontrada.".into(),
            AppError::NotificationNotFound => "Notificação não encontrada.".into(),
            AppError::TerminalStatus { current } => {
                format!("A ordem já foi encerrada como '{current}' e não aceita mudanças.")
            }
            AppError::InvalidTransition { from, to } => {
                format!("Não é possível mudar a ordem de '{from}' para '{to}'.")
            }
            AppError::OrderNotCancelled => {
                "Apenas ordens canceladas podem ser excluídas.".into()
            }
            AppError::RequestNotPending => "A requisição não está mais pendente.".into(),
            AppError::RequestNotApproved => "A requisição ainda não foi aprovada.".into(),
            AppError::InsufficientStock => "Estoque insuficiente para atender a requisição.".into(),
            _ => "Ocorreu um erro inesperado.".into(),
        }
    }

    fn message_es(&self) -> String {
        match self {
            AppError::ValidationError(_) => "Uno o más campos son inválidos.".into(),
            AppError::EmailAlreadyExists => "Este correo ya está en uso.".into(),
            AppError::InvalidCredentials => "Correo o contraseña inválidos.".into(),
            AppError::InvalidToken => "Token de autenticación inválido o ausente.".into(),
            AppError::Forbidden => "No tienes permiso para esta acción.".into(),
            AppError::UserNotFound => "Usuario no encontrado.".into(),
            AppError::ClientNotFound => "Cliente no encontrado.".into(),
            AppError::EquipmentNotFound => "Equipo no encontrado.".into(),
            AppError::OrderNotFound => "Orden de servicio no encontrada.".into(),
            AppError::PartNotFound => "Repuesto no encontrado.".into(),
            AppError::RequestNotFound => "Solicitud de repuesto no encontrada.".into(),
            AppError::NotificationNotFound => "Notificación no encontrada.".into(),
            AppError::TerminalStatus { current } => {
                format!("La orden ya fue cerrada como '{current}' y no acepta cambios.")
            }
            AppError::InvalidTransition { from, to } => {
                format!("No se puede cambiar la orden de '{from}' a '{to}'.")
            }
            AppError::OrderNotCancelled => {
                "Solo las órdenes canceladas pueden eliminarse.".into()
            }
            AppError::RequestNotPending => "La solicitud ya no está pendiente.".into(),
            AppError::RequestNotApproved => "La solicitud aún no fue aprobada.".into(),
            AppError::InsufficientStock => "Stock insuficiente para atender la solicitud.".into(),
            _ => "Ocurrió un error inesperado.".into(),
        }
    }

    fn message_en(&self) -> String {
        match self {
            AppError::ValidationError(_) => "One or more fields are invalid.".into(),
            AppError::EmailAlreadyExists => "This e-mail is already in use.".into(),
            AppError::InvalidCredentials => "Invalid e-mail or password.".into(),
            AppError::InvalidToken => "Missing or invalid authentication token.".into(),
            AppError::Forbidden => "You are not allowed to perform this action.".into(),
            AppError::UserNotFound => "User not found.".into(),
            AppError::ClientNotFound => "Client not found.".into(),
            AppError::EquipmentNotFound => "Equipment not found.".into(),
            AppError::OrderNotFound => "Service order not found.".into(),
            AppError::PartNotFound => "Part not found.".into(),
            AppError::RequestNotFound => "Part request not found.".into(),
            AppError::NotificationNotFound => "Notification not found.".into(),
            AppError::TerminalStatus { current } => {
                format!("The order was already closed as '{current}' and cannot change.")
            }
            AppError::InvalidTransition { from, to } => {
                format!("Cannot move the order from '{from}' to '{to}'.")
            }
            AppError::OrderNotCancelled => "Only cancelled orders can be deleted.".into(),
            AppError::RequestNotPending => "The request is no longer pending.".into(),
            AppError::RequestNotApproved => "The request has not been approved yet.".into(),
            AppError::InsufficientStock => "Not enough stock to fulfill the request.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }

    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        // Erros de validação carregam o detalhe campo a campo.
        if let AppError::ValidationError(ref errors) = self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            return ApiError {
                status: StatusCode::BAD_REQUEST,
                error: self.message(&locale.0),
                details: Some(json!(details)),
            };
        }

        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log; o usuário recebe a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError {
            status,
            error: self.message(&locale.0),
            details: None,
        }
    }
}

// Usado pelos middlewares/extratores, que não têm Locale em mãos:
// responde com a mensagem padrão em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale("en".to_string())).into_response()
    }
}
