// src/middleware/rbac.rs

use axum::http::{StatusCode, request::Parts};
use axum::extract::FromRequestParts;
use std::marker::PhantomData;

use crate::{common::error::ApiError, models::auth::{Role, User}};

/// 1. O Trait que define quem pode passar
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn describe() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário (inserido pelo auth_guard)
        let user = parts.extensions.get::<User>().ok_or(ApiError {
            status: StatusCode::UNAUTHORIZED,
            error: "Usuário não autenticado".into(),
            details: None,
        })?;

        // B. Verifica o papel carregado no próprio usuário.
        // Diferente de permissões granulares, os papéis são um conjunto
        // fechado, então não há consulta ao banco aqui.
        if !T::allows(user.role) {
            return Err(ApiError {
                status: StatusCode::FORBIDDEN,
                error: format!(
                    "Esta ação exige o papel '{}'.",
                    T::describe()
                ),
                details: None,
            });
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS REQUISITOS (TIPOS)
// ---

/// Qualquer membro da equipe (admin, técnico ou recepção).
pub struct StaffOnly;
impl RoleRequirement for StaffOnly {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Admin | Role::Technician | Role::Receptionist)
    }
    fn describe() -> &'static str { "equipe" }
}

pub struct AdminOnly;
impl RoleRequirement for AdminOnly {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Admin)
    }
    fn describe() -> &'static str { "admin" }
}

/// Recepção ou admin: abertura de ordens e cadastro de clientes no balcão.
pub struct ReceptionOnly;
impl RoleRequirement for ReceptionOnly {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Admin | Role::Receptionist)
    }
    fn describe() -> &'static str { "recepção" }
}

/// Apenas contas de cliente (o assistente de solicitação de serviço).
pub struct ClientOnly;
impl RoleRequirement for ClientOnly {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Client)
    }
    fn describe() -> &'static str { "cliente" }
}
