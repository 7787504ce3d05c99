// src/services/order_service.rs
//
// Orquestra persistência e efeitos colaterais em volta do motor puro de
// ciclo de vida (services/lifecycle.rs): transações, notificações e as
// checagens de existência que precisam do banco.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        ClientRepository, EquipmentRepository, NotificationRepository, OrderRepository,
        UserRepository,
        order_repo::{NewServiceOrder, OrderFieldUpdates},
    },
    models::{
        auth::{Role, User},
        orders::{OrderPriority, OrderStatus, ServiceOrder, ServiceOrderDetail},
    },
    services::lifecycle,
};

// Entrada da abertura de ordem pelo balcão.
#[derive(Debug, Clone)]
pub struct OpenOrderInput {
    pub client_id: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub priority: OrderPriority,
    pub problem_description: Option<String>,
    pub device_condition: Option<String>,
    pub accessories: Option<String>,
    pub client_notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub estimated_completion: Option<DateTime<Utc>>,
}

// Entrada do assistente de solicitação do cliente: ou um equipamento já
// cadastrado, ou os dados para cadastrá-lo na hora.
#[derive(Debug, Clone)]
pub struct ClientRequestInput {
    pub equipment_id: Option<Uuid>,
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub problem_description: String,
    pub accessories: Option<String>,
    pub client_notes: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    client_repo: ClientRepository,
    equipment_repo: EquipmentRepository,
    user_repo: UserRepository,
    notification_repo: NotificationRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        client_repo: ClientRepository,
        equipment_repo: EquipmentRepository,
        user_repo: UserRepository,
        notification_repo: NotificationRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            client_repo,
            equipment_repo,
            user_repo,
            notification_repo,
            pool,
        }
    }

    // Número legível no formato ORD-<epoch-millis>. O índice único no banco
    // transforma uma colisão de mesmo milissegundo em erro visível em vez
    // de duplicata silenciosa.
    fn next_order_number(now: DateTime<Utc>) -> String {
        format!("ORD-{}", now.timestamp_millis())
    }

    fn generated_serial() -> String {
        let raw = Uuid::new_v4().simple().to_string();
        format!("EQ-{}", &raw[..8].to_uppercase())
    }

    // --- ABERTURA ---

    pub async fn open_order(
        &self,
        receptionist: &User,
        input: OpenOrderInput,
    ) -> Result<ServiceOrder, AppError> {
        if let Some(client_id) = input.client_id {
            self.client_repo
                .find_by_id(client_id)
                .await?
                .ok_or(AppError::ClientNotFound)?;
        }
        if let Some(equipment_id) = input.equipment_id {
            self.equipment_repo
                .find_by_id(equipment_id)
                .await?
                .ok_or(AppError::EquipmentNotFound)?;
        }

        let now = Utc::now();
        let data = NewServiceOrder {
            order_number: Self::next_order_number(now),
            priority: input.priority,
            client_id: input.client_id,
            technician_id: input.technician_id,
            receptionist_id: Some(receptionist.id),
            equipment_id: input.equipment_id,
            problem_description: input.problem_description,
            device_condition: input.device_condition,
            accessories: input.accessories,
            client_notes: input.client_notes,
            estimated_cost: input.estimated_cost,
            estimated_completion: input.estimated_completion,
            received_date: now,
        };

        let order = self.repo.create(&self.pool, &data).await?;
        tracing::info!("📋 Ordem {} aberta pela recepção", order.order_number);
        Ok(order)
    }

    // Assistente do cliente: registra o equipamento se preciso e abre a
    // ordem, tudo em uma transação.
    pub async fn open_client_request(
        &self,
        user: &User,
        input: ClientRequestInput,
    ) -> Result<ServiceOrder, AppError> {
        let client = self
            .client_repo
            .find_by_profile(user.id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let equipment_id = match input.equipment_id {
            Some(id) => {
                let equipment = self
                    .equipment_repo
                    .find_by_id(id)
                    .await?
                    .ok_or(AppError::EquipmentNotFound)?;
                // O cliente só abre solicitação para aparelho dele.
                if equipment.client_id != client.id {
                    return Err(AppError::Forbidden);
                }
                Some(id)
            }
            None => match input.equipment_type {
                Some(ref equipment_type) => {
                    let serial = input
                        .serial_number
                        .clone()
                        .unwrap_or_else(Self::generated_serial);
                    let equipment = self
                        .equipment_repo
                        .create(
                            &mut *tx,
                            client.id,
                            equipment_type,
                            input.brand.as_deref(),
                            input.model.as_deref(),
                            &serial,
                            None,
                        )
                        .await?;
                    Some(equipment.id)
                }
                None => None,
            },
        };

        let data = NewServiceOrder {
            order_number: Self::next_order_number(now),
            priority: OrderPriority::Medium,
            client_id: Some(client.id),
            technician_id: None,
            receptionist_id: None,
            equipment_id,
            problem_description: Some(input.problem_description),
            device_condition: None,
            accessories: input.accessories,
            client_notes: input.client_notes,
            estimated_cost: None,
            estimated_completion: None,
            received_date: now,
        };

        let order = self.repo.create(&mut *tx, &data).await?;
        tx.commit().await?;

        tracing::info!("📨 Solicitação do cliente virou a ordem {}", order.order_number);
        Ok(order)
    }

    // --- CONSULTA ---

    pub async fn get(&self, id: Uuid) -> Result<ServiceOrder, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::OrderNotFound)
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<ServiceOrderDetail, AppError> {
        let row = self
            .repo
            .find_detail(id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let allowed_next = lifecycle::allowed_next(&row.order.status).to_vec();
        Ok(ServiceOrderDetail {
            header: row.order,
            client_name: row.client_name,
            technician_name: row.technician_name,
            equipment_label: row.equipment_label,
            allowed_next,
        })
    }

    pub async fn list(
        &self,
        status: Option<&str>,
        technician_id: Option<Uuid>,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ServiceOrder>, AppError> {
        self.repo.list(status, technician_id, client_id).await
    }

    // O cliente lista apenas as próprias ordens.
    pub async fn list_for_client_user(&self, user: &User) -> Result<Vec<ServiceOrder>, AppError> {
        let client = self
            .client_repo
            .find_by_profile(user.id)
            .await?
            .ok_or(AppError::ClientNotFound)?;
        self.repo.list(None, None, Some(client.id)).await
    }

    // --- TRANSIÇÃO ---

    pub async fn transition(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<ServiceOrder, AppError> {
        let order = self.get(id).await?;

        // A validação e os efeitos de data são todos do motor puro; aqui só
        // persistimos o que ele devolveu.
        let updated = lifecycle::apply_transition(&order, new_status, Utc::now())?;

        let mut tx = self.pool.begin().await?;

        let saved = self
            .repo
            .update_status(
                &mut *tx,
                id,
                &updated.status,
                updated.completed_date,
                updated.delivered_date,
                updated.updated_at,
            )
            .await?
            .ok_or(AppError::OrderNotFound)?;

        // Avisa o cliente quando a ordem fica pronta ou é entregue.
        if matches!(new_status, OrderStatus::Completed | OrderStatus::Delivered) {
            if let Some(client_id) = saved.client_id {
                if let Some(client) = self.client_repo.find_by_id(client_id).await? {
                    if let Some(profile_id) = client.profile_id {
                        let (title, body) = match new_status {
                            OrderStatus::Completed => (
                                format!("Ordem {} concluída", saved.order_number),
                                "Seu equipamento está pronto para retirada.".to_string(),
                            ),
                            _ => (
                                format!("Ordem {} entregue", saved.order_number),
                                "Obrigado pela preferência!".to_string(),
                            ),
                        };
                        self.notification_repo
                            .create(&mut *tx, profile_id, &title, &body)
                            .await?;
                    }
                }
            }
        }

        tx.commit().await?;

        tracing::info!(
            "🔄 Ordem {}: {} -> {}",
            saved.order_number,
            order.status,
            saved.status
        );
        Ok(saved)
    }

    // --- DESIGNAÇÃO ---

    pub async fn assign_technician(
        &self,
        id: Uuid,
        technician_id: Option<Uuid>,
    ) -> Result<ServiceOrder, AppError> {
        let order = self.get(id).await?;

        if let Some(technician_id) = technician_id {
            let technician = self
                .user_repo
                .find_by_id(technician_id)
                .await?
                .ok_or(AppError::UserNotFound)?;
            if technician.role != Role::Technician {
                return Err(AppError::Forbidden);
            }
        }

        let updated = lifecycle::assign_technician(&order, technician_id, Utc::now());

        let mut tx = self.pool.begin().await?;
        let saved = self
            .repo
            .update_technician(&mut *tx, id, updated.technician_id, updated.updated_at)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if let Some(technician_id) = saved.technician_id {
            self.notification_repo
                .create(
                    &mut *tx,
                    technician_id,
                    &format!("Ordem {} atribuída a você", saved.order_number),
                    "Confira a fila de trabalho.",
                )
                .await?;
        }
        tx.commit().await?;

        Ok(saved)
    }

    pub async fn assign_receptionist(
        &self,
        id: Uuid,
        receptionist_id: Option<Uuid>,
    ) -> Result<ServiceOrder, AppError> {
        let order = self.get(id).await?;

        if let Some(receptionist_id) = receptionist_id {
            let receptionist = self
                .user_repo
                .find_by_id(receptionist_id)
                .await?
                .ok_or(AppError::UserNotFound)?;
            if !matches!(receptionist.role, Role::Receptionist | Role::Admin) {
                return Err(AppError::Forbidden);
            }
        }

        let updated = lifecycle::assign_receptionist(&order, receptionist_id, Utc::now());

        self.repo
            .update_receptionist(id, updated.receptionist_id, updated.updated_at)
            .await?
            .ok_or(AppError::OrderNotFound)
    }

    // --- EDIÇÃO E EXCLUSÃO ---

    pub async fn update_fields(
        &self,
        id: Uuid,
        updates: &OrderFieldUpdates,
    ) -> Result<ServiceOrder, AppError> {
        self.repo
            .update_fields(id, updates)
            .await?
            .ok_or(AppError::OrderNotFound)
    }

    // A trava central: nada de depender só de botão escondido na tela.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let order = self.get(id).await?;
        if !lifecycle::can_delete(&order) {
            return Err(AppError::OrderNotCancelled);
        }

        self.repo.delete(id).await?;
        tracing::info!("🗑️ Ordem {} excluída", order.order_number);
        Ok(())
    }
}
