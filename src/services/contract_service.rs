//! Contract Service - contract CRUD with change history, no HTTP layer
//!
//! Child collections are replaced wholesale on update. Everything an update
//! touches, including its history records, goes through one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::domain::contract::{
    ChecklistItemInput, CreateContractInput, DeadlineInput, KpiInput, ProofOfUseInput,
    ReportDutyInput, RevenuePlanInput, UpdateContractInput, normalize_amount, normalize_text,
    optional_date, require_date,
};
use crate::history::{
    ChecklistEntry, DeadlineItem, HistoryContext, HistoryRecorder, KpiItem, ProofOfUseEntry,
    ReferenceNames, ReportDutyItem, RevenuePlanItem,
};
use crate::models::deadline::REFUND_DEADLINE_LABEL;
use crate::models::{
    UserSummary, checklist_item, contract, contract_kpi, contract_type, deadline, kpi_history,
    kpi_type, proof_of_use_item, report_duty, revenue_plan_entry, user,
};
use crate::services::checklist::default_checklist;
use crate::services::permissions::{Actor, can_view_all_contracts};
use crate::services::status::{
    DeadlineStatus, KpiStatus, days_until, deadline_status, kpi_progress, kpi_status,
};

pub const VAT_RATE: f64 = 0.19;

/// Number of KPI history rows shown with a single contract
const KPI_HISTORY_PREVIEW: u64 = 10;

/// Filter parameters for listing contracts
#[derive(Debug, Default, Clone)]
pub struct ContractFilter {
    pub status: Option<String>,
    pub type_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeadlineView {
    #[serde(flatten)]
    pub deadline: deadline::Model,
    pub type_label: String,
    pub deadline_status: DeadlineStatus,
    pub days_until: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiView {
    #[serde(flatten)]
    pub kpi: contract_kpi::Model,
    pub kpi_type: Option<kpi_type::Model>,
    pub progress: i64,
    pub traffic_light: KpiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<kpi_history::Model>>,
}

/// A contract with everything hanging off it
#[derive(Debug, Clone, Serialize)]
pub struct ContractDetails {
    #[serde(flatten)]
    pub contract: contract::Model,
    pub status_text: String,
    #[serde(rename = "type")]
    pub contract_type: Option<contract_type::Model>,
    pub created_by: Option<UserSummary>,
    pub deadlines: Vec<DeadlineView>,
    pub kpis: Vec<KpiView>,
    pub revenue_plan: Vec<revenue_plan_entry::Model>,
    pub report_duties: Vec<report_duty::Model>,
    pub proof_of_use_items: Vec<proof_of_use_item::Model>,
    pub checklist_items: Vec<checklist_item::Model>,
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Net, tax and gross revenue; zero or missing net clears all three
pub fn derive_revenue(net: Option<f64>) -> (Option<f64>, Option<f64>, Option<f64>) {
    match normalize_amount(net) {
        Some(net) => (
            Some(net),
            Some(round_cents(net * VAT_RATE)),
            Some(round_cents(net * (1.0 + VAT_RATE))),
        ),
        None => (None, None, None),
    }
}

fn is_refund_deadline(input: &DeadlineInput) -> bool {
    input.deadline_type == "SONSTIGES" && input.custom_label.as_deref() == Some(REFUND_DEADLINE_LABEL)
}

/// Deadlines to store: the supplied ones plus a refund deadline when the
/// contract has a refund date and the list does not carry one yet.
pub fn with_refund_deadline(
    mut deadlines: Vec<DeadlineInput>,
    refund_date: Option<DateTime<Utc>>,
) -> Vec<DeadlineInput> {
    if let Some(date) = refund_date
        && !deadlines.iter().any(is_refund_deadline)
    {
        deadlines.push(DeadlineInput {
            deadline_type: "SONSTIGES".to_owned(),
            custom_label: Some(REFUND_DEADLINE_LABEL.to_owned()),
            due_date: date.to_rfc3339(),
            reminder_days: 30,
            notify_email: None,
            is_completed: false,
        });
    }
    deadlines
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List contracts visible to `actor`, ordered by status then termination date
pub async fn list_contracts(
    db: &DatabaseConnection,
    actor: Actor,
    filter: ContractFilter,
) -> Result<Vec<ContractDetails>, DomainError> {
    let mut condition = Condition::all();

    if let Some(status) = filter.status {
        condition = condition.add(contract::Column::Status.eq(status));
    }

    if let Some(type_id) = filter.type_id {
        condition = condition.add(contract::Column::TypeId.eq(type_id));
    }

    if !can_view_all_contracts(actor.role) {
        condition = condition.add(contract::Column::CreatedById.eq(actor.user_id));
    }

    let contracts = contract::Entity::find()
        .filter(condition)
        .order_by_asc(contract::Column::Status)
        .order_by_asc(contract::Column::TerminationDate)
        .all(db)
        .await?;

    let today = Utc::now().date_naive();
    let mut result = Vec::with_capacity(contracts.len());
    for c in contracts {
        result.push(load_details(db, c, today, false).await?);
    }

    Ok(result)
}

/// Load one contract the actor may see
pub async fn get_contract(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
) -> Result<ContractDetails, DomainError> {
    let contract = find_visible(db, actor, id).await?;
    load_details(db, contract, Utc::now().date_naive(), true).await
}

/// Fetch a contract and check read access
pub async fn find_visible<C: ConnectionTrait>(
    conn: &C,
    actor: Actor,
    id: i32,
) -> Result<contract::Model, DomainError> {
    let contract = contract::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound)?;

    if !actor.can_view(contract.created_by_id) {
        return Err(DomainError::Forbidden);
    }

    Ok(contract)
}

async fn load_details<C: ConnectionTrait>(
    conn: &C,
    contract: contract::Model,
    today: NaiveDate,
    with_kpi_history: bool,
) -> Result<ContractDetails, DomainError> {
    let id = contract.id;

    let contract_type = contract_type::Entity::find_by_id(contract.type_id)
        .one(conn)
        .await?;
    let created_by = user::Entity::find_by_id(contract.created_by_id)
        .one(conn)
        .await?
        .as_ref()
        .map(UserSummary::from);

    let deadlines = deadline::Entity::find()
        .filter(deadline::Column::ContractId.eq(id))
        .order_by_asc(deadline::Column::DueDate)
        .all(conn)
        .await?
        .into_iter()
        .map(|d| {
            let (status, days) = deadline_status(d.due_date, d.is_completed, today);
            DeadlineView {
                type_label: deadline::deadline_type_label(&d.deadline_type).to_owned(),
                deadline_status: status,
                days_until: days,
                deadline: d,
            }
        })
        .collect();

    let kpi_rows = contract_kpi::Entity::find()
        .filter(contract_kpi::Column::ContractId.eq(id))
        .order_by_asc(contract_kpi::Column::Id)
        .find_also_related(kpi_type::Entity)
        .all(conn)
        .await?;

    let mut kpis = Vec::with_capacity(kpi_rows.len());
    for (kpi, kpi_type) in kpi_rows {
        let history = if with_kpi_history {
            Some(
                kpi_history::Entity::find()
                    .filter(kpi_history::Column::ContractKpiId.eq(kpi.id))
                    .order_by_desc(kpi_history::Column::ChangedAt)
                    .limit(KPI_HISTORY_PREVIEW)
                    .all(conn)
                    .await?,
            )
        } else {
            None
        };
        kpis.push(kpi_view(kpi, kpi_type, history, today));
    }

    let revenue_plan = revenue_plan_entry::Entity::find()
        .filter(revenue_plan_entry::Column::ContractId.eq(id))
        .order_by_asc(revenue_plan_entry::Column::SortOrder)
        .all(conn)
        .await?;

    let report_duties = report_duty::Entity::find()
        .filter(report_duty::Column::ContractId.eq(id))
        .order_by_asc(report_duty::Column::SortOrder)
        .all(conn)
        .await?;

    let proof_of_use_items = proof_of_use_item::Entity::find()
        .filter(proof_of_use_item::Column::ContractId.eq(id))
        .order_by_asc(proof_of_use_item::Column::SequenceNumber)
        .all(conn)
        .await?;

    let checklist_items = checklist_item::Entity::find()
        .filter(checklist_item::Column::ContractId.eq(id))
        .order_by_asc(checklist_item::Column::SortOrder)
        .all(conn)
        .await?;

    Ok(ContractDetails {
        status_text: contract::status_text(&contract.status).to_owned(),
        contract,
        contract_type,
        created_by,
        deadlines,
        kpis,
        revenue_plan,
        report_duties,
        proof_of_use_items,
        checklist_items,
    })
}

pub fn kpi_view(
    kpi: contract_kpi::Model,
    kpi_type: Option<kpi_type::Model>,
    history: Option<Vec<kpi_history::Model>>,
    today: NaiveDate,
) -> KpiView {
    let progress = kpi_progress(kpi.current_value, kpi.target_value);
    let days_left = kpi.due_date.map(|d| days_until(d, today));
    KpiView {
        traffic_light: kpi_status(progress, days_left),
        progress,
        kpi,
        kpi_type,
        history,
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Create a contract with all its child rows. No history is recorded.
pub async fn create_contract(
    db: &DatabaseConnection,
    actor: Actor,
    input: CreateContractInput,
) -> Result<ContractDetails, DomainError> {
    input.validate()?;

    let txn = db.begin().await?;

    let contract_number = input.contract_number.trim().to_owned();
    let taken = || format!("contract number '{}' already taken", contract_number);
    let existing = contract::Entity::find()
        .filter(contract::Column::ContractNumber.eq(contract_number.as_str()))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(DomainError::Conflict(taken()));
    }

    ensure_contract_type(&txn, input.type_id).await?;
    ensure_kpi_types(&txn, &input.kpis).await?;

    let now = Utc::now();
    let refund_deadline = optional_date("refund_deadline", input.refund_deadline.as_deref())?;
    let (revenue_net, revenue_tax, revenue_gross) = derive_revenue(input.revenue_net);

    let model = contract::ActiveModel {
        contract_number: Set(contract_number.clone()),
        title: Set(input.title),
        title_short: Set(normalize_text(input.title_short)),
        partner: Set(input.partner),
        description: Set(normalize_text(input.description)),
        esf_number: Set(normalize_text(input.esf_number)),
        client: Set(normalize_text(input.client)),
        project_lead: Set(normalize_text(input.project_lead)),
        company: Set(normalize_text(input.company)),
        cost_center: Set(normalize_text(input.cost_center)),
        basis_document: Set(normalize_text(input.basis_document)),
        data_matches_contract: Set(input.data_matches_contract),
        type_id: Set(input.type_id),
        start_date: Set(require_date("start_date", &input.start_date)?),
        end_date: Set(optional_date("end_date", input.end_date.as_deref())?),
        termination_date: Set(optional_date(
            "termination_date",
            input.termination_date.as_deref(),
        )?),
        notice_period_days: Set(input.notice_period_days),
        revenue_net: Set(revenue_net),
        revenue_tax: Set(revenue_tax),
        revenue_gross: Set(revenue_gross),
        payment_method: Set(normalize_text(input.payment_method)),
        value: Set(normalize_amount(input.value)),
        currency: Set(input.currency),
        payment_interval: Set(normalize_text(input.payment_interval)),
        status: Set(input.status),
        auto_renewal: Set(input.auto_renewal),
        reports_linked_to_payment: Set(input.reports_linked_to_payment),
        additional_obligations: Set(normalize_text(input.additional_obligations)),
        refund_deadline: Set(refund_deadline),
        proof_of_use_required: Set(input.proof_of_use_required),
        proof_of_use_remarks: Set(normalize_text(input.proof_of_use_remarks)),
        notes: Set(normalize_text(input.notes)),
        document_path: Set(None),
        reminder_days: Set(input.reminder_days),
        reminder_sent: Set(false),
        created_by_id: Set(actor.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| DomainError::from_write(e, taken))?;

    let id = model.id;
    let deadlines = with_refund_deadline(input.deadlines, refund_deadline);
    let checklist = input.checklist_items.unwrap_or_else(default_checklist);

    insert_deadlines(&txn, id, &deadlines, now).await?;
    insert_kpis(&txn, id, &input.kpis, now).await?;
    insert_revenue_plan(&txn, id, &input.revenue_plan).await?;
    insert_report_duties(&txn, id, &input.report_duties).await?;
    insert_proof_of_use(&txn, id, &input.proof_of_use_items).await?;
    insert_checklist(&txn, id, &checklist, now).await?;

    txn.commit().await?;

    tracing::info!(
        "Contract {} ({}) created by user {}",
        model.contract_number,
        id,
        actor.user_id
    );

    load_details(db, model, now.date_naive(), true).await
}

/// Apply a partial update and record what changed.
///
/// Runs in a single transaction: the contract row, replaced child lists and
/// history records are committed together or not at all.
pub async fn update_contract(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    input: UpdateContractInput,
) -> Result<ContractDetails, DomainError> {
    input.validate()?;

    let txn = db.begin().await?;

    let existing = contract::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound)?;
    if !actor.can_edit(existing.created_by_id) {
        return Err(DomainError::Forbidden);
    }

    if let Some(type_id) = input.type_id {
        ensure_contract_type(&txn, type_id).await?;
    }
    if let Some(kpis) = &input.kpis {
        ensure_kpi_types(&txn, kpis).await?;
    }

    let now = Utc::now();
    let ctx = HistoryContext::new(id, actor.user_id, now);
    let old_snapshot = existing.snapshot();

    // Relation state before the replace, only for lists the payload carries
    let old_deadlines = match input.deadlines {
        Some(_) => Some(deadline_items(&txn, id).await?),
        None => None,
    };
    let old_kpis = match input.kpis {
        Some(_) => Some(kpi_items(&txn, id).await?),
        None => None,
    };
    let old_revenue = match input.revenue_plan {
        Some(_) => Some(revenue_items(&txn, id).await?),
        None => None,
    };
    let old_duties = match input.report_duties {
        Some(_) => Some(report_duty_items(&txn, id).await?),
        None => None,
    };
    let old_proofs = match input.proof_of_use_items {
        Some(_) => Some(proof_items(&txn, id).await?),
        None => None,
    };
    let old_checklist = match input.checklist_items {
        Some(_) => Some(checklist_entries(&txn, id).await?),
        None => None,
    };

    let mut active: contract::ActiveModel = existing.into();
    apply_update(&mut active, &input)?;
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    let mut recorder = HistoryRecorder::new(ctx);
    let names = reference_names(&txn).await?;
    recorder.fields(&old_snapshot, &updated.snapshot(), &names);

    if let (Some(list), Some(old)) = (input.deadlines, old_deadlines) {
        replace_deadlines(&txn, id, with_refund_deadline(list, updated.refund_deadline), now).await?;
        recorder.relation(&old, &deadline_items(&txn, id).await?);
    }
    if let (Some(list), Some(old)) = (input.kpis, old_kpis) {
        contract_kpi::Entity::delete_many()
            .filter(contract_kpi::Column::ContractId.eq(id))
            .exec(&txn)
            .await?;
        insert_kpis(&txn, id, &list, now).await?;
        recorder.relation(&old, &kpi_items(&txn, id).await?);
    }
    if let (Some(list), Some(old)) = (input.revenue_plan, old_revenue) {
        revenue_plan_entry::Entity::delete_many()
            .filter(revenue_plan_entry::Column::ContractId.eq(id))
            .exec(&txn)
            .await?;
        insert_revenue_plan(&txn, id, &list).await?;
        recorder.relation(&old, &revenue_items(&txn, id).await?);
    }
    if let (Some(list), Some(old)) = (input.report_duties, old_duties) {
        report_duty::Entity::delete_many()
            .filter(report_duty::Column::ContractId.eq(id))
            .exec(&txn)
            .await?;
        insert_report_duties(&txn, id, &list).await?;
        recorder.relation(&old, &report_duty_items(&txn, id).await?);
    }
    if let (Some(list), Some(old)) = (input.proof_of_use_items, old_proofs) {
        proof_of_use_item::Entity::delete_many()
            .filter(proof_of_use_item::Column::ContractId.eq(id))
            .exec(&txn)
            .await?;
        insert_proof_of_use(&txn, id, &list).await?;
        recorder.relation(&old, &proof_items(&txn, id).await?);
    }
    if let (Some(list), Some(old)) = (input.checklist_items, old_checklist) {
        checklist_item::Entity::delete_many()
            .filter(checklist_item::Column::ContractId.eq(id))
            .exec(&txn)
            .await?;
        insert_checklist(&txn, id, &list, now).await?;
        recorder.relation(&old, &checklist_entries(&txn, id).await?);
    }

    let recorded = recorder.flush(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "Contract {} updated by user {} ({} changes)",
        id,
        actor.user_id,
        recorded
    );

    load_details(db, updated, now.date_naive(), true).await
}

/// Delete a contract; children and history go with it
pub async fn delete_contract(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
) -> Result<(), DomainError> {
    let existing = contract::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    if !actor.can_delete(existing.created_by_id) {
        return Err(DomainError::Forbidden);
    }

    contract::Entity::delete_by_id(id).exec(db).await?;
    tracing::info!("Contract {} deleted by user {}", id, actor.user_id);

    Ok(())
}

fn apply_update(
    active: &mut contract::ActiveModel,
    input: &UpdateContractInput,
) -> Result<(), DomainError> {
    if let Some(v) = &input.title {
        active.title = Set(v.clone());
    }
    if let Some(v) = &input.title_short {
        active.title_short = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.partner {
        active.partner = Set(v.clone());
    }
    if let Some(v) = &input.description {
        active.description = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.esf_number {
        active.esf_number = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.client {
        active.client = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.project_lead {
        active.project_lead = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.company {
        active.company = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.cost_center {
        active.cost_center = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.basis_document {
        active.basis_document = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = input.data_matches_contract {
        active.data_matches_contract = Set(v);
    }
    if let Some(v) = input.type_id {
        active.type_id = Set(v);
    }
    if let Some(v) = &input.start_date {
        active.start_date = Set(require_date("start_date", v)?);
    }
    if let Some(v) = &input.end_date {
        active.end_date = Set(optional_date("end_date", Some(v))?);
    }
    if let Some(v) = &input.termination_date {
        active.termination_date = Set(optional_date("termination_date", Some(v))?);
    }
    if let Some(v) = input.notice_period_days {
        active.notice_period_days = Set(v);
    }
    if let Some(v) = input.value {
        active.value = Set(normalize_amount(Some(v)));
    }
    if let Some(v) = &input.currency {
        active.currency = Set(v.clone());
    }
    if let Some(v) = &input.payment_interval {
        active.payment_interval = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.status {
        active.status = Set(v.clone());
    }
    if let Some(v) = input.auto_renewal {
        active.auto_renewal = Set(v);
    }
    if input.revenue_net.is_some() {
        let (net, tax, gross) = derive_revenue(input.revenue_net);
        active.revenue_net = Set(net);
        active.revenue_tax = Set(tax);
        active.revenue_gross = Set(gross);
    }
    if let Some(v) = &input.payment_method {
        active.payment_method = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = input.reports_linked_to_payment {
        active.reports_linked_to_payment = Set(v);
    }
    if let Some(v) = &input.additional_obligations {
        active.additional_obligations = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.refund_deadline {
        active.refund_deadline = Set(optional_date("refund_deadline", Some(v))?);
    }
    if let Some(v) = input.proof_of_use_required {
        active.proof_of_use_required = Set(v);
    }
    if let Some(v) = &input.proof_of_use_remarks {
        active.proof_of_use_remarks = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = &input.notes {
        active.notes = Set(normalize_text(Some(v.clone())));
    }
    if let Some(v) = input.reminder_days {
        active.reminder_days = Set(v);
    }
    Ok(())
}

async fn ensure_contract_type<C: ConnectionTrait>(conn: &C, type_id: i32) -> Result<(), DomainError> {
    if contract_type::Entity::find_by_id(type_id).one(conn).await?.is_none() {
        return Err(DomainError::Validation(format!(
            "unknown contract type {}",
            type_id
        )));
    }
    Ok(())
}

async fn ensure_kpi_types<C: ConnectionTrait>(conn: &C, kpis: &[KpiInput]) -> Result<(), DomainError> {
    for kpi in kpis {
        if kpi_type::Entity::find_by_id(kpi.kpi_type_id).one(conn).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "unknown KPI type {}",
                kpi.kpi_type_id
            )));
        }
    }
    Ok(())
}

async fn reference_names<C: ConnectionTrait>(conn: &C) -> Result<ReferenceNames, DbErr> {
    let types = contract_type::Entity::find().all(conn).await?;
    Ok(ReferenceNames::new().with_table("type_id", types.into_iter().map(|t| (t.id, t.name))))
}

// ---------------------------------------------------------------------------
// Child rows
// ---------------------------------------------------------------------------

async fn insert_all<E, A, C>(conn: &C, rows: Vec<A>) -> Result<(), DbErr>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E>,
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(());
    }
    E::insert_many(rows).exec(conn).await?;
    Ok(())
}

async fn replace_deadlines<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    deadlines: Vec<DeadlineInput>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    deadline::Entity::delete_many()
        .filter(deadline::Column::ContractId.eq(contract_id))
        .exec(conn)
        .await?;
    insert_deadlines(conn, contract_id, &deadlines, now).await
}

async fn insert_deadlines<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    deadlines: &[DeadlineInput],
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    let mut rows = Vec::with_capacity(deadlines.len());
    for d in deadlines {
        rows.push(deadline::ActiveModel {
            contract_id: Set(contract_id),
            deadline_type: Set(d.deadline_type.clone()),
            custom_label: Set(normalize_text(d.custom_label.clone())),
            due_date: Set(require_date("deadline due_date", &d.due_date)?),
            reminder_days: Set(d.reminder_days),
            notify_email: Set(normalize_text(d.notify_email.clone())),
            is_completed: Set(d.is_completed),
            completed_at: Set(d.is_completed.then_some(now)),
            reminder_sent: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
    }
    insert_all(conn, rows).await?;
    Ok(())
}

async fn insert_kpis<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    kpis: &[KpiInput],
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    let mut rows = Vec::with_capacity(kpis.len());
    for k in kpis {
        rows.push(contract_kpi::ActiveModel {
            contract_id: Set(contract_id),
            kpi_type_id: Set(k.kpi_type_id),
            target_value: Set(k.target_value),
            current_value: Set(k.current_value),
            due_date: Set(optional_date("kpi due_date", k.due_date.as_deref())?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
    }
    insert_all(conn, rows).await?;
    Ok(())
}

async fn insert_revenue_plan<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    entries: &[RevenuePlanInput],
) -> Result<(), DomainError> {
    let rows: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(index, e)| revenue_plan_entry::ActiveModel {
            contract_id: Set(contract_id),
            label: Set(e.label.clone()),
            year2024: Set(e.year2024),
            year2025: Set(e.year2025),
            year2026: Set(e.year2026),
            year2027: Set(e.year2027),
            year2028: Set(e.year2028),
            year2029: Set(e.year2029),
            sort_order: Set(index as i32),
            ..Default::default()
        })
        .collect();
    insert_all(conn, rows).await?;
    Ok(())
}

async fn insert_report_duties<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    duties: &[ReportDutyInput],
) -> Result<(), DomainError> {
    let rows: Vec<_> = duties
        .iter()
        .enumerate()
        .map(|(index, d)| report_duty::ActiveModel {
            contract_id: Set(contract_id),
            report_type: Set(d.report_type.clone()),
            year2024: Set(normalize_text(d.year2024.clone())),
            year2025: Set(normalize_text(d.year2025.clone())),
            year2026: Set(normalize_text(d.year2026.clone())),
            year2027: Set(normalize_text(d.year2027.clone())),
            year2028: Set(normalize_text(d.year2028.clone())),
            year2029: Set(normalize_text(d.year2029.clone())),
            remarks: Set(normalize_text(d.remarks.clone())),
            sort_order: Set(index as i32),
            ..Default::default()
        })
        .collect();
    insert_all(conn, rows).await?;
    Ok(())
}

async fn insert_proof_of_use<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    items: &[ProofOfUseInput],
) -> Result<(), DomainError> {
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        rows.push(proof_of_use_item::ActiveModel {
            contract_id: Set(contract_id),
            sequence_number: Set(item.sequence_number),
            due_date: Set(require_date("proof_of_use due_date", &item.due_date)?),
            proof_type: Set(item.proof_type.clone()),
            auditor_required: Set(item.auditor_required),
            sort_order: Set(index as i32),
            ..Default::default()
        });
    }
    insert_all(conn, rows).await?;
    Ok(())
}

async fn insert_checklist<C: ConnectionTrait>(
    conn: &C,
    contract_id: i32,
    items: &[ChecklistItemInput],
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    let rows: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(index, item)| checklist_item::ActiveModel {
            contract_id: Set(contract_id),
            category: Set(item.category.clone()),
            label: Set(item.label.clone()),
            assignee: Set(normalize_text(item.assignee.clone())),
            remark: Set(normalize_text(item.remark.clone())),
            is_completed: Set(item.is_completed),
            completed_at: Set(item.is_completed.then_some(now)),
            sort_order: Set(index as i32),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .collect();
    insert_all(conn, rows).await?;
    Ok(())
}

// Stored child rows reduced to their history descriptions

async fn deadline_items<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<DeadlineItem>, DbErr> {
    let rows = deadline::Entity::find()
        .filter(deadline::Column::ContractId.eq(id))
        .order_by_asc(deadline::Column::Id)
        .all(conn)
        .await?;
    Ok(rows.iter().map(DeadlineItem::from).collect())
}

async fn kpi_items<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<KpiItem>, DbErr> {
    let rows = contract_kpi::Entity::find()
        .filter(contract_kpi::Column::ContractId.eq(id))
        .order_by_asc(contract_kpi::Column::Id)
        .find_also_related(kpi_type::Entity)
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(kpi, kpi_type)| KpiItem {
            kpi_type_name: kpi_type.map(|t| t.name),
            target_value: Some(kpi.target_value),
        })
        .collect())
}

async fn revenue_items<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<RevenuePlanItem>, DbErr> {
    let rows = revenue_plan_entry::Entity::find()
        .filter(revenue_plan_entry::Column::ContractId.eq(id))
        .order_by_asc(revenue_plan_entry::Column::SortOrder)
        .all(conn)
        .await?;
    Ok(rows.iter().map(RevenuePlanItem::from).collect())
}

async fn report_duty_items<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<ReportDutyItem>, DbErr> {
    let rows = report_duty::Entity::find()
        .filter(report_duty::Column::ContractId.eq(id))
        .order_by_asc(report_duty::Column::SortOrder)
        .all(conn)
        .await?;
    Ok(rows.iter().map(ReportDutyItem::from).collect())
}

async fn proof_items<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<ProofOfUseEntry>, DbErr> {
    let rows = proof_of_use_item::Entity::find()
        .filter(proof_of_use_item::Column::ContractId.eq(id))
        .order_by_asc(proof_of_use_item::Column::SequenceNumber)
        .all(conn)
        .await?;
    Ok(rows.iter().map(ProofOfUseEntry::from).collect())
}

async fn checklist_entries<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<ChecklistEntry>, DbErr> {
    let rows = checklist_item::Entity::find()
        .filter(checklist_item::Column::ContractId.eq(id))
        .order_by_asc(checklist_item::Column::SortOrder)
        .all(conn)
        .await?;
    Ok(rows.iter().map(ChecklistEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn vat_is_derived_from_net() {
        assert_eq!(
            derive_revenue(Some(1000.0)),
            (Some(1000.0), Some(190.0), Some(1190.0))
        );
        assert_eq!(derive_revenue(Some(0.0)), (None, None, None));
        assert_eq!(derive_revenue(None), (None, None, None));
    }

    #[test]
    fn refund_deadline_is_appended_once() {
        let date = Utc.with_ymd_and_hms(2026, 6, 30, 0, 0, 0).unwrap();
        let deadlines = with_refund_deadline(Vec::new(), Some(date));
        assert_eq!(deadlines.len(), 1);
        assert_eq!(deadlines[0].deadline_type, "SONSTIGES");
        assert_eq!(deadlines[0].custom_label.as_deref(), Some(REFUND_DEADLINE_LABEL));

        let again = with_refund_deadline(deadlines.clone(), Some(date));
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn no_refund_date_no_extra_deadline() {
        assert!(with_refund_deadline(Vec::new(), None).is_empty());
    }
}
