use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Set,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{company, customer, employee, generate_id};
use crate::services::accounts::{normalize_email, Actor};
use crate::services::clock::SharedClock;

/// Employee records and company-admin checks
#[derive(Clone)]
pub struct EmployeeService {
    db: DbConn,
    clock: SharedClock,
}

impl EmployeeService {
    pub fn new(db: DbConn, clock: SharedClock) -> Self {
        Self { db, clock }
    }

    /// Active (not soft-deleted) company, or 404
    pub async fn require_company(&self, company_id: &str) -> Result<company::Model> {
        Company::find_by_id(company_id.to_string())
            .filter(company::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
    }

    pub async fn find_active_for_customer<C: ConnectionTrait>(
        &self,
        conn: &C,
        company_id: &str,
        customer_id: &str,
    ) -> Result<Option<employee::Model>> {
        Ok(Employee::find()
            .filter(employee::Column::CompanyId.eq(company_id))
            .filter(employee::Column::CustomerId.eq(customer_id))
            .filter(employee::Column::DeletedAt.is_null())
            .one(conn)
            .await?)
    }

    /// Active employee of the company whose customer account has this email
    pub async fn find_active_by_email(
        &self,
        company_id: &str,
        email: &str,
    ) -> Result<Option<employee::Model>> {
        Ok(Employee::find()
            .join(
                JoinType::InnerJoin,
                employee::Relation::Customer.def(),
            )
            .filter(employee::Column::CompanyId.eq(company_id))
            .filter(employee::Column::DeletedAt.is_null())
            .filter(customer::Column::Email.eq(normalize_email(email)))
            .filter(customer::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?)
    }

    /// Active employments of a customer, with their companies
    pub async fn list_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<(employee::Model, Option<company::Model>)>> {
        Ok(Employee::find()
            .filter(employee::Column::CustomerId.eq(customer_id))
            .filter(employee::Column::DeletedAt.is_null())
            .find_also_related(Company)
            .all(&self.db)
            .await?)
    }

    /// Platform admins pass; a customer must be an active admin employee of the company
    pub async fn require_company_admin(
        &self,
        actor: &Actor,
        company_id: &str,
        denied: &str,
    ) -> Result<()> {
        let customer = match actor {
            Actor::PlatformAdmin(_) => return Ok(()),
            Actor::Customer(customer) => customer,
        };

        let employee = self
            .find_active_for_customer(&self.db, company_id, &customer.id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not an employee of this company".to_string())
            })?;

        if !employee.is_admin {
            return Err(AppError::Forbidden(denied.to_string()));
        }
        Ok(())
    }

    /// Insert an employee with zero spending limit and no admin rights
    pub async fn create_employee<C: ConnectionTrait>(
        &self,
        conn: &C,
        company_id: &str,
        customer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<employee::Model> {
        let employee = employee::ActiveModel {
            id: Set(generate_id("emp")),
            company_id: Set(company_id.to_string()),
            customer_id: Set(customer_id.to_string()),
            spending_limit: Set(0),
            is_admin: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(conn)
        .await?;

        tracing::info!(
            employee_id = %employee.id,
            company_id = %company_id,
            "Employee created"
        );
        Ok(employee)
    }

    /// Soft delete an employee. Admin employees cannot be deleted.
    pub async fn delete_employee(&self, company_id: &str, employee_id: &str) -> Result<()> {
        let target = Employee::find_by_id(employee_id.to_string())
            .filter(employee::Column::CompanyId.eq(company_id))
            .filter(employee::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        if target.is_admin {
            return Err(AppError::BadRequest(
                "Cannot delete admin employees".to_string(),
            ));
        }

        // Conditional so a concurrent delete or promotion to admin is not overridden
        let now = self.clock.now();
        let result = Employee::update_many()
            .col_expr(employee::Column::DeletedAt, Expr::value(now))
            .col_expr(employee::Column::UpdatedAt, Expr::value(now))
            .filter(employee::Column::Id.eq(target.id.as_str()))
            .filter(employee::Column::DeletedAt.is_null())
            .filter(employee::Column::IsAdmin.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::BadRequest(
                "Employee was already deleted or became an admin".to_string(),
            ));
        }

        tracing::info!(employee_id = %employee_id, company_id = %company_id, "Employee deleted");
        Ok(())
    }
}
