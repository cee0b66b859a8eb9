use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{company, customer, employee};
use crate::schemas::CompanyRef;

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub company_id: String,
    pub customer_id: String,
    pub spending_limit: i64,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
    pub created_at: DateTime<Utc>,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(e: employee::Model) -> Self {
        Self {
            id: e.id,
            company_id: e.company_id,
            customer_id: e.customer_id,
            spending_limit: e.spending_limit,
            is_admin: e.is_admin,
            company: None,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeEnvelope {
    pub employee: EmployeeResponse,
}

/// The signed-in customer and the companies they work for
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub has_account: bool,
    pub employees: Vec<EmployeeResponse>,
}

impl CustomerResponse {
    pub fn new(
        customer: customer::Model,
        employments: Vec<(employee::Model, Option<company::Model>)>,
    ) -> Self {
        let employees = employments
            .into_iter()
            .map(|(employee, company)| EmployeeResponse {
                company: company.map(CompanyRef::from),
                ..EmployeeResponse::from(employee)
            })
            .collect();

        Self {
            id: customer.id,
            email: customer.email,
            first_name: customer.first_name,
            last_name: customer.last_name,
            has_account: customer.has_account,
            employees,
        }
    }
}
