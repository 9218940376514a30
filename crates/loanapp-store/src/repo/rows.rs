//! Column mapping for section tables
//!
//! Each section record knows its table, the column pointing at its parent
//! and how to turn itself into column values and back. `SqliteRepo` builds
//! its statements from this description.

#![allow(clippy::result_large_err)]

use crate::errors::{json_error, Result};
use loanapp_core::model::{
    BankAccount, BusinessDetails, BusinessOwner, CoApplicant, Conclusion, Loan, OtherBusiness,
    PersonMet, SecurityDetails,
};
use rusqlite::types::{ToSql, Type};
use rusqlite::Row;
use std::str::FromStr;

/// Owned column values in `COLUMNS` order
pub type Values = Vec<Box<dyn ToSql>>;

macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$(Box::new($value) as Box<dyn ToSql>),*]
    };
}

/// A record stored in one section table
pub trait SectionRow: Sized {
    const TABLE: &'static str;
    /// `application_id` for sections of the root, `business_details_id`
    /// for the collections nested under business details
    const PARENT_COLUMN: &'static str;
    /// Data columns, excluding `id` and the parent column
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Result<Values>;

    /// Build the record from a row selected as `id, COLUMNS...`
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn json_list(column: &str, items: &[String]) -> Result<String> {
    serde_json::to_string(items).map_err(|e| json_error(column, e))
}

pub(crate) fn parse_json_list(row: &Row<'_>, column: &str) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index(column).unwrap_or_default(),
            Type::Text,
            Box::new(e),
        )
    })
}

fn parse_label<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(column)?;
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index(column).unwrap_or_default(),
            Type::Text,
            e.into(),
        )
    })
}

fn parse_opt_label<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match row.get::<_, Option<String>>(column)? {
        None => Ok(None),
        Some(_) => parse_label(row, column).map(Some),
    }
}

impl SectionRow for BusinessDetails {
    const TABLE: &'static str = "business_details";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &[
        "business_name",
        "ownership_type",
        "business_address",
        "visit_address",
        "gst_number",
        "business_location",
        "gps_location",
        "shop_ownership",
        "rent_amount",
        "business_relates_to",
        "business_since_year",
        "turnover",
        "net_income",
        "stock_value",
        "txn_type",
        "staff_count",
        "monthly_salary",
        "creditors_payment_time",
        "debtors_payment_time",
        "payment_modes",
        "purchase_area",
        "sale_area",
    ];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.business_name.clone(),
            self.ownership_type.clone(),
            self.business_address.clone(),
            self.visit_address.clone(),
            self.gst_number.clone(),
            self.business_location.clone(),
            self.gps_location.clone(),
            self.shop_ownership.clone(),
            self.rent_amount.clone(),
            self.business_relates_to.clone(),
            self.business_since_year,
            self.turnover.clone(),
            self.net_income.clone(),
            self.stock_value.clone(),
            self.txn_type.clone(),
            self.staff_count,
            self.monthly_salary.clone(),
            self.creditors_payment_time.clone(),
            self.debtors_payment_time.clone(),
            json_list("payment_modes", &self.payment_modes)?,
            self.purchase_area.clone(),
            self.sale_area.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            business_name: row.get("business_name")?,
            ownership_type: row.get("ownership_type")?,
            business_address: row.get("business_address")?,
            visit_address: row.get("visit_address")?,
            gst_number: row.get("gst_number")?,
            business_location: row.get("business_location")?,
            gps_location: row.get("gps_location")?,
            shop_ownership: row.get("shop_ownership")?,
            rent_amount: row.get("rent_amount")?,
            business_relates_to: row.get("business_relates_to")?,
            business_since_year: row.get("business_since_year")?,
            turnover: row.get("turnover")?,
            net_income: row.get("net_income")?,
            stock_value: row.get("stock_value")?,
            txn_type: row.get("txn_type")?,
            staff_count: row.get("staff_count")?,
            monthly_salary: row.get("monthly_salary")?,
            creditors_payment_time: row.get("creditors_payment_time")?,
            debtors_payment_time: row.get("debtors_payment_time")?,
            payment_modes: parse_json_list(row, "payment_modes")?,
            purchase_area: row.get("purchase_area")?,
            sale_area: row.get("sale_area")?,
        })
    }
}

impl SectionRow for BusinessOwner {
    const TABLE: &'static str = "business_owners";
    const PARENT_COLUMN: &'static str = "business_details_id";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn values(&self) -> Result<Values> {
        Ok(values![self.name.clone()])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
        })
    }
}

impl SectionRow for PersonMet {
    const TABLE: &'static str = "persons_met";
    const PARENT_COLUMN: &'static str = "business_details_id";
    const COLUMNS: &'static [&'static str] = &["name", "phone"];

    fn values(&self) -> Result<Values> {
        Ok(values![self.name.clone(), self.phone.clone()])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            phone: row.get("phone")?,
        })
    }
}

impl SectionRow for CoApplicant {
    const TABLE: &'static str = "co_applicants";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &[
        "involvement_type",
        "business_name",
        "business_address",
        "registered_name",
        "business_relates_to",
        "business_since_year",
        "turnover",
        "net_income",
        "stock_value",
        "txn_type",
        "staff_count",
        "monthly_salary",
        "employer_name",
        "position",
        "yearly_salary",
        "duration",
        "other_details",
    ];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.involvement_type.as_str(),
            self.business_name.clone(),
            self.business_address.clone(),
            self.registered_name.clone(),
            self.business_relates_to.clone(),
            self.business_since_year,
            self.turnover.clone(),
            self.net_income.clone(),
            self.stock_value.clone(),
            self.txn_type.clone(),
            self.staff_count,
            self.monthly_salary.clone(),
            self.employer_name.clone(),
            self.position.clone(),
            self.yearly_salary.clone(),
            self.duration.clone(),
            self.other_details.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            involvement_type: parse_label(row, "involvement_type")?,
            business_name: row.get("business_name")?,
            business_address: row.get("business_address")?,
            registered_name: row.get("registered_name")?,
            business_relates_to: row.get("business_relates_to")?,
            business_since_year: row.get("business_since_year")?,
            turnover: row.get("turnover")?,
            net_income: row.get("net_income")?,
            stock_value: row.get("stock_value")?,
            txn_type: row.get("txn_type")?,
            staff_count: row.get("staff_count")?,
            monthly_salary: row.get("monthly_salary")?,
            employer_name: row.get("employer_name")?,
            position: row.get("position")?,
            yearly_salary: row.get("yearly_salary")?,
            duration: row.get("duration")?,
            other_details: row.get("other_details")?,
        })
    }
}

impl SectionRow for OtherBusiness {
    const TABLE: &'static str = "other_businesses";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &[
        "business_name",
        "owner_name",
        "address",
        "relationship",
        "yearly_income",
        "vintage_year",
        "remarks",
    ];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.business_name.clone(),
            self.owner_name.clone(),
            self.address.clone(),
            self.relationship.clone(),
            self.yearly_income.clone(),
            self.vintage_year,
            self.remarks.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            business_name: row.get("business_name")?,
            owner_name: row.get("owner_name")?,
            address: row.get("address")?,
            relationship: row.get("relationship")?,
            yearly_income: row.get("yearly_income")?,
            vintage_year: row.get("vintage_year")?,
            remarks: row.get("remarks")?,
        })
    }
}

impl SectionRow for Loan {
    const TABLE: &'static str = "loans";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &["loan_type", "bank_name", "loan_amount", "emi"];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.loan_type.clone(),
            self.bank_name.clone(),
            self.loan_amount.clone(),
            self.emi.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            loan_type: row.get("loan_type")?,
            bank_name: row.get("bank_name")?,
            loan_amount: row.get("loan_amount")?,
            emi: row.get("emi")?,
        })
    }
}

impl SectionRow for BankAccount {
    const TABLE: &'static str = "bank_accounts";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &["bank_name", "branch", "account_type", "cc_limit"];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.bank_name.clone(),
            self.branch.clone(),
            self.account_type.clone(),
            self.cc_limit.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            bank_name: row.get("bank_name")?,
            branch: row.get("branch")?,
            account_type: row.get("account_type")?,
            cc_limit: row.get("cc_limit")?,
        })
    }
}

impl SectionRow for SecurityDetails {
    const TABLE: &'static str = "security_details";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &[
        "house_address",
        "house_area",
        "house_market_value",
        "house_ownership",
        "other_house_owner",
        "amount_required",
        "end_use",
        "other_end_use",
    ];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.house_address.clone(),
            self.house_area.clone(),
            self.house_market_value.clone(),
            self.house_ownership.clone(),
            self.other_house_owner.clone(),
            self.amount_required.clone(),
            self.end_use.clone(),
            self.other_end_use.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            house_address: row.get("house_address")?,
            house_area: row.get("house_area")?,
            house_market_value: row.get("house_market_value")?,
            house_ownership: row.get("house_ownership")?,
            other_house_owner: row.get("other_house_owner")?,
            amount_required: row.get("amount_required")?,
            end_use: row.get("end_use")?,
            other_end_use: row.get("other_end_use")?,
        })
    }
}

impl SectionRow for Conclusion {
    const TABLE: &'static str = "conclusions";
    const PARENT_COLUMN: &'static str = "application_id";
    const COLUMNS: &'static [&'static str] = &[
        "general_observation",
        "nearby_person1",
        "nearby_person2",
        "sale_invoices",
        "purchase_invoices",
        "business_setup",
        "stock_pictures",
        "signboard",
        "biz_registration",
        "education_proof",
        "true_caller_name",
        "qr_availability",
        "qr_other_owner",
        "signboard_contact",
        "signboard_contact_other",
        "electricity_bill",
        "rent_agreement",
        "commercial_vehicle",
        "other_findings",
        "overall_status",
        "status_remark",
    ];

    fn values(&self) -> Result<Values> {
        Ok(values![
            self.general_observation.clone(),
            self.nearby_person1.clone(),
            self.nearby_person2.clone(),
            self.sale_invoices.clone(),
            self.purchase_invoices.clone(),
            self.business_setup.clone(),
            self.stock_pictures.clone(),
            self.signboard.clone(),
            self.biz_registration.clone(),
            self.education_proof.clone(),
            self.true_caller_name.clone(),
            self.qr_availability.clone(),
            self.qr_other_owner.clone(),
            self.signboard_contact.clone(),
            self.signboard_contact_other.clone(),
            self.electricity_bill.clone(),
            self.rent_agreement.clone(),
            self.commercial_vehicle.clone(),
            self.other_findings.clone(),
            self.overall_status.map(|s| s.as_str()),
            self.status_remark.clone(),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            general_observation: row.get("general_observation")?,
            nearby_person1: row.get("nearby_person1")?,
            nearby_person2: row.get("nearby_person2")?,
            sale_invoices: row.get("sale_invoices")?,
            purchase_invoices: row.get("purchase_invoices")?,
            business_setup: row.get("business_setup")?,
            stock_pictures: row.get("stock_pictures")?,
            signboard: row.get("signboard")?,
            biz_registration: row.get("biz_registration")?,
            education_proof: row.get("education_proof")?,
            true_caller_name: row.get("true_caller_name")?,
            qr_availability: row.get("qr_availability")?,
            qr_other_owner: row.get("qr_other_owner")?,
            signboard_contact: row.get("signboard_contact")?,
            signboard_contact_other: row.get("signboard_contact_other")?,
            electricity_bill: row.get("electricity_bill")?,
            rent_agreement: row.get("rent_agreement")?,
            commercial_vehicle: row.get("commercial_vehicle")?,
            other_findings: row.get("other_findings")?,
            overall_status: parse_opt_label(row, "overall_status")?,
            status_remark: row.get("status_remark")?,
        })
    }
}
