//! Seed the database with demo users, customers, and invoices.
//!
//! This command reads a YAML fixture describing users (tenants) with their
//! nested customers and invoices, validates the whole file up front, and
//! inserts whatever does not already exist. Passwords are hashed with the
//! same Argon2 parameters the dashboard uses, so seeded accounts can log in.
//!
//! # Fixture Format
//!
//! ```yaml
//! users:
//!   - name: Demo Owner
//!     email: demo@ledgerboard.test
//!     password: demo-password-123
//!     customers:
//!       - name: Evil Rabbit
//!         email: evil@rabbit.test
//!         invoices:
//!           - amount: "666.66"
//!             status: pending
//!           - amount: "15.00"
//!             status: paid
//!             date: 2026-06-14
//! ```

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use ledgerboard_core::{Cents, Email, InvoiceStatus, TenantId};
use ledgerboard_dashboard::db::{self, RepositoryError, UserRepository};
use ledgerboard_dashboard::models::NewTenant;
use ledgerboard_dashboard::services::auth;

/// Image path stored for seeded customers, same as dashboard-created ones.
const DEFAULT_AVATAR: &str = "/static/customers/default-avatar.svg";

/// Minimum password length accepted by the dashboard signup form.
const MIN_PASSWORD_CHARS: usize = 6;

/// Top-level seed fixture.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    pub users: Vec<SeedUser>,
}

/// A user (tenant) with nested customers.
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub customers: Vec<SeedCustomer>,
}

/// A customer with nested invoices.
#[derive(Debug, Deserialize)]
pub struct SeedCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub invoices: Vec<SeedInvoice>,
}

/// A single invoice.
#[derive(Debug, Deserialize)]
pub struct SeedInvoice {
    /// Decimal dollar amount, e.g. `"250.00"`.
    pub amount: String,
    /// `pending` or `paid`.
    pub status: String,
    /// Issue date; today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Seed the database from a YAML fixture.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or validated, or database operations fail.
pub async fn run(
    file_path: &str,
    database_url_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = match database_url_override {
        Some(value) => SecretString::from(value),
        None => database_url()?,
    };

    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed fixture from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let config: SeedConfig = serde_yaml::from_str(&content)?;

    info!(users = config.users.len(), "Parsed fixture");

    let errors = validate_config(&config);
    if !errors.is_empty() {
        error!("Fixture validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!("Fixture validated successfully");

    // Connect to database
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = seed_all(&pool, &config).await?;

    info!("Seeding complete!");
    info!(
        "  Users: {} inserted, {} already existed",
        summary.users_inserted, summary.users_skipped
    );
    info!(
        "  Customers: {} inserted, {} already existed",
        summary.customers_inserted, summary.customers_skipped
    );
    info!(
        "  Invoices: {} inserted, {} skipped",
        summary.invoices_inserted, summary.invoices_skipped
    );

    Ok(())
}

/// Counts of what the seeding pass did.
#[derive(Debug, Default)]
struct SeedSummary {
    users_inserted: usize,
    users_skipped: usize,
    customers_inserted: usize,
    customers_skipped: usize,
    invoices_inserted: usize,
    invoices_skipped: usize,
}

/// Validate the whole fixture, returning every problem found.
fn validate_config(config: &SeedConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for user in &config.users {
        if Email::parse(&user.email).is_err() {
            errors.push(format!("user '{}': invalid email '{}'", user.name, user.email));
        }
        if user.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push(format!(
                "user '{}': password must be at least {MIN_PASSWORD_CHARS} characters",
                user.name
            ));
        }

        for customer in &user.customers {
            if Email::parse(&customer.email).is_err() {
                errors.push(format!(
                    "customer '{}': invalid email '{}'",
                    customer.name, customer.email
                ));
            }

            for invoice in &customer.invoices {
                match Decimal::from_str(&invoice.amount) {
                    Ok(amount) if amount > Decimal::ZERO => {
                        if Cents::from_dollars(amount).is_none() {
                            errors.push(format!(
                                "customer '{}': amount '{}' out of range",
                                customer.name, invoice.amount
                            ));
                        }
                    }
                    _ => errors.push(format!(
                        "customer '{}': invalid amount '{}'",
                        customer.name, invoice.amount
                    )),
                }
                if InvoiceStatus::from_str(&invoice.status).is_err() {
                    errors.push(format!(
                        "customer '{}': invalid status '{}'",
                        customer.name, invoice.status
                    ));
                }
            }
        }
    }

    errors
}

/// Insert every user, customer, and invoice the database does not have yet.
///
/// A customer that already exists (matched by tenant and email) is skipped
/// together with its invoices, so re-running the command does not duplicate
/// billing data.
async fn seed_all(
    pool: &PgPool,
    config: &SeedConfig,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let users = UserRepository::new(pool);
    let mut summary = SeedSummary::default();

    for user in &config.users {
        let email = Email::parse(&user.email)?;
        let tenant = match users
            .create(&NewTenant {
                name: user.name.clone(),
                email: email.clone(),
                password_hash: auth::hash_password(&user.password)?,
            })
            .await
        {
            Ok(tenant) => {
                summary.users_inserted += 1;
                tenant.id
            }
            Err(RepositoryError::Conflict(_)) => {
                summary.users_skipped += 1;
                users
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| format!("user '{}' vanished during seeding", user.email))?
                    .id
            }
            Err(e) => return Err(e.into()),
        };

        seed_customers(pool, tenant, user, &mut summary).await?;
    }

    Ok(summary)
}

/// Seed one user's customers and their invoices.
async fn seed_customers(
    pool: &PgPool,
    tenant: TenantId,
    user: &SeedUser,
    summary: &mut SeedSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    for customer in &user.customers {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT id FROM customers
            WHERE user_id = $1 AND email = $2
            ",
        )
        .bind(tenant.as_uuid())
        .bind(&customer.email)
        .fetch_optional(pool)
        .await?;

        if existing.is_some() {
            summary.customers_skipped += 1;
            summary.invoices_skipped += customer.invoices.len();
            continue;
        }

        let customer_id = sqlx::query_scalar::<_, Uuid>(
            r"
            INSERT INTO customers (name, email, image_url, user_id, date)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id
            ",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(DEFAULT_AVATAR)
        .bind(tenant.as_uuid())
        .fetch_one(pool)
        .await?;
        summary.customers_inserted += 1;

        for invoice in &customer.invoices {
            let amount = Decimal::from_str(&invoice.amount)
                .ok()
                .and_then(Cents::from_dollars)
                .ok_or_else(|| format!("invalid amount '{}'", invoice.amount))?;
            let status = InvoiceStatus::from_str(&invoice.status)?;
            let date = invoice
                .date
                .unwrap_or_else(|| chrono::Utc::now().date_naive());

            sqlx::query(
                r"
                INSERT INTO invoices (customer_id, amount, status, date, user_id)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(customer_id)
            .bind(amount.as_i64())
            .bind(status.as_str())
            .bind(date)
            .bind(tenant.as_uuid())
            .execute(pool)
            .await?;
            summary.invoices_inserted += 1;
        }
    }

    Ok(())
}

fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    if let Ok(value) = std::env::var("DASHBOARD_DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err("DASHBOARD_DATABASE_URL not set".into())
}
