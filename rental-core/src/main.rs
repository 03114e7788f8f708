//! Portal operator tool
//!
//! Runs the portal state against the on-disk store under `WORK_DIR` and
//! prints results as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rental_core::booking::PaymentMethod;
use rental_core::state::OrderFilter;
use rental_core::{AppError, BookingFlow, Config, PortalState, ReceiptConfig};
use serde::Serialize;
use serde_json::json;
use shared::ApiResponse;
use shared::models::{OrderStatus, UserRole};

#[derive(Parser, Debug)]
#[command(name = "rental-core", version, about = "Campus hardware rental portal")]
struct Cli {
    /// Work directory (database and logs)
    #[arg(long, env = "WORK_DIR")]
    work_dir: Option<String>,

    /// Log level filter
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse the hardware catalog
    Catalog {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// List orders, optionally for one student
    Orders {
        #[arg(long)]
        email: Option<String>,
    },
    /// Check out hardware as a student
    Checkout {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        college_id: String,
        #[arg(long)]
        house: String,
        #[arg(long)]
        road: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        pincode: String,
        /// Comma separated hardware ids
        #[arg(long, value_delimiter = ',', required = true)]
        items: Vec<String>,
    },
    /// Move an order to the next status (as admin)
    Advance {
        #[arg(long)]
        order: String,
        #[arg(long)]
        status: String,
    },
    /// Catalog and order counters
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(work_dir) = cli.work_dir {
        config.work_dir = work_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let log_dir = config.log_dir();
    rental_core::init_logger_with_file(
        &config.log_level,
        config.log_json,
        log_dir.to_str(),
    )?;

    let state = PortalState::open(&config).context("Failed to open portal store")?;
    tracing::debug!(work_dir = %config.work_dir, "Portal state ready");

    if let Err(e) = run(cli.command, &config, &state).await {
        // Business errors are reported in the response envelope
        if let Some(app) = e.downcast_ref::<AppError>() {
            tracing::warn!(code = %app.code, category = app.code.category().name(), "Command failed");
            print_json(&ApiResponse::<()>::error(app))?;
        }
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, config: &Config, state: &PortalState) -> anyhow::Result<()> {
    match command {
        Commands::Catalog { search, category } => {
            respond(&state.search_hardware(&search, category.as_deref()))?;
        }
        Commands::Orders { email } => {
            let orders = match email {
                Some(email) => {
                    state.admin_login(&config.admin_password)?;
                    let user = state
                        .all_users()?
                        .into_iter()
                        .find(|u| u.email == email)
                        .ok_or_else(|| AppError::not_found(format!("User {}", email)))?;
                    state.orders_for_user(&user.id)
                }
                None => state.orders(),
            };
            respond(&orders)?;
        }
        Commands::Checkout {
            email,
            name,
            phone,
            college_id,
            house,
            road,
            city,
            state: region,
            pincode,
            items,
        } => {
            state.login(&email, &name, UserRole::User);
            for id in &items {
                let item = state
                    .hardware_item(id)
                    .ok_or_else(|| AppError::not_found(format!("Hardware {}", id)))?;
                state.add_to_cart(&item)?;
            }

            let mut flow = BookingFlow::new(state.clone(), &items)?
                .with_receipt_config(ReceiptConfig::from(config));
            flow.set_phone(&phone);
            flow.details_mut().college_id = college_id;

            let address = flow.address_mut();
            address.set_state(region);
            address.city = city;
            address.set_pincode(&pincode);
            address.house_no = house;
            address.road_name = road;
            if !flow.save_address() {
                print_json(flow.errors())?;
                anyhow::bail!("Invalid address");
            }

            flow.select_payment(PaymentMethod::PayOnCollection)?;
            while flow.receipt().is_none() {
                if let Err(e) = flow.next().await {
                    print_json(flow.errors())?;
                    return Err(e.into());
                }
            }
            respond(&flow.receipt())?;
        }
        Commands::Advance { order, status } => {
            let status = OrderStatus::parse(&status)
                .with_context(|| format!("Unknown status {}", status))?;
            state.admin_login(&config.admin_password)?;
            let updated = state
                .update_order_status(&order, status)?
                .ok_or_else(|| AppError::not_found(format!("Order {}", order)))?;
            respond(&updated)?;
        }
        Commands::Stats => {
            let orders = state.orders();
            let by_status: serde_json::Map<String, serde_json::Value> = OrderStatus::ALL
                .into_iter()
                .map(|s| {
                    let count = orders.iter().filter(|o| o.status == s).count();
                    (s.to_string(), json!(count))
                })
                .collect();
            respond(&json!({
                "hardware": state.hardware().len(),
                "categories": state.categories(),
                "cart": state.cart().len(),
                "orders": orders.len(),
                "ordersByStatus": by_status,
                "problemStatements": state.problem_statements().len(),
                "session": state.current_user().map(|u| u.email),
                "dashboard": state.dashboard(),
                "myActiveOrders": state.my_orders(OrderFilter::Active, "").len(),
            }))?;
        }
    }

    Ok(())
}

/// Success envelope around `data`
fn respond<T: Serialize>(data: T) -> anyhow::Result<()> {
    print_json(&ApiResponse::success(data))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
