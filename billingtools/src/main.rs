use anyhow::Result;
use billing_common::{Money, Secret};
use billing_engine::{
    db_types::{NewOrderItem, NewProduct, PaymentMethod},
    payment_objects::PaymentRequest,
};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;

mod client;
mod formatting;

use client::BillingClient;
use formatting::{
    format_confirmation,
    format_order,
    format_orders,
    format_payments,
    format_payments_result,
    format_products,
};

#[derive(Parser, Debug)]
#[command(version, about = "Command-line client for the billing server")]
pub struct Arguments {
    /// The base url of the billing server
    #[arg(short, long, env = "BILLING_SERVER_URL", default_value = "http://127.0.0.1:8460")]
    server: String,
    /// The admin token. Only needed for admin commands.
    #[arg(short, long, env = "BILLING_ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(name = "health", about = "Check that the server is up")]
    Health,
    #[clap(name = "products", about = "List the product catalog")]
    Products,
    #[clap(name = "add-product", about = "Add a product to the catalog (admin)")]
    AddProduct(AddProductParams),
    #[clap(name = "create-order", about = "Place an order")]
    CreateOrder(CreateOrderParams),
    #[clap(name = "order", about = "Show an order, its items and its total")]
    Order { id: i64 },
    #[clap(name = "orders", about = "List all orders (admin)")]
    Orders,
    #[clap(name = "pay", about = "Record a payment against an order")]
    Pay(PayParams),
    #[clap(name = "payments", about = "List the payments for an order (admin)")]
    Payments { order_id: i64 },
    #[clap(name = "set-payment-status", about = "Change the status of a payment (admin)")]
    SetPaymentStatus {
        payment_id: i64,
        /// The new status. Use `paid` to make the order eligible for confirmation.
        status: String,
    },
    #[clap(name = "confirm", about = "Run the confirmation workflow for an order (admin)")]
    Confirm { order_id: i64 },
    #[clap(name = "complete", about = "Mark a confirmed order as completed (admin)")]
    Complete { order_id: i64 },
}

#[derive(Debug, Args)]
pub struct AddProductParams {
    #[arg(short, long)]
    name: String,
    /// The unit cost, e.g. 19.99
    #[arg(short, long)]
    cost: Money,
    #[arg(long, default_value = "")]
    content: String,
}

#[derive(Debug, Args)]
pub struct CreateOrderParams {
    /// Items as product_id[:quantity], e.g. `1:2 2`
    #[arg(required = true, value_parser = parse_item)]
    items: Vec<NewOrderItem>,
}

#[derive(Debug, Args)]
pub struct PayParams {
    /// The order being paid
    #[arg(short, long)]
    order: i64,
    /// card, bank_transfer or paypal
    #[arg(short, long, default_value = "card", value_parser = parse_method)]
    method: PaymentMethod,
    /// The amount paid. Defaults to the order total.
    #[arg(short, long)]
    amount: Option<Money>,
    /// Defaults to `pending`
    #[arg(short, long)]
    status: Option<String>,
}

fn parse_item(s: &str) -> Result<NewOrderItem, String> {
    let (product, quantity) = match s.split_once(':') {
        Some((p, q)) => (p, q.parse::<i64>().map_err(|e| format!("Invalid quantity in '{s}'. {e}"))?),
        None => (s, 1),
    };
    let product = product.parse::<i64>().map_err(|e| format!("Invalid product id in '{s}'. {e}"))?;
    Ok(NewOrderItem::new(product, quantity))
}

fn parse_method(s: &str) -> Result<PaymentMethod, String> {
    s.parse::<PaymentMethod>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Arguments) -> Result<()> {
    let client = BillingClient::new(&cli.server, cli.token.map(Secret::new))?;
    match cli.command {
        Command::Health => println!("{}", client.health().await?),
        Command::Products => println!("{}", format_products(&client.products().await?)),
        Command::AddProduct(params) => {
            let product = NewProduct::new(params.name, params.content, params.cost);
            let product = client.add_product(&product).await?;
            println!("Product #{} ({}) added at {}", product.id, product.name, product.cost);
        },
        Command::CreateOrder(params) => println!("{}", format_order(&client.create_order(params.items).await?)?),
        Command::Order { id } => println!("{}", format_order(&client.order(id).await?)?),
        Command::Orders => println!("{}", format_orders(&client.orders().await?)),
        Command::Pay(params) => {
            let mut request = PaymentRequest::new(params.order).with_method(params.method);
            if let Some(amount) = params.amount {
                request = request.with_amount(amount);
            }
            if let Some(status) = params.status {
                request = request.with_status(status);
            }
            let payment = client.pay(&request).await?;
            println!("{}", format_payments(&[payment]));
        },
        Command::Payments { order_id } => {
            println!("{}", format_payments_result(&client.payments_for_order(order_id).await?)?)
        },
        Command::SetPaymentStatus { payment_id, status } => {
            let payment = client.set_payment_status(payment_id, &status).await?;
            println!("{}", format_payments(&[payment]));
        },
        Command::Confirm { order_id } => println!("{}", format_confirmation(&client.confirm(order_id).await?)),
        Command::Complete { order_id } => {
            let order = client.complete(order_id).await?;
            println!("Order #{} is now {}", order.id, order.status);
        },
    }
    Ok(())
}
