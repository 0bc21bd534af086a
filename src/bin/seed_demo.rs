use std::{
    error::Error,
    path::Path,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use wardrobe_rs::{
    AppState,
    category::CategorySelection,
    purchase::PurchaseDraft,
    store::{SqliteDocumentStore, create_document_table},
    user::{UserId, UserProfile},
};

/// A utility for creating a demo database for manual testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user ID to store the demo data under.
    #[arg(long, default_value = "demo-user")]
    user: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;
    create_document_table(&connection)?;

    let store = SqliteDocumentStore::new(Arc::new(Mutex::new(connection)));
    let mut state = AppState::new(store, UserId::new(&args.user));
    state.load().await?;

    println!("Creating demo profile...");
    state
        .save_profile(UserProfile {
            email: format!("{}@example.com", args.user),
            name: "Demo User".to_string(),
            budget: 300.0,
            registration_date: OffsetDateTime::now_utc(),
        })
        .await?;

    println!("Creating demo categories...");
    let sneakers = state.add_custom_category("Footwear", "Sneakers").await?;

    println!("Creating demo purchases...");
    let today = OffsetDateTime::now_utc().date();

    let raincoat = state
        .create_purchase(&PurchaseDraft {
            name: "Raincoat".to_string(),
            category: CategorySelection {
                category: "Outerwear".to_string(),
                sub_category: state
                    .catalog()
                    .category("Outerwear")
                    .and_then(|category| category.subcategories.first().cloned()),
            },
            note: "end-of-season sale".to_string(),
            regular_price: "129.99".to_string(),
            paid_price: "64.99".to_string(),
            date_purchased: today,
        })
        .await?;

    let trainers = state
        .create_purchase(&PurchaseDraft {
            name: "Court Trainers".to_string(),
            category: CategorySelection {
                category: sneakers.category.clone(),
                sub_category: state
                    .catalog()
                    .category(&sneakers.category)
                    .and_then(|category| {
                        category
                            .subcategories
                            .iter()
                            .find(|sub| sub.id == sneakers.id)
                            .cloned()
                    }),
            },
            note: String::new(),
            regular_price: String::new(),
            paid_price: "89.00".to_string(),
            date_purchased: today,
        })
        .await?;

    println!("Recording demo wears...");
    state
        .record_wear(&trainers.key, OffsetDateTime::now_utc())
        .await?;

    println!("Creating demo collection...");
    let collection = state
        .create_collection("Rainy Days", "what to grab when the sky opens")
        .await?;
    state
        .add_items_to_collections(
            &[raincoat.key.clone(), trainers.key.clone()],
            &[collection.id.clone()],
        )
        .await?;

    println!("Success!");

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
