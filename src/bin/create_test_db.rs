use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finance_tracker::{
    Budget, BudgetPeriod, Category, SavingsGoal, Transaction, TransactionType, create_budget,
    create_savings_goal, create_transaction, initialize_db,
};

/// A utility for creating a test database for the REST API server of finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of transactions to generate, ending with the current month.
    #[arg(long, default_value_t = 6)]
    months: u8,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();
    let month_start = today.replace_day(1)?;

    println!("Creating transactions...");
    let mut count = 0;
    for months_ago in 0..args.months {
        // Roughly the same day in each earlier month, without overflowing short months.
        let date = today - Duration::days(30 * months_ago as i64);

        let monthly_transactions = [
            Transaction::build(4200.0, date, "Salary")
                .transaction_type(TransactionType::Income)
                .category(Category::Other),
            Transaction::build(1650.0, date, "Rent").category(Category::Housing),
            Transaction::build(132.40, date, "Groceries").category(Category::FoodAndDining),
            Transaction::build(4.50, date, "Coffee").category(Category::FoodAndDining),
            Transaction::build(48.0, date, "Bus pass").category(Category::Transportation),
            Transaction::build(89.95, date, "Power bill").category(Category::Utilities),
            Transaction::build(15.99, date, "Streaming subscription")
                .category(Category::Entertainment),
        ];

        for transaction in monthly_transactions {
            create_transaction(transaction, &conn)?;
            count += 1;
        }
    }
    println!("Created {count} transactions.");

    println!("Creating budgets...");
    for budget in [
        Budget::build(
            Category::FoodAndDining,
            160.0,
            BudgetPeriod::Monthly,
            month_start,
        ),
        Budget::build(
            Category::Entertainment,
            20.0,
            BudgetPeriod::Weekly,
            month_start,
        ),
        Budget::build(Category::Travel, 3000.0, BudgetPeriod::Yearly, month_start),
    ] {
        create_budget(budget, &conn)?;
    }

    println!("Creating savings goals...");
    for goal in [
        SavingsGoal::build("Emergency fund", 10000.0).current_amount(3500.0),
        SavingsGoal::build("Japan trip", 6000.0)
            .current_amount(1200.0)
            .target_date(Some(today + Duration::days(240))),
        SavingsGoal::build("New laptop", 2500.0).current_amount(2500.0),
    ] {
        create_savings_goal(goal, &conn)?;
    }

    println!("Success!");

    Ok(())
}
