use clap::Subcommand;
use vitaquest_core::MealNutrition;

#[derive(Subcommand)]
pub enum MealAction {
    /// Log a meal for a date (defaults to today)
    Log {
        name: String,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        #[arg(long, default_value_t = 0.0)]
        carbohydrates: f64,
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
        #[arg(long, default_value_t = 0.0)]
        fiber: f64,
        #[arg(long)]
        date: Option<String>,
    },
    /// Show a day's summary (defaults to today)
    Show {
        #[arg(long)]
        date: Option<String>,
    },
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub async fn run(action: MealAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = crate::common::open_context().await?;

    match action {
        MealAction::Log {
            name,
            protein,
            calories,
            carbohydrates,
            fat,
            fiber,
            date,
        } => {
            let date = date.unwrap_or_else(today);
            let totals = ctx.log_meal(
                &date,
                MealNutrition {
                    name,
                    protein,
                    calories,
                    carbohydrates,
                    fat,
                    fiber,
                },
            );
            println!("{date}: {}", serde_json::to_string(&totals)?);
        }
        MealAction::Show { date } => {
            let date = date.unwrap_or_else(today);
            match ctx.daily_summary(&date) {
                Some(day) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "date": day.date,
                            "meals": day.meals,
                            "totals": day.totals(),
                            "goalsMet": day.goals_met(&ctx.nutrient_goals()),
                        }))?
                    );
                }
                None => println!("No meals logged for {date}"),
            }
        }
    }

    ctx.flush().await;
    Ok(())
}
