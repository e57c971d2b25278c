use clap::{Subcommand, ValueEnum};
use vitaquest_core::{Plan, PlanBook, Supplement, Update};

#[derive(Clone, Copy, ValueEnum)]
pub enum Category {
    Supplement,
    Training,
    Nutrition,
    Other,
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// List all plans
    List,
    /// Add a plan to a category
    Add {
        #[arg(value_enum)]
        category: Category,
        name: String,
        /// Preferred time as HH:MM
        #[arg(long, default_value = "08:00")]
        time: String,
        /// Supplement entries as "name:quantity:unit"
        #[arg(long = "supplement")]
        supplements: Vec<String>,
        #[arg(long)]
        notify: bool,
    },
}

fn parse_supplement(spec: &str) -> Result<Supplement, Box<dyn std::error::Error>> {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("invalid supplement spec: {spec}").into());
    }
    let quantity: f64 = parts.next().unwrap_or("1").parse()?;
    let unit = parts.next().unwrap_or("unit");
    Ok(Supplement::new(name, quantity, unit))
}

pub async fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = crate::common::open_context().await?;

    match action {
        PlanAction::List => {
            println!("{}", serde_json::to_string_pretty(&ctx.plans())?);
        }
        PlanAction::Add {
            category,
            name,
            time,
            supplements,
            notify,
        } => {
            let supplements = supplements
                .iter()
                .map(|s| parse_supplement(s))
                .collect::<Result<Vec<_>, _>>()?;
            let plan = Plan {
                name,
                preferred_time: time,
                supplements,
                notify,
                reason: None,
            };
            ctx.set_plans(Update::with(move |book: &PlanBook| {
                let mut book = book.clone();
                match category {
                    Category::Supplement => book.supplement.push(plan.clone()),
                    Category::Training => book.training.push(plan.clone()),
                    Category::Nutrition => book.nutrition.push(plan.clone()),
                    Category::Other => book.other.push(plan.clone()),
                }
                book
            }));
            println!("{} plan(s) stored", ctx.plans().len());
        }
    }

    ctx.flush().await;
    Ok(())
}
