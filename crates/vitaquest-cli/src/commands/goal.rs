use clap::Subcommand;
use vitaquest_core::Update;

#[derive(Subcommand)]
pub enum GoalAction {
    /// List selected focus areas and goal state
    List,
    /// Select a focus area
    Select { main_goal_id: String },
    /// Start working on a goal
    Start {
        main_goal_id: String,
        goal_id: String,
    },
    /// Mark a goal as finished
    Finish {
        main_goal_id: String,
        goal_id: String,
    },
}

pub async fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = crate::common::open_context().await?;

    match action {
        GoalAction::List => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "myGoals": ctx.my_goals(),
                    "activeGoals": ctx.active_goals(),
                    "finishedGoals": ctx.finished_goals(),
                }))?
            );
        }
        GoalAction::Select { main_goal_id } => {
            ctx.set_my_goals(Update::with(move |goals: &Vec<String>| {
                let mut goals = goals.clone();
                if !goals.contains(&main_goal_id) {
                    goals.push(main_goal_id.clone());
                }
                goals
            }));
            println!("Focus areas: {}", ctx.my_goals().join(", "));
        }
        GoalAction::Start {
            main_goal_id,
            goal_id,
        } => {
            let goal = ctx.start_goal(&main_goal_id, &goal_id);
            println!("Started: {}", serde_json::to_string(&goal)?);
        }
        GoalAction::Finish {
            main_goal_id,
            goal_id,
        } => {
            let finished = ctx.finish_goal(&main_goal_id, &goal_id);
            println!("Finished: {}", serde_json::to_string(&finished)?);
        }
    }

    ctx.flush().await;
    Ok(())
}
