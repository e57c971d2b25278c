use vitaquest_core::GoalDuration;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = crate::common::open_context().await?;

    println!("Level {} ({} XP)", ctx.level(), ctx.xp());
    if let Some(next) = ctx.level_table().next_threshold(ctx.xp()) {
        println!(
            "Next: level {} at {} XP ({} to go)",
            next.level,
            next.required_xp,
            next.required_xp - ctx.xp()
        );
    }

    let goals = ctx.my_goals();
    if goals.is_empty() {
        println!("No focus areas selected");
    } else {
        println!("Focus areas: {}", goals.join(", "));
    }

    for goal in ctx.active_goals() {
        // Default reporting window until per-goal durations are wired in.
        let duration = GoalDuration::new(7, vitaquest_core::DurationUnit::Days);
        if let Some(p) = ctx.progress_for(&goal.main_goal_id, duration) {
            println!(
                "  {} / {} -- {:.0}%{}",
                goal.main_goal_id,
                goal.goal_id,
                p.ratio * 100.0,
                if p.is_finished { " (finished)" } else { "" }
            );
        }
    }
    println!("Finished goals: {}", ctx.finished_goals().len());

    ctx.flush().await;
    Ok(())
}
