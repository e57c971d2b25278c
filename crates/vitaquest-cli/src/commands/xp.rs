use clap::Subcommand;
use vitaquest_core::{Notification, Update};

#[derive(Subcommand)]
pub enum XpAction {
    /// Show current XP and level
    Show,
    /// Add XP (negative amounts allowed)
    Add { amount: i64 },
}

pub async fn run(action: XpAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = crate::common::open_context().await?;

    match action {
        XpAction::Show => {
            println!("{} XP, level {}", ctx.xp(), ctx.level());
        }
        XpAction::Add { amount } => {
            let xp = ctx.set_xp(Update::with(move |xp| xp + amount));
            println!("{xp} XP, level {}", ctx.level());
            while let Some(Notification::LevelUp { level, .. }) = ctx.poll_notification() {
                println!("Level up! You reached level {level}");
            }
        }
    }

    ctx.flush().await;
    Ok(())
}
