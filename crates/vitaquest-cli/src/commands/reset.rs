use std::io::Write;

pub async fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        print!("This deletes all stored data. Type 'yes' to continue: ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if answer.trim() != "yes" {
            println!("Aborted");
            return Ok(());
        }
    }

    let ctx = crate::common::open_context().await?;
    ctx.clear_all().await?;
    println!("All data cleared");
    Ok(())
}
