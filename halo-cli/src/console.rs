use anyhow::Result;
use halo_runner::ConversationRunner;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub async fn run_chat(runner: &ConversationRunner, session_id: &str, channel: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Halo Console");
    println!("Session: {session_id} ({channel})");
    println!("Type your message and press Enter. Ctrl+C to exit.\n");

    loop {
        match rl.readline("User -> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match runner.run_conversation(session_id, line, channel, Default::default()).await {
                    Ok(state) => {
                        println!("\nAgent -> {}", state.assistant_response.unwrap_or_default());
                        if state.handoff_to_human {
                            println!("(forwarded to a human agent)");
                        }
                        println!();
                    }
                    Err(e) => eprintln!("\nError: {e}\n"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("EOF");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    Ok(())
}
