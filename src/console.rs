// file: src/console.rs
// description: interactive question loop over any line-oriented input

use crate::assistant::Assistant;
use crate::error::Result;
use crate::utils::logging::{format_assistant, format_error};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::error;

pub const EXIT_WORDS: [&str; 3] = ["quitter", "quit", "exit"];
pub const PROMPT: &str = "Votre question: ";

pub fn is_exit_word(input: &str) -> bool {
    EXIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// Asks `assistant` every non-blank line read from `reader` until an exit
/// word or end of input. Failed answers are reported and the loop goes on.
/// Returns the number of questions asked.
pub async fn run<R>(assistant: &Assistant, mut reader: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut asked = 0;

    loop {
        print!("\n{}", PROMPT);
        std::io::stdout().flush()?;

        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }
        // Invalid UTF-8 is replaced rather than ending the session.
        let line = String::from_utf8_lossy(&buffer);
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if is_exit_word(question) {
            break;
        }

        asked += 1;
        match assistant.chat(question).await {
            Ok(answer) => println!("{}", format_assistant(&answer)),
            Err(e) => {
                error!("Chat failed: {}", e);
                println!("{}", format_error(&e.to_string()));
            }
        }
    }

    println!("Fin de la session.");
    Ok(asked)
}
