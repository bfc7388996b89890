//! Interactive query session over the built index.
//!
//! A blocking read-eval loop, independent of the pipeline once indexing
//! completes. Each query is answered through the RAG engine and printed;
//! nothing is persisted. The literal `exit` keyword ends the session; there
//! is no in-band cancellation beyond that.

use super::RagEngine;
use crate::error::Result;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Sentinel input that terminates the session.
const EXIT_KEYWORD: &str = "exit";

/// Interactive question loop.
pub struct QuerySession {
    engine: RagEngine,
}

impl QuerySession {
    pub fn new(engine: RagEngine) -> Self {
        Self { engine }
    }

    /// Run the loop until the exit keyword or end of input.
    pub async fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("Enter query: ");
            stdout.flush()?;

            let mut input = String::new();
            let read = stdin.lock().read_line(&mut input)?;
            if read == 0 {
                // EOF behaves like exit.
                break;
            }

            let query = input.trim();

            if query.is_empty() {
                continue;
            }

            if query == EXIT_KEYWORD {
                break;
            }

            debug!("Query: {}", query);
            let response = self.engine.ask(query).await?;
            println!("{}", response.format_for_display());
            println!();
        }

        Ok(())
    }
}
