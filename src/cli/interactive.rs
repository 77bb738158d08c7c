//! Interactive menu
//!
//! Reads choices line by line from any async reader so the loop can be
//! driven by stdin or by a test script. End of input exits like `3`.

use crate::cli::Result;
use guesstimate_core::Solver;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

pub const EXAMPLE_PROBLEMS: [&str; 3] = [
    "How many piano tuners are there in New York City?",
    "What's the market size for coffee shops in San Francisco?",
    "How many smartphones are sold globally per year?",
];

const MENU: &str = "\nOptions:\n1. Try example problems\n2. Enter custom problem\n3. Exit\n";

pub async fn run_menu<R, W>(solver: &Solver, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output
        .write_all(b"Guesstimate Solver - Interactive Mode\n")
        .await?;

    loop {
        output.write_all(MENU.as_bytes()).await?;
        let Some(choice) = prompt(&mut lines, &mut output, "Choose option (1-3): ").await? else {
            break;
        };

        match choice.trim() {
            "1" => {
                let mut listing = String::from("\nExample problems:\n");
                for (i, problem) in EXAMPLE_PROBLEMS.iter().enumerate() {
                    listing.push_str(&format!("{}. {}\n", i + 1, problem));
                }
                output.write_all(listing.as_bytes()).await?;

                let Some(pick) = prompt(&mut lines, &mut output, "Select problem (1-3): ").await?
                else {
                    break;
                };
                match pick.trim().parse::<usize>() {
                    Ok(n) if (1..=EXAMPLE_PROBLEMS.len()).contains(&n) => {
                        solve_and_print(solver, EXAMPLE_PROBLEMS[n - 1], &mut output).await?;
                    }
                    Ok(_) => output.write_all(b"Invalid selection\n").await?,
                    Err(_) => output.write_all(b"Invalid input\n").await?,
                }
            }
            "2" => {
                let Some(problem) =
                    prompt(&mut lines, &mut output, "Enter your guesstimate problem: ").await?
                else {
                    break;
                };
                let problem = problem.trim();
                if !problem.is_empty() {
                    solve_and_print(solver, problem, &mut output).await?;
                }
            }
            "3" => {
                output.write_all(b"Goodbye!\n").await?;
                break;
            }
            _ => output.write_all(b"Invalid option\n").await?,
        }
    }

    output.flush().await?;
    Ok(())
}

async fn prompt<R, W>(lines: &mut Lines<R>, output: &mut W, text: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(lines.next_line().await?)
}

// A failed run is reported and the menu continues.
async fn solve_and_print<W>(solver: &Solver, problem: &str, output: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output
        .write_all(format!("\nSolving: {}\n", problem).as_bytes())
        .await?;
    let text = match solver.solve(problem).await {
        Ok(report) => format!("\n{}\n", report),
        Err(e) => format!("\nError: {}\n", e),
    };
    output.write_all(text.as_bytes()).await?;
    Ok(())
}
