//! Interactive menu
//!
//! Shown when the binary is started without a subcommand. Mirrors the three
//! workflows: list chats, live forward, bulk copy.

use std::io::{self, Write};

use crate::commands::{copy, forward, list_chats};
use crate::config::Credentials;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListChats,
    Forward,
    Copy,
}

impl MenuChoice {
    /// Map console input to a workflow. Anything but "1", "2" or "3" is
    /// an invalid choice.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::ListChats),
            "2" => Some(MenuChoice::Forward),
            "3" => Some(MenuChoice::Copy),
            _ => None,
        }
    }
}

pub async fn run(credentials: &Credentials) -> Result<()> {
    println!("Choose an option:");
    println!("1. List Chats");
    println!("2. Forward Messages");
    println!("3. Copy Messages");

    let input = prompt("Enter your choice: ")?;
    let Some(choice) = MenuChoice::parse(&input) else {
        println!("Invalid choice");
        return Ok(());
    };

    match choice {
        MenuChoice::ListChats => {
            list_chats::run(credentials).await?;
        }
        MenuChoice::Forward => {
            let source = prompt_chat_id("Enter the source chat ID: ")?;
            let destination = prompt_chat_id("Enter the destination chat ID: ")?;
            println!(
                "Enter keywords if you want to forward messages with specific keywords, \
                 or leave blank to forward every message!"
            );
            let keywords = prompt("Put keywords (comma separated if multiple, or leave blank): ")?;
            forward::run(
                credentials,
                source,
                destination,
                forward::KeywordFilter::parse(&keywords),
            )
            .await?;
        }
        MenuChoice::Copy => {
            let source = prompt_chat_id("Enter the source chat ID: ")?;
            let destination = prompt_chat_id("Enter the destination chat ID: ")?;
            copy::run(credentials, source, destination, copy::default_since()).await?;
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_chat_id(label: &str) -> Result<i64> {
    let input = prompt(label)?;
    input
        .parse::<i64>()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a chat ID", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_workflows() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::ListChats));
        assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::Forward));
        assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::Copy));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(MenuChoice::parse(" 2 \n"), Some(MenuChoice::Forward));
    }

    #[test]
    fn anything_else_is_invalid() {
        for input in ["9", "0", "", "list", "1.0", "22"] {
            assert_eq!(MenuChoice::parse(input), None, "input {:?}", input);
        }
    }
}
