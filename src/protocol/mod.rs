pub mod channel;
pub mod dispatcher;
pub mod parser;
pub mod tokenizer;

pub use channel::SerialChannel;
pub use dispatcher::CommandDispatcher;
pub use parser::CommandParser;
pub use tokenizer::{split_exact, split_fields, FIELD_DELIMITER};

use crate::device::Credentials;

// Command prefixes of the controller grammar
pub const PROVISION_PREFIX: &str = "PROVISION:";
pub const SET_TANKS_PREFIX: &str = "SET_TANKS:";
pub const SET_TANK_IDS_PREFIX: &str = "SET_TANK_IDS:";
pub const SET_NAME_PREFIX: &str = "SET_NAME:";
pub const SELECT_TANK_PREFIX: &str = "SELECT_TANK:";

/// Number of `|`-separated fields in a `PROVISION:` payload
pub const PROVISION_FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Provision(Credentials),
    SetTankNames(Vec<String>),
    SetTankIds(Vec<String>),
    SetName(String),
    SelectTank(String),
}

/// Why a recognised command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    FieldCount { expected: usize, found: usize },
    EmptyField,
}

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Command(Command),
    Rejected(Rejection),
    Unrecognized,
}

/// Result of dispatching one line
///
/// Only `Ack` produces output on the controller link.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Ack(String),
    Rejected(Rejection),
    Ignored,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rejection::FieldCount { expected, found } => {
                write!(f, "field count: expected {}, found {}", expected, found)
            }
            Rejection::EmptyField => write!(f, "empty field"),
        }
    }
}
