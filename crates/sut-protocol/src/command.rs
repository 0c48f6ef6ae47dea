//! Commands understood by the SUT agent
//!
//! Each command is sent as a single line terminated by `\r\n`. The only
//! command that carries a body is `push`, whose raw payload follows the
//! command line immediately.
//!
//! # Command Set
//!
//! | Command              | Reply                                   |
//! |----------------------|-----------------------------------------|
//! | `clok`               | device clock in milliseconds            |
//! | `ver`                | agent version string                    |
//! | `isdir <path>`       | `TRUE` or `FALSE`                       |
//! | `ls <path>`          | one directory entry per line            |
//! | `rm <path>`          | empty on success                        |
//! | `rmdr <path>`        | empty on success                        |
//! | `push <path> <len>`  | digest of the received file             |
//! | `info <topic>`       | topic header line, then the value lines |
//! | `exec <cmd>`         | command output                          |
//! | `rebt`               | nothing (the agent goes away)           |
//! | `updt <pkg> <apk>`   | installer output (the agent restarts)   |
//! | `kill <process>`     | kill output                             |

use bytes::Bytes;

use crate::error::ProtocolError;

/// Port the SUT agent listens on for commands.
pub const DEFAULT_PORT: u16 = 20701;

/// A single command sent to the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SutCommand {
    /// Read the device clock
    Clock,
    /// Read the agent version
    Version,
    /// Check whether a directory exists
    IsDir(String),
    /// List a directory
    List(String),
    /// Remove a file
    Remove(String),
    /// Remove a directory recursively
    RemoveDir(String),
    /// Write a file on the device
    Push {
        /// Destination path on the device
        path: String,
        /// File contents
        data: Bytes,
    },
    /// Query device information for a topic (e.g. `screen`)
    Info(String),
    /// Run a shell command on the device
    Exec(String),
    /// Reboot the device
    Reboot,
    /// Install a new agent package that is already on the device
    Update {
        /// Package name of the agent
        package: String,
        /// Path to the package file on the device
        apk: String,
    },
    /// Kill a process by name
    Kill(String),
}

impl SutCommand {
    /// Short verb for logging
    pub fn verb(&self) -> &'static str {
        match self {
            SutCommand::Clock => "clok",
            SutCommand::Version => "ver",
            SutCommand::IsDir(_) => "isdir",
            SutCommand::List(_) => "ls",
            SutCommand::Remove(_) => "rm",
            SutCommand::RemoveDir(_) => "rmdr",
            SutCommand::Push { .. } => "push",
            SutCommand::Info(_) => "info",
            SutCommand::Exec(_) => "exec",
            SutCommand::Reboot => "rebt",
            SutCommand::Update { .. } => "updt",
            SutCommand::Kill(_) => "kill",
        }
    }

    /// Render the command line, without the trailing `\r\n`
    ///
    /// Returns an error if an argument would break the line framing.
    pub fn line(&self) -> Result<String, ProtocolError> {
        let line = match self {
            SutCommand::Clock | SutCommand::Version | SutCommand::Reboot => {
                self.verb().to_string()
            }
            SutCommand::IsDir(arg)
            | SutCommand::List(arg)
            | SutCommand::Remove(arg)
            | SutCommand::RemoveDir(arg)
            | SutCommand::Info(arg)
            | SutCommand::Exec(arg)
            | SutCommand::Kill(arg) => format!("{} {}", self.verb(), checked(arg)?),
            SutCommand::Push { path, data } => {
                format!("push {} {}", checked(path)?, data.len())
            }
            SutCommand::Update { package, apk } => {
                format!("updt {} {}", checked(package)?, checked(apk)?)
            }
        };
        Ok(line)
    }

    /// Payload that follows the command line, if any
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            SutCommand::Push { data, .. } => Some(data),
            _ => None,
        }
    }
}

fn checked(arg: &str) -> Result<&str, ProtocolError> {
    if arg.is_empty() || arg.contains(['\r', '\n', '\0']) {
        return Err(ProtocolError::InvalidArgument(arg.to_string()));
    }
    Ok(arg)
}
