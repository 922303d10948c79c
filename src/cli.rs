use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Expected 1 argument but found {0}")]
    ArgumentCount(usize),

    #[error("Expected an integer for port, but found {0}")]
    InvalidPort(String),
}

/// Extracts the port from `args` (program name first).
pub fn parse_port<I>(args: I) -> Result<u16, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().skip(1).collect();

    let [port] = args.as_slice() else {
        return Err(UsageError::ArgumentCount(args.len()));
    };

    port.parse()
        .map_err(|_| UsageError::InvalidPort(port.clone()))
}

pub fn usage(program: &str) -> String {
    format!("Usage: {program} port\nExample: {program} 8989")
}
