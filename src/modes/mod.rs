mod serve;
pub(crate) mod shared;
mod watch;

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Serve,
    Watch,
}

impl RunMode {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "watch" | "telegram" => Self::Watch,
            _ => Self::Serve,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("RUN_MODE").unwrap_or_else(|_| "serve".into()))
    }
}

pub async fn run_from_env() -> Result<()> {
    match RunMode::from_env() {
        RunMode::Serve => serve::run().await,
        RunMode::Watch => watch::run().await,
    }
}

#[cfg(test)]
mod tests {
    use super::RunMode;

    #[test]
    fn run_mode_defaults_to_serve() {
        assert_eq!(RunMode::parse("serve"), RunMode::Serve);
        assert_eq!(RunMode::parse(""), RunMode::Serve);
        assert_eq!(RunMode::parse("bogus"), RunMode::Serve);
        assert_eq!(RunMode::parse(" Watch "), RunMode::Watch);
        assert_eq!(RunMode::parse("telegram"), RunMode::Watch);
    }
}
