use clap::{Args, Subcommand, ValueEnum};

use crate::domain::{DEFAULT_MAX_TOKENS, DEFAULT_MAX_TURNS, DEFAULT_TEMPERATURE};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP relay (the default when no subcommand is given)
    Serve(ServeArgs),

    /// List the models available to the configured API key
    Models,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
    #[arg(long)]
    pub public: bool,

    #[arg(long, env = "GROQ_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    #[arg(long, env = "GROQ_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Send neither temperature nor max_tokens and use the model's defaults
    #[arg(long)]
    pub omit_generation_params: bool,

    /// Number of remembered turns (user and assistant messages count separately)
    #[arg(long, env = "MAX_TURNS", default_value_t = DEFAULT_MAX_TURNS)]
    pub max_turns: usize,

    /// Forward each message on its own, without conversation history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvMode {
    Development,
    Production,
}
