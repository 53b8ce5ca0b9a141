use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about, propagate_version = true)]
pub struct Cli {
    #[clap(long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// API key for the exchange-rate service.
    #[clap(long, env = "EXCHANGE_RATE_API_KEY")]
    pub exchange_rate_api_key: Option<String>,

    /// Bearer token for the AI gateway.
    #[clap(long, env = "AI_GATEWAY_API_KEY")]
    pub ai_gateway_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on.
        #[clap(long, env = "BIND", default_value = "127.0.0.1:8080")]
        bind: String,
    },

    /// Search nearby places around a coordinate and print the ranked list.
    Nearby {
        #[clap(long, allow_negative_numbers = true)]
        latitude: f64,

        #[clap(long, allow_negative_numbers = true)]
        longitude: f64,

        /// Search radius in kilometers.
        #[clap(long, default_value = "3")]
        radius_km: f64,

        /// Only show places of this category.
        #[clap(long)]
        category: Option<String>,
    },

    /// Convert an amount between two currencies.
    Convert {
        amount: rust_decimal::Decimal,

        #[clap(long, default_value = "USD")]
        from: String,

        #[clap(long, default_value = "NPR")]
        to: String,
    },

    /// Ask the travel assistant a single question.
    Chat {
        /// The question.
        message: String,
    },

    /// Generate a trip itinerary.
    Plan {
        #[clap(long)]
        interest: Option<String>,

        #[clap(long)]
        duration: Option<String>,

        #[clap(long)]
        difficulty: Option<String>,

        #[clap(long)]
        budget: Option<String>,
    },
}
