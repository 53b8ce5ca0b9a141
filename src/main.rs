use clap::Parser;

mod auth;
mod category;
mod cli;
mod client;
mod currency;
mod explorer;
mod gateway;
mod geo;
mod nearby;
mod overpass;
mod prelude;
mod server;
mod tracing;

use crate::{
    cli::{Cli, Command},
    currency::{ConversionRequest, CurrencyClient},
    explorer::{Explorer, ExplorerState, LocationError},
    gateway::{
        GatewayClient,
        chatbot::{Chatbot, ChatbotRequest},
        planner::{TripPlanner, TripPreferences},
    },
    geo::GeoLocation,
    nearby::NearbySearch,
    overpass::OverpassClient,
    prelude::*,
    server::Services,
};

#[actix_web::main]
async fn main() -> Result {
    let cli = Cli::parse();
    let _guards = self::tracing::init(cli.sentry_dsn.as_deref())?;

    let client = client::build_client()?;
    let currency = CurrencyClient::new(
        client.clone(),
        cli.exchange_rate_api_key.map(secrecy::SecretString::from),
    );
    let ai_gateway =
        GatewayClient::new(client.clone(), cli.ai_gateway_api_key.map(secrecy::SecretString::from));
    let nearby = NearbySearch::new(OverpassClient(client));

    match cli.command {
        Command::Serve { bind } => {
            let services = Services {
                nearby,
                currency,
                chatbot: Chatbot(ai_gateway.clone()),
                planner: TripPlanner(ai_gateway),
            };
            server::run(&bind, services).await
        }

        Command::Nearby { latitude, longitude, radius_km, category } => {
            let center = GeoLocation { latitude, longitude };
            explore_nearby(&nearby, center, radius_km, category.as_deref()).await
        }

        Command::Convert { amount, from, to } => {
            let conversion = currency.convert(ConversionRequest { from, to, amount }).await?;
            println!(
                "{} {} = {} {} (rate: {})",
                conversion.amount, conversion.from, conversion.converted, conversion.to,
                conversion.rate,
            );
            Ok(())
        }

        Command::Chat { message } => {
            let reply =
                Chatbot(ai_gateway).reply(ChatbotRequest { message, history: Vec::new() }).await?;
            println!("{}", reply.reply);
            Ok(())
        }

        Command::Plan { interest, duration, difficulty, budget } => {
            let preferences = TripPreferences { interest, duration, difficulty, budget };
            let itinerary = TripPlanner(ai_gateway).plan(&preferences).await?;
            println!("{}", itinerary.itinerary);
            Ok(())
        }
    }
}

/// Run one explorer cycle and print the ranked list.
async fn explore_nearby(
    nearby: &NearbySearch,
    center: GeoLocation,
    radius_km: f64,
    category: Option<&str>,
) -> Result {
    if let Some(id) = category {
        category::find(id).with_context(|| format!("unknown category `{id}`"))?;
    }

    let mut explorer = Explorer::new();
    explorer.request_location();
    if (-90.0..=90.0).contains(&center.latitude) && (-180.0..=180.0).contains(&center.longitude) {
        explorer.location_granted(center);
    } else {
        explorer.location_denied(&LocationError::PositionUnavailable);
    }
    if let ExplorerState::LocationDenied { message } = explorer.state() {
        bail!("{message}");
    }
    let generation = explorer.begin_search()?;
    let result = nearby.search(center, radius_km).await;
    explorer.complete_search(generation, result);

    match explorer.state() {
        ExplorerState::PlacesReady { places, .. } => {
            let places =
                places.iter().filter(|place| category.is_none_or(|id| place.category == id));
            for place in places {
                println!(
                    "{} {} - {:.2} km ({})",
                    place.category_icon, place.name, place.distance_km, place.category,
                );
            }
            Ok(())
        }
        ExplorerState::PlacesFailed { message, .. } => bail!("{message}"),
        _ => bail!("the search did not complete"),
    }
}
