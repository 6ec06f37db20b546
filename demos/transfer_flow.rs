use dotenvy::dotenv;
use tunebridge::{
    client::ServiceClientBuilder,
    model::{Provider, RedirectQuery},
    surface::TransferSurface,
};

struct TerminalSurface;

impl TransferSurface for TerminalSurface {
    fn navigate(&self, url: &str) {
        println!("Open this URL in your browser and approve the application: {}", url);
    }

    fn mark_logged_in(&self, provider: Provider) {
        println!("Logged in to {}", provider);
    }

    fn reveal_transfer(&self) {
        println!("Both logins complete; transfer is available");
    }

    fn alert(&self, message: &str) {
        println!("! {}", message);
    }

    fn set_status(&self, message: &str) {
        println!("{}", message);
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let service = ServiceClientBuilder::new(
        std::env::var("TUNEBRIDGE_URL").expect("transfer service URL not in environment"),
    )
    .build()
    .expect("failed to build service client");

    let gate = service.auth_gate(TerminalSurface);

    gate.start_apple_music_login().await;
    gate.start_spotify_login().await;

    println!("Paste the URL you were redirected to:");
    let mut redirect_url = String::new();
    std::io::stdin().read_line(&mut redirect_url).unwrap();

    let query = RedirectQuery::from_url(redirect_url.trim()).expect("failed to parse the redirect URL");
    gate.handle_incoming_redirect(&query).await;

    gate.start_transfer().await;
}
