use microserve::config::Config;
use microserve::http::request::Request;
use microserve::router::ResponseContext;
use microserve::server::HttpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()>{
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };

    let server = app(cfg);
    tracing::info!(root = %server.static_root().display(), "Serving static files");

    tokio::select! {
        res = server.start() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Demo routes on top of the configured static root.
fn app(cfg: Config) -> HttpServer {
    let server = HttpServer::new(cfg);
    server
        .get("/world", |_: &Request, _: &mut ResponseContext| "hello world!".to_string())
        .get("/hello", |req: &Request, _: &mut ResponseContext| {
            format!("hello {} you are {} years old", req.value("name"), req.value("age"))
        })
        .get("/pi", |_: &Request, _: &mut ResponseContext| std::f64::consts::PI.to_string())
        .post("/hellopost", |req: &Request, _: &mut ResponseContext| {
            format!("hello {} this is a simple post method example", req.value("name"))
        });
    server
}
