use tokio::net::TcpListener;

/// Run the echo server on `127.0.0.1:$PORT` (default 3000) for manual checks.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("echo server listening on {addr}");
    println!("  /status/{{code}}  empty body with that status");
    println!("  /reply           request body verbatim");
    println!("  anything else    request reflected as JSON");
    mock_server::run(listener).await
}
