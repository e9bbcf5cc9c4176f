use tokio::net::TcpListener;

/// Run the mock backend standalone for manual poking with curl.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock backend listening on {addr}");
    mock_server::run(listener).await
}
